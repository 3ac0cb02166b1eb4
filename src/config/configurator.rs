//! Descriptor driven component configuration
//!
//! An integration describes what it needs as plain data (a [`Descriptor`]) and
//! [`configure`] checks it against an [`EnvTree`]. The steps always run in the
//! same order: feature flags, mandatory parameters, validators, setters, key
//! set extraction.

use crate::config::tree::{join_path, EnvTree};
use crate::error::{AppError, Result};
use crate::models::KeyRule;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

const DESTKEY: &str = "DESTKEY";
const FIELD: &str = "FIELD";

/// Mandatory scalar parameter copied into a named slot
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub path: Vec<&'static str>,
    pub slot: &'static str,
}

impl Param {
    pub fn new(path: &[&'static str], slot: &'static str) -> Self {
        Self {
            path: path.to_vec(),
            slot,
        }
    }
}

/// Validation rule evaluated against the raw tree
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Value at path must parse as an absolute URL
    AbsoluteUrl { path: Vec<&'static str> },

    /// Value at path must contain a `{{ TOKEN }}` placeholder
    Placeholder {
        path: Vec<&'static str>,
        token: &'static str,
    },
}

/// Derived state populated once validation succeeded
#[derive(Debug, Clone, PartialEq)]
pub enum Setter {
    /// Optional variable at path, or a fallback value
    Default {
        path: Vec<&'static str>,
        slot: &'static str,
        value: &'static str,
    },

    /// Strip trailing slashes of an already populated slot
    TrimTrailingSlash { slot: &'static str },
}

/// Validation contract of one integration
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Section name used in error messages, e.g. "JIRA"
    pub section: &'static str,
    pub params: Vec<Param>,
    /// Flags that must all be true for the component to be built
    pub features: Vec<Vec<&'static str>>,
    pub validators: Vec<Validator>,
    pub setters: Vec<Setter>,
    /// Path of the key set subtree, if the integration extracts fields
    pub keys: Option<Vec<&'static str>>,
}

/// Validated configuration of one integration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub name: String,
    values: BTreeMap<&'static str, String>,
    pub keys: Vec<KeyRule>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Value stored in slot
    pub fn value(&self, slot: &str) -> Result<&str> {
        self.values
            .get(slot)
            .map(String::as_str)
            .ok_or_else(|| AppError::VariableNotFound(format!("{}.{}", self.name, slot)))
    }

    pub fn set(&mut self, slot: &'static str, value: impl Into<String>) {
        self.values.insert(slot, value.into());
    }
}

/// Validate `tree` against `descriptor`
///
/// Returns `Ok(None)` when a feature flag disables the component.
pub fn configure(tree: &EnvTree, descriptor: &Descriptor) -> Result<Option<Section>> {
    for flag in &descriptor.features {
        if !tree.find_bool_unsecured(flag.as_slice()) {
            debug!(
                section = descriptor.section,
                flag = %join_path(flag.as_slice()),
                "Component disabled by feature flag"
            );
            return Ok(None);
        }
    }

    let mut section = Section::new(descriptor.section);

    for param in &descriptor.params {
        let value = tree
            .find_string(param.path.as_slice())
            .map_err(|_| AppError::MissingVariable {
                variable: param.path.last().copied().unwrap_or_default().to_string(),
                section: descriptor.section.to_string(),
            })?;
        section.set(param.slot, value);
    }

    for validator in &descriptor.validators {
        validate(tree, descriptor, validator)?;
    }

    for setter in &descriptor.setters {
        apply_setter(tree, &mut section, setter);
    }

    if let Some(path) = &descriptor.keys {
        section.keys = extract_keys(tree, path)?;
    }

    debug!(
        section = descriptor.section,
        keys = section.keys.len(),
        "Component configured"
    );

    Ok(Some(section))
}

fn placeholder_matches(token: &str, value: &str) -> bool {
    let expr = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(token));

    Regex::new(&expr)
        .map(|pattern| pattern.is_match(value))
        .unwrap_or(false)
}

fn validate(tree: &EnvTree, descriptor: &Descriptor, validator: &Validator) -> Result<()> {
    match validator {
        Validator::AbsoluteUrl { path } => {
            let value = tree.find_string_unsecured(path.as_slice());

            match reqwest::Url::parse(value) {
                Ok(url) if url.has_host() => Ok(()),
                _ => Err(AppError::Validation(format!(
                    r#""{}" is not a valid absolute URL defined in "{}" config"#,
                    value, descriptor.section
                ))),
            }
        }
        Validator::Placeholder { path, token } => {
            if placeholder_matches(token, tree.find_string_unsecured(path.as_slice())) {
                Ok(())
            } else {
                Err(AppError::Validation(format!(
                    r#"ensure you defined a placeholder {{{{{}}}}} in URL defined in "{}""#,
                    token,
                    join_path(path.as_slice())
                )))
            }
        }
    }
}

fn apply_setter(tree: &EnvTree, section: &mut Section, setter: &Setter) {
    match setter {
        Setter::Default { path, slot, value } => {
            let found = tree.find_string_unsecured(path.as_slice());
            let value = if found.is_empty() { *value } else { found };
            section.set(*slot, value);
        }
        Setter::TrimTrailingSlash { slot } => {
            if let Some(value) = section.values.get_mut(slot) {
                let trimmed = value.trim_end_matches('/').len();
                value.truncate(trimmed);
            }
        }
    }
}

/// Read `<PATH>_<ID>_DESTKEY` / `<PATH>_<ID>_FIELD` pairs
pub fn extract_keys(tree: &EnvTree, path: &[&str]) -> Result<Vec<KeyRule>> {
    let prefix = join_path(path);
    let keys = tree
        .find_subtree(path)
        .map_err(|_| AppError::MissingKey(prefix.clone()))?;

    let mut rules = Vec::new();

    for id in keys.children_keys() {
        let lookup = |suffix: &str| -> Result<String> {
            keys.find_string(&[id, suffix])
                .map(str::to_string)
                .map_err(|_| AppError::MissingKeyEntry {
                    suffix: suffix.to_string(),
                    id: id.to_string(),
                    variable: format!("{}_{}_{}", prefix, id, suffix),
                })
        };

        let dest_key = lookup(DESTKEY)?;
        let field = lookup(FIELD)?;

        rules.push(KeyRule::new(dest_key, field));
    }

    Ok(rules)
}
