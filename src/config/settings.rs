use crate::config::configurator::{configure, Section};
use crate::config::descriptors::{custom_api_descriptor, jira_descriptor};
use crate::config::tree::EnvTree;
use crate::error::{AppError, Result};
use crate::models::KeyRule;
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::info;

/// Variables taken into account when building settings
pub const VARIABLE_PATTERN: &str = "^(CHYLE|EXPANDERS)_";

/// Separator between path segments of a variable
pub const VARIABLE_SEPARATOR: &str = "_";

/// Known children of `EXPANDERS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ExpanderKind {
    Jira,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JiraSettings {
    pub username: String,
    pub password: String,
    pub url: String,
    pub record_key: String,
    pub keys: Vec<KeyRule>,
}

impl JiraSettings {
    fn from_section(section: Section) -> Result<Self> {
        Ok(Self {
            username: section.value("username")?.to_string(),
            password: section.value("password")?.to_string(),
            url: section.value("url")?.to_string(),
            record_key: section.value("record_key")?.to_string(),
            keys: section.keys,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomApiSettings {
    pub url_template: String,
    pub token: String,
    pub record_key: String,
    pub keys: Vec<KeyRule>,
}

impl CustomApiSettings {
    fn from_section(section: Section) -> Result<Self> {
        Ok(Self {
            url_template: section.value("url")?.to_string(),
            token: section.value("token")?.to_string(),
            record_key: section.value("record_key")?.to_string(),
            keys: section.keys,
        })
    }
}

/// Validated integration settings, built once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub jira: Option<JiraSettings>,
    pub custom_api: Option<CustomApiSettings>,
}

impl Settings {
    /// Build settings from the process environment
    pub fn from_env() -> Result<Self> {
        let tree = EnvTree::from_env(VARIABLE_PATTERN, VARIABLE_SEPARATOR)?;
        Self::from_tree(&tree)
    }

    /// Build settings from a tree rooted above `EXPANDERS` and `CHYLE`
    pub fn from_tree(tree: &EnvTree) -> Result<Self> {
        let mut settings = Settings::default();

        if tree.has_subtree(&["EXPANDERS"]) {
            let expanders = tree.find_subtree(&["EXPANDERS"])?;
            for name in expanders.children_keys() {
                let kind = ExpanderKind::from_str(name).map_err(|_| {
                    AppError::Validation(format!(r#""{}" is not a valid expander structure"#, name))
                })?;

                match kind {
                    ExpanderKind::Jira => {
                        if let Some(section) = configure(tree, &jira_descriptor())? {
                            settings.jira = Some(JiraSettings::from_section(section)?);
                        }
                    }
                }
            }
        }

        if let Some(section) = configure(tree, &custom_api_descriptor())? {
            settings.custom_api = Some(CustomApiSettings::from_section(section)?);
        }

        info!(
            jira = settings.jira.is_some(),
            custom_api = settings.custom_api.is_some(),
            "Integration settings loaded"
        );

        Ok(settings)
    }

    /// Number of integrations that will run
    pub fn enabled_count(&self) -> usize {
        usize::from(self.jira.is_some()) + usize::from(self.custom_api.is_some())
    }
}
