use crate::error::{AppError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Hierarchical view over environment variables
///
/// `EXPANDERS_JIRA_CREDENTIALS_URL=http://x` becomes the path
/// `EXPANDERS -> JIRA -> CREDENTIALS -> URL` holding `http://x`. A node can
/// carry a value and children at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTree {
    value: Option<String>,
    children: BTreeMap<String, EnvTree>,
}

impl EnvTree {
    /// Build a tree from the process environment
    pub fn from_env(pattern: &str, separator: &str) -> Result<Self> {
        Self::from_pairs(std::env::vars(), pattern, separator)
    }

    /// Build a tree from explicit name/value pairs
    ///
    /// Only names matching `pattern` are kept. Names are uppercased before
    /// being split on `separator`.
    pub fn from_pairs<I, K, V>(pairs: I, pattern: &str, separator: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if separator.is_empty() {
            return Err(AppError::Validation(
                "separator of an environment tree can't be empty".to_string(),
            ));
        }

        let filter = Regex::new(pattern)
            .map_err(|e| AppError::Validation(format!("invalid variable pattern: {}", e)))?;

        let mut root = EnvTree::default();

        for (name, value) in pairs {
            let name = name.as_ref().to_uppercase();

            if !filter.is_match(&name) {
                continue;
            }

            let mut node = &mut root;
            for segment in name.split(separator).filter(|s| !s.is_empty()) {
                node = node.children.entry(segment.to_string()).or_default();
            }
            node.value = Some(value.into());
        }

        Ok(root)
    }

    /// Value carried by this node
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Sorted child names
    pub fn children_keys(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    fn node<S: AsRef<str>>(&self, path: &[S]) -> Option<&EnvTree> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(segment.as_ref()))
    }

    /// Subtree at path, the node must exist
    pub fn find_subtree<S: AsRef<str>>(&self, path: &[S]) -> Result<&EnvTree> {
        self.node(path)
            .ok_or_else(|| AppError::NodeNotFound(join_path(path)))
    }

    pub fn has_subtree<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.node(path).is_some()
    }

    /// Secured string lookup: the node must exist and carry a non empty value
    pub fn find_string<S: AsRef<str>>(&self, path: &[S]) -> Result<&str> {
        let node = self.find_subtree(path)?;

        match node.value.as_deref() {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(AppError::VariableNotFound(join_path(path))),
        }
    }

    /// String lookup returning an empty string when anything is missing
    pub fn find_string_unsecured<S: AsRef<str>>(&self, path: &[S]) -> &str {
        self.node(path)
            .and_then(|node| node.value.as_deref())
            .unwrap_or_default()
    }

    /// Boolean lookup, `1`, `t`, `T` and a case insensitive `true` are true
    pub fn find_bool_unsecured<S: AsRef<str>>(&self, path: &[S]) -> bool {
        match self.find_string_unsecured(path) {
            "1" | "t" | "T" => true,
            value => value.eq_ignore_ascii_case("true"),
        }
    }
}

/// Join path segments the way variables are named
pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("_")
}
