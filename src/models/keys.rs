use serde::{Deserialize, Serialize};

/// Extraction rule from a remote payload into a record
///
/// `field` is a dotted path into the payload (`fields.summary`), `dest_key` the
/// record key receiving the value (`jiraTicketDescription`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRule {
    pub dest_key: String,
    pub field: String,
}

impl KeyRule {
    pub fn new(dest_key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            dest_key: dest_key.into(),
            field: field.into(),
        }
    }
}
