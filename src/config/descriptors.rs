use crate::config::configurator::{Descriptor, Param, Setter, Validator};

pub const JIRA_RECORD_KEY: &str = "jiraIssueId";
pub const CUSTOM_API_RECORD_KEY: &str = "customApiId";

/// Jira issue expander, enabled by the presence of `EXPANDERS_JIRA`
pub fn jira_descriptor() -> Descriptor {
    Descriptor {
        section: "JIRA",
        params: vec![
            Param::new(&["EXPANDERS", "JIRA", "CREDENTIALS", "USERNAME"], "username"),
            Param::new(&["EXPANDERS", "JIRA", "CREDENTIALS", "PASSWORD"], "password"),
            Param::new(&["EXPANDERS", "JIRA", "CREDENTIALS", "URL"], "url"),
        ],
        features: vec![],
        validators: vec![Validator::AbsoluteUrl {
            path: vec!["EXPANDERS", "JIRA", "CREDENTIALS", "URL"],
        }],
        setters: vec![
            Setter::Default {
                path: vec!["EXPANDERS", "JIRA", "RECORDKEY"],
                slot: "record_key",
                value: JIRA_RECORD_KEY,
            },
            Setter::TrimTrailingSlash { slot: "url" },
        ],
        keys: Some(vec!["EXPANDERS", "JIRA", "KEYS"]),
    }
}

/// Custom API decorator, gated by the decorator feature flags
pub fn custom_api_descriptor() -> Descriptor {
    Descriptor {
        section: "CUSTOMAPI",
        params: vec![
            Param::new(&["CHYLE", "DECORATORS", "CUSTOMAPI", "ENDPOINT", "URL"], "url"),
            Param::new(&["CHYLE", "DECORATORS", "CUSTOMAPI", "CREDENTIALS", "TOKEN"], "token"),
        ],
        features: vec![
            vec!["CHYLE", "FEATURES", "DECORATORS", "ENABLED"],
            vec!["CHYLE", "FEATURES", "DECORATORS", "CUSTOMAPI"],
        ],
        validators: vec![
            Validator::Placeholder {
                path: vec!["CHYLE", "DECORATORS", "CUSTOMAPI", "ENDPOINT", "URL"],
                token: "ID",
            },
            Validator::AbsoluteUrl {
                path: vec!["CHYLE", "DECORATORS", "CUSTOMAPI", "ENDPOINT", "URL"],
            },
        ],
        setters: vec![Setter::Default {
            path: vec!["CHYLE", "DECORATORS", "CUSTOMAPI", "RECORDKEY"],
            slot: "record_key",
            value: CUSTOM_API_RECORD_KEY,
        }],
        keys: Some(vec!["CHYLE", "DECORATORS", "CUSTOMAPI", "KEYS"]),
    }
}
