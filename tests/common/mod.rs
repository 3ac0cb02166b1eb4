//! Common test utilities for expansion testing

#![allow(dead_code)]

use chyle::config::settings::{VARIABLE_PATTERN, VARIABLE_SEPARATOR};
use chyle::config::EnvTree;
use chyle::models::Record;
use serde_json::Value;

/// Build a record from a `json!` object
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

/// Build a configuration tree from variables, the way the binary does
pub fn env_tree(pairs: &[(&str, &str)]) -> EnvTree {
    EnvTree::from_pairs(
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        VARIABLE_PATTERN,
        VARIABLE_SEPARATOR,
    )
    .expect("valid variable pattern")
}

/// Jira issue payload as returned by `GET /rest/api/2/issue/<id>`
pub fn jira_issue(id: &str, key: &str, summary: &str) -> String {
    serde_json::json!({
        "expand": "renderedFields,names,schema,operations,editmeta,changelog,versionedRepresentations",
        "id": id,
        "self": format!("http://test.com/jira/rest/api/2/issue/{}", id),
        "key": key,
        "fields": {
            "summary": summary,
            "status": {"name": "Open"}
        },
        "names": {
            "watcher": "watcher",
            "description": "description",
            "project": "project"
        }
    })
    .to_string()
}
