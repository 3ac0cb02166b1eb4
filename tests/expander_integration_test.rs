mod common;

use chyle::config::{JiraSettings, RuntimeConfig, Settings};
use chyle::enrichment::{Expander, ExpanderPipeline, ExpansionService, JiraIssueExpander};
use chyle::http::build_client;
use chyle::models::KeyRule;
use chyle::AppError;
use common::{jira_issue, record};
use serde_json::json;
use std::sync::Arc;

fn jira_settings(url: &str, keys: Vec<KeyRule>) -> JiraSettings {
    JiraSettings {
        username: "test".to_string(),
        password: "test".to_string(),
        url: url.to_string(),
        record_key: "jiraIssueId".to_string(),
        keys,
    }
}

fn jira_expander(url: &str, keys: Vec<KeyRule>) -> JiraIssueExpander {
    let client = build_client(5, "chyle-test").unwrap();
    JiraIssueExpander::from_settings(client, &jira_settings(url, keys)).unwrap()
}

/// Test a single record picking the issue key
#[tokio::test]
async fn test_jira_expander() {
    let mut server = mockito::Server::new_async().await;
    let issue = server
        .mock("GET", "/rest/api/2/issue/10000")
        .with_status(200)
        .with_body(jira_issue("10000", "EX-1", "First issue"))
        .create_async()
        .await;

    let expander = jira_expander(&server.url(), vec![KeyRule::new("jiraIssueKey", "key")]);

    let mut r = record(json!({"test": "test", "jiraIssueId": "10000"}));
    expander.expand(&mut r).await.unwrap();

    assert_eq!(
        r,
        record(json!({
            "test": "test",
            "jiraIssueId": "10000",
            "jiraIssueKey": "EX-1"
        }))
    );
    issue.assert_async().await;
}

/// Test that a record without issue id never reaches jira
#[tokio::test]
async fn test_jira_expander_with_no_jira_issue_id_defined() {
    let mut server = mockito::Server::new_async().await;
    let issue = server
        .mock("GET", "/rest/api/2/issue/10000")
        .with_status(200)
        .with_body(jira_issue("10000", "EX-1", "First issue"))
        .expect(0)
        .create_async()
        .await;

    let expander = jira_expander(&server.url(), vec![KeyRule::new("jiraIssueKey", "key")]);

    let mut r = record(json!({"test": "test"}));
    expander.expand(&mut r).await.unwrap();

    assert_eq!(r, record(json!({"test": "test"})));
    issue.assert_async().await;
}

/// Test nested fields and fields missing from the payload
#[tokio::test]
async fn test_jira_expander_nested_fields() {
    let mut server = mockito::Server::new_async().await;
    let _issue = server
        .mock("GET", "/rest/api/2/issue/EX-7")
        .with_status(200)
        .with_body(jira_issue("10007", "EX-7", "Broken build"))
        .create_async()
        .await;

    let expander = jira_expander(
        &server.url(),
        vec![
            KeyRule::new("jiraTicketDescription", "fields.summary"),
            KeyRule::new("jiraStatus", "fields.status.name"),
            KeyRule::new("jiraAssignee", "fields.assignee.name"),
        ],
    );

    let mut r = record(json!({"test": "test", "jiraIssueId": "EX-7"}));
    expander.expand(&mut r).await.unwrap();

    assert_eq!(
        r,
        record(json!({
            "test": "test",
            "jiraIssueId": "EX-7",
            "jiraTicketDescription": "Broken build",
            "jiraStatus": "Open"
        }))
    );
}

/// Test the whole batch keeps its order
#[tokio::test]
async fn test_expander_pipeline() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/rest/api/2/issue/10000")
        .with_status(200)
        .with_body(jira_issue("10000", "EX-1", "First issue"))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/rest/api/2/issue/ABC-123")
        .with_status(200)
        .with_body(jira_issue("10001", "ABC-123", "Second issue"))
        .create_async()
        .await;

    let mut pipeline = ExpanderPipeline::new();
    pipeline.register_expander(Arc::new(jira_expander(
        &server.url(),
        vec![KeyRule::new("jiraIssueKey", "key")],
    )));

    let records = vec![
        record(json!({"test": "test1", "jiraIssueId": "10000"})),
        record(json!({"test": "test2", "jiraIssueId": "ABC-123"})),
    ];

    let result = pipeline.run(records).await.unwrap();

    assert_eq!(
        result,
        vec![
            record(json!({"test": "test1", "jiraIssueId": "10000", "jiraIssueKey": "EX-1"})),
            record(json!({"test": "test2", "jiraIssueId": "ABC-123", "jiraIssueKey": "ABC-123"})),
        ]
    );
    first.assert_async().await;
    second.assert_async().await;
}

/// Test that a remote failure on the second record drops the whole batch
#[tokio::test]
async fn test_expander_pipeline_aborts_on_remote_error() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/rest/api/2/issue/10000")
        .with_status(200)
        .with_body(jira_issue("10000", "EX-1", "First issue"))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/rest/api/2/issue/ABC-404")
        .with_status(404)
        .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
        .create_async()
        .await;

    let mut pipeline = ExpanderPipeline::new();
    pipeline.register_expander(Arc::new(jira_expander(
        &server.url(),
        vec![KeyRule::new("jiraIssueKey", "key")],
    )));

    let records = vec![
        record(json!({"test": "test1", "jiraIssueId": "10000"})),
        record(json!({"test": "test2", "jiraIssueId": "ABC-404"})),
    ];

    let err = pipeline.run(records).await.unwrap_err();

    assert!(matches!(err, AppError::Remote { status: 404, .. }));
    first.assert_async().await;
}

/// Test the service built from settings, jira then custom api
#[tokio::test]
async fn test_expansion_service_chains_expanders() {
    let mut server = mockito::Server::new_async().await;
    let _session = server
        .mock("POST", "/rest/auth/1/session")
        .with_status(200)
        .with_body(r#"{"session":{"name":"JSESSIONID","value":"s3cr3t"}}"#)
        .create_async()
        .await;
    let _issue = server
        .mock("GET", "/rest/api/2/issue/EX-1")
        .match_header("cookie", "JSESSIONID=s3cr3t")
        .with_status(200)
        .with_body(jira_issue("10000", "EX-1", "First issue"))
        .create_async()
        .await;
    let _entry = server
        .mock("GET", "/api/entries/42")
        .match_header("authorization", "token abc")
        .with_status(200)
        .with_body(r#"{"data":{"title":"Release notes"}}"#)
        .create_async()
        .await;

    let settings = Settings {
        jira: Some(jira_settings(
            &server.url(),
            vec![KeyRule::new("jiraTicketDescription", "fields.summary")],
        )),
        custom_api: Some(chyle::config::CustomApiSettings {
            url_template: format!("{}/api/entries/{{{{ ID }}}}", server.url()),
            token: "abc".to_string(),
            record_key: "customApiId".to_string(),
            keys: vec![KeyRule::new("customTitle", "data.title")],
        }),
    };

    let service = ExpansionService::new(&settings, &RuntimeConfig::default()).unwrap();
    service.authenticate().await.unwrap();

    let result = service
        .process(vec![
            record(json!({"sha": "a1", "jiraIssueId": "EX-1", "customApiId": "42"})),
            record(json!({"sha": "b2"})),
        ])
        .await
        .unwrap();

    assert_eq!(
        result,
        vec![
            record(json!({
                "sha": "a1",
                "jiraIssueId": "EX-1",
                "customApiId": "42",
                "jiraTicketDescription": "First issue",
                "customTitle": "Release notes"
            })),
            record(json!({"sha": "b2"})),
        ]
    );
}
