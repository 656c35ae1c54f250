//! Jira adapter against a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seq_ticket::adapters::live::http_client;
use seq_ticket::adapters::live::jira::JiraTracker;
use seq_ticket::ports::{Credential, DedupQuery, Secret, TicketSink};
use seq_ticket::ticket::{Priority, Ticket};

const FINGERPRINT: &str = "9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08";

fn tracker(server: &MockServer, send_priority: bool) -> JiraTracker {
    let client = http_client(Duration::from_secs(5)).unwrap();
    JiraTracker::new(client, &server.uri(), send_priority)
}

fn credential() -> Credential {
    Credential {
        secret: Secret::Basic { username: "ops".into(), password: "pw".into() },
        identity: None,
    }
}

fn query() -> DedupQuery {
    DedupQuery {
        project: "OPS".into(),
        field: "customfield_10425".into(),
        fingerprint: FINGERPRINT.into(),
    }
}

fn ticket() -> Ticket {
    Ticket {
        project: "OPS".into(),
        title: "DB timeout".into(),
        body: "a < b & c".into(),
        kind: "Bug".into(),
        priority: Priority::High,
        dedup_field: "customfield_10425".into(),
        fingerprint: FINGERPRINT.into(),
        assignee: None,
    }
}

#[tokio::test]
async fn exists_matches_only_exact_field_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/latest/search"))
        .and(header("authorization", "Basic b3BzOnB3"))
        .and(query_param("jql", format!("project = \"OPS\" AND cf[10425] ~ \"{FINGERPRINT}\"")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                {
                    "id": "1",
                    "key": "OPS-1",
                    "fields": { "customfield_10425": format!("{FINGERPRINT}00") }
                }
            ]
        })))
        .mount(&server)
        .await;

    let found = tracker(&server, false).exists(&credential(), &query()).await.unwrap();
    assert!(!found);
}

#[tokio::test]
async fn exists_finds_filed_fingerprint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/latest/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                { "id": "1", "key": "OPS-1", "fields": { "customfield_10425": "OTHER" } },
                { "id": "2", "key": "OPS-2", "fields": { "customfield_10425": FINGERPRINT } }
            ]
        })))
        .mount(&server)
        .await;

    assert!(tracker(&server, false).exists(&credential(), &query()).await.unwrap());
}

#[tokio::test]
async fn create_posts_fields_and_returns_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/latest/issue"))
        .and(body_partial_json(json!({
            "fields": {
                "project": { "key": "OPS" },
                "summary": "DB timeout",
                "description": "a &lt; b &amp; c",
                "issuetype": { "name": "Bug" },
                "customfield_10425": FINGERPRINT,
                "priority": { "name": "High" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "10001", "key": "OPS-42" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let receipt = tracker(&server, true).create(&credential(), &ticket()).await.unwrap();
    assert_eq!(receipt.id, "OPS-42");
}

#[tokio::test]
async fn rejected_create_reports_tracker_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/latest/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"errors":{"customfield_10425":"Field does not exist"}}"#,
        ))
        .mount(&server)
        .await;

    let err = tracker(&server, false).create(&credential(), &ticket()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("400"));
    assert!(message.contains("Field does not exist"));
}
