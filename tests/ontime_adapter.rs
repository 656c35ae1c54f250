//! OnTime adapters against a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seq_ticket::adapters::live::http_client;
use seq_ticket::adapters::live::ontime::{
    ItemKind, OnTimeAccount, OnTimeAuthenticator, OnTimeTracker,
};
use seq_ticket::ports::{Credential, CredentialProvider, DedupQuery, Secret, TicketSink};
use seq_ticket::ticket::{Priority, Ticket};

fn account() -> OnTimeAccount {
    OnTimeAccount {
        username: "ops".into(),
        password: "pw".into(),
        client_id: "cid".into(),
        client_secret: "csecret".into(),
    }
}

fn bearer() -> Credential {
    Credential { secret: Secret::Bearer("tok-1".into()), identity: Some("7".into()) }
}

fn query() -> DedupQuery {
    DedupQuery { project: "12".into(), field: "notes".into(), fingerprint: "ABC".into() }
}

#[tokio::test]
async fn token_fetch_yields_bearer_with_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oauth2/token"))
        .and(query_param("grant_type", "password"))
        .and(query_param("username", "ops"))
        .and(query_param("client_id", "cid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "data": { "id": 7, "first_name": "Ops" }
        })))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let authenticator = OnTimeAuthenticator::new(client, &server.uri(), account());
    let credential = authenticator.fetch_credential().await.unwrap();
    assert_eq!(credential.secret, Secret::Bearer("tok-1".into()));
    assert_eq!(credential.identity.as_deref(), Some("7"));
}

#[tokio::test]
async fn rejected_login_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let err = OnTimeAuthenticator::new(client, &server.uri(), account())
        .fetch_credential()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn exists_searches_the_dedup_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/defects"))
        .and(query_param("access_token", "tok-1"))
        .and(query_param("project_id", "12"))
        .and(query_param("search_field", "notes"))
        .and(query_param("search_string", "ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": 3, "notes": "ABC" } ]
        })))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Defects);
    assert!(tracker.exists(&bearer(), &query()).await.unwrap());
}

#[tokio::test]
async fn empty_search_means_no_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Incidents);
    assert!(!tracker.exists(&bearer(), &query()).await.unwrap());
}

#[tokio::test]
async fn create_posts_item_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/defects"))
        .and(query_param("access_token", "tok-1"))
        .and(body_partial_json(json!({
            "item": {
                "name": "DB timeout",
                "project": { "id": 12 },
                "assigned_to": { "id": 7 },
                "notes": "ABC"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 88 } })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = Ticket {
        project: "12".into(),
        title: "DB timeout".into(),
        body: "body".into(),
        kind: "defects".into(),
        priority: Priority::High,
        dedup_field: "notes".into(),
        fingerprint: "ABC".into(),
        assignee: Some("7".into()),
    };
    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Defects);
    let receipt = tracker.create(&bearer(), &ticket).await.unwrap();
    assert_eq!(receipt.id, "88");
}

#[tokio::test]
async fn create_without_item_id_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/defects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "validation" })))
        .mount(&server)
        .await;

    let ticket = Ticket {
        project: "12".into(),
        title: "DB timeout".into(),
        body: "body".into(),
        kind: "defects".into(),
        priority: Priority::Low,
        dedup_field: "notes".into(),
        fingerprint: "ABC".into(),
        assignee: None,
    };
    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Defects);
    let err = tracker.create(&bearer(), &ticket).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("no item id"));
    assert!(message.contains("validation"));
}

#[tokio::test]
async fn exists_ignores_items_that_only_contain_the_fingerprint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/defects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": 3, "notes": "see ABC and XYZ" }, { "id": 4, "notes": "ABCD" } ]
        })))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Defects);
    assert!(!tracker.exists(&bearer(), &query()).await.unwrap());
}

#[tokio::test]
async fn exists_counts_items_without_the_field_as_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/defects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": 3, "name": "DB timeout" } ]
        })))
        .mount(&server)
        .await;

    let client = http_client(Duration::from_secs(5)).unwrap();
    let tracker = OnTimeTracker::new(client, &server.uri(), ItemKind::Defects);
    assert!(tracker.exists(&bearer(), &query()).await.unwrap());
}
