//! Live `TicketSink` for Jira's REST API.
//!
//! The fingerprint lives in a numeric custom field (`customfield_<N>`).
//! Jira text fields only support the `~` (contains) operator in JQL, so the
//! search asks for the dedup field back and keeps only exact matches.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{authorize, read_json, send};
use crate::ports::{CreateFuture, Credential, DedupQuery, ExistsFuture, TicketSink};
use crate::ticket::{Priority, Ticket, TicketReceipt};

const VENDOR: &str = "Jira";
const API_PATH: &str = "/rest/api/latest";
const SEARCH_PAGE_SIZE: u32 = 50;

/// Jira issue tracker.
pub struct JiraTracker {
    client: Client,
    host: String,
    send_priority: bool,
}

impl JiraTracker {
    /// Creates a tracker for the Jira instance at `host` (without `/rest/api`).
    #[must_use]
    pub fn new(client: Client, host: &str, send_priority: bool) -> Self {
        Self { client, host: host.trim_end_matches('/').to_string(), send_priority }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}{API_PATH}/{resource}", self.host)
    }
}

/// Field name for a numeric custom field id.
#[must_use]
pub fn custom_field_name(id: u32) -> String {
    format!("customfield_{id}")
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Deserialize)]
struct SearchIssue {
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct CreatedIssue {
    id: String,
    #[serde(default)]
    key: Option<String>,
}

impl TicketSink for JiraTracker {
    fn exists<'a>(
        &'a self,
        credential: &'a Credential,
        query: &'a DedupQuery,
    ) -> ExistsFuture<'a> {
        Box::pin(async move {
            let jql = search_jql(query);
            let fields = format!("id,key,{}", query.field);
            let page_size = SEARCH_PAGE_SIZE.to_string();
            let request = self.client.get(self.url("search")).query(&[
                ("jql", jql.as_str()),
                ("maxResults", page_size.as_str()),
                ("fields", fields.as_str()),
            ]);
            let response = send(authorize(request, credential), VENDOR).await?;
            let results: SearchResponse = read_json(response, VENDOR).await?;

            Ok(results.issues.iter().any(|issue| {
                issue.fields.get(&query.field).and_then(Value::as_str)
                    == Some(query.fingerprint.as_str())
            }))
        })
    }

    fn create<'a>(&'a self, credential: &'a Credential, ticket: &'a Ticket) -> CreateFuture<'a> {
        Box::pin(async move {
            let payload = json!({ "fields": issue_fields(ticket, self.send_priority) });
            let request = self.client.post(self.url("issue")).json(&payload);
            let response = send(authorize(request, credential), VENDOR).await?;
            let created: CreatedIssue = read_json(response, VENDOR).await?;
            Ok(TicketReceipt { id: created.key.unwrap_or(created.id) })
        })
    }
}

/// JQL selecting issues in the project whose dedup field contains the
/// fingerprint.
fn search_jql(query: &DedupQuery) -> String {
    let field = match query.field.strip_prefix("customfield_") {
        Some(id) => format!("cf[{id}]"),
        None => format!("\"{}\"", jql_escape(&query.field)),
    };
    format!(
        "project = \"{}\" AND {field} ~ \"{}\"",
        jql_escape(&query.project),
        jql_escape(&query.fingerprint)
    )
}

fn jql_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The `fields` object of a create-issue request.
fn issue_fields(ticket: &Ticket, send_priority: bool) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("project".into(), json!({ "key": ticket.project }));
    fields.insert("summary".into(), json!(ticket.title));
    fields.insert("description".into(), json!(escape_markup(&ticket.body)));
    fields.insert("issuetype".into(), json!({ "name": ticket.kind }));
    fields.insert(ticket.dedup_field.clone(), json!(ticket.fingerprint));
    if send_priority {
        let name = match ticket.priority {
            Priority::High => "High",
            Priority::Low => "Low",
        };
        fields.insert("priority".into(), json!({ "name": name }));
    }
    if let Some(assignee) = &ticket.assignee {
        fields.insert("assignee".into(), json!({ "name": assignee }));
    }
    fields
}

/// Escapes the characters Jira would otherwise interpret as markup.
fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
