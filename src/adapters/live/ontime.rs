//! Live adapters for the OnTime v2 API: OAuth2 password-grant credentials
//! and a `TicketSink` for defects or incidents.

use std::fmt;
use std::str::FromStr;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{authorize, read_body, read_json, send};
use crate::ports::{
    CreateFuture, Credential, CredentialFuture, CredentialProvider, DedupQuery, ExistsFuture,
    PortError, Secret, TicketSink,
};
use crate::ticket::{Ticket, TicketReceipt};

const VENDOR: &str = "OnTime";

/// Which OnTime work item collection tickets are filed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// `/api/v2/defects`
    Defects,
    /// `/api/v2/incidents`
    Incidents,
}

impl ItemKind {
    /// Path segment of the collection.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Defects => "defects",
            ItemKind::Incidents => "incidents",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "defects" | "defect" => Ok(ItemKind::Defects),
            "incidents" | "incident" => Ok(ItemKind::Incidents),
            other => {
                Err(format!("unknown OnTime item kind {other:?} (expected defects or incidents)"))
            }
        }
    }
}

/// Joins the host and optional extra path into the API base URL.
#[must_use]
pub fn base_url(host: &str, path: &str) -> String {
    let host = host.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        host.to_string()
    } else {
        format!("{host}/{path}")
    }
}

/// Account details for the OAuth2 password grant.
#[derive(Clone)]
pub struct OnTimeAccount {
    /// OnTime user name.
    pub username: String,
    /// OnTime password.
    pub password: String,
    /// API client id.
    pub client_id: String,
    /// API client secret.
    pub client_secret: String,
}

/// Fetches a fresh access token on every call.
pub struct OnTimeAuthenticator {
    client: Client,
    base: String,
    account: OnTimeAccount,
}

impl OnTimeAuthenticator {
    /// Creates an authenticator against the API at `base`.
    #[must_use]
    pub fn new(client: Client, base: &str, account: OnTimeAccount) -> Self {
        Self { client, base: base.trim_end_matches('/').to_string(), account }
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    #[serde(default)]
    data: Option<AuthUser>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Value,
}

impl CredentialProvider for OnTimeAuthenticator {
    fn fetch_credential(&self) -> CredentialFuture<'_> {
        Box::pin(async move {
            let account = &self.account;
            let request = self.client.get(format!("{}/api/oauth2/token", self.base)).query(&[
                ("client_id", account.client_id.as_str()),
                ("client_secret", account.client_secret.as_str()),
                ("grant_type", "password"),
                ("scope", "read write"),
                ("username", account.username.as_str()),
                ("password", account.password.as_str()),
            ]);
            let response = send(request, VENDOR).await?;
            let auth: AuthResponse = read_json(response, VENDOR).await?;
            Ok(Credential {
                secret: Secret::Bearer(auth.access_token),
                identity: auth.data.map(|user| value_to_string(&user.id)),
            })
        })
    }
}

/// OnTime work item tracker.
pub struct OnTimeTracker {
    client: Client,
    base: String,
    kind: ItemKind,
}

impl OnTimeTracker {
    /// Creates a tracker filing into `kind` on the API at `base`.
    #[must_use]
    pub fn new(client: Client, base: &str, kind: ItemKind) -> Self {
        Self { client, base: base.trim_end_matches('/').to_string(), kind }
    }

    fn items_url(&self) -> String {
        format!("{}/api/v2/{}", self.base, self.kind)
    }
}

// OnTime takes bearer tokens as an `access_token` query parameter.
fn with_access(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    match &credential.secret {
        Secret::Bearer(token) => request.query(&[("access_token", token.as_str())]),
        Secret::Basic { .. } => authorize(request, credential),
    }
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    data: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
struct CreateResult {
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

impl TicketSink for OnTimeTracker {
    fn exists<'a>(
        &'a self,
        credential: &'a Credential,
        query: &'a DedupQuery,
    ) -> ExistsFuture<'a> {
        Box::pin(async move {
            let request = self.client.get(self.items_url()).query(&[
                ("project_id", query.project.as_str()),
                ("search_field", query.field.as_str()),
                ("search_string", query.fingerprint.as_str()),
                ("columns", query.field.as_str()),
            ]);
            let response = send(with_access(request, credential), VENDOR).await?;
            let results: SearchResult = read_json(response, VENDOR).await?;

            // Items that don't echo the field back are counted as matches.
            Ok(results.data.iter().any(|item| match item.get(&query.field) {
                Some(Value::String(value)) => *value == query.fingerprint,
                _ => true,
            }))
        })
    }

    fn create<'a>(&'a self, credential: &'a Credential, ticket: &'a Ticket) -> CreateFuture<'a> {
        Box::pin(async move {
            let payload = json!({ "item": item_payload(ticket) });
            let request = self.client.post(self.items_url()).json(&payload);
            let response = send(with_access(request, credential), VENDOR).await?;
            let text = read_body(response, VENDOR).await?;
            let created: CreateResult = serde_json::from_str(&text).map_err(|e| -> PortError {
                format!("Failed to parse {VENDOR} API response: {e}").into()
            })?;

            // Validation failures come back as 2xx bodies without an item.
            let id = created
                .data
                .as_ref()
                .and_then(|data| data.get("id"))
                .filter(|id| !id.is_null())
                .map(value_to_string)
                .ok_or_else(|| -> PortError {
                    format!("{VENDOR} API response has no item id: {text}").into()
                })?;
            Ok(TicketReceipt { id })
        })
    }
}

/// The `item` object of a create request.
fn item_payload(ticket: &Ticket) -> Map<String, Value> {
    let mut item = Map::new();
    item.insert("name".into(), json!(ticket.title));
    item.insert("description".into(), json!(ticket.body));
    item.insert("project".into(), json!({ "id": numeric_or_text(&ticket.project) }));
    item.insert(ticket.dedup_field.clone(), json!(ticket.fingerprint));
    if let Some(assignee) = &ticket.assignee {
        item.insert("assigned_to".into(), json!({ "id": numeric_or_text(assignee) }));
    }
    item
}

fn numeric_or_text(value: &str) -> Value {
    value.parse::<u64>().map_or_else(|_| json!(value), |n| json!(n))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
