//! Live adapters that talk to real trackers over HTTP.

pub mod jira;
pub mod ontime;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::ports::{Credential, PortError, Secret};

/// Builds the HTTP client shared by one adapter's requests.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> Result<Client, PortError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Applies the credential's secret to a request.
pub(crate) fn authorize(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    match &credential.secret {
        Secret::Basic { username, password } => request.basic_auth(username, Some(password)),
        Secret::Bearer(token) => request.bearer_auth(token),
    }
}

/// Reads a response body, turning non-2xx statuses into errors that carry
/// the tracker's own reason text.
pub(crate) async fn read_body(response: Response, vendor: &str) -> Result<String, PortError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| -> PortError { format!("Failed to read {vendor} API response: {e}").into() })?;

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("unknown status");
        return Err(format!("{vendor} API error ({} {reason}): {text}", status.as_u16()).into());
    }
    Ok(text)
}

/// Reads and parses a JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    vendor: &str,
) -> Result<T, PortError> {
    let text = read_body(response, vendor).await?;
    serde_json::from_str(&text)
        .map_err(|e| -> PortError { format!("Failed to parse {vendor} API response: {e}").into() })
}

/// Sends a request, labelling transport failures with the vendor name.
pub(crate) async fn send(request: RequestBuilder, vendor: &str) -> Result<Response, PortError> {
    request
        .send()
        .await
        .map_err(|e| -> PortError { format!("{vendor} API request failed: {e}").into() })
}
