//! gerrit::rest
//!
//! Gerrit REST API client over reqwest.
//!
//! # Design
//!
//! All requests go to the `/a/` authenticated prefix with HTTP Basic auth,
//! the way Gerrit expects scripted clients to connect. Responses carry an
//! XSSI-protection prefix (`)]}'`) which is stripped before JSON parsing.
//!
//! Status codes map onto the [`GerritError`] taxonomy: 401/403 are auth
//! failures, 404 is `NotFound`, anything else ≥400 is an `ApiError`, and
//! transport problems are `NetworkError`. Nothing is retried here.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::config::ServerConfig;
use crate::core::types::ChangeIdentifier;

use super::models::{ChangeInfo, CommentInfo, FileInfo, ReviewInput, ReviewResult};
use super::traits::{Gerrit, GerritError};

/// XSSI protection prefix Gerrit prepends to every JSON body.
const XSSI_PREFIX: &str = ")]}'";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "gerrit-cli";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST implementation of the [`Gerrit`] trait.
pub struct GerritRest {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for GerritRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GerritRest")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish()
    }
}

impl GerritRest {
    /// Create a client for the given server.
    pub fn new(server: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: server.url.trim_end_matches('/').to_string(),
            username: server.username.clone(),
            password: server.password.clone(),
        }
    }

    /// Build the full URL for an endpoint path (which must start with `/`).
    fn url(&self, path: &str) -> String {
        format!("{}/a{}", self.base_url, path)
    }

    /// Identifier as a single path segment (`/` in project-qualified ids
    /// must be percent-encoded).
    fn encode_id(id: &ChangeIdentifier) -> String {
        id.as_str().replace('/', "%2F")
    }

    /// Send a request and decode the response.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&impl Serialize>,
    ) -> Result<T, GerritError> {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::USER_AGENT, USER_AGENT_VALUE)
            .timeout(REQUEST_TIMEOUT);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GerritError::NetworkError(e.to_string()))?;
        Self::handle_response(response).await
    }

    /// Decode a response, mapping error statuses onto the taxonomy.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, GerritError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GerritError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text));
        }

        let body = strip_xssi_prefix(&text);
        // Some write endpoints answer with an empty body on success.
        let body = if body.trim().is_empty() { "{}" } else { body };
        serde_json::from_str(body)
            .map_err(|e| GerritError::InvalidResponse(format!("JSON parse failed: {}", e)))
    }
}

/// Map an HTTP error status to a [`GerritError`].
fn error_for_status(status: StatusCode, body: &str) -> GerritError {
    let message = {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    };
    match status {
        StatusCode::UNAUTHORIZED => {
            GerritError::AuthFailed("invalid username or password".into())
        }
        StatusCode::FORBIDDEN => GerritError::AuthFailed(format!("permission denied: {}", message)),
        StatusCode::NOT_FOUND => GerritError::NotFound(message),
        _ => GerritError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

/// Strip Gerrit's XSSI protection prefix.
fn strip_xssi_prefix(text: &str) -> &str {
    match text.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.trim_start_matches(['\r', '\n']),
        None => text,
    }
}

/// Expand `options` into repeated `o=` query parameters.
fn option_params<'a>(options: &[&'a str]) -> Vec<(&'a str, String)> {
    options.iter().map(|o| ("o", o.to_string())).collect()
}

#[async_trait]
impl Gerrit for GerritRest {
    async fn get_change(
        &self,
        id: &ChangeIdentifier,
        options: &[&str],
    ) -> Result<ChangeInfo, GerritError> {
        let path = format!("/changes/{}", Self::encode_id(id));
        self.request(Method::GET, &path, &option_params(options), None::<&()>)
            .await
            .map_err(|e| match e {
                // Attach the identifier so "not found" names what was asked.
                GerritError::NotFound(_) => GerritError::NotFound(format!("change {}", id)),
                other => other,
            })
    }

    async fn query_changes(
        &self,
        query: &str,
        limit: u32,
        options: &[&str],
    ) -> Result<Vec<ChangeInfo>, GerritError> {
        let mut params = vec![("q", query.to_string()), ("n", limit.to_string())];
        params.extend(option_params(options));
        self.request(Method::GET, "/changes/", &params, None::<&()>)
            .await
    }

    async fn get_change_files(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, FileInfo>, GerritError> {
        let path = format!("/changes/{}/revisions/current/files/", Self::encode_id(id));
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    async fn get_change_comments(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, Vec<CommentInfo>>, GerritError> {
        let path = format!("/changes/{}/comments", Self::encode_id(id));
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    async fn set_review(
        &self,
        id: &ChangeIdentifier,
        revision: &str,
        review: ReviewInput,
    ) -> Result<ReviewResult, GerritError> {
        let path = format!(
            "/changes/{}/revisions/{}/review",
            Self::encode_id(id),
            revision
        );
        self.request(Method::POST, &path, &[], Some(&review)).await
    }
}
