//! Remote service collaborator
//!
//! [`RemoteTransport`] is the seam between repository operations and the network.
//! [`HttpTransport`] talks to the hosted service over HTTP; tests substitute an
//! in-memory implementation.
//!
//! Network failures, timeouts and bodyless error statuses surface as
//! [`RemoteUnreachable`](RepositoryError::RemoteUnreachable). A non-2xx reply that
//! carries a body is [`RemoteRejected`](RepositoryError::RemoteRejected) whatever
//! the body says. A 2xx reply with `status: error` is returned as a response and
//! left to the caller to turn into a rejection.

use crate::errors::RepositoryError;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const LOGIN_POLL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Started browser login; the CLI polls with `cli_token` until it completes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    pub cli_token: String,
    pub login_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthCredentials {
    pub username: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteAddRequest {
    pub user: String,
    /// SHA-256 of the raw key
    pub api_key: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteAddResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub branches: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub user: String,
    /// SHA-256 of the raw key
    pub api_key: String,
    pub repo: String,
    pub branch: String,
    pub last_known_remote_commit: Option<String>,
    pub new_commit: String,
    /// gzip'd tar of the objects to transfer
    pub object_bundle: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub most_recent_remote_branch_commit: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait RemoteTransport {
    /// Open a login session.
    async fn start_login(&self) -> anyhow::Result<AuthSession>;

    /// `None` while the user has not completed the login yet.
    async fn poll_login(&self, cli_token: &str) -> anyhow::Result<Option<AuthCredentials>>;

    async fn add_remote(&self, request: &RemoteAddRequest) -> anyhow::Result<RemoteAddResponse>;

    async fn push(&self, request: PushRequest) -> anyhow::Result<PushResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RepositoryError::RemoteUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> anyhow::Result<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| RepositoryError::RemoteUnreachable(e.to_string()).into())
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> anyhow::Result<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::RemoteUnreachable(e.to_string()))?;

        interpret_reply(status, &body)
    }
}

/// Only a 2xx reply is decoded; anything else is an error, explained by the body
/// when there is one.
fn interpret_reply<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> anyhow::Result<T> {
    if !status.is_success() {
        let explanation = rejection_message(body);
        tracing::debug!(%status, "remote replied with an error status");

        return Err(match explanation {
            Some(explanation) => {
                RepositoryError::RemoteRejected(format!("HTTP {status}: {explanation}"))
            }
            None => RepositoryError::RemoteUnreachable(format!("HTTP {status}")),
        }
        .into());
    }

    serde_json::from_slice(body).map_err(|e| {
        RepositoryError::RemoteUnreachable(format!("unexpected reply from remote: {e}")).into()
    })
}

/// `message` (or `detail`) of a JSON error body, else the body as text.
fn rejection_message(body: &[u8]) -> Option<String> {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_slice(body) {
        let message = ["message", "detail"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(|value| match value {
                serde_json::Value::String(text) => Some(text.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            });
        if message.is_some() {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}

impl RemoteTransport for HttpTransport {
    async fn start_login(&self) -> anyhow::Result<AuthSession> {
        let response = self.send(self.client.post(self.url("/auth/init"))).await?;
        if !response.status().is_success() {
            return Err(
                RepositoryError::RemoteUnreachable(format!("HTTP {}", response.status())).into(),
            );
        }

        Self::decode(response).await
    }

    async fn poll_login(&self, cli_token: &str) -> anyhow::Result<Option<AuthCredentials>> {
        let request = self
            .client
            .get(self.url("/auth/status"))
            .query(&[("cli_token", cli_token)])
            .timeout(LOGIN_POLL_TIMEOUT);
        let response = self.send(request).await?;

        if response.status() != StatusCode::OK {
            return Ok(None);
        }

        Self::decode(response).await.map(Some)
    }

    async fn add_remote(&self, request: &RemoteAddRequest) -> anyhow::Result<RemoteAddResponse> {
        let response = self
            .send(self.client.post(self.url("/api/remote/add")).json(request))
            .await?;

        Self::decode(response).await
    }

    async fn push(&self, request: PushRequest) -> anyhow::Result<PushResponse> {
        let bundle = Part::bytes(request.object_bundle)
            .file_name("objects.tar.gz")
            .mime_str("application/gzip")?;
        let form = Form::new()
            .text("user", request.user)
            .text("api_key", request.api_key)
            .text("repo", request.repo)
            .text("branch", request.branch)
            .text(
                "last_known_remote_commit",
                request.last_known_remote_commit.unwrap_or_default(),
            )
            .text("new_commit", request.new_commit)
            .part("object_bundle", bundle);

        tracing::info!(url = %self.url("/api/remote/push"), "sending push");
        let response = self
            .send(
                self.client
                    .post(self.url("/api/remote/push"))
                    .multipart(form)
                    .timeout(REQUEST_TIMEOUT),
            )
            .await?;

        Self::decode(response).await
    }
}
