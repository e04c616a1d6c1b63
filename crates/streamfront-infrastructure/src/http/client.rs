//! HTTP transport shared by every gateway implementation.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use streamfront_core::api::{ApiError, MessageResponse};
use streamfront_core::config::ClientConfig;
use streamfront_core::session::{Credential, SessionSnapshot};
use tokio::sync::watch;

/// Floor for multipart uploads; video files take longer than JSON calls.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Client for the storefront's remote API.
///
/// Stateless apart from an optional read handle on the session: when attached,
/// every request carries the current credential as a bearer token. The handle
/// is a receiver on the session store's snapshot channel, so the client never
/// holds its own copy of the credential.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: Option<watch::Receiver<SessionSnapshot>>,
}

/// Error body shape; only `message` is ever shown.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_url(config.normalized_base_url(), config.request_timeout())
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            session: None,
        }
    }

    /// Attaches the session snapshot channel used for `Authorization` headers.
    pub fn with_session(mut self, session: watch::Receiver<SessionSnapshot>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn current_credential(&self) -> Option<Credential> {
        self.session
            .as_ref()
            .and_then(|rx| rx.borrow().credential().cloned())
    }

    /// Request with timeout and, when signed in, the bearer header.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("[HttpApiClient] {} {}", method, url);

        let request = self.client.request(method, url).timeout(self.timeout);
        match self.current_credential() {
            Some(credential) => request.header(reqwest::header::AUTHORIZATION, credential.bearer()),
            None => request,
        }
    }

    /// Like [`Self::request`], but allows slow uploads at least [`UPLOAD_TIMEOUT`].
    pub(crate) fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .timeout(self.timeout.max(UPLOAD_TIMEOUT))
    }

    /// Sends and decodes a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends and expects a `{message}` body; an empty body is accepted.
    pub(crate) async fn send_message(
        &self,
        request: RequestBuilder,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await.map_err(map_transport_error)?;
        if text.trim().is_empty() {
            return Ok(MessageResponse::default());
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends and discards whatever body comes back.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        tracing::warn!(
            "[HttpApiClient] {} answered {}{}",
            url,
            status,
            message
                .as_deref()
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );

        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized { message })
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        tracing::warn!("[HttpApiClient] Request timed out");
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        tracing::warn!("[HttpApiClient] Transport failure: {}", err);
        ApiError::Transport(err.to_string())
    }
}
