use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use super::{Transport, TransportError};

/// Longest response body excerpt kept in [`TransportError::HttpError`].
const MAX_ERROR_BODY: usize = 256;

/// JSON-RPC over HTTP POST.
///
/// Each payload is posted to a single node URL; the response body is returned untouched.
/// No retries happen here: a failed cycle is simply retried by the poll loop on its next tick.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport for `url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unsupported`] for non-HTTP URLs, or
    /// [`TransportError::ConnectionFailed`] if the underlying reqwest client fails to build.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TransportError::Unsupported(url));
        }

        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("logpoll/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                TransportError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, url, timeout })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sanitizes network errors to prevent information disclosure.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_redirect() {
            "unexpected redirect".to_string()
        } else {
            "network error".to_string()
        }
    }

    fn truncate_body(mut text: String) -> String {
        if text.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
            text.push_str("... (truncated)");
        }
        text
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: Bytes) -> Result<Bytes, TransportError> {
        let result = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .body(payload)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(TransportError::Timeout),
            Err(e) => {
                tracing::trace!(error = %e, "http request error");
                return Err(TransportError::ConnectionFailed(Self::sanitize_network_error(&e)));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::trace!(status = status.as_u16(), "http request failed");
            return Err(TransportError::HttpError(status.as_u16(), Self::truncate_body(text)));
        }

        response.bytes().await.map_err(TransportError::Network)
    }
}
