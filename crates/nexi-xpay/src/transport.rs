//! HTTP transport seam for the server-to-server subsequent-payment call.
//!
//! The core only needs "POST these bytes, give me status and body".
//! [`ReqwestTransport`] is the production implementation; tests plug in
//! in-memory fakes.

use std::future::Future;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportRequest {
    /// JSON POST with explicit `Content-Length`. `Accept-Encoding` is left
    /// unset so the client negotiates what it supports.
    pub fn json(url: impl Into<String>, body: Vec<u8>) -> Self {
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Length".to_string(), body.len().to_string()),
        ];
        Self {
            url: url.into(),
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns the raw status and body.
///
/// Implementations must not retry; a failure before any status is received
/// is reported as [`XPayError::Transport`](crate::XPayError::Transport).
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

#[cfg(feature = "full")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "full")]
mod reqwest_transport {
    use std::time::Duration;

    use super::{HttpTransport, TransportRequest, TransportResponse};
    use crate::error::{Result, XPayError};

    /// [`HttpTransport`] over `reqwest`. Redirects are disabled.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        http: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self> {
            let http = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .timeout(timeout)
                .build()
                .map_err(|e| XPayError::Transport(format!("failed to build HTTP client: {e}")))?;
            Ok(Self { http })
        }

        pub fn with_client(http: reqwest::Client) -> Self {
            Self { http }
        }
    }

    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
            let mut builder = self.http.post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let resp = builder
                .body(request.body)
                .send()
                .await
                .map_err(|e| XPayError::Transport(format!("request failed: {e}")))?;

            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .map_err(|e| XPayError::Transport(format!("failed to read body: {e}")))?;

            tracing::debug!(url = %request.url, status, "XPay responded");
            Ok(TransportResponse { status, body })
        }
    }
}
