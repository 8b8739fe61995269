//! HTTP layer: bearer auth, status mapping, transport errors.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{AuthzError, AuthzResult};
use crate::types::AuthzConfig;

use super::helpers::{error_message, parse_body, parse_stream};

/// HTTP backend for making requests (holds reqwest client and config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) config: AuthzConfig,
}

impl HttpBackend {
    /// POST a JSON body and decode a single JSON response.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> AuthzResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (_, text) = self.post(path, body).await?;
        parse_body(&text)
    }

    /// POST a JSON body and decode a newline-delimited result stream.
    pub(crate) async fn post_stream<B, T>(&self, path: &str, body: &B) -> AuthzResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = self.post(path, body).await?;
        parse_stream(&text, status)
    }

    /// Send exactly one request; no retries.
    async fn post<B>(&self, path: &str, body: &B) -> AuthzResult<(u16, String)>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "sending request");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        match status.as_u16() {
            200..=299 => Ok((status.as_u16(), text)),

            401 => Err(AuthzError::Unauthorized {
                message: error_message(&text, "invalid or missing token"),
            }),

            403 => Err(AuthzError::Forbidden {
                message: error_message(&text, "token not allowed to perform this call"),
            }),

            code => Err(AuthzError::Remote {
                status: code,
                message: error_message(&text, &status.to_string()),
            }),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> AuthzError {
        // the request never left: e.g. a token that is not a valid header value
        if err.is_builder() {
            AuthzError::Config {
                message: format!("failed to build request: {}", error_chain(&err)),
            }
        } else if err.is_timeout() {
            AuthzError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else if err.is_decode() {
            AuthzError::InvalidResponse {
                message: format!("failed to read response body: {}", err),
            }
        } else {
            AuthzError::Network {
                message: error_chain(&err),
            }
        }
    }
}

// reqwest hides the TLS/DNS cause behind `source()`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
