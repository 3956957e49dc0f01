//! JSON fetching over HTTP.
//!
//! [`DataFetcher`] performs exactly one GET per call and turns non-2xx
//! answers into [`LookupError::Status`]. The network itself sits behind the
//! [`Transport`] trait so the orchestration can be driven without sockets.

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::LookupError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// 2xx check on the raw code; transports report statuses as plain `u16`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP GET primitive.
///
/// Fails with [`LookupError::Network`] only when no response was received
/// at all; any status code counts as a completed exchange.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, LookupError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, LookupError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Fetches a URL and decodes its JSON body.
#[derive(Clone)]
pub struct DataFetcher<T> {
    transport: T,
}

impl<T: Transport> DataFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// GET `url` and decode the body as `D`.
    ///
    /// # Errors
    ///
    /// * [`LookupError::Status`] carrying `not_found_message` and the status
    ///   code when the server answers with anything other than 2xx
    /// * [`LookupError::Network`] when the request could not be completed
    /// * [`LookupError::Decode`] when the body is not valid JSON for `D`
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        url: &str,
        not_found_message: &str,
    ) -> Result<D, LookupError> {
        let response = self.transport.get(url).await?;
        debug!(url, status = response.status, "Response received");

        if !response.is_success() {
            return Err(LookupError::Status {
                message: not_found_message.to_string(),
                status: response.status,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}
