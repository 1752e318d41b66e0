//! Single-call client for the joke API.
//!
//! # Design
//! `ApiClient` holds only a base URL and a transport. Each call is split into
//! `build_request` (pure), `HttpTransport::execute` (the one round-trip) and
//! `parse_response` (pure). Hosts that do their own I/O use the two pure
//! halves with a `DetachedTransport`.
//!
//! The API reports failure inside the body, so the status code is advisory:
//! a decodable body is always returned to the caller, which inspects the
//! envelope tag.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{DetachedTransport, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::request::OutboundRequest;
use crate::settings::ClientSettings;

/// Decoded JSON body, or why there is none.
pub type ApiResult = Result<Value, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(&settings.base_url, UreqTransport::new(settings))
    }
}

impl ApiClient<DetachedTransport> {
    /// A client that builds and parses but never performs I/O.
    pub fn detached(base_url: &str) -> Self {
        Self::new(base_url, DetachedTransport)
    }
}

impl<T> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request(&self, request: &OutboundRequest) -> HttpRequest {
        HttpRequest {
            url: format!("{}/{}", self.base_url, request.path.trim_start_matches('/')),
            query: request
                .query
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            headers: Vec::new(),
        }
    }

    /// Decode a response body. The status only matters when decoding fails.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResult {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => {
                if !response.is_success() {
                    tracing::warn!(
                        status = response.status,
                        "joke API answered with a non-2xx status but a JSON body"
                    );
                }
                Ok(body)
            }
            Err(e) => Err(ApiError::decode(Some(response.status), e.to_string())),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// One GET to `{base_url}/{path}` with `query`.
    pub fn get(&self, path: &str, query: &BTreeMap<String, String>) -> ApiResult {
        self.send(&OutboundRequest {
            path: path.to_string(),
            query: query.clone(),
        })
    }

    pub fn send(&self, request: &OutboundRequest) -> ApiResult {
        let http_request = self.build_request(request);
        tracing::debug!(url = %http_request.full_url(), "joke API request");
        let response = self.transport.execute(&http_request)?;
        tracing::debug!(status = response.status, "joke API response");
        self.parse_response(response)
    }
}
