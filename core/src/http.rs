//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient` builds an
//! `HttpRequest`, hands it to an `HttpTransport`, and parses whatever
//! `HttpResponse` comes back, so a host that must do its own I/O (see the
//! `icndb-ffi` crate) can skip the transport and call the build/parse halves
//! directly.
//!
//! All fields use owned types so values can cross the FFI boundary without
//! lifetime concerns.

use std::sync::Arc;

use url::form_urlencoded;

use crate::error::ApiError;
use crate::settings::ClientSettings;

/// A GET request described as plain data. The joke API has no other verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL without the query string.
    pub url: String,
    /// Unencoded query pairs, in the order they should be sent.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// The URL with the query form-encoded onto it.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{query}", self.url)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes exactly one request. Implementations must not retry.
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
///
/// Non-2xx statuses are returned as data: the joke API signals failure in the
/// body, so the status code alone never decides the outcome.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: Option<String>,
}

impl UreqTransport {
    pub fn new(settings: &ClientSettings) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(settings.timeout())
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: settings.user_agent.clone(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientSettings::default())
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .agent
            .get(&request.url)
            .header("accept", "application/json");
        if let Some(agent) = &self.user_agent {
            builder = builder.header("user-agent", agent.as_str());
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }

        let mut response = builder
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Transport for clients that only build and parse.
///
/// Used when the host performs the round-trip itself; calling `execute`
/// is a transport error rather than a panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedTransport;

impl HttpTransport for DetachedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Transport(format!(
            "detached client cannot execute GET {}",
            request.url
        )))
    }
}
