//! Total number of jokes the API knows about.
//!
//! `0` doubles as "unknown": it is what a failed lookup returns, and callers
//! must read it as "do not enforce an upper bound". A genuinely empty
//! database is indistinguishable from an unreachable one.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::normalize::unwrap_envelope;
use crate::request::OutboundRequest;

/// Fetch the joke count, surfacing the failure instead of defaulting.
pub fn fetch_count<T: HttpTransport>(client: &ApiClient<T>) -> Result<u64, ApiError> {
    let body = client.send(&OutboundRequest::count())?;
    unwrap_envelope(&body)
}

#[derive(Debug, Clone)]
pub struct CountProvider<T> {
    client: ApiClient<T>,
}

impl<T: HttpTransport> CountProvider<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    /// The live joke count, or `0` if it could not be fetched.
    pub fn get_count(&self) -> u64 {
        fetch_count(&self.client).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not fetch joke count, bounds checks disabled");
            0
        })
    }
}
