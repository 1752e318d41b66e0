//! Translate a block configuration into the joke API's path and query.
//!
//! Everything here is pure: no I/O, no clock, no randomness. The same
//! configuration always yields the same `OutboundRequest`.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{BlockConfiguration, FilterType};

pub const RANDOM_JOKES_PATH: &str = "jokes/random";
pub const CATEGORIES_PATH: &str = "categories";
pub const COUNT_PATH: &str = "jokes/count";

pub const QUERY_FIRST_NAME: &str = "firstName";
pub const QUERY_LAST_NAME: &str = "lastName";
pub const QUERY_ESCAPE: &str = "escape";
pub const QUERY_LIMIT_TO: &str = "limitTo";
pub const QUERY_EXCLUDE: &str = "exclude";

/// Path relative to the API base URL plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundRequest {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl OutboundRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
        }
    }

    pub fn categories() -> Self {
        Self::new(CATEGORIES_PATH)
    }

    pub fn count() -> Self {
        Self::new(COUNT_PATH)
    }

    /// Request for the random jokes described by `config`.
    pub fn random_jokes(config: &BlockConfiguration) -> Self {
        build_random_jokes(config)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.query.insert(key.to_string(), value);
        }
    }
}

/// Build the `jokes/random` request for a configuration.
///
/// The count goes in the path only when more than one joke is wanted; the
/// API answers the bare path with a single joke object instead of a list.
pub fn build_random_jokes(config: &BlockConfiguration) -> OutboundRequest {
    let path = if config.quantity > 1 {
        format!("{RANDOM_JOKES_PATH}/{}", config.quantity)
    } else {
        RANDOM_JOKES_PATH.to_string()
    };
    let mut request = OutboundRequest::new(path);

    let renaming = &config.renaming;
    if renaming.enable {
        request.set(QUERY_FIRST_NAME, renaming.first_name.as_str());
        request.set(QUERY_LAST_NAME, renaming.last_name.as_str());
    }

    if config.escaping.enable {
        request.set(QUERY_ESCAPE, config.escaping.format.as_str());
    }

    let filtering = &config.filtering;
    if filtering.enable {
        match &filtering.kind {
            FilterType::Inclusive => {
                request.set(QUERY_LIMIT_TO, category_list(&filtering.inclusive))
            }
            FilterType::Exclusive => {
                request.set(QUERY_EXCLUDE, category_list(&filtering.exclusive))
            }
            FilterType::Other(kind) => {
                tracing::debug!(filter_type = %kind, "unknown filter type, sending no filter");
            }
        }
    }

    request
}

/// `[a,b,c]`, the list syntax the API expects for category parameters.
///
/// Names are joined in the set's sorted order, not the order the host stored
/// them in: `{nerdy, explicit}` is always sent as `[explicit,nerdy]`.
pub fn category_list(categories: &BTreeSet<String>) -> String {
    let joined = categories
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}
