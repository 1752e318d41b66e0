//! Joke categories, fetched once and memoized.
//!
//! # Design
//! The category list feeds form options and validation, neither of which may
//! block on the API being up. Any failure yields the fallback set
//! `{nerdy, explicit}`. Only sets that came from the API are memoized, so a
//! later call retries instead of pinning the fallback for the process
//! lifetime.
//!
//! The memo is an `RwLock<Option<Arc<..>>>`: readers never wait on a fetch,
//! and two concurrent misses may both fetch, with the first writer winning.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::normalize::unwrap_envelope;
use crate::request::OutboundRequest;

pub const FALLBACK_CATEGORIES: [&str; 2] = ["nerdy", "explicit"];

/// Set of category names, remembering whether it is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    names: BTreeSet<String>,
    fallback: bool,
}

impl CategorySet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            fallback: true,
            ..Self::new(FALLBACK_CATEGORIES)
        }
    }

    /// True when the API could not be reached and the set is made up.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Fetch the categories without any caching or fallback.
pub fn fetch_categories<T: HttpTransport>(client: &ApiClient<T>) -> Result<CategorySet, ApiError> {
    let body = client.send(&OutboundRequest::categories())?;
    let names: Vec<String> = unwrap_envelope(&body)?;
    Ok(CategorySet::new(names))
}

/// Process-lifetime memo of the category list.
#[derive(Debug)]
pub struct CategoryCache<T> {
    client: ApiClient<T>,
    cached: RwLock<Option<Arc<CategorySet>>>,
}

impl<T: HttpTransport> CategoryCache<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            cached: RwLock::new(None),
        }
    }

    /// The memoized set, fetching it on first use.
    pub fn get_categories(&self) -> Arc<CategorySet> {
        if let Some(cached) = self.cached() {
            return cached;
        }
        self.load()
    }

    /// Forget the memoized set; the next `get_categories` fetches again.
    pub fn invalidate(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Invalidate and fetch immediately.
    pub fn refresh(&self) -> Arc<CategorySet> {
        self.invalidate();
        self.load()
    }

    fn cached(&self) -> Option<Arc<CategorySet>> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self) -> Arc<CategorySet> {
        match fetch_categories(&self.client) {
            Ok(set) => {
                let mut slot = self.cached.write().unwrap_or_else(PoisonError::into_inner);
                slot.get_or_insert_with(|| Arc::new(set)).clone()
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not fetch joke categories, using fallback");
                Arc::new(CategorySet::fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    const CATEGORIES: &str = r#"{"type":"success","value":["explicit","nerdy","dad"]}"#;

    fn cache(transport: &RecordingTransport) -> CategoryCache<RecordingTransport> {
        CategoryCache::new(ApiClient::new("http://api.test", transport.clone()))
    }

    #[test]
    fn success_returns_the_api_list_as_a_set() {
        let transport = RecordingTransport::replying(200, CATEGORIES);
        let set = cache(&transport).get_categories();
        assert!(!set.is_fallback());
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["dad", "explicit", "nerdy"]);
        assert_eq!(transport.requests()[0].url, "http://api.test/categories");
    }

    #[test]
    fn transport_error_yields_the_fallback() {
        let transport = RecordingTransport::failing();
        let set = cache(&transport).get_categories();
        assert!(set.is_fallback());
        assert_eq!(set.len(), 2);
        assert!(set.contains("nerdy"));
        assert!(set.contains("explicit"));
    }

    #[test]
    fn logical_and_decode_failures_yield_the_fallback() {
        for body in [r#"{"type":"failure","value":"down"}"#, "not json", r#"{"type":"success","value":3}"#] {
            let transport = RecordingTransport::replying(200, body);
            assert!(cache(&transport).get_categories().is_fallback(), "{body}");
        }
    }

    #[test]
    fn successful_fetch_is_memoized() {
        let transport = RecordingTransport::replying(200, CATEGORIES);
        let cache = cache(&transport);
        let first = cache.get_categories();
        let second = cache.get_categories();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn memo_survives_the_api_going_down() {
        let transport = RecordingTransport::replying(200, CATEGORIES);
        let cache = cache(&transport);
        cache.get_categories();
        transport.fail();
        assert!(cache.get_categories().contains("dad"));
    }

    #[test]
    fn fallback_is_not_memoized() {
        let transport = RecordingTransport::failing();
        let cache = cache(&transport);
        assert!(cache.get_categories().is_fallback());

        transport.answer(200, CATEGORIES);
        let set = cache.get_categories();
        assert!(!set.is_fallback());
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn refresh_refetches() {
        let transport = RecordingTransport::replying(200, CATEGORIES);
        let cache = cache(&transport);
        cache.get_categories();

        transport.answer(200, r#"{"type":"success","value":["nerdy"]}"#);
        assert!(cache.get_categories().contains("dad"));
        let refreshed = cache.refresh();
        assert_eq!(refreshed.len(), 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn concurrent_readers_share_one_set() {
        let transport = RecordingTransport::replying(200, CATEGORIES);
        let cache = Arc::new(cache(&transport));
        let first = cache.get_categories();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_categories())
            })
            .collect();
        for handle in handles {
            assert!(Arc::ptr_eq(&first, &handle.join().unwrap()));
        }
    }
}
