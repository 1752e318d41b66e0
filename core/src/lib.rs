//! Core of the ICNDb jokes block.
//!
//! # Overview
//! Turns a block configuration into one GET against the joke API and turns
//! the JSON answer into an ordered list of joke texts, degrading to safe
//! defaults whenever the third-party API misbehaves.
//!
//! # Design
//! - `request` and `normalize` are pure; `ApiClient` is the only place that
//!   touches the network, through the `HttpTransport` seam.
//! - `ApiClient` exposes `build_request` / `parse_response` separately so a
//!   host can execute the round-trip itself (host-does-IO).
//! - Lookups used at edit time (`CategoryCache`, `CountProvider`) never fail:
//!   they fall back to `{nerdy, explicit}` and `0`.
//! - Dependencies are passed explicitly; there is no global registry or
//!   implicit static cache.

pub mod block;
pub mod categories;
pub mod client;
pub mod config;
pub mod count;
pub mod error;
pub mod http;
pub mod normalize;
pub mod render;
pub mod request;
pub mod settings;
pub mod validate;

#[cfg(test)]
mod testing;

pub use block::RandomJokesBlock;
pub use categories::{fetch_categories, CategoryCache, CategorySet, FALLBACK_CATEGORIES};
pub use client::{ApiClient, ApiResult};
pub use config::{BlockConfiguration, EscapeFormat, Escaping, FilterType, Filtering, Renaming};
pub use count::{fetch_count, CountProvider};
pub use error::{ApiError, SettingsError, ValidationError, GENERIC_FAILURE_MESSAGE};
pub use http::{DetachedTransport, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use normalize::{
    normalize_joke_objects, normalize_jokes, unwrap_envelope, Joke, NormalizedJokes,
};
pub use render::{render, JokeBlock};
pub use request::{build_random_jokes, OutboundRequest};
pub use settings::ClientSettings;
pub use validate::{
    quantity_bounds, validate_configuration, validate_filtering, validate_quantity,
    validate_renaming, QuantityBounds,
};
