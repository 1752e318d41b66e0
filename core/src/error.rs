//! Error types for the joke API client and the configuration layer.
//!
//! # Design
//! Every API-facing failure lands in one `ApiError` and is rendered the same
//! way to the end user. The variants only exist so hosts can log *why* a
//! block degraded. `ValidationError` is configuration-time and is reported
//! back to whoever edits the block, never raised during rendering.

use thiserror::Error;

/// The only message an end user ever sees for a failed API call.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Failure of a single call against the joke API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but its body was not the JSON shape we expected.
    #[error("could not decode response{}: {message}", status_suffix(.status))]
    Decode { status: Option<u16>, message: String },

    /// Well-formed envelope whose `type` tag is not `"success"`.
    #[error("API reported `{kind}`{}", detail_suffix(.detail))]
    Logical { kind: String, detail: Option<String> },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ApiError {
    pub(crate) fn decode(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Decode {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for end users, identical for every variant.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

/// A configuration value rejected at edit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Quantity must be at least 1.")]
    QuantityTooSmall,

    #[error("Quantity must be lower than or equal to {max}.")]
    QuantityExceedsCount { quantity: u32, max: u64 },

    #[error("First name must be lowercase or uppercase letters.")]
    InvalidFirstName,

    #[error("Last name must be lowercase or uppercase letters.")]
    InvalidLastName,

    #[error("Unknown category `{category}`.")]
    UnknownCategory { field: &'static str, category: String },
}

impl ValidationError {
    /// Dotted path of the configuration field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::QuantityTooSmall | ValidationError::QuantityExceedsCount { .. } => {
                "quantity"
            }
            ValidationError::InvalidFirstName => "renaming.first_name",
            ValidationError::InvalidLastName => "renaming.last_name",
            ValidationError::UnknownCategory { field, .. } => *field,
        }
    }
}

/// Problems loading `ClientSettings`.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid timeout `{0}`: expected a whole number of seconds")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_api_error_shows_the_same_user_message() {
        let errors = [
            ApiError::Transport("connection refused".into()),
            ApiError::decode(Some(200), "expected value"),
            ApiError::Logical {
                kind: "NoSuchQuoteException".into(),
                detail: None,
            },
        ];
        for err in errors {
            assert_eq!(err.user_message(), "Something went wrong.");
        }
    }

    #[test]
    fn logical_error_display_includes_detail_when_present() {
        let err = ApiError::Logical {
            kind: "NoSuchQuoteException".into(),
            detail: Some("No quote with id=-1.".into()),
        };
        assert_eq!(
            err.to_string(),
            "API reported `NoSuchQuoteException`: No quote with id=-1."
        );

        let bare = ApiError::Logical {
            kind: "failure".into(),
            detail: None,
        };
        assert_eq!(bare.to_string(), "API reported `failure`");
    }

    #[test]
    fn decode_error_display_mentions_status_only_when_known() {
        assert_eq!(
            ApiError::decode(Some(502), "expected value").to_string(),
            "could not decode response (HTTP 502): expected value"
        );
        assert_eq!(
            ApiError::decode(None, "missing `value`").to_string(),
            "could not decode response: missing `value`"
        );
    }

    #[test]
    fn validation_errors_name_their_field() {
        assert_eq!(ValidationError::QuantityTooSmall.field(), "quantity");
        assert_eq!(
            ValidationError::QuantityExceedsCount { quantity: 9, max: 3 }.to_string(),
            "Quantity must be lower than or equal to 3."
        );
        assert_eq!(ValidationError::InvalidLastName.field(), "renaming.last_name");
        let unknown = ValidationError::UnknownCategory {
            field: "filtering.exclusive",
            category: "dad".into(),
        };
        assert_eq!(unknown.field(), "filtering.exclusive");
    }
}
