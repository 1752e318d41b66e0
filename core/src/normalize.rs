//! Turn decoded joke API bodies into renderer-agnostic results.
//!
//! # Design
//! Every API response is an envelope `{"type": ..., "value": ...}`. The tag
//! is checked first and decides success on its own; only a `"success"` tag
//! lets us look at `value`. Joke text is passed through untouched: if the
//! block asked for escaping, the API has already applied it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub const SUCCESS_TAG: &str = "success";

/// One joke object as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    #[serde(default)]
    pub id: Option<u64>,
    pub joke: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Check the envelope tag and deserialize its `value`.
pub fn unwrap_envelope<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    let kind = body
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::decode(None, "missing `type` tag"))?;
    tracing::debug!(tag = kind, "joke API envelope");

    if kind != SUCCESS_TAG {
        return Err(ApiError::Logical {
            kind: kind.to_string(),
            detail: body.get("value").and_then(Value::as_str).map(str::to_string),
        });
    }

    let value = body
        .get("value")
        .ok_or_else(|| ApiError::decode(None, "missing `value`"))?;
    T::deserialize(value).map_err(|e| ApiError::decode(None, e.to_string()))
}

/// Extract the joke objects for a request of `quantity` jokes, in API order.
///
/// A single joke is requested on the bare path and comes back as an object;
/// anything more comes back as a list. A list of any other length than
/// `quantity` is a decode error.
pub fn normalize_joke_objects(body: &Value, quantity: u32) -> Result<Vec<Joke>, ApiError> {
    let jokes = if quantity > 1 {
        unwrap_envelope::<Vec<Joke>>(body)?
    } else {
        vec![unwrap_envelope::<Joke>(body)?]
    };

    let expected = quantity.max(1) as usize;
    if jokes.len() != expected {
        return Err(ApiError::decode(
            None,
            format!("expected {expected} jokes, got {}", jokes.len()),
        ));
    }
    Ok(jokes)
}

/// Extract the joke texts for a request of `quantity` jokes, in API order.
pub fn normalize_jokes(body: &Value, quantity: u32) -> Result<Vec<String>, ApiError> {
    Ok(normalize_joke_objects(body, quantity)?
        .into_iter()
        .map(|j| j.joke)
        .collect())
}

/// Jokes ready for presentation, or the reason there are none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedJokes {
    jokes: Vec<String>,
    failure: Option<ApiError>,
}

impl NormalizedJokes {
    pub fn success(jokes: Vec<String>) -> Self {
        Self {
            jokes,
            failure: None,
        }
    }

    pub fn failure(reason: ApiError) -> Self {
        Self {
            jokes: Vec::new(),
            failure: Some(reason),
        }
    }

    /// Normalize the outcome of an API call for `quantity` jokes.
    pub fn from_api_result(result: Result<Value, ApiError>, quantity: u32) -> Self {
        match result.and_then(|body| normalize_jokes(&body, quantity)) {
            Ok(jokes) => Self::success(jokes),
            Err(reason) => Self::failure(reason),
        }
    }

    pub fn jokes(&self) -> &[String] {
        &self.jokes
    }

    pub fn failure_reason(&self) -> Option<&ApiError> {
        self.failure.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_result(self) -> Result<Vec<String>, ApiError> {
        match self.failure {
            Some(reason) => Err(reason),
            None => Ok(self.jokes),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn jokes_body(texts: &[&str]) -> Value {
        let value: Vec<Value> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"id": i + 1, "joke": t, "categories": []}))
            .collect();
        json!({"type": "success", "value": value})
    }

    #[test]
    fn single_joke_object_becomes_one_element() {
        let body = json!({
            "type": "success",
            "value": {"id": 15, "joke": "Chuck Norris counted to infinity. Twice.", "categories": ["nerdy"]}
        });
        let jokes = normalize_jokes(&body, 1).unwrap();
        assert_eq!(jokes, vec!["Chuck Norris counted to infinity. Twice."]);
    }

    #[test]
    fn several_jokes_keep_api_order() {
        let texts = ["third", "first", "second", "fourth"];
        let jokes = normalize_jokes(&jokes_body(&texts), 4).unwrap();
        assert_eq!(jokes, texts);
    }

    #[test]
    fn joke_objects_keep_their_metadata() {
        let body = json!({
            "type": "success",
            "value": [{"id": 7, "joke": "a", "categories": ["nerdy"]}, {"joke": "b"}]
        });
        let jokes = normalize_joke_objects(&body, 2).unwrap();
        assert_eq!(jokes[0].id, Some(7));
        assert_eq!(jokes[0].categories, vec!["nerdy"]);
        assert_eq!(jokes[1].id, None);
        assert!(jokes[1].categories.is_empty());
    }

    #[test]
    fn escaped_text_is_not_escaped_again() {
        let body = json!({"type": "success", "value": {"joke": "&quot;Ha&quot; &amp; <b>"}});
        assert_eq!(normalize_jokes(&body, 1).unwrap(), vec!["&quot;Ha&quot; &amp; <b>"]);
    }

    #[test]
    fn non_success_tag_fails_whatever_the_value() {
        let bodies = [
            json!({"type": "NoSuchQuoteException", "value": "No quote with id=-1."}),
            json!({"type": "failure", "value": [{"joke": "looks fine"}]}),
            json!({"type": "SUCCESS", "value": {"joke": "wrong case"}}),
        ];
        for body in bodies {
            let err = normalize_jokes(&body, 1).unwrap_err();
            assert!(matches!(err, ApiError::Logical { .. }), "{body}");
        }
    }

    #[test]
    fn logical_failure_keeps_the_api_message() {
        let body = json!({"type": "NoSuchQuoteException", "value": "No quote with id=-1."});
        let err = normalize_jokes(&body, 1).unwrap_err();
        assert_eq!(
            err,
            ApiError::Logical {
                kind: "NoSuchQuoteException".into(),
                detail: Some("No quote with id=-1.".into()),
            }
        );
    }

    #[test]
    fn missing_fields_are_decode_errors() {
        let cases = [
            (json!({"value": {"joke": "x"}}), 1),
            (json!({"type": "success"}), 1),
            (json!({"type": "success", "value": {"text": "x"}}), 1),
            (json!({"type": "success", "value": [{"joke": "x"}, {"id": 2}]}), 2),
        ];
        for (body, quantity) in cases {
            let err = normalize_jokes(&body, quantity).unwrap_err();
            assert!(matches!(err, ApiError::Decode { .. }), "{body}");
        }
    }

    #[test]
    fn shape_must_match_the_requested_quantity() {
        let list = jokes_body(&["a"]);
        assert!(matches!(
            normalize_jokes(&list, 1).unwrap_err(),
            ApiError::Decode { .. }
        ));

        let object = json!({"type": "success", "value": {"joke": "a"}});
        assert!(matches!(
            normalize_jokes(&object, 2).unwrap_err(),
            ApiError::Decode { .. }
        ));
    }

    #[test]
    fn joke_count_must_match_the_requested_quantity() {
        for texts in [&[][..], &["a"][..], &["a", "b", "c", "d"][..]] {
            let err = normalize_jokes(&jokes_body(texts), 3).unwrap_err();
            assert_eq!(
                err,
                ApiError::decode(None, format!("expected 3 jokes, got {}", texts.len()))
            );
        }
    }

    #[test]
    fn empty_success_list_renders_the_error_state() {
        let result = NormalizedJokes::from_api_result(Ok(jokes_body(&[])), 3);
        assert!(result.is_failure());
        assert_eq!(
            crate::render::render(&result, 3).to_html(),
            "Something went wrong."
        );
    }

    #[test]
    fn normalized_jokes_from_transport_failure_is_empty() {
        let result = NormalizedJokes::from_api_result(
            Err(ApiError::Transport("connection refused".into())),
            3,
        );
        assert!(result.is_failure());
        assert!(result.jokes().is_empty());
        assert!(matches!(
            result.failure_reason(),
            Some(ApiError::Transport(_))
        ));
    }

    #[test]
    fn normalized_jokes_from_success_round_trips_into_result() {
        let result = NormalizedJokes::from_api_result(Ok(jokes_body(&["x", "y"])), 2);
        assert!(!result.is_failure());
        assert_eq!(result.into_result().unwrap(), vec!["x", "y"]);
    }
}
