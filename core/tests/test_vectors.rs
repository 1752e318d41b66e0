//! Verify the render path and the lookups against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected outbound request, a
//! simulated response and the expected outcome. Queries are compared as maps
//! so parameter order never causes false negatives.

use std::collections::BTreeMap;

use icndb_core::{
    ApiClient, ApiError, BlockConfiguration, CategoryCache, CountProvider, HttpRequest,
    HttpResponse, HttpTransport, NormalizedJokes, OutboundRequest,
};

const BASE_URL: &str = "http://localhost:3000";

/// Replies with the vector's simulated response.
struct VectorTransport(HttpResponse);

impl HttpTransport for VectorTransport {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.0.clone())
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Random jokes
// ---------------------------------------------------------------------------

#[test]
fn random_jokes_test_vectors() {
    let raw = include_str!("../../test-vectors/random_jokes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config: BlockConfiguration = serde_json::from_value(case["config"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let client = ApiClient::new(BASE_URL, VectorTransport(simulated(case)));
        let outbound = OutboundRequest::random_jokes(&config);
        let req = client.build_request(&outbound);
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
        let expected_query: BTreeMap<String, String> =
            serde_json::from_value(expected_req["query"].clone()).unwrap();
        let query: BTreeMap<String, String> = req.query.iter().cloned().collect();
        assert_eq!(query, expected_query, "{name}: query");

        // Verify normalize
        let result = NormalizedJokes::from_api_result(client.send(&outbound), config.quantity);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.into_result().unwrap_err();
            match expected_error.as_str().unwrap() {
                "Logical" => assert!(matches!(err, ApiError::Logical { .. }), "{name}: {err}"),
                "Decode" => assert!(matches!(err, ApiError::Decode { .. }), "{name}: {err}"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let jokes = result.into_result().unwrap();
            assert_eq!(jokes, string_list(&case["expected_result"]), "{name}: jokes");
            assert_eq!(jokes.len(), config.quantity as usize, "{name}: length");
        }
    }
}

#[test]
fn exclusive_filter_full_url() {
    let config: BlockConfiguration = serde_json::from_str(
        r#"{"quantity": 2, "filtering": {"enable": true, "type": "exclusive", "exclusive": ["explicit"]}}"#,
    )
    .unwrap();
    let client = ApiClient::detached(BASE_URL);
    let req = client.build_request(&OutboundRequest::random_jokes(&config));

    assert_eq!(
        req.full_url(),
        "http://localhost:3000/jokes/random/2?exclude=%5Bexplicit%5D"
    );
    assert!(req.query.iter().all(|(k, _)| k != "limitTo"));
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn categories_test_vectors() {
    let raw = include_str!("../../test-vectors/categories.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let cache = CategoryCache::new(ApiClient::new(BASE_URL, VectorTransport(simulated(case))));

        let set = cache.get_categories();
        let names: Vec<String> = set.iter().map(str::to_string).collect();
        assert_eq!(names, string_list(&case["expected_result"]), "{name}: names");
        assert_eq!(
            set.is_fallback(),
            case["expected_fallback"].as_bool().unwrap(),
            "{name}: fallback"
        );
    }
}

// ---------------------------------------------------------------------------
// Count
// ---------------------------------------------------------------------------

#[test]
fn count_test_vectors() {
    let raw = include_str!("../../test-vectors/count.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let provider = CountProvider::new(ApiClient::new(BASE_URL, VectorTransport(simulated(case))));
        assert_eq!(
            provider.get_count(),
            case["expected_result"].as_u64().unwrap(),
            "{name}: count"
        );
    }
}
