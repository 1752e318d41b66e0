//! C-ABI wrapper around `icndb-core`.
//!
//! # Overview
//! Exposes the jokes block through `extern "C"` functions so a host written
//! in any language can build the ICNDb requests, execute them with its own
//! HTTP stack, and hand the responses back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `build_*` / `parse_*` pairs mirror the three API lookups.
//! - Joke and category lists come back in one `FfiStringListResult`
//!   envelope; the count is a bare `u64` where `0` means unknown.
//! - The C caller owns all returned pointers and must call the matching
//!   `icndb_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use icndb_core::{
    render, unwrap_envelope, ApiClient, BlockConfiguration, CategorySet, HttpResponse,
    NormalizedJokes, OutboundRequest,
};

use types::*;

/// Borrow a C string as `&str`. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`, e.g. `http://api.icndb.com`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `icndb_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_client_new(base_url: *const c_char) -> *mut FfiIcndbClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        let client = ApiClient::detached(url);
        Box::into_raw(Box::new(FfiIcndbClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `icndb_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_client_free(client: *mut FfiIcndbClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

fn build(client: *const FfiIcndbClient, outbound: &OutboundRequest) -> *mut FfiHttpRequest {
    let client = unsafe { &*client };
    FfiHttpRequest::from_core(client.inner.build_request(outbound))
}

/// Build the random-jokes request for a block configuration given as JSON.
///
/// Missing fields take their defaults, so `"{}"` asks for one plain joke.
/// Returns null if `client` or `config_json` is null, or if the JSON does not
/// describe a block configuration. When `error_out` is non-null it receives
/// the reason for a null return (free it with `icndb_free_string`) and is set
/// to null on success.
/// The caller must free the returned pointer with `icndb_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_build_random_jokes(
    client: *const FfiIcndbClient,
    config_json: *const c_char,
    error_out: *mut *mut c_char,
) -> *mut FfiHttpRequest {
    let outcome = catch_unwind(|| {
        if client.is_null() {
            return Err("null argument: client".to_string());
        }
        if config_json.is_null() {
            return Err("null argument: config_json".to_string());
        }
        let raw = unsafe { borrow_str(config_json) };
        BlockConfiguration::from_json(raw)
            .map(|config| build(client, &OutboundRequest::random_jokes(&config)))
            .map_err(|e| format!("invalid block configuration: {e}"))
    })
    .unwrap_or_else(|_| Err("panic in icndb_build_random_jokes".to_string()));

    let (request, error) = match outcome {
        Ok(request) => (request, std::ptr::null_mut()),
        Err(message) => (std::ptr::null_mut(), c_string(message)),
    };
    if error_out.is_null() {
        free_c_string(error);
    } else {
        unsafe { *error_out = error };
    }
    request
}

/// Build the request listing every joke category.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_build_categories(client: *const FfiIcndbClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        build(client, &OutboundRequest::categories())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for the total joke count.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_build_count(client: *const FfiIcndbClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        build(client, &OutboundRequest::count())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// read as empty, which then fails to decode.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { borrow_str(resp.body) }.to_string()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

fn normalized(client: &FfiIcndbClient, resp: &FfiHttpResponse, quantity: u32) -> NormalizedJokes {
    let result = client.inner.parse_response(ffi_response_to_core(resp));
    NormalizedJokes::from_api_result(result, quantity)
}

/// Parse a random-jokes response into the joke texts, in API order.
///
/// `quantity` must be the one the request was built with; it decides whether
/// the API answered with one joke object or a list.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_parse_random_jokes(
    client: *const FfiIcndbClient,
    response: *const FfiHttpResponse,
    quantity: u32,
) -> *mut FfiStringListResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiStringListResult::null_arg("client");
        }
        if response.is_null() {
            return FfiStringListResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match normalized(client, resp, quantity).into_result() {
            Ok(jokes) => FfiStringListResult::ok(jokes, resp.status),
            Err(e) => FfiStringListResult::from_error(&e, resp.status, Vec::new()),
        }
    })
    .unwrap_or_else(|_| FfiStringListResult::panic("panic in icndb_parse_random_jokes"))
}

/// Parse a random-jokes response straight into the block's HTML.
///
/// Never fails: any problem renders the generic error message. Returns null
/// only if an argument is null. Free the result with `icndb_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_render_random_jokes(
    client: *const FfiIcndbClient,
    response: *const FfiHttpResponse,
    quantity: u32,
) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() || response.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let block = render(&normalized(client, resp, quantity), quantity);
        c_string(block.to_html())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse a categories response.
///
/// On failure `items` still holds the fallback categories, while
/// `error_code` reports what went wrong.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_parse_categories(
    client: *const FfiIcndbClient,
    response: *const FfiHttpResponse,
) -> *mut FfiStringListResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiStringListResult::null_arg("client");
        }
        if response.is_null() {
            return FfiStringListResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let names = client
            .inner
            .parse_response(ffi_response_to_core(resp))
            .and_then(|body| unwrap_envelope::<Vec<String>>(&body));
        match names {
            Ok(names) => {
                let set = CategorySet::new(names);
                FfiStringListResult::ok(set.names().iter().cloned().collect(), resp.status)
            }
            Err(e) => {
                let fallback = CategorySet::fallback();
                let items = fallback.names().iter().cloned().collect();
                FfiStringListResult::from_error(&e, resp.status, items)
            }
        }
    })
    .unwrap_or_else(|_| FfiStringListResult::panic("panic in icndb_parse_categories"))
}

/// Parse a count response. Returns `0` on any failure or null argument,
/// which callers must read as "no upper bound".
#[unsafe(no_mangle)]
pub extern "C" fn icndb_parse_count(
    client: *const FfiIcndbClient,
    response: *const FfiHttpResponse,
) -> u64 {
    catch_unwind(|| {
        if client.is_null() || response.is_null() {
            return 0;
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        client
            .inner
            .parse_response(ffi_response_to_core(resp))
            .and_then(|body| unwrap_envelope::<u64>(&body))
            .unwrap_or(0)
    })
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by any `icndb_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.full_url);
        for param in unsafe { from_raw_parts(req.query, req.query_len) } {
            free_c_string(param.key);
            free_c_string(param.value);
        }
    });
}

/// Free an `FfiStringListResult` returned by any `icndb_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_free_result(result: *mut FfiStringListResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        for item in unsafe { from_raw_parts(result.items, result.len) } {
            free_c_string(item);
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn icndb_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
