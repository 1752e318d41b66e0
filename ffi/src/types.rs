//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use icndb_core::{ApiClient, ApiError, DetachedTransport, HttpRequest};

/// Opaque handle to a build/parse-only `ApiClient`. C callers receive a
/// pointer to this and pass it back into every FFI function.
pub struct FfiIcndbClient {
    pub(crate) inner: ApiClient<DetachedTransport>,
}

/// Convert to an owned C string. Interior NULs cannot cross the boundary and
/// are dropped.
pub(crate) fn c_string(mut s: String) -> *mut c_char {
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

/// Move a `Vec` onto the heap as pointer + length. Empty vectors become null.
pub(crate) fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

/// Inverse of `into_raw_parts`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_parts` and not have been freed.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single query parameter, unencoded.
#[repr(C)]
pub struct FfiQueryParam {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
///
/// `url` has no query string; `full_url` has the query form-encoded onto it.
/// Hosts either send `full_url` as-is or pass `query` to their own client.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub full_url: *mut c_char,
    pub query: *mut FfiQueryParam,
    pub query_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let full_url = c_string(req.full_url());
        let params: Vec<FfiQueryParam> = req
            .query
            .into_iter()
            .map(|(k, v)| FfiQueryParam {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (query, query_len) = into_raw_parts(params);

        Box::into_raw(Box::new(FfiHttpRequest {
            url: c_string(req.url),
            full_url,
            query,
            query_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing the request,
/// then passes a pointer to an `icndb_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiStringListResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Decode = 2,
    ApiFailure = 3,
    Panic = 4,
    NullArg = 5,
}

/// Result envelope for the jokes and categories parsers.
///
/// `items` holds `len` C strings (null when empty). On failure `error_code`
/// says why and `error_message` is a human-readable C string; `items` may
/// still be populated when a fallback applies (categories).
#[repr(C)]
pub struct FfiStringListResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub items: *mut *mut c_char,
    pub len: u32,
}

impl FfiStringListResult {
    fn build(
        error_code: FfiErrorCode,
        error_message: Option<String>,
        http_status: u16,
        items: Vec<String>,
    ) -> *mut Self {
        let (items, len) = into_raw_parts(items.into_iter().map(c_string).collect());
        Box::into_raw(Box::new(FfiStringListResult {
            error_code,
            error_message: error_message.map_or(std::ptr::null_mut(), c_string),
            http_status,
            items,
            len,
        }))
    }

    pub(crate) fn ok(items: Vec<String>, http_status: u16) -> *mut Self {
        Self::build(FfiErrorCode::Ok, None, http_status, items)
    }

    /// An error result, optionally still carrying fallback `items`.
    pub(crate) fn from_error(err: &ApiError, http_status: u16, items: Vec<String>) -> *mut Self {
        let code = match err {
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Decode { .. } => FfiErrorCode::Decode,
            ApiError::Logical { .. } => FfiErrorCode::ApiFailure,
        };
        Self::build(code, Some(err.to_string()), http_status, items)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::build(
            FfiErrorCode::NullArg,
            Some(format!("null argument: {name}")),
            0,
            Vec::new(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::build(FfiErrorCode::Panic, Some(msg.to_string()), 0, Vec::new())
    }
}
