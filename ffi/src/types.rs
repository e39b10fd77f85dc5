//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use fx_core::{
    ConversionError, ConversionRequest, ConversionResult, ConversionSummary, CurrencyCode,
    HttpMethod, ValidationError, GENERIC_FAILURE_MESSAGE,
};

/// Opaque handle to a `RateClient`. C callers receive a pointer to this
/// and pass it back into every FFI function that talks to the provider.
pub struct FfiFxClient {
    pub(crate) inner: fx_core::RateClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs yield
/// an empty string.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Borrow a caller C string as UTF-8. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that stays
/// alive for `'a`.
pub(crate) unsafe fn borrow_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `fx_build_latest_rates`. The C caller executes the request and
/// passes the response back through `fx_parse_latest_rates`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: fx_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to `fx_parse_latest_rates`. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes shared by `FfiValidation` and `FfiConversionResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidBaseCode = 1,
    InvalidTargetCode = 2,
    InvalidAmount = 3,
    Network = 4,
    Auth = 5,
    RateLimited = 6,
    Service = 7,
    MalformedResponse = 8,
    CurrencyNotFound = 9,
    InvalidRate = 10,
    Panic = 11,
    NullArg = 12,
    AmountOutOfRange = 13,
    /// A non-null argument that cannot be used, such as a validation whose
    /// `Ok` fields were altered by the host.
    InvalidArg = 14,
}

impl From<&ValidationError> for FfiErrorCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::InvalidBaseCode => FfiErrorCode::InvalidBaseCode,
            ValidationError::InvalidTargetCode => FfiErrorCode::InvalidTargetCode,
            ValidationError::InvalidAmount => FfiErrorCode::InvalidAmount,
        }
    }
}

impl From<&ConversionError> for FfiErrorCode {
    fn from(err: &ConversionError) -> Self {
        match err {
            ConversionError::NetworkError(_) => FfiErrorCode::Network,
            ConversionError::AuthError => FfiErrorCode::Auth,
            ConversionError::RateLimited => FfiErrorCode::RateLimited,
            ConversionError::ServiceError { .. } => FfiErrorCode::Service,
            ConversionError::MalformedResponse => FfiErrorCode::MalformedResponse,
            ConversionError::CurrencyNotFound { .. } => FfiErrorCode::CurrencyNotFound,
            ConversionError::InvalidRate { .. } => FfiErrorCode::InvalidRate,
            ConversionError::AmountOutOfRange => FfiErrorCode::AmountOutOfRange,
        }
    }
}

/// Outcome of `fx_validate`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and
/// `base_code` / `target_code` hold the normalized codes the host should
/// write back into its input fields. On failure the codes are null and
/// `error_message` is the text to show.
#[repr(C)]
pub struct FfiValidation {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub base_code: *mut c_char,
    pub target_code: *mut c_char,
    pub amount: f64,
}

impl FfiValidation {
    pub(crate) fn from_core(result: Result<ConversionRequest, ValidationError>) -> *mut Self {
        let validation = match result {
            Ok(req) => FfiValidation {
                error_code: FfiErrorCode::Ok,
                error_message: std::ptr::null_mut(),
                base_code: to_c_string(req.base.as_str()),
                target_code: to_c_string(req.target.as_str()),
                amount: req.amount,
            },
            Err(err) => Self::failed((&err).into(), &err.to_string()),
        };
        Box::into_raw(Box::new(validation))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Box::into_raw(Box::new(Self::failed(
            FfiErrorCode::NullArg,
            &format!("null argument: {name}"),
        )))
    }

    pub(crate) fn panic() -> *mut Self {
        Box::into_raw(Box::new(Self::failed(FfiErrorCode::Panic, GENERIC_FAILURE_MESSAGE)))
    }

    fn failed(error_code: FfiErrorCode, msg: &str) -> Self {
        FfiValidation {
            error_code,
            error_message: to_c_string(msg),
            base_code: std::ptr::null_mut(),
            target_code: std::ptr::null_mut(),
            amount: 0.0,
        }
    }

    /// Rebuild the core request from a successful validation.
    ///
    /// # Safety
    /// The string fields must be null or valid C strings from `fx_validate`.
    pub(crate) unsafe fn to_request(&self) -> Option<ConversionRequest> {
        if !matches!(self.error_code, FfiErrorCode::Ok)
            || self.base_code.is_null()
            || self.target_code.is_null()
            || !(self.amount.is_finite() && self.amount > 0.0)
        {
            return None;
        }
        let base = CurrencyCode::normalize(unsafe { borrow_str(self.base_code) })?;
        let target = CurrencyCode::normalize(unsafe { borrow_str(self.target_code) })?;
        Some(ConversionRequest {
            base,
            target,
            amount: self.amount,
        })
    }
}

/// Outcome of a conversion attempt.
///
/// On success `error_code` is `Ok`, `error_message` is null, `rate` and
/// `converted_amount` are set, and `headline` / `rate_line` carry the two
/// rendered lines. On failure `error_message` is the text to show, the
/// line fields are null, and `http_status` is set when the provider
/// answered with a non-success status.
#[repr(C)]
pub struct FfiConversionResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub rate: f64,
    pub converted_amount: f64,
    pub headline: *mut c_char,
    pub rate_line: *mut c_char,
}

impl FfiConversionResult {
    pub(crate) fn ok(request: ConversionRequest, result: ConversionResult) -> *mut Self {
        let summary = ConversionSummary { request, result };
        Box::into_raw(Box::new(FfiConversionResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            rate: result.rate,
            converted_amount: result.converted_amount,
            headline: to_c_string(summary.headline()),
            rate_line: to_c_string(summary.rate_line()),
        }))
    }

    pub(crate) fn from_error(err: ConversionError) -> *mut Self {
        let http_status = match &err {
            ConversionError::AuthError => 401,
            ConversionError::RateLimited => 429,
            ConversionError::ServiceError { status } => *status,
            _ => 0,
        };
        Box::into_raw(Box::new(Self::failed((&err).into(), &err.to_string(), http_status)))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Box::into_raw(Box::new(Self::failed(
            FfiErrorCode::NullArg,
            &format!("null argument: {name}"),
            0,
        )))
    }

    /// Carry a failed validation's own code and message into a result, so
    /// the host sees why nothing was converted.
    ///
    /// # Safety
    /// `validation.error_message` must be null or a valid C string from
    /// `fx_validate`.
    pub(crate) unsafe fn rejected(validation: &FfiValidation) -> *mut Self {
        let failed = if validation.error_code == FfiErrorCode::Ok {
            Self::failed(FfiErrorCode::InvalidArg, "invalid argument: validation", 0)
        } else {
            let message = if validation.error_message.is_null() {
                GENERIC_FAILURE_MESSAGE
            } else {
                unsafe { borrow_str(validation.error_message) }
            };
            Self::failed(validation.error_code, message, 0)
        };
        Box::into_raw(Box::new(failed))
    }

    pub(crate) fn panic() -> *mut Self {
        Box::into_raw(Box::new(Self::failed(FfiErrorCode::Panic, GENERIC_FAILURE_MESSAGE, 0)))
    }

    fn failed(error_code: FfiErrorCode, msg: &str, http_status: u16) -> Self {
        FfiConversionResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            rate: 0.0,
            converted_amount: 0.0,
            headline: std::ptr::null_mut(),
            rate_line: std::ptr::null_mut(),
        }
    }
}
