//! C-ABI wrapper around `fx-core`.
//!
//! # Overview
//! Exposes validation and the latest-rates round-trip through `extern "C"`
//! functions so a native mobile shell can drive a conversion without
//! linking to Rust's async runtime. The host owns the screen, the busy
//! flag and the network call:
//!
//! 1. `fx_validate` the three field strings; write the normalized codes back.
//! 2. `fx_build_latest_rates` and execute the returned request.
//! 3. `fx_parse_latest_rates` with the response, or `fx_transport_failed`
//!    if no response arrived, and render the result.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary; a caught panic is reported with the
//!   generic failure message.
//! - The C caller owns all returned pointers and must call the matching
//!   `fx_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use fx_core::{ConversionError, HttpResponse};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new rate client for `base_url`, authenticating with `api_key`.
///
/// Returns null if either argument is null or if an internal panic occurs.
/// The caller must free the returned pointer with `fx_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn fx_client_new(base_url: *const c_char, api_key: *const c_char) -> *mut FfiFxClient {
    catch_unwind(|| {
        if base_url.is_null() || api_key.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        let key = unsafe { borrow_str(api_key) };
        let client = fx_core::RateClient::new(url, key);
        Box::into_raw(Box::new(FfiFxClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `fx_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fx_client_free(client: *mut FfiFxClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the raw base code, target code and amount.
///
/// Never returns null. Free with `fx_free_validation`.
#[unsafe(no_mangle)]
pub extern "C" fn fx_validate(
    base: *const c_char,
    target: *const c_char,
    amount: *const c_char,
) -> *mut FfiValidation {
    catch_unwind(|| {
        for (name, ptr) in [("base", base), ("target", target), ("amount", amount)] {
            if ptr.is_null() {
                return FfiValidation::null_arg(name);
            }
        }
        let result = unsafe { fx_core::validate(borrow_str(base), borrow_str(target), borrow_str(amount)) };
        FfiValidation::from_core(result)
    })
    .unwrap_or_else(|_| FfiValidation::panic())
}

// ---------------------------------------------------------------------------
// Latest rates
// ---------------------------------------------------------------------------

/// Build the HTTP request for a successful validation.
///
/// Returns null if `client` or `validation` is null, or if `validation`
/// did not succeed. The caller must free the returned pointer with
/// `fx_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn fx_build_latest_rates(
    client: *const FfiFxClient,
    validation: *const FfiValidation,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || validation.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(request) = (unsafe { (*validation).to_request() }) else {
            return std::ptr::null_mut();
        };
        FfiHttpRequest::from_core(client.inner.build_latest_rates(&request))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the provider's answer to the request built for `validation`.
///
/// If `validation` did not succeed, its own error code and message are
/// returned unchanged. Never returns null. Free with `fx_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn fx_parse_latest_rates(
    client: *const FfiFxClient,
    validation: *const FfiValidation,
    response: *const FfiHttpResponse,
) -> *mut FfiConversionResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiConversionResult::null_arg("client");
        }
        if validation.is_null() {
            return FfiConversionResult::null_arg("validation");
        }
        if response.is_null() {
            return FfiConversionResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let validation = unsafe { &*validation };
        let Some(request) = (unsafe { validation.to_request() }) else {
            return unsafe { FfiConversionResult::rejected(validation) };
        };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            unsafe { borrow_str(resp.body) }.to_string()
        };

        match client
            .inner
            .parse_latest_rates(&request, HttpResponse::new(resp.status, body))
        {
            Ok(result) => FfiConversionResult::ok(request, result),
            Err(e) => FfiConversionResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiConversionResult::panic())
}

/// Report that the host could not get any HTTP response.
///
/// `message` is shown as-is; null or empty falls back to the generic
/// failure message. Never returns null. Free with `fx_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn fx_transport_failed(message: *const c_char) -> *mut FfiConversionResult {
    catch_unwind(|| {
        let message = if message.is_null() {
            String::new()
        } else {
            unsafe { borrow_str(message) }.to_string()
        };
        FfiConversionResult::from_error(ConversionError::NetworkError(message))
    })
    .unwrap_or_else(|_| FfiConversionResult::panic())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiValidation` returned by `fx_validate`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fx_free_validation(validation: *mut FfiValidation) {
    if validation.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let validation = unsafe { Box::from_raw(validation) };
        free_c_string(validation.error_message);
        free_c_string(validation.base_code);
        free_c_string(validation.target_code);
    });
}

/// Free an `FfiHttpRequest` returned by `fx_build_latest_rates`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fx_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiConversionResult` returned by `fx_parse_latest_rates` or
/// `fx_transport_failed`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fx_free_result(result: *mut FfiConversionResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.headline);
        free_c_string(result.rate_line);
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn read(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn new_client() -> *mut FfiFxClient {
        let url = c("http://localhost:3000");
        let key = c("test-key");
        fx_client_new(url.as_ptr(), key.as_ptr())
    }

    fn validated(base: &str, target: &str, amount: &str) -> *mut FfiValidation {
        let (b, t, a) = (c(base), c(target), c(amount));
        fx_validate(b.as_ptr(), t.as_ptr(), a.as_ptr())
    }

    fn parse(client: *const FfiFxClient, v: *const FfiValidation, status: u16, body: &str) -> *mut FfiConversionResult {
        let body = c(body);
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        fx_parse_latest_rates(client, v, &resp)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        fx_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let key = c("k");
        assert!(fx_client_new(std::ptr::null(), key.as_ptr()).is_null());
        let url = c("http://localhost:3000");
        assert!(fx_client_new(url.as_ptr(), std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        fx_client_free(std::ptr::null_mut());
    }

    #[test]
    fn validate_success_returns_normalized_codes() {
        let v = validated(" cad", "usd ", "100");
        let r = unsafe { &*v };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(read(r.base_code), "CAD");
        assert_eq!(read(r.target_code), "USD");
        assert_eq!(r.amount, 100.0);
        fx_free_validation(v);
    }

    #[test]
    fn validate_failures_carry_code_and_message() {
        let cases = [
            ("ca", "USD", "5", FfiErrorCode::InvalidBaseCode),
            ("CAD", "US1", "5", FfiErrorCode::InvalidTargetCode),
            ("CAD", "USD", "-1", FfiErrorCode::InvalidAmount),
            ("CAD", "USD", "abc", FfiErrorCode::InvalidAmount),
        ];
        for (base, target, amount, code) in cases {
            let v = validated(base, target, amount);
            let r = unsafe { &*v };
            assert_eq!(r.error_code, code, "{base} {target} {amount}");
            assert!(!r.error_message.is_null());
            assert!(r.base_code.is_null());
            fx_free_validation(v);
        }
    }

    #[test]
    fn validate_null_arg() {
        let b = c("CAD");
        let t = c("USD");
        let v = fx_validate(b.as_ptr(), t.as_ptr(), std::ptr::null());
        let r = unsafe { &*v };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(read(r.error_message), "null argument: amount");
        fx_free_validation(v);
    }

    #[test]
    fn build_latest_rates_returns_correct_request() {
        let client = new_client();
        let v = validated("CAD", "USD", "100");
        let req = fx_build_latest_rates(client, v);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(
            read(req_ref.url),
            "http://localhost:3000/v1/latest?apikey=test-key&base_currency=CAD&currencies=USD"
        );
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(read(header.key), "accept");
        assert_eq!(read(header.value), "application/json");

        fx_free_request(req);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn build_with_failed_validation_returns_null() {
        let client = new_client();
        let v = validated("CAD", "USD", "0");
        assert!(fx_build_latest_rates(client, v).is_null());
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn build_null_client_returns_null() {
        let v = validated("CAD", "USD", "1");
        assert!(fx_build_latest_rates(std::ptr::null(), v).is_null());
        fx_free_validation(v);
    }

    #[test]
    fn parse_success_renders_lines() {
        let client = new_client();
        let v = validated("CAD", "USD", "100");
        let result = parse(client, v, 200, r#"{"data":{"USD":0.74}}"#);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.rate, 0.74);
        assert!((r.converted_amount - 74.0).abs() < 1e-9);
        assert_eq!(read(r.headline), "100 CAD = 74.00 USD");
        assert_eq!(read(r.rate_line), "Used rate: 1 CAD = 0.7400 USD");

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_classifies_statuses() {
        let client = new_client();
        let v = validated("CAD", "USD", "1");
        let cases = [
            (401, FfiErrorCode::Auth),
            (429, FfiErrorCode::RateLimited),
            (500, FfiErrorCode::Service),
        ];
        for (status, code) in cases {
            let result = parse(client, v, status, "");
            let r = unsafe { &*result };
            assert_eq!(r.error_code, code, "{status}");
            assert_eq!(r.http_status, status);
            assert!(r.headline.is_null());
            fx_free_result(result);
        }
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_missing_currency() {
        let client = new_client();
        let v = validated("CAD", "USD", "1");
        let result = parse(client, v, 200, r#"{"data":{}}"#);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::CurrencyNotFound);
        assert_eq!(read(r.error_message), "Destination currency was not found in the API result.");

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_with_failed_validation_reports_its_error() {
        let client = new_client();
        let v = validated("CAD", "USD", "abc");
        let result = parse(client, v, 200, r#"{"data":{"USD":0.74}}"#);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidAmount);
        assert_eq!(read(r.error_message), "Amount needs to be a positive number.");
        assert!(r.headline.is_null());

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_with_altered_validation_is_invalid_arg() {
        let client = new_client();
        let v = validated("CAD", "USD", "1");
        unsafe { (*v).amount = f64::NAN };
        let result = parse(client, v, 200, r#"{"data":{"USD":0.74}}"#);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidArg);
        assert_eq!(read(r.error_message), "invalid argument: validation");

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_out_of_range_product() {
        let client = new_client();
        let v = validated("CAD", "USD", "1e308");
        let result = parse(client, v, 200, r#"{"data":{"USD":10}}"#);

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::AmountOutOfRange);
        assert_eq!(
            read(r.error_message),
            "The converted amount is too large or too small to show."
        );
        assert!(r.headline.is_null());

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_null_body_is_malformed() {
        let client = new_client();
        let v = validated("CAD", "USD", "1");
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = fx_parse_latest_rates(client, v, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::MalformedResponse);

        fx_free_result(result);
        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn parse_null_args() {
        let client = new_client();
        let v = validated("CAD", "USD", "1");

        let result = parse(std::ptr::null(), v, 200, "{}");
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        fx_free_result(result);

        let result = fx_parse_latest_rates(client, v, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        fx_free_result(result);

        fx_free_validation(v);
        fx_client_free(client);
    }

    #[test]
    fn transport_failed_passes_message_through() {
        let msg = c("The Internet connection appears to be offline.");
        let result = fx_transport_failed(msg.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Network);
        assert_eq!(read(r.error_message), "The Internet connection appears to be offline.");
        fx_free_result(result);
    }

    #[test]
    fn transport_failed_without_message_is_generic() {
        let result = fx_transport_failed(std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(read(r.error_message), fx_core::GENERIC_FAILURE_MESSAGE);
        fx_free_result(result);
    }

    #[test]
    fn free_functions_accept_null() {
        fx_free_validation(std::ptr::null_mut());
        fx_free_request(std::ptr::null_mut());
        fx_free_result(std::ptr::null_mut());
    }
}
