//! FFI Layer
//!
//! All C-ABI exports are defined here. This is the ONLY file that should
//! contain `extern "C"` functions. All functions follow a consistent pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `typed_data_free_string`)
//!
//! Error handling: All functions return JSON with `success` field.
//! On error, `success: false` and `error` object is populated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::eip712::{encoder_for_request, hash_typed_data, TypedDataRequest};
use crate::error::CoreError;
use crate::types::*;
use crate::utils::crypto::to_hex_prefixed;
use crate::utils::encoder_config::EncoderSettings;
use crate::utils::logging::{LogEntry, LogLevel};

const LOG_MODULE: &str = "ffi";

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any typed_data_* function
///
/// # Safety
/// The pointer must have been returned by a typed_data_* function
#[unsafe(no_mangle)]
pub extern "C" fn typed_data_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to Rust string, returning error JSON if invalid
fn parse_input<'a>(input: *const c_char) -> Result<&'a str, *mut c_char> {
    if input.is_null() {
        return Err(error_response(CoreError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    c_str
        .to_str()
        .map_err(|_| error_response(CoreError::invalid_input("Invalid UTF-8 string")))
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: CoreError) -> *mut c_char {
    crate::log_warn!(LOG_MODULE, "request rejected", code = format!("{:?}", error.code));
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => {
            // Interior NUL cannot occur in this literal
            CString::new(r#"{"success":false,"error":{"code":"internal","message":"String conversion failed"}}"#)
                .map(CString::into_raw)
                .unwrap_or(std::ptr::null_mut())
        }
    }
}

/// Settings for FFI calls come from the environment
fn session_settings() -> EncoderSettings {
    session_settings_from(|key| std::env::var(key).ok())
}

fn session_settings_from<F>(lookup: F) -> EncoderSettings
where
    F: Fn(&str) -> Option<String>,
{
    let (settings, warnings) = EncoderSettings::from_lookup(lookup);
    settings.apply_logging();
    for entry in settings_warnings(&warnings) {
        entry.log();
    }
    settings
}

/// Unusable `TYPED_DATA_*` values are reported, not fatal
fn settings_warnings(warnings: &[String]) -> Vec<LogEntry> {
    warnings
        .iter()
        .map(|warning| LogEntry::new(LogLevel::Warn, LOG_MODULE, warning.as_str()))
        .collect()
}

fn digest_for(json_str: &str) -> Result<DigestResponse, CoreError> {
    let request = TypedDataRequest::from_json(json_str)
        .map_err(|e| CoreError::parse_error("Invalid typed data").with_details(e.to_string()))?;
    let settings = session_settings();
    let pre_image = hash_typed_data(&request, &settings)?;

    Ok(DigestResponse {
        primary_type: request.primary_type.clone(),
        version: request.version.unwrap_or(settings.version),
        pre_image: pre_image.to_hex(),
    })
}

fn encode_type_for(json_str: &str) -> Result<EncodeTypeResponse, CoreError> {
    let query: TypeQuery = serde_json::from_str(json_str)
        .map_err(|e| CoreError::parse_error("Invalid typed data").with_details(e.to_string()))?;
    let encoder = encoder_for_request(&query.request, &session_settings())?;
    let type_name = query.target_type();

    if !encoder.registry().contains(type_name) {
        return Err(CoreError::from(crate::eip712::Eip712Error::UndefinedType(type_name.to_string())));
    }

    Ok(EncodeTypeResponse {
        type_name: type_name.to_string(),
        encoded_type: encoder.encode_types(type_name),
        type_hash: to_hex_prefixed(encoder.type_hash(type_name)),
    })
}

// =============================================================================
// Typed Data Operations
// =============================================================================

/// Hash EIP-712 typed data
///
/// # Input
/// ```json
/// {
///   "types": { ... },
///   "primaryType": "Mail",
///   "domain": { ... },
///   "message": { ... },
///   "version": "v4"
/// }
/// ```
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": {
///     "primaryType": "Mail",
///     "version": "v4",
///     "digest": "0x...",
///     "domainSeparator": "0x...",
///     "structHash": "0x..."
///   }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn typed_data_hash(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    match digest_for(json_str) {
        Ok(response) => success_response(response),
        Err(e) => error_response(e),
    }
}

/// Canonical type string and type hash
///
/// # Input
/// Same as `typed_data_hash`, plus an optional `"typeName"` (defaults to
/// `primaryType`).
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": {
///     "typeName": "Mail",
///     "encodedType": "Mail(Person from,Person to,string contents)Person(string name,address wallet)",
///     "typeHash": "0x..."
///   }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn typed_data_encode_type(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    match encode_type_for(json_str) {
        Ok(response) => success_response(response),
        Err(e) => error_response(e),
    }
}
