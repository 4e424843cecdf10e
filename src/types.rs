//! Shared response types
//!
//! Data structures returned across the FFI and CLI boundaries, serialized
//! with camelCase keys.

use crate::eip712::{Eip712PreImageHex, TypedDataRequest, Version};
use serde::{Deserialize, Serialize};

// =============================================================================
// Responses
// =============================================================================

/// Digest of a typed data request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestResponse {
    pub primary_type: String,
    pub version: Version,
    #[serde(flatten)]
    pub pre_image: Eip712PreImageHex,
}

/// Canonical type string and its hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeTypeResponse {
    pub type_name: String,
    pub encoded_type: String,
    pub type_hash: String,
}

/// Request for a single struct type within a typed data payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuery {
    #[serde(flatten)]
    pub request: TypedDataRequest,
    /// Defaults to the request's `primaryType`
    #[serde(default)]
    pub type_name: Option<String>,
}

impl TypeQuery {
    pub fn target_type(&self) -> &str {
        self.type_name.as_deref().unwrap_or(&self.request.primary_type)
    }
}

// =============================================================================
// API Response Wrapper
// =============================================================================

/// Standard API response wrapper for FFI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::CoreError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::CoreError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}
