//! Sign Typed Data Core
//!
//! Deterministic canonicalization, encoding and hashing of EIP-712
//! (`eth_signTypedData_v3` / `eth_signTypedData_v4`) requests.
//!
//! # Architecture
//!
//! This crate provides:
//! - **eip712**: type registry, dependency resolution, canonical type
//!   strings, field and struct encoding, signing digest
//! - **utils**: Keccak/hex helpers, encoder settings, structured logging
//! - **ffi**: C-ABI exports for host applications
//!
//! Signing the digest, key management and request approval live outside
//! this crate.
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `typed_data_free_string`)
//!
//! # Example
//!
//! ```rust,ignore
//! use sign_typed_data::eip712::{Eip712Encoder, Version};
//!
//! let encoder = Eip712Encoder::from_schema(&types, Version::Current)?;
//! let digest = encoder.message_to_sign("Mail", &message, &domain)?;
//! println!("0x{}", hex::encode(digest));
//! ```

pub mod error;
pub mod types;
pub mod ffi;
pub mod utils;
pub mod eip712;

pub use error::{CoreError, CoreResult, ErrorCode};
pub use eip712::{
    Eip712Encoder,
    Eip712Error,
    Eip712PreImage,
    TypeRegistry,
    TypedDataField,
    TypedDataRequest,
    Version,
    hash_typed_data,
};
pub use utils::crypto::{keccak256, to_hex_prefixed};
pub use utils::encoder_config::EncoderSettings;

pub use ffi::{typed_data_encode_type, typed_data_free_string, typed_data_hash};
