//! EIP-712 Typed Data Hashing
//!
//! Canonicalization, encoding and hashing of `eth_signTypedData` (v3 and v4)
//! payloads. The output digest is handed to an external signer.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//!
//! # Example
//! ```rust,ignore
//! use sign_typed_data::eip712::{Eip712Encoder, Version};
//!
//! let encoder = Eip712Encoder::from_schema(&types, Version::Current)?;
//! let digest = encoder.message_to_sign("Mail", &message, &domain)?;
//! ```

pub mod types;
pub mod encoder;
pub mod hasher;

pub use types::*;
pub use encoder::*;
pub use hasher::*;
