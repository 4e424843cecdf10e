//! EIP-712 Hashing
//!
//! Struct encoding, struct hashing and the final signing digest.

use super::encoder::{Eip712Encoder, Word};
use super::types::*;
use crate::utils::crypto::{keccak256, to_hex_prefixed};
use crate::utils::encoder_config::EncoderSettings;
use serde::Serialize;

/// Magic prefix for EIP-712 encoding
const EIP712_PREFIX: &[u8] = b"\x19\x01";

const LOG_MODULE: &str = "eip712";

impl Eip712Encoder {
    /// encodeData(s) = typeHash || enc(field_0) || enc(field_1) || ...
    ///
    /// Fields are visited in declaration order. A field missing from `data`
    /// contributes 32 zero bytes under v4 and nothing at all under v3, which
    /// is also what stops recursion through self-referential types.
    pub fn encode_data(&self, type_name: &str, data: &serde_json::Value) -> Result<Vec<u8>, Eip712Error> {
        let fields = self.registry().get(type_name).ok_or_else(|| {
            crate::log_debug!(LOG_MODULE, "struct type not in schema", type_name = type_name);
            Eip712Error::UndefinedType(type_name.to_string())
        })?;
        let obj = data.as_object().ok_or_else(|| {
            Eip712Error::malformed(type_name, format!("expected object, got {}", kind_of(data)))
        })?;

        let mut encoded = Vec::with_capacity((fields.len() + 1) * 32);
        encoded.extend_from_slice(&self.type_hash(type_name));

        for field in fields {
            match obj.get(&field.name) {
                Some(value) => encoded.extend_from_slice(&self.encode_field(&field.type_name, value)?),
                // Absent field: a zero word under v4, nothing under v3
                None => match self.version() {
                    Version::Current => encoded.extend_from_slice(&[0u8; 32]),
                    Version::Legacy => {}
                },
            }
        }

        Ok(encoded)
    }

    /// hashStruct(s) = keccak256(encodeData(s))
    pub fn hash_struct(&self, type_name: &str, data: &serde_json::Value) -> Result<Word, Eip712Error> {
        let encoded = self.encode_data(type_name, data)?;
        Ok(keccak256(&encoded))
    }

    /// hash = keccak256("\x19\x01" || hashStruct(domain) || hashStruct(message))
    pub fn message_to_sign(
        &self,
        primary_type: &str,
        message: &serde_json::Value,
        domain: &serde_json::Value,
    ) -> Result<Word, Eip712Error> {
        Ok(self.pre_image(primary_type, message, domain)?.digest)
    }

    /// The digest together with the two struct hashes it is built from
    pub fn pre_image(
        &self,
        primary_type: &str,
        message: &serde_json::Value,
        domain: &serde_json::Value,
    ) -> Result<Eip712PreImage, Eip712Error> {
        let domain_separator = self.hash_struct(DOMAIN_TYPE_NAME, domain)?;
        let struct_hash = self.hash_struct(primary_type, message)?;

        let mut data = Vec::with_capacity(2 + 32 + 32);
        data.extend_from_slice(EIP712_PREFIX);
        data.extend_from_slice(&domain_separator);
        data.extend_from_slice(&struct_hash);

        Ok(Eip712PreImage {
            domain_separator,
            struct_hash,
            digest: keccak256(&data),
        })
    }
}

/// Pre-image components (for external signing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712PreImage {
    pub domain_separator: Word,
    pub struct_hash: Word,
    pub digest: Word,
}

/// Hex rendering of [`Eip712PreImage`] for JSON responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712PreImageHex {
    pub digest: String,
    pub domain_separator: String,
    pub struct_hash: String,
}

impl Eip712PreImage {
    pub fn to_hex(&self) -> Eip712PreImageHex {
        Eip712PreImageHex {
            digest: to_hex_prefixed(self.digest),
            domain_separator: to_hex_prefixed(self.domain_separator),
            struct_hash: to_hex_prefixed(self.struct_hash),
        }
    }
}

/// Build a session encoder for `request`.
///
/// The request's own version tag wins over the settings default.
pub fn encoder_for_request(
    request: &TypedDataRequest,
    settings: &EncoderSettings,
) -> Result<Eip712Encoder, Eip712Error> {
    let registry = TypeRegistry::from_value(&request.types)?;
    let mut encoder = Eip712Encoder::with_settings(registry, settings);
    if let Some(version) = request.version {
        encoder.set_version(version);
    }
    Ok(encoder)
}

/// Compute the signing pre-image of a complete request
pub fn hash_typed_data(
    request: &TypedDataRequest,
    settings: &EncoderSettings,
) -> Result<Eip712PreImage, Eip712Error> {
    let encoder = encoder_for_request(request, settings)?;
    encoder.pre_image(&request.primary_type, &request.message, &request.domain)
}
