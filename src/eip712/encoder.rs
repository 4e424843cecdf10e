//! EIP-712 Type and Field Encoding
//!
//! Dependency resolution, canonical type strings, and the per-field
//! 32-byte encoding rules.

use super::types::*;
use crate::utils::crypto::{decode_prefixed_hex, keccak256, keccak256_str};
use crate::utils::encoder_config::EncoderSettings;
use ethers_core::types::U256;
use std::collections::BTreeMap;

const LOG_MODULE: &str = "eip712";

/// A 32-byte ABI word
pub type Word = [u8; 32];

/// Encoding session: a schema plus the protocol version it is hashed under.
///
/// Encoding methods take `&self` and never mutate the session. Replacing the
/// schema or version requires `&mut self`, so it cannot race an encode in
/// flight on the same value.
#[derive(Debug, Clone)]
pub struct Eip712Encoder {
    registry: TypeRegistry,
    version: Version,
    enforce_int_width: bool,
}

impl Eip712Encoder {
    pub fn new(registry: TypeRegistry, version: Version) -> Self {
        Self {
            registry,
            version,
            enforce_int_width: false,
        }
    }

    /// Build from a raw `types` object
    pub fn from_schema(schema: &serde_json::Value, version: Version) -> Result<Self, Eip712Error> {
        Ok(Self::new(TypeRegistry::from_value(schema)?, version))
    }

    /// Build with the version and range-check policy of `settings`
    pub fn with_settings(registry: TypeRegistry, settings: &EncoderSettings) -> Self {
        Self {
            registry,
            version: settings.version,
            enforce_int_width: settings.enforce_int_width,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Replace the schema. On error the current schema is kept.
    pub fn set_types(&mut self, schema: &serde_json::Value) -> Result<(), Eip712Error> {
        self.registry = TypeRegistry::from_value(schema)?;
        Ok(())
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn set_int_width_enforcement(&mut self, enabled: bool) {
        self.enforce_int_width = enabled;
    }

    /// Every struct type reachable from `anchor`, including `anchor` itself.
    ///
    /// A type is recorded before its fields are visited, so recursive schemas
    /// terminate after one visit per type name. Names missing from the
    /// registry are skipped: an undefined anchor yields an empty map.
    pub fn find_dependencies(&self, anchor: &str) -> BTreeMap<String, Vec<TypedDataField>> {
        let mut found = BTreeMap::new();
        let mut to_visit = vec![anchor];

        while let Some(current) = to_visit.pop() {
            if found.contains_key(current) {
                continue;
            }
            let Some(fields) = self.registry.get(current) else {
                continue;
            };
            found.insert(current.to_string(), fields.to_vec());

            for field in fields {
                let dependency = base_type(&field.type_name);
                if !found.contains_key(dependency) {
                    to_visit.push(dependency);
                }
            }
        }

        found
    }

    /// Canonical type string: primary type first, then its dependencies
    /// sorted by name. Empty when `primary` is undefined.
    pub fn encode_types(&self, primary: &str) -> String {
        let dependencies = self.find_dependencies(primary);

        let mut result = match dependencies.get(primary) {
            Some(fields) => encode_type(primary, fields),
            None => return String::new(),
        };
        for (name, fields) in &dependencies {
            if name != primary {
                result.push_str(&encode_type(name, fields));
            }
        }

        result
    }

    /// typeHash = keccak256(encodeType(primary))
    #[doc(alias = "get_type_hash")]
    pub fn type_hash(&self, primary: &str) -> Word {
        keccak256_str(&self.encode_types(primary))
    }

    /// Encode one value against its declared type into a 32-byte word.
    ///
    /// Strings, bytes, arrays and structs encode as the hash of their contents.
    pub fn encode_field(&self, type_name: &str, value: &serde_json::Value) -> Result<Word, Eip712Error> {
        match FieldKind::parse(type_name)? {
            FieldKind::Array { element, len } => self.encode_array(type_name, element, len, value),
            FieldKind::String => {
                let s = expect_str(type_name, value)?;
                Ok(keccak256_str(s))
            }
            FieldKind::Bytes => {
                let bytes = expect_hex(type_name, value)?;
                Ok(keccak256(&bytes))
            }
            FieldKind::Bool => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| Eip712Error::malformed(type_name, format!("expected bool, got {}", kind_of(value))))?;
                let mut word = [0u8; 32];
                word[31] = u8::from(b);
                Ok(word)
            }
            FieldKind::Address => {
                let bytes = expect_hex(type_name, value)?;
                if bytes.len() != 20 {
                    return Err(Eip712Error::malformed(
                        type_name,
                        format!("expected 20 bytes, got {}", bytes.len()),
                    ));
                }
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(&bytes);
                Ok(word)
            }
            FieldKind::FixedBytes(size) => {
                let bytes = expect_hex(type_name, value)?;
                if bytes.len() > size {
                    return Err(Eip712Error::malformed(
                        type_name,
                        format!("bytes too long: {} > {}", bytes.len(), size),
                    ));
                }
                let mut word = [0u8; 32];
                word[..bytes.len()].copy_from_slice(&bytes);
                Ok(word)
            }
            FieldKind::Uint(bits) => {
                let n = parse_integer(type_name, value)?;
                if n.negative && !n.magnitude.is_zero() {
                    return Err(Eip712Error::malformed(type_name, "negative value for unsigned type"));
                }
                if self.enforce_int_width && n.magnitude.bits() > bits {
                    return Err(Eip712Error::malformed(type_name, format!("value exceeds {} bits", bits)));
                }
                Ok(to_word(n.magnitude))
            }
            FieldKind::Int(bits) => {
                let n = parse_integer(type_name, value)?;
                let width = if self.enforce_int_width { bits } else { 256 };
                if !n.fits_signed(width) {
                    return Err(Eip712Error::malformed(type_name, format!("value exceeds {} bits", width)));
                }
                Ok(to_word(n.twos_complement()))
            }
            FieldKind::Struct(struct_name) => {
                let encoded = self.encode_data(struct_name, value)?;
                Ok(keccak256(&encoded))
            }
        }
    }

    fn encode_array(
        &self,
        type_name: &str,
        element: &str,
        len: Option<usize>,
        value: &serde_json::Value,
    ) -> Result<Word, Eip712Error> {
        if !self.version.supports_arrays() {
            crate::log_debug!(LOG_MODULE, "array field rejected", type_name = type_name, version = self.version);
            return Err(Eip712Error::VersionMismatch {
                type_name: type_name.to_string(),
                version: self.version,
            });
        }

        let items = value
            .as_array()
            .ok_or_else(|| Eip712Error::malformed(type_name, format!("expected array, got {}", kind_of(value))))?;
        // Fixed arrays must carry exactly k elements
        if let Some(expected) = len {
            if items.len() != expected {
                return Err(Eip712Error::malformed(
                    type_name,
                    format!("expected {} elements, got {}", expected, items.len()),
                ));
            }
        }

        // Elements encode like fields, then the concatenation is hashed
        let mut encoded = Vec::with_capacity(items.len() * 32);
        for item in items {
            encoded.extend_from_slice(&self.encode_field(element, item)?);
        }

        Ok(keccak256(&encoded))
    }
}

/// Format a single type string: "Name(type0 name0,type1 name1)"
pub fn encode_type(type_name: &str, fields: &[TypedDataField]) -> String {
    let field_strs: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();

    format!("{}({})", type_name, field_strs.join(","))
}

fn expect_str<'v>(type_name: &str, value: &'v serde_json::Value) -> Result<&'v str, Eip712Error> {
    value
        .as_str()
        .ok_or_else(|| Eip712Error::malformed(type_name, format!("expected string, got {}", kind_of(value))))
}

fn expect_hex(type_name: &str, value: &serde_json::Value) -> Result<Vec<u8>, Eip712Error> {
    decode_prefixed_hex(expect_str(type_name, value)?).map_err(|reason| Eip712Error::malformed(type_name, reason))
}

/// Sign and magnitude of an integer field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedInt {
    negative: bool,
    magnitude: U256,
}

impl ParsedInt {
    /// Whether the value lies in [-2^(bits-1), 2^(bits-1))
    fn fits_signed(&self, bits: usize) -> bool {
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.magnitude <= limit
        } else {
            self.magnitude < limit
        }
    }

    fn twos_complement(&self) -> U256 {
        if self.negative && !self.magnitude.is_zero() {
            (!self.magnitude).overflowing_add(U256::one()).0
        } else {
            self.magnitude
        }
    }
}

/// Parse an integer from a JSON number, a decimal string or a `0x` hex string
fn parse_integer(type_name: &str, value: &serde_json::Value) -> Result<ParsedInt, Eip712Error> {
    match value {
        // Number literals keep their source digits, so values past u64 survive
        serde_json::Value::Number(n) => parse_integer_str(type_name, &n.to_string()),
        serde_json::Value::String(s) => parse_integer_str(type_name, s.trim()),
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => Err(Eip712Error::malformed(
            type_name,
            format!("expected integer, got {}", kind_of(value)),
        )),
    }
}

fn parse_integer_str(type_name: &str, s: &str) -> Result<ParsedInt, Eip712Error> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let magnitude = if let Some(hex_digits) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        if hex_digits.is_empty() || hex_digits.len() > 64 {
            return Err(Eip712Error::malformed(type_name, format!("invalid hex integer: {}", s)));
        }
        U256::from_str_radix(hex_digits, 16)
            .map_err(|_| Eip712Error::malformed(type_name, format!("invalid hex integer: {}", s)))?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Eip712Error::malformed(type_name, format!("invalid decimal integer: {}", s)));
        }
        U256::from_dec_str(digits)
            .map_err(|_| Eip712Error::malformed(type_name, format!("integer exceeds 256 bits: {}", s)))?
    };

    Ok(ParsedInt { negative, magnitude })
}

fn to_word(n: U256) -> Word {
    let mut word = [0u8; 32];
    n.to_big_endian(&mut word);
    word
}
