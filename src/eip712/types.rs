//! EIP-712 Type Definitions
//!
//! Schema, protocol version, request envelope and error types for
//! typed data hashing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Reserved type name of the domain separator struct
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// A field in a struct type definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedDataField {
    /// The name of the field
    pub name: String,
    /// The type of the field (e.g., "address", "uint256", "Person[]")
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypedDataField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Protocol version of a sign typed data request.
///
/// `Legacy` is `eth_signTypedData_v3`, `Current` is `eth_signTypedData_v4`.
/// The version never changes the canonical type string; it only controls
/// array support and how fields absent from the data are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    Legacy,
    #[default]
    Current,
}

impl Version {
    /// Wire tag for this version
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Legacy => "v3",
            Version::Current => "v4",
        }
    }

    /// Whether `T[]` field types may be encoded
    pub fn supports_arrays(&self) -> bool {
        matches!(self, Version::Current)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = Eip712Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let tag = tag.strip_prefix("eth_signtypeddata_").unwrap_or(&tag);
        match tag {
            "v3" => Ok(Version::Legacy),
            "v4" => Ok(Version::Current),
            _ => Err(Eip712Error::InvalidRequest(format!("unknown version: {}", s))),
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Struct type name -> ordered field list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: HashMap<String, Vec<TypedDataField>>,
}

impl TypeRegistry {
    /// Build a registry from the `types` member of a request.
    ///
    /// Every entry must be a list of `{name, type}` objects. Self-referential
    /// and mutually recursive types are accepted.
    pub fn from_value(schema: &serde_json::Value) -> Result<Self, Eip712Error> {
        let entries = schema.as_object().ok_or_else(|| {
            Eip712Error::InvalidSchema(format!("expected an object of types, got {}", kind_of(schema)))
        })?;

        let mut types = HashMap::with_capacity(entries.len());
        for (name, fields) in entries {
            let fields: Vec<TypedDataField> = serde_json::from_value(fields.clone())
                .map_err(|e| Eip712Error::InvalidSchema(format!("{}: {}", name, e)))?;
            types.insert(name.clone(), fields);
        }

        Ok(Self { types })
    }

    pub fn from_map(types: HashMap<String, Vec<TypedDataField>>) -> Self {
        Self { types }
    }

    pub fn get(&self, type_name: &str) -> Option<&[TypedDataField]> {
        self.types.get(type_name).map(Vec::as_slice)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Classification of a declared field type, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind<'a> {
    /// `T[]` or `T[k]`; `len` is `Some(k)` for the fixed form
    Array { element: &'a str, len: Option<usize> },
    String,
    Bytes,
    Bool,
    Address,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
    Struct(&'a str),
}

impl<'a> FieldKind<'a> {
    pub fn parse(type_name: &'a str) -> Result<Self, Eip712Error> {
        if type_name.ends_with(']') {
            let mut parts = type_name.split('[');
            let (element, dims) = match (parts.next(), parts.next(), parts.next()) {
                (Some(element), Some(dims), None) if !element.is_empty() => (element, dims),
                _ => return Err(Eip712Error::InvalidType(type_name.to_string())),
            };
            let dims = &dims[..dims.len() - 1];
            let len = if dims.is_empty() {
                None
            } else {
                Some(
                    dims.parse::<usize>()
                        .map_err(|_| Eip712Error::InvalidType(type_name.to_string()))?,
                )
            };
            return Ok(FieldKind::Array { element, len });
        }

        Ok(match type_name {
            "string" => FieldKind::String,
            "bytes" => FieldKind::Bytes,
            "bool" => FieldKind::Bool,
            "address" => FieldKind::Address,
            _ => {
                if let Some(n) = sized_suffix(type_name, "bytes").filter(|n| (1..=32).contains(n)) {
                    FieldKind::FixedBytes(n)
                } else if let Some(bits) = sized_suffix(type_name, "uint").filter(valid_int_bits) {
                    FieldKind::Uint(bits)
                } else if let Some(bits) = sized_suffix(type_name, "int").filter(valid_int_bits) {
                    FieldKind::Int(bits)
                } else {
                    FieldKind::Struct(type_name)
                }
            }
        })
    }

    /// Fixed-size types that encode in place
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            FieldKind::Bool
                | FieldKind::Address
                | FieldKind::FixedBytes(_)
                | FieldKind::Uint(_)
                | FieldKind::Int(_)
        )
    }

    /// Types whose word is a hash of variable-length content
    pub fn is_dynamic(&self) -> bool {
        !self.is_atomic()
    }
}

fn sized_suffix(type_name: &str, prefix: &str) -> Option<usize> {
    let digits = type_name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

fn valid_int_bits(bits: &usize) -> bool {
    (8..=256).contains(bits) && bits % 8 == 0
}

/// Strip an array suffix: "Person[]" -> "Person", "uint256[3]" -> "uint256"
pub fn base_type(type_name: &str) -> &str {
    match type_name.find('[') {
        Some(bracket_pos) => &type_name[..bracket_pos],
        None => type_name,
    }
}

pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A complete `eth_signTypedData` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataRequest {
    /// Type definitions (struct name -> fields), validated by [`TypeRegistry::from_value`]
    pub types: serde_json::Value,

    /// The name of the primary type being signed
    pub primary_type: String,

    /// The domain separator data, described by `types.EIP712Domain`
    pub domain: serde_json::Value,

    /// The actual message data to sign
    pub message: serde_json::Value,

    /// Protocol version; the session default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
}

impl TypedDataRequest {
    /// Parse a request from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Eip712Error> {
        serde_json::from_str(json).map_err(|e| Eip712Error::InvalidRequest(e.to_string()))
    }
}

/// Errors that can occur during EIP-712 encoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Eip712Error {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Undefined type: {0}")]
    UndefinedType(String),

    #[error("Type {type_name} is not supported by {version}")]
    VersionMismatch { type_name: String, version: Version },

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Invalid value for type {type_name}: {reason}")]
    MalformedValue { type_name: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Eip712Error {
    pub(crate) fn malformed(type_name: &str, reason: impl Into<String>) -> Self {
        Eip712Error::MalformedValue {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
