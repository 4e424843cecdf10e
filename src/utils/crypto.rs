//! Hashing and Hex Utilities
//!
//! Thin wrappers around the Keccak primitive and hex codec used by
//! the encoder, the FFI layer and the CLI.

use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Keccak256 over the UTF-8 bytes of a string (not its hex form)
pub fn keccak256_str(data: &str) -> [u8; 32] {
    keccak256(data.as_bytes())
}

/// Render bytes as a `0x`-prefixed lowercase hex string
pub fn to_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a `0x`-prefixed hex string. The prefix is mandatory.
pub fn decode_prefixed_hex(s: &str) -> Result<Vec<u8>, String> {
    let payload = s
        .strip_prefix("0x")
        .ok_or_else(|| format!("missing 0x prefix: {}", s))?;
    hex::decode(payload).map_err(|e| format!("invalid hex: {}", e))
}
