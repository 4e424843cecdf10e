//! Encoder Configuration
//!
//! Per-session settings for typed data encoding. A settings value is built
//! once (from a preset, the environment, or CLI flags) and handed to each
//! encoder by reference; nothing here is mutated behind an encoder's back.

use crate::eip712::Version;

/// Environment variable selecting the default protocol version ("v3"/"v4")
pub const ENV_VERSION: &str = "TYPED_DATA_VERSION";
/// Environment variable enabling `uintN`/`intN` range checks
pub const ENV_STRICT_INT_WIDTH: &str = "TYPED_DATA_STRICT_INT_WIDTH";
/// Environment variable enabling debug logging
pub const ENV_DEBUG: &str = "TYPED_DATA_DEBUG";

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Preset these settings started from
    pub profile: EncoderProfile,
    /// Version used when a request does not carry one
    pub version: Version,
    /// Reject integers that do not fit their declared `N` bits.
    /// Off by default: wallets in the wild encode out-of-range values as-is.
    pub enforce_int_width: bool,
    /// Emit debug log lines for rejected values
    pub debug_logging: bool,
}

/// Settings presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderProfile {
    /// v4 encoding, no range checks
    Compatible,
    /// v4 encoding with integer range checks
    Strict,
    /// v3 encoding, no range checks
    Legacy,
    /// Adjusted from a preset
    Custom,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self::compatible()
    }
}

impl EncoderSettings {
    pub fn compatible() -> Self {
        Self {
            profile: EncoderProfile::Compatible,
            version: Version::Current,
            enforce_int_width: false,
            debug_logging: false,
        }
    }

    pub fn strict() -> Self {
        Self {
            profile: EncoderProfile::Strict,
            version: Version::Current,
            enforce_int_width: true,
            debug_logging: false,
        }
    }

    pub fn legacy() -> Self {
        Self {
            profile: EncoderProfile::Legacy,
            version: Version::Legacy,
            enforce_int_width: false,
            debug_logging: false,
        }
    }

    /// Compatible preset overridden by `TYPED_DATA_*` environment variables.
    ///
    /// Unparseable values are ignored and reported in the returned warnings,
    /// together with anything [`EncoderSettings::validate`] flags.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EncoderSettings::from_env`] over an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::compatible();
        let mut warnings = Vec::new();

        if let Some(raw) = lookup(ENV_VERSION) {
            match raw.parse::<Version>() {
                Ok(version) => settings = settings.with_version(version),
                Err(_) => warnings.push(format!("{}={} is not a version, using {}", ENV_VERSION, raw, settings.version)),
            }
        }
        if let Some(raw) = lookup(ENV_STRICT_INT_WIDTH) {
            match parse_flag(&raw) {
                Some(enabled) => settings = settings.with_int_width_enforcement(enabled),
                None => warnings.push(format!("{}={} is not a boolean", ENV_STRICT_INT_WIDTH, raw)),
            }
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            match parse_flag(&raw) {
                Some(enabled) => settings = settings.with_debug_logging(enabled),
                None => warnings.push(format!("{}={} is not a boolean", ENV_DEBUG, raw)),
            }
        }

        warnings.extend(settings.validate());
        (settings, warnings)
    }

    pub fn with_version(mut self, version: Version) -> Self {
        if version != self.version {
            self.version = version;
            self.profile = EncoderProfile::Custom;
        }
        self
    }

    pub fn with_int_width_enforcement(mut self, enabled: bool) -> Self {
        if enabled != self.enforce_int_width {
            self.enforce_int_width = enabled;
            self.profile = EncoderProfile::Custom;
        }
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Turn on the global debug log flag if these settings ask for it
    pub fn apply_logging(&self) {
        if self.debug_logging {
            crate::utils::logging::enable_debug();
        }
    }

    /// Validate settings consistency
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.version == Version::Legacy && self.enforce_int_width {
            warnings.push(
                "integer range checks change v3 digests relative to other wallets".to_string(),
            );
        }
        if self.version == Version::Legacy {
            warnings.push("v3 rejects array fields and skips missing fields".to_string());
        }

        warnings
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
