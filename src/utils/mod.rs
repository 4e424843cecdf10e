//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod crypto;
pub mod encoder_config;
pub mod logging;

pub use crypto::*;
pub use encoder_config::*;
