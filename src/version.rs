//! MPP front-end version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time, so the CLI banner and
//! JSON dumps agree on one string.

/// The MPP front-end version string (for example, `0.1.0`).
pub const MPP_VERSION: &str = env!("CARGO_PKG_VERSION");
