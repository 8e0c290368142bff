// src/error.rs

//! Error types for rpmgraph
//!
//! Only failures a caller can act on are errors. Unsatisfied requirements,
//! rpmlib provider violations and prerequisite loops are recorded as
//! diagnostics on the package set instead (see [`crate::resolver::Problem`]).

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or querying a package set
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a configuration or universe file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML decoding failed
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Version string could not be parsed as `[epoch:]version[-release]`
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// Capability string could not be parsed
    #[error("Malformed capability '{input}': {reason}")]
    MalformedCapreq { input: String, reason: String },

    /// A package record is missing mandatory data
    #[error("Invalid package '{package}': {reason}")]
    InvalidPackage { package: String, reason: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No package matched the given name or identity
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// The package set was queried before `setup()` built its indexes
    #[error("Package set has not been set up")]
    NotIndexed,
}

impl Error {
    /// Create a malformed-capability error
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCapreq {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
