// src/config/mod.rs

//! Resolver configuration
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the stock behaviour.
//!
//! # Example rpmgraph.toml
//!
//! ```toml
//! # Unversioned capabilities do not satisfy versioned requirements
//! strict = true
//!
//! # Keep only the newest package of each name
//! unique_names = false
//!
//! verify_conflicts = true
//! verify_file_conflicts = false
//! verify_order = true
//!
//! # The only package allowed to provide rpmlib(...) capabilities
//! pm_package = "rpm"
//!
//! [platform]
//! rpmlib_defaults = true
//! provides = [
//!     "config(base) = 1.0",
//! ]
//! ```

mod parser;

pub use parser::{parse_config, parse_config_file, PkgSetConfig, PlatformConfig};

use crate::error::Result;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rpmgraph.toml";

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
/// exists, or fall back to the defaults
pub fn load_config(path: Option<&Path>) -> Result<PkgSetConfig> {
    match path {
        Some(path) => parse_config_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                parse_config_file(default)
            } else {
                Ok(PkgSetConfig::default())
            }
        }
    }
}
