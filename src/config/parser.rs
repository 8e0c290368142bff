// src/config/parser.rs

//! Parser for resolver configuration TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::capreq::Capreq;
use crate::error::{Error, Result};
use crate::platform::RpmlibCaps;

/// Package set configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PkgSetConfig {
    /// Strict matching: an unversioned capability does not satisfy a
    /// versioned requirement
    pub strict: bool,

    /// Keep only the highest EVR of each package name during setup
    pub unique_names: bool,

    /// Run the conflict pass
    pub verify_conflicts: bool,

    /// Index every file and report paths owned by differently named packages
    pub verify_file_conflicts: bool,

    /// Compute the install ordering
    pub verify_order: bool,

    /// Name of the package manager's own package
    pub pm_package: String,

    /// Built-in capabilities
    pub platform: PlatformConfig,
}

impl Default for PkgSetConfig {
    fn default() -> Self {
        Self {
            strict: true,
            unique_names: false,
            verify_conflicts: true,
            verify_file_conflicts: false,
            verify_order: true,
            pm_package: "rpm".to_string(),
            platform: PlatformConfig::default(),
        }
    }
}

/// Capabilities provided without a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformConfig {
    /// Include the stock `rpmlib(...)` feature list
    pub rpmlib_defaults: bool,

    /// Extra capabilities, `name [op evr]`
    pub provides: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            rpmlib_defaults: true,
            provides: Vec::new(),
        }
    }
}

impl PlatformConfig {
    /// Build the built-in capability oracle
    pub fn build(&self) -> Result<RpmlibCaps> {
        RpmlibCaps::from_config(self.rpmlib_defaults, &self.provides)
    }
}

impl PkgSetConfig {
    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.pm_package.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "pm_package must not be empty".to_string(),
            ));
        }

        for cap in &self.platform.provides {
            Capreq::parse(cap).map_err(|e| {
                Error::InvalidConfig(format!("platform provides '{}': {}", cap, e))
            })?;
        }

        Ok(())
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Parse configuration from a TOML file
pub fn parse_config_file(path: &Path) -> Result<PkgSetConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from a TOML string
pub fn parse_config(content: &str) -> Result<PkgSetConfig> {
    let config: PkgSetConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PkgSetConfig::default());
        assert!(config.strict);
        assert!(!config.unique_names);
        assert!(config.verify_conflicts);
        assert!(!config.verify_file_conflicts);
        assert!(config.verify_order);
        assert_eq!(config.pm_package, "rpm");
        assert!(config.platform.rpmlib_defaults);
    }

    #[test]
    fn test_parse_config_string() {
        let toml = r#"
strict = false
unique_names = true
pm_package = "rpm-core"

[platform]
rpmlib_defaults = false
provides = ["config(base) = 1.0", "kernel-abi"]
"#;
        let config = parse_config(toml).unwrap();
        assert!(!config.strict);
        assert!(config.unique_names);
        assert_eq!(config.pm_package, "rpm-core");
        assert_eq!(config.platform.provides.len(), 2);

        let caps = config.platform.build().unwrap();
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn test_invalid_provides_rejected() {
        let toml = r#"
[platform]
provides = ["bad name >= 1"]
"#;
        assert!(matches!(
            parse_config(toml).unwrap_err(),
            Error::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            parse_config("stritc = true").unwrap_err(),
            Error::Toml(_)
        ));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut config = PkgSetConfig::default();
        config.platform.provides.push("foo = 2".to_string());
        let text = config.to_toml().unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }
}
