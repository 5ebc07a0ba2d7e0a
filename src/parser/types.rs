//! Shared types for Composer document parsing.
//!
//! This module defines the data structures used to represent a project
//! manifest (`composer.json`) and the lock file (`composer.lock`) that
//! records what was actually installed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the pseudo-package representing the PHP runtime itself.
pub const PLATFORM_PACKAGE: &str = "php";

/// Name prefix of pseudo-packages representing PHP extensions.
pub const EXTENSION_PREFIX: &str = "ext-";

/// Directory Composer installs packages into unless `config.vendor-dir`
/// overrides it.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Returns true if `name` refers to the PHP runtime pseudo-package.
pub fn is_platform_package(name: &str) -> bool {
    name.eq_ignore_ascii_case(PLATFORM_PACKAGE)
}

/// Returns true if `name` refers to a PHP extension pseudo-package.
pub fn is_extension_package(name: &str) -> bool {
    name.get(..EXTENSION_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(EXTENSION_PREFIX))
}

/// One package record, as found either in a `composer.json` manifest or in a
/// lock file's package lists.
///
/// The two layouts overlap almost completely, so a single struct covers both.
/// Every field is optional; requirement maps use `BTreeMap` so iteration
/// order is deterministic.
///
/// # Example
///
/// ```
/// use lockscope::parser::PackageRecord;
///
/// let json = r#"{"name": "acme/app", "require": {"php": ">=8.1"}}"#;
/// let record: PackageRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.name.as_deref(), Some("acme/app"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageRecord {
    /// The package name (e.g., "acme/http-client").
    pub name: Option<String>,

    /// Pre-1.0 lock files named packages through a "package" field instead.
    #[serde(rename = "package")]
    pub legacy_name: Option<String>,

    /// Exact version, present on lock records.
    pub version: Option<String>,

    /// Runtime requirements, package name to constraint string.
    pub require: Option<BTreeMap<String, String>>,

    /// Development-only requirements.
    #[serde(rename = "require-dev")]
    pub require_dev: Option<BTreeMap<String, String>>,

    /// Package names this record declares it supersedes.
    pub replace: Option<BTreeMap<String, String>>,

    /// Project-level configuration, only meaningful on the root manifest.
    pub config: Option<ConfigSection>,

    /// VCS origin of a locked package.
    pub source: Option<SourceInfo>,

    /// Distribution archive origin of a locked package.
    pub dist: Option<SourceInfo>,

    /// Older lock files record which of `source`/`dist` was installed from;
    /// its presence selects the legacy reference lookup.
    #[serde(rename = "installation-source")]
    pub installation_source: Option<String>,
}

impl PackageRecord {
    /// The name this record should be registered under, preferring the
    /// modern `name` field over the legacy `package` field.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.legacy_name.as_deref())
    }

    /// The configured vendor directory, or Composer's default.
    pub fn vendor_dir(&self) -> &str {
        self.config
            .as_ref()
            .and_then(|config| config.vendor_dir.as_deref())
            .unwrap_or(DEFAULT_VENDOR_DIR)
    }

    /// Resolved VCS reference of a locked package.
    ///
    /// Modern lock files store it at `source.reference`; older ones point at
    /// the section named by `installation-source`. The modern path wins when
    /// both are present.
    pub fn locked_reference(&self) -> Option<&str> {
        if let Some(reference) = self
            .source
            .as_ref()
            .and_then(|source| source.reference.as_deref())
        {
            return Some(reference);
        }

        match self.installation_source.as_deref() {
            Some("dist") => self.dist.as_ref().and_then(|dist| dist.reference.as_deref()),
            _ => None,
        }
    }

    /// Returns true if `require` or `require-dev` names at least one package
    /// that is not the PHP runtime or an extension.
    ///
    /// Pure platform requirements never make it into a lock file, so only
    /// userland entries make a lock file mandatory.
    pub fn has_userland_dependencies(&self) -> bool {
        has_userland_requirement(self.require.as_ref())
            || has_userland_requirement(self.require_dev.as_ref())
    }

    /// All declared requirements, `require` entries first, then
    /// `require-dev`.
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.require
            .iter()
            .flatten()
            .chain(self.require_dev.iter().flatten())
            .map(|(name, constraint)| (name.as_str(), constraint.as_str()))
    }
}

fn has_userland_requirement(requires: Option<&BTreeMap<String, String>>) -> bool {
    requires.is_some_and(|map| {
        map.keys()
            .any(|name| !is_platform_package(name) && !is_extension_package(name))
    })
}

/// The `config` section of a root manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Where Composer installs packages, relative to the project directory.
    #[serde(rename = "vendor-dir")]
    pub vendor_dir: Option<String>,
}

/// Origin of a locked package, shared by the `source` and `dist` sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Origin kind (e.g., "git", "zip").
    #[serde(rename = "type")]
    pub source_type: Option<String>,

    /// Where the package was fetched from.
    pub url: Option<String>,

    /// Commit hash or tag the installation points at.
    pub reference: Option<String>,
}

/// A parsed `composer.lock` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockFile {
    /// Installed regular packages.
    pub packages: Option<Vec<PackageRecord>>,

    /// Installed development packages.
    #[serde(rename = "packages-dev")]
    pub packages_dev: Option<Vec<PackageRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_package_check() {
        assert!(is_platform_package("php"));
        assert!(is_platform_package("PHP"));
        assert!(is_platform_package("Php"));
        assert!(!is_platform_package("php-64bit"));
        assert!(!is_platform_package("acme/php"));
    }

    #[test]
    fn test_extension_package_check() {
        assert!(is_extension_package("ext-json"));
        assert!(is_extension_package("Ext-json"));
        assert!(is_extension_package("EXT-intl"));
        assert!(!is_extension_package("ext/json"));
        assert!(!is_extension_package("php"));
        assert!(!is_extension_package("ex"));
    }

    #[test]
    fn test_display_name_prefers_name() {
        let record = PackageRecord {
            name: Some("acme/core".to_string()),
            legacy_name: Some("acme/old".to_string()),
            ..Default::default()
        };
        assert_eq!(record.display_name(), Some("acme/core"));
    }

    #[test]
    fn test_display_name_falls_back_to_legacy_field() {
        let record: PackageRecord =
            serde_json::from_str(r#"{"package": "acme/legacy", "version": "0.9"}"#).unwrap();
        assert_eq!(record.display_name(), Some("acme/legacy"));
    }

    #[test]
    fn test_display_name_absent() {
        assert_eq!(PackageRecord::default().display_name(), None);
    }

    #[test]
    fn test_vendor_dir_default() {
        assert_eq!(PackageRecord::default().vendor_dir(), "vendor");
    }

    #[test]
    fn test_vendor_dir_override() {
        let record: PackageRecord =
            serde_json::from_str(r#"{"config": {"vendor-dir": "lib/vendor"}}"#).unwrap();
        assert_eq!(record.vendor_dir(), "lib/vendor");
    }

    #[test]
    fn test_locked_reference_modern_layout() {
        let record: PackageRecord = serde_json::from_str(
            r#"{"name": "acme/core", "source": {"type": "git", "reference": "abc123"}}"#,
        )
        .unwrap();
        assert_eq!(record.locked_reference(), Some("abc123"));
    }

    #[test]
    fn test_locked_reference_legacy_dist_layout() {
        let record: PackageRecord = serde_json::from_str(
            r#"{
                "name": "acme/core",
                "installation-source": "dist",
                "dist": {"type": "zip", "reference": "def456"}
            }"#,
        )
        .unwrap();
        assert_eq!(record.locked_reference(), Some("def456"));
    }

    #[test]
    fn test_locked_reference_modern_path_wins() {
        let record: PackageRecord = serde_json::from_str(
            r#"{
                "name": "acme/core",
                "installation-source": "dist",
                "source": {"reference": "modern"},
                "dist": {"reference": "legacy"}
            }"#,
        )
        .unwrap();
        assert_eq!(record.locked_reference(), Some("modern"));
    }

    #[test]
    fn test_locked_reference_absent() {
        let record: PackageRecord =
            serde_json::from_str(r#"{"name": "acme/core", "version": "1.0.0"}"#).unwrap();
        assert_eq!(record.locked_reference(), None);
    }

    #[test]
    fn test_userland_dependencies_platform_only() {
        let record: PackageRecord = serde_json::from_str(
            r#"{"require": {"php": ">=8.1", "ext-json": "*", "EXT-intl": "*"}}"#,
        )
        .unwrap();
        assert!(!record.has_userland_dependencies());
    }

    #[test]
    fn test_userland_dependencies_detected() {
        let record: PackageRecord =
            serde_json::from_str(r#"{"require": {"php": ">=8.1", "acme/core": "^1.0"}}"#).unwrap();
        assert!(record.has_userland_dependencies());
    }

    #[test]
    fn test_userland_dependencies_in_dev_section() {
        let record: PackageRecord =
            serde_json::from_str(r#"{"require-dev": {"phpunit/phpunit": "^9"}}"#).unwrap();
        assert!(record.has_userland_dependencies());
    }

    #[test]
    fn test_userland_dependencies_empty() {
        assert!(!PackageRecord::default().has_userland_dependencies());

        let record: PackageRecord =
            serde_json::from_str(r#"{"require": {}, "require-dev": {}}"#).unwrap();
        assert!(!record.has_userland_dependencies());
    }

    #[test]
    fn test_requirements_order() {
        let record: PackageRecord = serde_json::from_str(
            r#"{
                "require": {"acme/b": "^2.0", "acme/a": "^1.0"},
                "require-dev": {"acme/dev": "^3.0"}
            }"#,
        )
        .unwrap();

        let entries: Vec<(&str, &str)> = record.requirements().collect();
        assert_eq!(
            entries,
            vec![
                ("acme/a", "^1.0"),
                ("acme/b", "^2.0"),
                ("acme/dev", "^3.0"),
            ]
        );
    }
}
