//! Parser for Composer manifest and lock documents.
//!
//! This module turns `composer.json` and `composer.lock` content into the
//! typed records the analyzer consumes. Unknown fields are ignored, since
//! real-world manifests carry far more than the dependency sections.

use std::fs;
use std::path::Path;

use super::types::{LockFile, PackageRecord};

/// Errors that can occur while reading or parsing a Composer document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a `composer.json` manifest from a string.
///
/// # Example
///
/// ```
/// use lockscope::parser::parse_manifest_str;
///
/// let manifest = parse_manifest_str(r#"{"name": "acme/app"}"#).unwrap();
/// assert_eq!(manifest.name.as_deref(), Some("acme/app"));
/// ```
pub fn parse_manifest_str(content: &str) -> ParseResult<PackageRecord> {
    Ok(serde_json::from_str(content)?)
}

/// Parses a `composer.json` manifest from a file path.
pub fn parse_manifest_file(path: &Path) -> ParseResult<PackageRecord> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

/// Parses a `composer.lock` document from a string.
pub fn parse_lock_str(content: &str) -> ParseResult<LockFile> {
    Ok(serde_json::from_str(content)?)
}

/// Parses a `composer.lock` document from a file path.
pub fn parse_lock_file(path: &Path) -> ParseResult<LockFile> {
    let content = fs::read_to_string(path)?;
    parse_lock_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"{
        "name": "acme/app",
        "description": "A test application",
        "require": {
            "php": ">=8.1",
            "acme/http-client": "^2.0"
        },
        "require-dev": {
            "phpunit/phpunit": "^9.5"
        },
        "config": {
            "vendor-dir": "deps"
        }
    }"#;

    const SAMPLE_LOCK: &str = r#"{
        "packages": [
            {
                "name": "acme/http-client",
                "version": "2.1.0",
                "source": {"type": "git", "url": "https://example.com", "reference": "abc123"},
                "require": {"php": ">=8.0"}
            }
        ],
        "packages-dev": [
            {
                "name": "phpunit/phpunit",
                "version": "9.5.20"
            }
        ]
    }"#;

    #[test]
    fn test_parse_manifest_valid() {
        let manifest = parse_manifest_str(SAMPLE_MANIFEST).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("acme/app"));
        assert_eq!(manifest.vendor_dir(), "deps");
        assert_eq!(
            manifest.require.as_ref().unwrap().get("acme/http-client"),
            Some(&"^2.0".to_string())
        );
        assert_eq!(
            manifest.require_dev.as_ref().unwrap().get("phpunit/phpunit"),
            Some(&"^9.5".to_string())
        );
    }

    #[test]
    fn test_parse_manifest_empty_object() {
        let manifest = parse_manifest_str("{}").unwrap();

        assert!(manifest.name.is_none());
        assert!(manifest.require.is_none());
    }

    #[test]
    fn test_parse_manifest_invalid_json() {
        let result = parse_manifest_str("{ invalid json }");

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParseError::Json(_)));
    }

    #[test]
    fn test_parse_manifest_non_object() {
        assert!(parse_manifest_str("[1, 2, 3]").is_err());
        assert!(parse_manifest_str("null").is_err());
    }

    #[test]
    fn test_parse_manifest_ignores_extra_fields() {
        let json = r#"{
            "name": "acme/app",
            "type": "project",
            "license": "MIT",
            "autoload": {"psr-4": {"Acme\\": "src/"}},
            "scripts": {"test": "phpunit"}
        }"#;

        let manifest = parse_manifest_str(json).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("acme/app"));
    }

    #[test]
    fn test_parse_lock_valid() {
        let lock = parse_lock_str(SAMPLE_LOCK).unwrap();

        let packages = lock.packages.as_ref().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name.as_deref(), Some("acme/http-client"));
        assert_eq!(packages[0].version.as_deref(), Some("2.1.0"));
        assert_eq!(packages[0].locked_reference(), Some("abc123"));

        let dev = lock.packages_dev.as_ref().unwrap();
        assert_eq!(dev.len(), 1);
        assert_eq!(dev[0].name.as_deref(), Some("phpunit/phpunit"));
    }

    #[test]
    fn test_parse_lock_without_dev_list() {
        let lock = parse_lock_str(r#"{"packages": []}"#).unwrap();

        assert!(lock.packages.as_ref().unwrap().is_empty());
        assert!(lock.packages_dev.is_none());
    }

    #[test]
    fn test_parse_lock_invalid_json() {
        let result = parse_lock_str("not json at all");

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParseError::Json(_)));
    }

    #[test]
    fn test_parse_error_display() {
        let io_err = ParseError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(io_err.to_string().contains("Failed to read file"));
    }
}
