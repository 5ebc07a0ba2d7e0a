//! Parser module for Lockscope.
//!
//! This module reads the two documents a Composer project describes itself
//! with: the `composer.json` manifest (requested dependencies, constraints)
//! and the `composer.lock` file (exact installed versions and sources).
//!
//! # Example
//!
//! ```
//! use lockscope::parser::{parse_lock_str, parse_manifest_str};
//!
//! let manifest = parse_manifest_str(r#"{"name": "acme/app"}"#).unwrap();
//! assert_eq!(manifest.name.as_deref(), Some("acme/app"));
//!
//! let lock = parse_lock_str(r#"{"packages": []}"#).unwrap();
//! assert!(lock.packages.unwrap().is_empty());
//! ```

pub mod composer;
pub mod types;

// Re-export commonly used types for convenience
pub use composer::{
    parse_lock_file, parse_lock_str, parse_manifest_file, parse_manifest_str, ParseError,
    ParseResult,
};

pub use types::{
    is_extension_package, is_platform_package, ConfigSection, LockFile, PackageRecord, SourceInfo,
    DEFAULT_VENDOR_DIR, EXTENSION_PREFIX, PLATFORM_PACKAGE,
};
