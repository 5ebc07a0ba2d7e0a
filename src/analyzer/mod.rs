//! Analyzer module for Lockscope.
//!
//! The [`DependencyAnalyzer`] orchestrates graph construction: it parses the
//! manifest and lock documents, registers a node for every locked package,
//! connects requirement edges, and back-fills resolved versions and source
//! references from the lock data.

mod dependency_analyzer;

pub use dependency_analyzer::{AnalyzeError, DependencyAnalyzer};
