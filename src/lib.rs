//! Lockscope - dependency graph analyzer for Composer projects
//!
//! This crate builds an in-memory dependency graph from a project's
//! `composer.json` manifest and `composer.lock` file, for tooling that needs
//! to reason about a dependency closure without running Composer itself.

pub mod analyzer;
pub mod export;
pub mod graph;
pub mod parser;
