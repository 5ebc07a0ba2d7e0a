//! JSON export implementation.
//!
//! Exports a dependency graph in JSON format for machine-readable output.

use super::Exporter;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::cmp::Ordering;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable package for JSON output.
#[derive(Serialize)]
struct JsonPackage {
    name: String,
    qualified_name: String,
    root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_reference: Option<String>,
}

/// Serializable requirement edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    source: String,
    dest: String,
    constraint: String,
    dev: bool,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    root: String,
    packages: Vec<JsonPackage>,
    edges: Vec<JsonEdge>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let mut nodes: Vec<_> = graph.packages().collect();
        nodes.sort_by(|a, b| {
            if graph.is_root_package(a) {
                return Ordering::Less;
            }
            if graph.is_root_package(b) {
                return Ordering::Greater;
            }
            a.name().cmp(b.name())
        });

        let packages: Vec<JsonPackage> = nodes
            .iter()
            .map(|package| JsonPackage {
                name: package.name().to_string(),
                qualified_name: package.qualified_name(),
                root: graph.is_root_package(package),
                version: package.version().map(str::to_string),
                source_reference: package.source_reference().map(str::to_string),
            })
            .collect();

        let mut edges: Vec<JsonEdge> = nodes
            .iter()
            .flat_map(|package| graph.out_edges(package.name()))
            .map(|edge| JsonEdge {
                source: edge.source_package().to_string(),
                dest: edge.dest_package().to_string(),
                constraint: edge.version_constraint().to_string(),
                dev: edge.is_dev_dependency(),
            })
            .collect();
        edges.sort_by(|a, b| (&a.source, &a.dest).cmp(&(&b.source, &b.dest)));

        let export = JsonExport {
            root: graph.root_package().name().to_string(),
            packages,
            edges,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DependencyAnalyzer;

    fn locked_graph() -> DependencyGraph {
        DependencyAnalyzer::new()
            .analyze_documents(
                r#"{"name": "acme/app", "require": {"acme/core": "^1.0"}}"#,
                Some(
                    r#"{"packages": [{
                        "name": "acme/core",
                        "version": "dev-master",
                        "source": {"reference": "abc123"}
                    }]}"#,
                ),
                None,
            )
            .unwrap()
    }

    #[test]
    fn test_json_export_basic() {
        let mut output = Vec::new();
        JsonExporter.export(&locked_graph(), &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(parsed["root"], "acme/app");

        let packages = parsed["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0]["name"], "acme/app");
        assert_eq!(packages[0]["root"], true);
        assert_eq!(packages[1]["name"], "acme/core");
        assert_eq!(packages[1]["version"], "dev-master");
        assert_eq!(packages[1]["source_reference"], "abc123");
    }

    #[test]
    fn test_json_export_edges() {
        let mut output = Vec::new();
        JsonExporter.export(&locked_graph(), &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();

        let edges = parsed["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["source"], "acme/app");
        assert_eq!(edges[0]["dest"], "acme/core");
        assert_eq!(edges[0]["constraint"], "^1.0");
        assert_eq!(edges[0]["dev"], false);
    }

    #[test]
    fn test_json_omits_unset_fields() {
        let graph = DependencyAnalyzer::new()
            .analyze_documents(r#"{"require": {"php": ">=8.1"}}"#, None, None)
            .unwrap();

        let mut output = Vec::new();
        JsonExporter.export(&graph, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let packages = parsed["packages"].as_array().unwrap();

        // Nothing was back-filled, so no version keys appear at all.
        for package in packages {
            assert!(package.get("version").is_none());
            assert!(package.get("source_reference").is_none());
        }
    }

    #[test]
    fn test_json_is_valid() {
        let mut output = Vec::new();
        JsonExporter.export(&locked_graph(), &mut output).unwrap();

        let result: Result<serde_json::Value, _> = serde_json::from_slice(&output);
        assert!(result.is_ok());
    }
}
