//! Plain-text report of a dependency graph.
//!
//! One block per package: the root first, the rest alphabetically. Each block
//! lists the resolved version, the source reference when one was recorded,
//! and the outgoing requirement edges sorted by destination.

use super::Exporter;
use crate::graph::DependencyGraph;
use std::cmp::Ordering;
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let mut packages: Vec<_> = graph.packages().collect();
        packages.sort_by(|a, b| {
            if graph.is_root_package(a) {
                return Ordering::Less;
            }
            if graph.is_root_package(b) {
                return Ordering::Greater;
            }
            a.name().cmp(b.name())
        });

        let mut first = true;
        for package in packages {
            if !first {
                writeln!(writer)?;
            }
            first = false;

            let mut title = package.name().to_string();
            if graph.is_root_package(package) {
                title.push_str(" (Root)");
            }

            writeln!(writer, "{}", title)?;
            writeln!(writer, "{}", "=".repeat(title.len()))?;
            writeln!(writer, "Version: {}", package.version().unwrap_or("<null>"))?;

            if let Some(reference) = package.source_reference() {
                writeln!(writer, "Source-Reference: {}", reference)?;
            }

            let mut edges = graph.out_edges(package.name());
            edges.sort_by(|a, b| a.dest_package().cmp(b.dest_package()));
            for edge in edges {
                writeln!(writer, "-> {}", edge.dest_package())?;
            }
        }

        Ok(())
    }
}
