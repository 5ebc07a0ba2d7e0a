//! Builds a dependency graph from a project's Composer documents.
//!
//! Construction runs in three strictly ordered phases: register a node for
//! every locked package (back-filling version and source reference as each is
//! created), then connect requirement edges over the nodes known at that
//! point, redirecting through aggregate packages where needed. Reordering the
//! phases changes which names are known during redirection and silently
//! alters the result.

use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::{DependencyGraph, PackageNode, ROOT_PACKAGE_NAME};
use crate::parser::{self, PackageRecord, ParseError};

/// Errors that can occur while analyzing a project.
///
/// All of them abort the analysis; no partial graph is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The target project directory does not exist.
    #[error("Directory does not exist: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// Failed to read a Composer document from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// A Composer document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The manifest declares userland dependencies but no lock file exists.
    #[error("Dependencies are declared but no lock file was found; run \"composer install\" or commit your composer.lock file before analyzing")]
    MissingLockFile,
}

/// Analyzes the dependencies of a project and returns them as a graph.
///
/// # Example
///
/// ```
/// use lockscope::analyzer::DependencyAnalyzer;
///
/// let graph = DependencyAnalyzer::new()
///     .analyze_documents(r#"{"require": {"php": ">=8.1"}}"#, None, None)
///     .unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.out_edges("__root").len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes the project located at `dir`, reading `composer.json` and,
    /// when present, `composer.lock`.
    ///
    /// A directory without a manifest yields a graph holding only the
    /// synthesized root node, tagged with the directory.
    pub fn analyze(&self, dir: impl AsRef<Path>) -> Result<DependencyGraph, AnalyzeError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AnalyzeError::InvalidDirectory(dir.to_path_buf()));
        }

        let manifest_path = dir.join("composer.json");
        if !manifest_path.is_file() {
            let mut graph = DependencyGraph::new();
            graph
                .root_package_mut()
                .set_attribute("dir", dir.to_string_lossy());
            return Ok(graph);
        }

        let manifest = fs::read_to_string(&manifest_path)?;

        let lock_path = dir.join("composer.lock");
        let lock = if lock_path.is_file() {
            Some(fs::read_to_string(&lock_path)?)
        } else {
            None
        };

        self.analyze_documents(&manifest, lock.as_deref(), Some(dir))
    }

    /// Analyzes already-read manifest and lock content.
    ///
    /// `dir` is only used to tag nodes with their filesystem location; pass
    /// `None` when the documents did not come from disk.
    pub fn analyze_documents(
        &self,
        manifest: &str,
        lock: Option<&str>,
        dir: Option<&Path>,
    ) -> Result<DependencyGraph, AnalyzeError> {
        let mut root_data = parser::parse_manifest_str(manifest)?;
        let root_name = root_data
            .name
            .clone()
            .unwrap_or_else(|| ROOT_PACKAGE_NAME.to_string());
        root_data.name = Some(root_name.clone());

        // Without a lock file the project either has no userland
        // dependencies, or they were never installed.
        let lock = lock.filter(|content| !content.trim().is_empty());
        let Some(lock) = lock else {
            if root_data.has_userland_dependencies() {
                return Err(AnalyzeError::MissingLockFile);
            }

            let requirements: Vec<(String, String)> = root_data
                .requirements()
                .map(|(name, constraint)| (name.to_string(), constraint.to_string()))
                .collect();

            let mut graph =
                DependencyGraph::with_root(PackageNode::with_data(root_name.as_str(), root_data));
            if let Some(dir) = dir {
                graph
                    .root_package_mut()
                    .set_attribute("dir", dir.to_string_lossy());
            }

            // Platform requirements (php itself, ext-*) never appear in a
            // lock file; connect them straight from the manifest. They get no
            // version or source reference.
            for (name, constraint) in &requirements {
                graph.connect(&root_name, name, constraint);
            }

            return Ok(graph);
        };

        let install_dir = {
            let vendor_dir = root_data.vendor_dir();
            match dir {
                Some(dir) => dir.join(vendor_dir),
                None => PathBuf::from(vendor_dir),
            }
        };

        let mut graph =
            DependencyGraph::with_root(PackageNode::with_data(root_name.as_str(), root_data));
        if let Some(dir) = dir {
            graph
                .root_package_mut()
                .set_attribute("dir", dir.to_string_lossy());
        }

        let lock_data = parser::parse_lock_str(lock)?;

        // Phase 1: register a node per locked package, regular packages
        // before development packages.
        if let Some(packages) = &lock_data.packages {
            self.add_packages(&mut graph, packages, &install_dir);
        }
        if let Some(packages) = &lock_data.packages_dev {
            self.add_packages(&mut graph, packages, &install_dir);
        }

        // Phase 2: connect the requirements of every node registered so far.
        // Stub nodes created while connecting are endpoints only; they carry
        // no requirements of their own.
        let requirements: Vec<(String, Vec<(String, String)>)> = graph
            .packages()
            .map(|package| {
                let entries = package
                    .data()
                    .requirements()
                    .map(|(name, constraint)| (name.to_string(), constraint.to_string()))
                    .collect();
                (package.name().to_string(), entries)
            })
            .collect();

        for (source, entries) in requirements {
            for (dest, constraint) in entries {
                self.connect(&mut graph, &source, &dest, &constraint);
            }
        }

        Ok(graph)
    }

    fn add_packages(
        &self,
        graph: &mut DependencyGraph,
        packages: &[PackageRecord],
        install_dir: &Path,
    ) {
        for record in packages {
            let Some(name) = record.display_name() else {
                continue;
            };

            // The root, and packages listed in both lock sections, must not
            // be registered twice.
            if graph.is_root_package_name(name) || graph.has_package(name) {
                continue;
            }

            if let Ok(package) = graph.create_package(name, record.clone()) {
                package.set_attribute("dir", install_dir.join(name).to_string_lossy());
            }

            self.process_locked_data(graph, record);
        }
    }

    fn connect(&self, graph: &mut DependencyGraph, source: &str, dest: &str, constraint: &str) {
        // The required package is available: connect directly.
        if graph.has_package(dest) {
            graph.connect(source, dest, constraint);
            return;
        }

        // Not available, but some aggregate package declares it replaces the
        // requested name: aim the edge there instead.
        if let Some(aggregate) = graph.aggregate_package_containing(dest) {
            let aggregate_name = aggregate.name().to_string();
            graph.connect(source, &aggregate_name, constraint);
            return;
        }

        // A package that is only installed under certain conditions (a
        // dev-only target, a platform pseudo-package). The connection is
        // still recorded, against a stub node with no data.
        graph.connect(source, dest, constraint);
    }

    fn process_locked_data(&self, graph: &mut DependencyGraph, record: &PackageRecord) {
        let Some(name) = record.display_name() else {
            return;
        };
        let Some(package) = graph.package_mut(name) else {
            return;
        };

        if let Some(version) = &record.version {
            package.set_version(version);
        }

        // A reference equal to the version (tag checkouts) adds nothing.
        if let Some(reference) = record.locked_reference() {
            if record.version.as_deref() != Some(reference) {
                package.set_source_reference(reference);
            }
        }
    }
}
