//! Dependency graph implementation using petgraph.
//!
//! Nodes are packages (the root project plus everything the lock file
//! names), edges are requirement declarations carrying the literal constraint
//! string that produced them. Names are compared case-insensitively
//! everywhere; the original spelling is retained for display.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

use crate::parser::{is_extension_package, is_platform_package, PackageRecord};

/// Name given to a root node when the manifest does not declare one.
pub const ROOT_PACKAGE_NAME: &str = "__root";

/// Repository id assumed for installed packages that never had one assigned.
const DEFAULT_REPOSITORY_ID: &str = "packagist";

/// Errors produced by graph and node operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A package with the same (case-insensitive) name is already registered.
    #[error("Package \"{0}\" is already registered")]
    PackageExists(String),

    /// The requested node attribute was never set.
    #[error("Attribute \"{0}\" does not exist")]
    AttributeNotFound(String),
}

/// A vertex of the dependency graph: one package, root project included.
///
/// A node is created either from a manifest/lock record, or as a bare stub
/// the first time a name shows up as an edge endpoint with no record of its
/// own (platform pseudo-packages, uninstalled dev-only targets).
#[derive(Debug, Clone)]
pub struct PackageNode {
    name: String,
    data: PackageRecord,
    version: Option<String>,
    source_reference: Option<String>,
    repository_id: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl PackageNode {
    /// Creates a stub node carrying no manifest or lock data.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_data(name, PackageRecord::default())
    }

    /// Creates a node from a manifest or lock record.
    pub fn with_data(name: impl Into<String>, data: PackageRecord) -> Self {
        Self {
            name: name.into(),
            data,
            version: None,
            source_reference: None,
            repository_id: None,
            attributes: BTreeMap::new(),
        }
    }

    /// The package name, in its original spelling.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw record this node was created from. Empty for stub nodes.
    pub fn data(&self) -> &PackageRecord {
        &self.data
    }

    /// Resolved version, back-filled from the lock file. Never set for
    /// packages that have no lock entry.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// VCS reference the installation points at, when it differs from the
    /// version.
    pub fn source_reference(&self) -> Option<&str> {
        self.source_reference.as_deref()
    }

    pub fn set_source_reference(&mut self, reference: impl Into<String>) {
        self.source_reference = Some(reference.into());
    }

    pub fn set_repository_id(&mut self, id: impl Into<String>) {
        self.repository_id = Some(id.into());
    }

    /// Name qualified by the originating repository.
    ///
    /// A node without a `dir` attribute was never materialized on disk
    /// (platform pseudo-package, uninstalled dev-only target) and keeps its
    /// bare name. Installed packages are prefixed with their repository id so
    /// identically-named packages from different repositories stay apart.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscope::graph::PackageNode;
    ///
    /// let mut node = PackageNode::new("acme/http-client");
    /// assert_eq!(node.qualified_name(), "acme/http-client");
    ///
    /// node.set_attribute("dir", "/project/vendor/acme/http-client");
    /// assert_eq!(node.qualified_name(), "packagist__acme/http-client");
    /// ```
    pub fn qualified_name(&self) -> String {
        if !self.has_attribute("dir") {
            return self.name.clone();
        }

        let repository_id = self
            .repository_id
            .as_deref()
            .unwrap_or(DEFAULT_REPOSITORY_ID);

        format!("{}__{}", repository_id, self.name)
    }

    /// Returns true if this node stands for the PHP runtime itself.
    pub fn is_php_runtime(&self) -> bool {
        is_platform_package(&self.qualified_name())
    }

    /// Returns true if this node stands for a PHP extension.
    pub fn is_php_extension(&self) -> bool {
        is_extension_package(&self.qualified_name())
    }

    /// Returns true if this package declares it supersedes `package`.
    pub fn replaces(&self, package: &str) -> bool {
        section_contains(self.data.replace.as_ref(), package)
    }

    /// Returns true if `package` appears in this node's `require-dev`
    /// section.
    pub fn has_dev_requirement_on(&self, package: &str) -> bool {
        section_contains(self.data.require_dev.as_ref(), package)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Looks up an attribute; missing keys are an error, not a default.
    pub fn attribute(&self, key: &str) -> Result<&str, GraphError> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GraphError::AttributeNotFound(key.to_string()))
    }
}

fn section_contains(section: Option<&BTreeMap<String, String>>, package: &str) -> bool {
    section.is_some_and(|map| map.keys().any(|key| key.eq_ignore_ascii_case(package)))
}

/// A directed edge: the source package requires the destination package.
///
/// Edges are immutable once created and carry the constraint string exactly
/// as declared, not a resolved version.
#[derive(Debug, Clone)]
pub struct DependencyEdge {
    source: String,
    dest: String,
    version_constraint: String,
    dev: bool,
}

impl DependencyEdge {
    /// Name of the package declaring the requirement.
    pub fn source_package(&self) -> &str {
        &self.source
    }

    /// Name of the required package.
    pub fn dest_package(&self) -> &str {
        &self.dest
    }

    /// The literal constraint string from the requirement declaration.
    pub fn version_constraint(&self) -> &str {
        &self.version_constraint
    }

    /// Returns true if the requirement came from the source's `require-dev`
    /// section.
    pub fn is_dev_dependency(&self) -> bool {
        self.dev
    }
}

/// A directed graph of package dependencies.
///
/// The graph uses petgraph's `DiGraph` internally, with a side map from
/// lowercased package name to node index for case-insensitive O(1) lookup.
/// Node indices are handed out in insertion order, which keeps iteration
/// deterministic. There is always exactly one root node, synthesized as
/// `__root` when no manifest name is available.
///
/// # Example
///
/// ```
/// use lockscope::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.connect("__root", "acme/http-client", "^2.0");
///
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.has_package("Acme/HTTP-Client"));
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<PackageNode, DependencyEdge>,
    indices: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a graph with a synthesized `__root` node.
    pub fn new() -> Self {
        Self::with_root(PackageNode::new(ROOT_PACKAGE_NAME))
    }

    /// Creates a graph around an explicit root node.
    pub fn with_root(root_package: PackageNode) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        let key = root_package.name().to_ascii_lowercase();
        let root = graph.add_node(root_package);
        indices.insert(key, root);

        Self {
            graph,
            indices,
            root,
        }
    }

    /// The distinguished root node.
    pub fn root_package(&self) -> &PackageNode {
        &self.graph[self.root]
    }

    pub fn root_package_mut(&mut self) -> &mut PackageNode {
        &mut self.graph[self.root]
    }

    /// Returns true if `node` is the root. Names are unique per graph, so
    /// name equality is identity here.
    pub fn is_root_package(&self, node: &PackageNode) -> bool {
        self.is_root_package_name(node.name())
    }

    /// Case-insensitive comparison against the root node's name.
    pub fn is_root_package_name(&self, name: &str) -> bool {
        self.root_package().name().eq_ignore_ascii_case(name)
    }

    /// All nodes, in insertion order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageNode> + '_ {
        self.graph.node_indices().map(|index| &self.graph[index])
    }

    /// Case-insensitive node lookup.
    pub fn package(&self, name: &str) -> Option<&PackageNode> {
        self.indices
            .get(&name.to_ascii_lowercase())
            .map(|&index| &self.graph[index])
    }

    pub fn package_mut(&mut self, name: &str) -> Option<&mut PackageNode> {
        let index = *self.indices.get(&name.to_ascii_lowercase())?;
        Some(&mut self.graph[index])
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.indices.contains_key(&name.to_ascii_lowercase())
    }

    /// Case-insensitive lookup that registers a stub node on a miss.
    ///
    /// This is how edge endpoints without a lock record of their own still
    /// become first-class graph members.
    pub fn get_or_create_package(&mut self, name: &str) -> &mut PackageNode {
        let index = self.get_or_create(name);
        &mut self.graph[index]
    }

    /// Registers a brand-new node with the given record.
    ///
    /// Fails if any node, stub form included, already holds the name. Callers
    /// that want skip-on-duplicate behavior check [`has_package`] first.
    ///
    /// [`has_package`]: DependencyGraph::has_package
    pub fn create_package(
        &mut self,
        name: &str,
        data: PackageRecord,
    ) -> Result<&mut PackageNode, GraphError> {
        let key = name.to_ascii_lowercase();
        if self.indices.contains_key(&key) {
            return Err(GraphError::PackageExists(name.to_string()));
        }

        let index = self.graph.add_node(PackageNode::with_data(name, data));
        self.indices.insert(key, index);
        Ok(&mut self.graph[index])
    }

    /// Connects a requirement edge between two packages, creating stub nodes
    /// for endpoints that do not exist yet.
    ///
    /// Self-dependencies are dropped, and only the first edge between a pair
    /// of nodes is kept; later constraints for the same pair are no-ops.
    ///
    /// # Example
    ///
    /// ```
    /// use lockscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.connect("__root", "acme/http-client", "^2.0");
    /// graph.connect("__root", "acme/http-client", "^3.0");
    ///
    /// assert_eq!(graph.edge_count(), 1);
    /// assert_eq!(graph.out_edges("__root")[0].version_constraint(), "^2.0");
    /// ```
    pub fn connect(&mut self, source: &str, dest: &str, version_constraint: &str) {
        let source_index = self.get_or_create(source);
        let dest_index = self.get_or_create(dest);

        // A package cannot depend on itself, under any spelling.
        if source_index == dest_index {
            return;
        }

        // First constraint wins; duplicate connections are no-ops.
        if self.graph.find_edge(source_index, dest_index).is_some() {
            return;
        }

        let dest_name = self.graph[dest_index].name().to_string();
        let source_node = &self.graph[source_index];
        let edge = DependencyEdge {
            source: source_node.name().to_string(),
            dest: dest_name.clone(),
            version_constraint: version_constraint.to_string(),
            dev: source_node.has_dev_requirement_on(&dest_name),
        };

        self.graph.add_edge(source_index, dest_index, edge);
    }

    /// Searches for a package declaring it replaces `name`.
    ///
    /// Returns the first match in insertion order. Used to redirect edges
    /// aimed at a name that only exists inside an aggregate package.
    pub fn aggregate_package_containing(&self, name: &str) -> Option<&PackageNode> {
        self.packages().find(|package| package.replaces(name))
    }

    /// Outgoing requirement edges of a package, in the order they were
    /// connected. Unknown names yield an empty list.
    pub fn out_edges(&self, name: &str) -> Vec<&DependencyEdge> {
        self.edges(name, Direction::Outgoing)
    }

    /// Incoming requirement edges of a package, in the order they were
    /// connected.
    pub fn in_edges(&self, name: &str) -> Vec<&DependencyEdge> {
        self.edges(name, Direction::Incoming)
    }

    fn edges(&self, name: &str, direction: Direction) -> Vec<&DependencyEdge> {
        let Some(&index) = self.indices.get(&name.to_ascii_lowercase()) else {
            return Vec::new();
        };

        // petgraph yields the most recently added edge first; reverse to get
        // append order.
        let mut edges: Vec<&DependencyEdge> = self
            .graph
            .edges_directed(index, direction)
            .map(|edge| edge.weight())
            .collect();
        edges.reverse();
        edges
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn get_or_create(&mut self, name: &str) -> NodeIndex {
        let key = name.to_ascii_lowercase();
        if let Some(&index) = self.indices.get(&key) {
            return index;
        }

        let index = self.graph.add_node(PackageNode::new(name));
        self.indices.insert(key, index);
        index
    }
}
