//! Namespace hierarchy construction.
//!
//! Classes are folded into a deduplicated hierarchy of namespace prefixes.
//! Nodes live in an arena indexed by id; children are stored as id lists and
//! a prefix-string map gives constant-time lookup of existing prefixes.
//!
//! Node ids are assigned in first-encounter order while walking the classes
//! in the order the caller supplies them. Callers that need reproducible ids
//! must supply a stable order (the report pipeline sorts by name).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{ClassStatus, ClassStatusKind, QualifiedName};

pub type NodeId = usize;

/// Class name -> classes it references.
pub type DependencyMap = BTreeMap<QualifiedName, BTreeSet<QualifiedName>>;

/// Name given to the synthetic root of the tree form.
pub const ROOT_NAME: &str = "root";

/// Kind of a hierarchy node: a plain namespace or a classified class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Namespace,
    Class(ClassStatusKind),
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Class(status) => status.as_str(),
        }
    }

    pub fn is_class(self) -> bool {
        matches!(self, NodeKind::Class(_))
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One conflicting pair found while building the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// Two structurally different names share the same joined prefix.
    PrefixCollision { prefix: String, existing: QualifiedName, incoming: QualifiedName },
    /// The same class was supplied twice with different metadata.
    ConflictingDuplicate {
        class: QualifiedName,
        existing: ClassStatusKind,
        incoming: ClassStatusKind,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::PrefixCollision { prefix, existing, incoming } => write!(
                f,
                "prefix '{prefix}' claimed by {:?} and {:?}",
                existing.segments(),
                incoming.segments()
            ),
            Inconsistency::ConflictingDuplicate { class, existing, incoming } => write!(
                f,
                "class '{class}' supplied twice ({} vs {})",
                existing.as_str(),
                incoming.as_str()
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum GraphError {
    /// Input data maps distinct classes onto one node path.
    #[error(
        "Inconsistent class hierarchy ({} conflict(s)): {}",
        .conflicts.len(),
        join_conflicts(.conflicts)
    )]
    Inconsistent { conflicts: Vec<Inconsistency> },
}

fn join_conflicts(conflicts: &[Inconsistency]) -> String {
    conflicts.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Nested node of the tree form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_methods: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_binary_size: Option<u64>,
}

impl TreeNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Number of class nodes in this subtree.
    pub fn class_count(&self) -> usize {
        usize::from(self.kind.is_class())
            + self.children.iter().map(TreeNode::class_count).sum::<usize>()
    }

    /// Depth-first search by node name.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Node of the flat form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent prefix to child prefix.
    #[default]
    Contains,
    /// Class to a class it references.
    DependsOn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip)]
    pub kind: EdgeKind,
}

/// Flat node/edge form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatGraph {
    pub nodes: Vec<FlatNode>,
    pub edges: Vec<Edge>,
}

impl FlatGraph {
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassMeta {
    status: ClassStatusKind,
    method_count: usize,
    total_binary_size: u64,
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    /// Segments of the prefix this node stands for.
    path: QualifiedName,
    /// Class whose walk created the node.
    origin: QualifiedName,
    class: Option<ClassMeta>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match &self.class {
            Some(meta) => NodeKind::Class(meta.status),
            None => NodeKind::Namespace,
        }
    }
}

/// Arena-backed builder owning the prefix -> node id map.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeData>,
    by_prefix: HashMap<String, NodeId>,
    edges: Vec<Edge>,
    conflicts: Vec<Inconsistency>,
    root: Option<NodeId>,
}

impl GraphBuilder {
    /// Builder for the flat form: ids start at 0 with the first prefix.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Builder for the tree form: id 0 is the synthetic root.
    pub fn tree() -> Self {
        let mut builder = Self::default();
        let root_name = QualifiedName::parse(ROOT_NAME);
        builder.nodes.push(NodeData {
            name: ROOT_NAME.to_string(),
            path: root_name.clone(),
            origin: root_name,
            class: None,
            children: Vec::new(),
        });
        builder.root = Some(0);
        builder
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Id of the node standing for `prefix`, if one was created.
    pub fn lookup(&self, prefix: &str) -> Option<NodeId> {
        self.by_prefix.get(prefix).copied()
    }

    /// Walk `class.class` prefix by prefix, creating missing nodes and
    /// attaching the status to the full-name node.
    ///
    /// A conflict is recorded and the class is skipped; the build goes on so
    /// every conflict can be reported together.
    pub fn add_class(&mut self, class: &ClassStatus) {
        let name = &class.class;
        let mut parent = self.root;

        for depth in 1..=name.len() {
            let prefix = name.prefix_string(depth);
            let id = match self.by_prefix.get(&prefix).copied() {
                Some(existing) => {
                    let node = &self.nodes[existing];
                    if node.path.segments() != &name.segments()[..depth] {
                        let collision = Inconsistency::PrefixCollision {
                            prefix,
                            existing: node.origin.clone(),
                            incoming: name.clone(),
                        };
                        self.conflict(collision);
                        return;
                    }
                    existing
                }
                None => self.create_node(prefix, name, depth, parent),
            };
            parent = Some(id);
        }

        let Some(id) = parent else {
            return;
        };
        let meta = ClassMeta {
            status: class.status,
            method_count: class.method_count,
            total_binary_size: class.total_binary_size,
        };
        match self.nodes[id].class.clone() {
            None => self.nodes[id].class = Some(meta),
            Some(existing) if existing != meta => {
                self.conflict(Inconsistency::ConflictingDuplicate {
                    class: name.clone(),
                    existing: existing.status,
                    incoming: meta.status,
                });
            }
            Some(_) => {}
        }
    }

    /// Add an edge from each class to each referenced class that has a class
    /// node. References to unknown names are dropped.
    pub fn add_dependencies(&mut self, class: &QualifiedName, targets: &BTreeSet<QualifiedName>) {
        let Some(source) = self.class_node(class) else {
            return;
        };
        for target in targets {
            match self.class_node(target) {
                Some(target) => {
                    self.edges.push(Edge { source, target, kind: EdgeKind::DependsOn })
                }
                None => debug!(from = %class, to = %target, "dropping unresolved dependency"),
            }
        }
    }

    /// Finish as a nested tree rooted at the synthetic root.
    pub fn finish_tree(self) -> Result<TreeNode, GraphError> {
        self.check()?;
        match self.root {
            Some(root) => Ok(self.materialize(root)),
            // A flat builder has no root; report an empty hierarchy.
            None => Ok(TreeNode {
                id: 0,
                name: ROOT_NAME.to_string(),
                kind: NodeKind::Namespace,
                children: Vec::new(),
                num_methods: None,
                total_binary_size: None,
            }),
        }
    }

    /// Finish as flat nodes plus edges.
    pub fn finish_graph(self) -> Result<FlatGraph, GraphError> {
        self.check()?;
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(id, _)| Some(*id) != self.root)
            .map(|(id, node)| FlatNode { id, name: node.name.clone(), kind: node.kind() })
            .collect();
        Ok(FlatGraph { nodes, edges: self.edges })
    }

    fn create_node(
        &mut self,
        prefix: String,
        origin: &QualifiedName,
        depth: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            name: prefix.clone(),
            path: QualifiedName::from_segments(origin.segments()[..depth].iter().cloned()),
            origin: origin.clone(),
            class: None,
            children: Vec::new(),
        });
        self.by_prefix.insert(prefix, id);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
            if Some(parent) != self.root {
                self.edges.push(Edge { source: parent, target: id, kind: EdgeKind::Contains });
            }
        }
        id
    }

    fn class_node(&self, class: &QualifiedName) -> Option<NodeId> {
        let id = self.lookup(&class.joined())?;
        let node = &self.nodes[id];
        (node.class.is_some() && node.path == *class).then_some(id)
    }

    fn conflict(&mut self, inconsistency: Inconsistency) {
        warn!(%inconsistency, "class hierarchy conflict");
        self.conflicts.push(inconsistency);
    }

    fn check(&self) -> Result<(), GraphError> {
        if self.conflicts.is_empty() {
            debug!(nodes = self.nodes.len(), edges = self.edges.len(), "hierarchy built");
            Ok(())
        } else {
            Err(GraphError::Inconsistent { conflicts: self.conflicts.clone() })
        }
    }

    fn materialize(&self, id: NodeId) -> TreeNode {
        let node = &self.nodes[id];
        TreeNode {
            id,
            name: node.name.clone(),
            kind: node.kind(),
            children: node.children.iter().map(|&child| self.materialize(child)).collect(),
            num_methods: node.class.as_ref().map(|m| m.method_count),
            total_binary_size: node.class.as_ref().map(|m| m.total_binary_size),
        }
    }
}

/// Fold classes into the nested tree form. Dependencies play no part here.
pub fn build_tree(classes: &[ClassStatus]) -> Result<TreeNode, GraphError> {
    let mut builder = GraphBuilder::tree();
    for class in classes {
        builder.add_class(class);
    }
    builder.finish_tree()
}

/// Fold classes into the flat form, then add dependency edges between known
/// classes in class order.
pub fn build_graph(
    classes: &[ClassStatus],
    dependencies: &DependencyMap,
) -> Result<FlatGraph, GraphError> {
    let mut builder = GraphBuilder::flat();
    for class in classes {
        builder.add_class(class);
    }
    for class in classes {
        if let Some(targets) = dependencies.get(&class.class) {
            builder.add_dependencies(&class.class, targets);
        }
    }
    builder.finish_graph()
}
