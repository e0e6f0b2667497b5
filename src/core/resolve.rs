//! core::resolve
//!
//! Edit path enumeration.
//!
//! Given an [`EditIndex`] and a starting node, find every chain of edits
//! leading from that node up to a root (a node with no recorded parents).
//!
//! # Algorithm
//!
//! Depth-first expansion over child-to-parent edits. The chain of nodes
//! already visited on the current branch is a borrowed linked list living on
//! the call stack: each call extends it by one link and hands the extended
//! chain to its children, so sibling branches never observe each other's
//! visits.
//!
//! An edit whose parent is already on the chain closes a cycle. It is
//! reported and pruned; it contributes no paths. A node is a root only if it
//! has no edits at all. A node whose edits are all cyclic yields no paths.
//!
//! # Complexity
//!
//! Exponential in the number of alternate routes through diamond-shaped
//! graphs. Sequence hierarchies are shallow (two to four levels) with little
//! fan-out, so this is not a concern in practice. Recursion depth equals
//! graph depth.

use std::fmt;

use serde::Serialize;

use super::edits::EditIndex;
use super::types::NodeId;

/// A chain of nodes from a starting node out to a root.
///
/// `nodes()[0]` is the node the enumeration started from and the last node
/// is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EditPath {
    nodes: Vec<NodeId>,
}

impl EditPath {
    /// Create a path from leaf-to-root ordered nodes.
    ///
    /// Returns `None` for an empty node list.
    pub fn new(nodes: Vec<NodeId>) -> Option<Self> {
        if nodes.is_empty() {
            None
        } else {
            Some(Self { nodes })
        }
    }

    /// Nodes from leaf to root.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The node the enumeration started from.
    pub fn leaf(&self) -> &NodeId {
        &self.nodes[0]
    }

    /// The root the path ends at.
    pub fn root(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Nodes from root to leaf.
    pub fn root_to_leaf(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().rev()
    }

    /// Number of nodes in the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; paths hold at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for EditPath {
    /// Root to leaf, short names joined with ` > `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.root_to_leaf().map(NodeId::name).collect();
        write!(f, "{}", names.join(" > "))
    }
}

/// An edit pruned because its parent was already on the visited chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Visited chain from the starting node to `child`
    pub chain: Vec<NodeId>,
    /// Node whose edit closes the cycle
    pub child: NodeId,
    /// Parent already present on the chain
    pub parent: NodeId,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<&str> = self.chain.iter().map(NodeId::as_str).collect();
        write!(
            f,
            "cycle detected: {} is edited into {}, already visited in [{}]",
            self.child,
            self.parent,
            chain.join(", ")
        )
    }
}

/// Result of resolving a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub paths: Vec<EditPath>,
    pub cycles: Vec<CycleReport>,
}

/// One link of the visited chain.
struct Visited<'a> {
    node: &'a NodeId,
    prev: Option<&'a Visited<'a>>,
}

impl Visited<'_> {
    fn contains(&self, node: &NodeId) -> bool {
        let mut link = Some(self);
        while let Some(current) = link {
            if current.node == node {
                return true;
            }
            link = current.prev;
        }
        false
    }

    /// Chain from the starting node to this link.
    fn to_vec(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut link = Some(self);
        while let Some(current) = link {
            nodes.push(current.node.clone());
            link = current.prev;
        }
        nodes.reverse();
        nodes
    }
}

/// Enumerate every path from `start` to a root.
///
/// Cycles are logged and pruned. See [`resolve`] to also get the cycle
/// reports.
///
/// # Example
///
/// ```
/// use shotpath::core::edits::{Edit, EditIndex};
/// use shotpath::core::resolve::enumerate_paths;
/// use shotpath::core::types::NodeId;
///
/// let a = NodeId::new("A").unwrap();
/// let b = NodeId::new("B").unwrap();
/// let c = NodeId::new("C").unwrap();
///
/// let mut index = EditIndex::new();
/// index.record(a.clone());
/// index.push(b.clone(), Edit::to(a.clone()));
/// index.push(c.clone(), Edit::to(b.clone()));
///
/// let paths = enumerate_paths(&index, &c);
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].nodes(), &[c, b, a]);
/// ```
pub fn enumerate_paths(index: &EditIndex, start: &NodeId) -> Vec<EditPath> {
    resolve(index, start).paths
}

/// Enumerate paths from `start`, collecting cycle reports alongside.
pub fn resolve(index: &EditIndex, start: &NodeId) -> Resolution {
    let mut cycles = Vec::new();
    let paths = walk(index, start, None, &mut cycles)
        .into_iter()
        .filter_map(EditPath::new)
        .collect();

    Resolution { paths, cycles }
}

fn walk<'a>(
    index: &EditIndex,
    node: &'a NodeId,
    prev: Option<&'a Visited<'a>>,
    cycles: &mut Vec<CycleReport>,
) -> Vec<Vec<NodeId>> {
    let here = Visited { node, prev };
    let edits = index.edits(node);

    if edits.is_empty() {
        return vec![vec![node.clone()]];
    }

    let mut paths = Vec::new();
    for edit in edits {
        if here.contains(&edit.parent) {
            let report = CycleReport {
                chain: here.to_vec(),
                child: node.clone(),
                parent: edit.parent.clone(),
            };
            tracing::warn!("{}", report);
            cycles.push(report);
            continue;
        }

        for tail in walk(index, &edit.parent, Some(&here), cycles) {
            let mut path = Vec::with_capacity(tail.len() + 1);
            path.push(node.clone());
            path.extend(tail);
            paths.push(path);
        }
    }

    paths
}
