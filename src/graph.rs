//! A mutable bidirected sequence graph.
//!
//! Nodes are stored in an arena keyed by node identifier, and each node has a sequence.
//! Edges connect oriented nodes, which are represented as GBWT node identifiers (handles).
//! See [`gbwt::support::encode_node`] for the encoding.
//!
//! An edge `(from, to)` can be traversed in two directions.
//! Edges `(from, to)` and `(flip(to), flip(from))` are the same edge, and the graph stores the one returned by [`canonical_edge`].

use crate::formats;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::{self, Write};

use gbwt::{GBZ, Orientation};
use gbwt::support;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Returns the canonical representation of the edge from handle `from` to handle `to`.
///
/// The canonical edge is the smaller of `(from, to)` and `(flip(to), flip(from))`.
///
/// # Examples
///
/// ```
/// use gbz_unfold::graph::canonical_edge;
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// let a = support::encode_node(1, Orientation::Forward);
/// let b = support::encode_node(2, Orientation::Forward);
/// assert_eq!(canonical_edge(a, b), (a, b));
/// assert_eq!(canonical_edge(support::flip_node(b), support::flip_node(a)), (a, b));
/// ```
pub fn canonical_edge(from: usize, to: usize) -> (usize, usize) {
    let reverse = (support::flip_node(to), support::flip_node(from));
    if reverse < (from, to) {
        reverse
    } else {
        (from, to)
    }
}

//-----------------------------------------------------------------------------

/// A bidirected sequence graph with node sequences and strand-aware edges.
///
/// Node identifiers must be positive, as identifier 0 is reserved for the GBWT endmarker.
/// Adding an edge requires that both endpoints are already in the graph.
/// Removing a node also removes all edges incident to it.
///
/// # Examples
///
/// ```
/// use gbz_unfold::Graph;
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// let mut graph = Graph::new();
/// graph.add_node(1, b"GAT".to_vec());
/// graph.add_node(2, b"TACA".to_vec());
/// let from = support::encode_node(1, Orientation::Forward);
/// let to = support::encode_node(2, Orientation::Reverse);
/// assert_eq!(graph.add_edge(from, to), Ok(true));
///
/// // The same edge in the other direction.
/// assert!(graph.has_edge(support::flip_node(to), support::flip_node(from)));
/// assert_eq!(graph.successors(from), vec![to]);
/// assert_eq!(graph.successors(support::flip_node(to)), vec![support::flip_node(from)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    // Node identifier to sequence.
    nodes: BTreeMap<usize, Vec<u8>>,

    // Canonical edges.
    edges: BTreeSet<(usize, usize)>,

    // Node identifier to the canonical edges incident to it.
    adjacency: BTreeMap<usize, BTreeSet<(usize, usize)>>,
}

//-----------------------------------------------------------------------------

/// Construction.
impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the same nodes and edges as the given GBZ graph.
    pub fn from_gbz(graph: &GBZ) -> Self {
        let mut result = Graph::new();
        for node_id in graph.node_iter() {
            let sequence = graph.sequence(node_id).unwrap_or(&[]);
            result.add_node(node_id, sequence.to_vec());
        }
        for node_id in graph.node_iter() {
            for orientation in [Orientation::Forward, Orientation::Reverse] {
                let from = support::encode_node(node_id, orientation);
                if let Some(iter) = graph.successors(node_id, orientation) {
                    for (to_id, to_orientation) in iter {
                        let to = support::encode_node(to_id, to_orientation);
                        // Both endpoints are in the graph.
                        let _ = result.add_edge(from, to);
                    }
                }
            }
        }
        result
    }

    /// Adds all nodes and edges of the other graph to this graph.
    ///
    /// Nodes already present in this graph keep their sequences.
    pub fn extend(&mut self, other: &Graph) {
        for (node_id, sequence) in other.nodes.iter() {
            if !self.has_node(*node_id) {
                self.add_node(*node_id, sequence.clone());
            }
        }
        for (from, to) in other.edges.iter() {
            self.insert_canonical_edge(*from, *to);
        }
    }

    /// Decomposes the graph into connected components, ignoring edge directions.
    ///
    /// Every node belongs to exactly one component and every edge is in the component of its endpoints.
    /// The components are listed in the order of their smallest node identifiers.
    pub fn components(&self) -> Vec<Graph> {
        let mut result = Vec::new();
        let mut visited: BTreeSet<usize> = BTreeSet::new();

        for (start, _) in self.nodes.iter() {
            if visited.contains(start) {
                continue;
            }
            let mut component = Graph::new();
            let mut queue: VecDeque<usize> = VecDeque::new();
            visited.insert(*start);
            queue.push_back(*start);
            while let Some(node_id) = queue.pop_front() {
                if let Some(sequence) = self.sequence(node_id) {
                    component.add_node(node_id, sequence.to_vec());
                }
                for (from, to) in self.edges_of(node_id) {
                    for next in [support::node_id(from), support::node_id(to)] {
                        if visited.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
            // All endpoints have been added by now.
            for node_id in component.nodes.keys().copied().collect::<Vec<usize>>() {
                for (from, to) in self.edges_of(node_id) {
                    component.insert_canonical_edge(from, to);
                }
            }
            result.push(component);
        }

        result
    }
}

//-----------------------------------------------------------------------------

/// Nodes.
impl Graph {
    /// Returns the number of nodes in the graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if the graph contains the given node.
    #[inline]
    pub fn has_node(&self, node_id: usize) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Returns the sequence of the given node, or [`None`] if there is no such node.
    #[inline]
    pub fn sequence(&self, node_id: usize) -> Option<&[u8]> {
        self.nodes.get(&node_id).map(|x| x.as_slice())
    }

    /// Returns the largest node identifier in the graph, or [`None`] if the graph is empty.
    pub fn max_node(&self) -> Option<usize> {
        self.nodes.keys().next_back().copied()
    }

    /// Returns an iterator over the node identifiers in sorted order.
    pub fn node_iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.keys().copied()
    }

    /// Adds a node with the given sequence to the graph.
    ///
    /// Returns `false` and leaves the graph unchanged if the node already exists.
    pub fn add_node(&mut self, node_id: usize, sequence: Vec<u8>) -> bool {
        if self.has_node(node_id) {
            return false;
        }
        self.nodes.insert(node_id, sequence);
        true
    }

    /// Removes the given node and all edges incident to it.
    ///
    /// Returns `false` if the node did not exist.
    pub fn remove_node(&mut self, node_id: usize) -> bool {
        if self.nodes.remove(&node_id).is_none() {
            return false;
        }
        if let Some(incident) = self.adjacency.remove(&node_id) {
            for (from, to) in incident {
                self.edges.remove(&(from, to));
                for other in [support::node_id(from), support::node_id(to)] {
                    if other != node_id {
                        if let Some(edges) = self.adjacency.get_mut(&other) {
                            edges.remove(&(from, to));
                        }
                    }
                }
            }
        }
        true
    }
}

//-----------------------------------------------------------------------------

/// Edges.
impl Graph {
    /// Returns the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph contains an edge from handle `from` to handle `to`.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges.contains(&canonical_edge(from, to))
    }

    /// Adds an edge from handle `from` to handle `to`.
    ///
    /// Returns `true` if the edge was added and `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not in the graph.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<bool, String> {
        for handle in [from, to] {
            if !self.has_node(support::node_id(handle)) {
                return Err(format!(
                    "Cannot add edge ({}, {}): node {} is not in the graph",
                    support::node_id(from), support::node_id(to), support::node_id(handle)
                ));
            }
        }
        let (from, to) = canonical_edge(from, to);
        Ok(self.insert_canonical_edge(from, to))
    }

    /// Removes the edge from handle `from` to handle `to`.
    ///
    /// Returns `false` if the edge did not exist.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> bool {
        let edge = canonical_edge(from, to);
        if !self.edges.remove(&edge) {
            return false;
        }
        for node_id in [support::node_id(edge.0), support::node_id(edge.1)] {
            if let Some(edges) = self.adjacency.get_mut(&node_id) {
                edges.remove(&edge);
            }
        }
        true
    }

    /// Returns an iterator over the canonical edges in sorted order.
    pub fn edge_iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Returns the canonical edges incident to the given node.
    pub fn edges_of(&self, node_id: usize) -> Vec<(usize, usize)> {
        self.adjacency.get(&node_id).map(|edges| edges.iter().copied().collect()).unwrap_or_default()
    }

    /// Returns the handles that can follow the given handle.
    ///
    /// The successors are listed in the order of the canonical edges.
    pub fn successors(&self, handle: usize) -> Vec<usize> {
        let mut result = Vec::new();
        if let Some(edges) = self.adjacency.get(&support::node_id(handle)) {
            for (from, to) in edges.iter() {
                if *from == handle {
                    result.push(*to);
                } else if support::flip_node(*to) == handle {
                    result.push(support::flip_node(*from));
                }
            }
        }
        result
    }

    // Inserts an edge that is known to be canonical.
    fn insert_canonical_edge(&mut self, from: usize, to: usize) -> bool {
        if !self.edges.insert((from, to)) {
            return false;
        }
        self.adjacency.entry(support::node_id(from)).or_default().insert((from, to));
        self.adjacency.entry(support::node_id(to)).or_default().insert((from, to));
        true
    }
}

//-----------------------------------------------------------------------------

/// Output.
impl Graph {
    /// Writes the graph in the GFA format.
    ///
    /// Nodes are written as segment lines in the order of node identifiers, followed by links for the canonical edges.
    /// The given paths are written as path lines.
    ///
    /// # Errors
    ///
    /// Passes through any I/O errors.
    pub fn write_gfa<T: Write>(&self, paths: &[(String, Vec<usize>)], output: &mut T) -> io::Result<()> {
        formats::write_gfa_header(output)?;
        for (node_id, sequence) in self.nodes.iter() {
            formats::write_gfa_node(*node_id, sequence, output)?;
        }
        for (from, to) in self.edges.iter() {
            formats::write_gfa_edge(support::decode_node(*from), support::decode_node(*to), output)?;
        }
        for (name, path) in paths.iter() {
            formats::write_gfa_path(name, path, output)?;
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------
