//! Phase unfolding: restoring the paths of a pruned graph without reintroducing its complex regions.
//!
//! A graph is often pruned before building an index, by removing high-degree nodes and regions with too many paths.
//! Pruning also removes parts of reference paths and haplotypes.
//! [`PhaseUnfolder`] adds them back in an acyclic form:
//!
//! 1. The complement graph consists of the edges used by the paths and the haplotypes but missing from the pruned graph.
//!    See [`PhaseUnfolder::complement_components`].
//! 2. For each connected component of the complement, we list all maximal walks starting from border nodes, which are also present in the pruned graph.
//!    See [`walks::path_walks`] and [`walks::thread_walks`].
//! 3. The walks are merged into prefix and suffix tries, where all internal nodes are new duplicates of the original nodes.
//!    See [`trie::Tries`].
//! 4. The tries of all components are added to the pruned graph.
//!
//! The duplicates are recorded in a [`NodeMapping`].
//! [`PhaseUnfolder::verify_paths`] can then check that all paths are present in the unfolded graph.

use crate::{verify, Graph, HaplotypeIndex, NodeMapping, PathIndex};

use std::collections::BTreeSet;
use std::path::Path;

use gbwt::support;

pub mod trie;
pub mod walks;

use trie::Tries;


//-----------------------------------------------------------------------------

/// Phase unfolding for a pruned graph based on reference paths and haplotypes.
///
/// The unfolder assumes that the pruned graph is a subgraph of the full graph stored in the path index.
/// New node identifiers are allocated from a [`NodeMapping`], which persists over multiple calls to [`PhaseUnfolder::unfold`] and can be saved and loaded.
///
/// # Examples
///
/// ```
/// use gbz_unfold::{Graph, HaplotypeSet, PathIndex, PhaseUnfolder};
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// let handle = |id| support::encode_node(id, Orientation::Forward);
///
/// // Path 1 2 3 4 in the full graph.
/// let mut path_index = PathIndex::new();
/// for node_id in 1..=4 {
///     path_index.add_node(node_id, b"GA".to_vec());
/// }
/// path_index.add_path("ref", vec![handle(1), handle(2), handle(3), handle(4)]).unwrap();
/// let haplotypes = HaplotypeSet::new(Vec::new());
///
/// // The pruned graph has only nodes 1 and 4.
/// let mut graph = Graph::new();
/// graph.add_node(1, b"GA".to_vec());
/// graph.add_node(4, b"GA".to_vec());
///
/// let mut unfolder = PhaseUnfolder::new(&path_index, &haplotypes, 5).unwrap();
/// let paths = unfolder.unfold(&mut graph, false).unwrap();
/// assert_eq!(paths, 1);
///
/// // Nodes 2 and 3 were restored as duplicates 5 and 6.
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(unfolder.get_mapping(5), 2);
/// assert_eq!(unfolder.get_mapping(6), 3);
/// assert!(graph.has_edge(handle(1), handle(5)));
/// assert!(graph.has_edge(handle(5), handle(6)));
/// assert!(graph.has_edge(handle(6), handle(4)));
/// assert_eq!(unfolder.verify_paths(&graph, 1, false), Ok(0));
/// ```
pub struct PhaseUnfolder<'a, H: HaplotypeIndex> {
    path_index: &'a PathIndex,
    haplotypes: &'a H,
    mapping: NodeMapping,
}

//-----------------------------------------------------------------------------

/// Construction and the node mapping.
impl<'a, H: HaplotypeIndex> PhaseUnfolder<'a, H> {
    /// Creates a new unfolder.
    ///
    /// # Arguments
    ///
    /// * `path_index`: Reference paths and the nodes of the full graph.
    /// * `haplotypes`: Haplotype index.
    /// * `next_node`: The first node identifier used for duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if `next_node` is not larger than any node identifier in the path index.
    pub fn new(path_index: &'a PathIndex, haplotypes: &'a H, next_node: usize) -> Result<Self, String> {
        let mapping = NodeMapping::with_first_id(next_node, path_index.max_node())?;
        Ok(PhaseUnfolder { path_index, haplotypes, mapping })
    }

    /// Returns the mapping from duplicate node identifiers to original identifiers.
    #[inline]
    pub fn mapping(&self) -> &NodeMapping {
        &self.mapping
    }

    /// Returns the original identifier for the given node identifier.
    #[inline]
    pub fn get_mapping(&self, node_id: usize) -> usize {
        self.mapping.map(node_id)
    }

    /// Replaces the node mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping is not valid for the nodes in the path index.
    /// The current mapping is left unchanged in that case.
    pub fn set_mapping(&mut self, mapping: NodeMapping) -> Result<(), String> {
        mapping.check(self.path_index.max_node())?;
        self.mapping = mapping;
        Ok(())
    }

    /// Replaces the node mapping with the one stored in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the mapping is not valid for the nodes in the path index.
    /// The current mapping is left unchanged in that case.
    pub fn read_mapping<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), String> {
        let mapping = NodeMapping::load_from(filename, self.path_index.max_node())?;
        self.mapping = mapping;
        Ok(())
    }

    /// Checks that the graph is compatible with the path index and the node mapping.
    ///
    /// Every node in the graph must be either a node of the path index or a duplicate in the mapping.
    /// This holds for a pruned graph and for a graph unfolded earlier with the same mapping.
    ///
    /// # Errors
    ///
    /// Returns an error for the first node that fails the check.
    pub fn check_graph(&self, graph: &Graph) -> Result<(), String> {
        let duplicates = self.mapping.duplicates();
        for node_id in graph.node_iter() {
            if !self.path_index.has_node(node_id) && !duplicates.contains(&node_id) {
                return Err(format!(
                    "Node {} is neither in the full graph nor a duplicate in the range {}..{}",
                    node_id, duplicates.start, duplicates.end
                ));
            }
        }
        Ok(())
    }

    /// Writes the node mapping to the file.
    ///
    /// # Errors
    ///
    /// Passes through any I/O errors.
    pub fn write_mapping<P: AsRef<Path>>(&self, filename: P) -> Result<(), String> {
        self.mapping.save_to(filename)
    }
}

//-----------------------------------------------------------------------------

/// Unfolding.
impl<'a, H: HaplotypeIndex> PhaseUnfolder<'a, H> {
    // Adds the node to the graph with the sequence of the original node.
    fn insert_node(&self, graph: &mut Graph, node_id: usize) -> Result<(), String> {
        if graph.has_node(node_id) {
            return Ok(());
        }
        let original = self.mapping.map(node_id);
        let sequence = self.path_index.sequence(original).ok_or(
            format!("Cannot find the sequence for node {} (original node {})", node_id, original)
        )?;
        graph.add_node(node_id, sequence.to_vec());
        Ok(())
    }

    // Adds the edge and its endpoints to `target`, if the edge is not in `graph`.
    fn add_missing_edge(&self, graph: &Graph, target: &mut Graph, from: usize, to: usize) -> Result<(), String> {
        if graph.has_edge(from, to) {
            return Ok(());
        }
        self.insert_node(target, support::node_id(from))?;
        self.insert_node(target, support::node_id(to))?;
        target.add_edge(from, to)?;
        Ok(())
    }

    /// Returns the connected components of the complement graph.
    ///
    /// The complement graph contains the edges used by reference paths and haplotypes but missing from the graph, as well as their endpoints.
    /// Node sequences are taken from the path index.
    ///
    /// # Errors
    ///
    /// Returns an error if a path or a haplotype visits a node that is not in the path index.
    pub fn complement_components(&self, graph: &Graph, verbose: bool) -> Result<Vec<Graph>, String> {
        let mut complement = Graph::new();

        for (_, path) in self.path_index.path_iter() {
            for window in path.windows(2) {
                self.add_missing_edge(graph, &mut complement, window[0], window[1])?;
            }
        }

        for handle in self.haplotypes.alphabet() {
            for next in self.haplotypes.successors(handle) {
                self.add_missing_edge(graph, &mut complement, handle, next)?;
            }
        }

        let components = complement.components();
        if verbose {
            eprintln!(
                "Complement graph: {} nodes, {} edges in {} components",
                complement.node_count(), complement.edge_count(), components.len()
            );
        }
        Ok(components)
    }

    /// Unfolds the paths and haplotypes missing from the graph and adds them to the graph.
    ///
    /// Returns the number of distinct border-to-border walks that were unfolded.
    ///
    /// # Errors
    ///
    /// Returns an error if a path or a haplotype visits a node that is not in the path index.
    /// The graph is left unchanged in that case, but the mapping may contain new duplicates.
    pub fn unfold(&mut self, graph: &mut Graph, verbose: bool) -> Result<usize, String> {
        let components = self.complement_components(graph, verbose)?;

        let mut unfolded = Graph::new();
        let mut haplotype_paths = 0;
        for component in components.iter() {
            haplotype_paths += self.unfold_component(component, graph, &mut unfolded)?;
        }
        if verbose {
            eprintln!(
                "Unfolded graph: {} nodes, {} edges on {} paths",
                unfolded.node_count(), unfolded.edge_count(), haplotype_paths
            );
        }

        graph.extend(&unfolded);
        Ok(haplotype_paths)
    }

    /// Unfolds a single component of the complement graph into `unfolded`.
    ///
    /// Returns the number of distinct border-to-border walks in the component.
    ///
    /// # Arguments
    ///
    /// * `component`: A connected component of the complement graph.
    /// * `graph`: The pruned graph.
    /// * `unfolded`: Graph for the unfolded components.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence of a node cannot be found in the path index.
    pub fn unfold_component(&mut self, component: &Graph, graph: &Graph, unfolded: &mut Graph) -> Result<usize, String> {
        let border: BTreeSet<usize> = component.node_iter().filter(|node_id| graph.has_node(*node_id)).collect();

        let mut tries = Tries::new();
        for from in border.iter() {
            for walk in walks::path_walks(self.path_index, component, &border, *from) {
                tries.insert(&walk, &mut self.mapping);
            }
            for walk in walks::thread_walks(self.haplotypes, component, &border, *from) {
                tries.insert(&walk, &mut self.mapping);
            }
        }

        for (from, to) in tries.edges() {
            self.insert_node(unfolded, support::node_id(from))?;
            self.insert_node(unfolded, support::node_id(to))?;
            unfolded.add_edge(from, to)?;
        }

        Ok(tries.walks())
    }

    /// Adds the edges of the reference paths missing from the graph, instead of unfolding them.
    ///
    /// Missing nodes are added with their original identifiers.
    /// Haplotypes are not considered.
    ///
    /// # Errors
    ///
    /// Returns an error if a path visits a node that is not in the path index.
    pub fn restore_paths(&self, graph: &mut Graph, verbose: bool) -> Result<(), String> {
        let mut restored = Graph::new();
        for (_, path) in self.path_index.path_iter() {
            for window in path.windows(2) {
                self.add_missing_edge(graph, &mut restored, window[0], window[1])?;
            }
        }
        graph.extend(&restored);

        if verbose {
            eprintln!("Restored graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

/// Verification.
impl<'a, H: HaplotypeIndex + Sync> PhaseUnfolder<'a, H> {
    /// Verifies that all reference paths and haplotypes are present in the unfolded graph.
    ///
    /// Returns the number of paths that could not be found.
    /// See [`verify::verify_paths`] for details.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn verify_paths(&self, graph: &Graph, threads: usize, verbose: bool) -> Result<usize, String> {
        verify::verify_paths(self.path_index, self.haplotypes, &self.mapping, graph, threads, verbose)
    }
}

//-----------------------------------------------------------------------------
