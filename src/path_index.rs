//! An index for reference paths and the node sequences they visit.
//!
//! The index stores the nodes of the full graph, so that nodes missing from a pruned graph can be restored with their sequences.

use crate::Graph;

use gbwt::{GBZ, GBWT, Orientation, FullPathName, REF_SAMPLE};
use gbwt::support;

use std::collections::{BTreeMap, HashMap};


//-----------------------------------------------------------------------------

/// An index for named reference paths over a set of nodes with sequences.
///
/// Paths are identified by their ranks in the index.
/// The ranks range from 0 to `path_count() - 1` in the order the paths were added.
/// A path is a sequence of handles (see [`gbwt::support::encode_node`]), and every node it visits must be in the index.
/// The index also records the offsets at which each node occurs on each path.
///
/// # Examples
///
/// ```
/// use gbz_unfold::PathIndex;
/// use gbwt::{GBZ, Orientation};
/// use gbwt::support;
/// use simple_sds::serialize;
///
/// let filename = support::get_test_data("example.gbz");
/// let graph: GBZ = serialize::load_from(&filename).unwrap();
/// let path_index = PathIndex::from_gbz(&graph).unwrap();
///
/// // We have two components with one generic path in each.
/// assert_eq!(path_index.path_count(), 2);
/// let rank = path_index.find_path("A").unwrap();
/// assert_eq!(path_index.path_name(rank), Some("A"));
///
/// // The path starts from node 11 in forward orientation.
/// let path = path_index.path(rank).unwrap();
/// assert_eq!(path[0], support::encode_node(11, Orientation::Forward));
/// assert_eq!(path_index.occurrences(11, rank), &[0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathIndex {
    // Node identifier to sequence.
    sequences: BTreeMap<usize, Vec<u8>>,

    // Path names by rank.
    names: Vec<String>,

    // Path name to rank.
    name_to_rank: HashMap<String, usize>,

    // Path contents by rank.
    paths: Vec<Vec<usize>>,

    // Node identifier to the offsets of its occurrences on the path, by rank.
    occurrences: Vec<HashMap<usize, Vec<usize>>>,
}

//-----------------------------------------------------------------------------

/// Construction.
impl PathIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with the nodes of the given graph and the given paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be added.
    /// See [`PathIndex::add_path`].
    pub fn from_graph(graph: &Graph, paths: &[(String, Vec<usize>)]) -> Result<Self, String> {
        let mut result = PathIndex::new();
        for node_id in graph.node_iter() {
            let sequence = graph.sequence(node_id).unwrap_or(&[]);
            result.add_node(node_id, sequence.to_vec());
        }
        for (name, path) in paths.iter() {
            result.add_path(name, path.clone())?;
        }
        Ok(result)
    }

    // Distance between reference positions when selecting reference paths.
    const REFERENCE_INTERVAL: usize = 1000;

    /// Returns the identifiers of the reference paths in the GBZ graph in increasing order.
    ///
    /// Reference paths are generic paths (sample name [`REF_SAMPLE`]) and paths of the samples listed in GBWT tag `reference_samples`.
    pub fn reference_paths(graph: &GBZ) -> Vec<usize> {
        let mut result: Vec<usize> = graph.reference_positions(Self::REFERENCE_INTERVAL, false).iter().map(|path| path.id).collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Returns the name used for the path in the index.
    ///
    /// Generic paths are named by their contig names.
    /// Other paths use PanSN names `sample#haplotype#contig`, followed by `[fragment]` for nonzero fragments.
    pub fn path_name_for(name: &FullPathName) -> String {
        if name.sample == REF_SAMPLE {
            return name.contig.clone();
        }
        let mut result = format!("{}#{}#{}", name.sample, name.haplotype, name.contig);
        if name.fragment > 0 {
            result.push_str(&format!("[{}]", name.fragment));
        }
        result
    }

    /// Creates an index with the nodes and the reference paths of the given GBZ graph.
    ///
    /// See [`PathIndex::reference_paths`] for the selected paths and [`PathIndex::path_name_for`] for their names.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata for a path is missing or if two paths have the same name.
    pub fn from_gbz(graph: &GBZ) -> Result<Self, String> {
        Self::from_gbz_paths(graph, &Self::reference_paths(graph))
    }

    /// Creates an index with the nodes and the given paths of the given GBZ graph.
    ///
    /// If the graph has no path metadata, the index contains only the nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata for a path is missing or if two paths have the same name.
    pub fn from_gbz_paths(graph: &GBZ, path_ids: &[usize]) -> Result<Self, String> {
        let mut result = PathIndex::new();
        for node_id in graph.node_iter() {
            let sequence = graph.sequence(node_id).unwrap_or(&[]);
            result.add_node(node_id, sequence.to_vec());
        }

        let metadata = match graph.metadata() {
            Some(metadata) => metadata,
            None => return Ok(result),
        };
        let index: &GBWT = graph.as_ref();
        for path_id in path_ids.iter().copied() {
            let path_name = FullPathName::from_metadata(metadata, path_id).ok_or(
                format!("Cannot find metadata for path {}", path_id)
            )?;
            let mut path: Vec<usize> = Vec::new();
            let mut pos = index.start(support::encode_path(path_id, Orientation::Forward));
            while let Some(p) = pos {
                path.push(p.node);
                pos = index.forward(p);
            }
            result.add_path(&Self::path_name_for(&path_name), path)?;
        }

        Ok(result)
    }

    /// Adds a node with the given sequence to the index.
    ///
    /// Returns `false` and leaves the index unchanged if the node already exists.
    pub fn add_node(&mut self, node_id: usize, sequence: Vec<u8>) -> bool {
        if self.has_node(node_id) {
            return false;
        }
        self.sequences.insert(node_id, sequence);
        true
    }

    /// Adds a named path to the index and returns its rank.
    ///
    /// # Errors
    ///
    /// Returns an error if a path with the same name already exists or if the path visits a node that is not in the index.
    pub fn add_path(&mut self, name: &str, path: Vec<usize>) -> Result<usize, String> {
        if self.name_to_rank.contains_key(name) {
            return Err(format!("Duplicate path name {}", name));
        }
        let mut occurrences: HashMap<usize, Vec<usize>> = HashMap::new();
        for (offset, handle) in path.iter().enumerate() {
            let node_id = support::node_id(*handle);
            if !self.has_node(node_id) {
                return Err(format!("Path {} visits nonexistent node {}", name, node_id));
            }
            occurrences.entry(node_id).or_default().push(offset);
        }

        let rank = self.paths.len();
        self.names.push(name.to_string());
        self.name_to_rank.insert(name.to_string(), rank);
        self.paths.push(path);
        self.occurrences.push(occurrences);
        Ok(rank)
    }
}

//-----------------------------------------------------------------------------

/// Nodes.
impl PathIndex {
    /// Returns the number of nodes in the index.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns `true` if the index contains the given node.
    #[inline]
    pub fn has_node(&self, node_id: usize) -> bool {
        self.sequences.contains_key(&node_id)
    }

    /// Returns the sequence of the given node, or [`None`] if there is no such node.
    #[inline]
    pub fn sequence(&self, node_id: usize) -> Option<&[u8]> {
        self.sequences.get(&node_id).map(|x| x.as_slice())
    }

    /// Returns the largest node identifier in the index, or 0 if the index is empty.
    pub fn max_node(&self) -> usize {
        self.sequences.keys().next_back().copied().unwrap_or(0)
    }
}

//-----------------------------------------------------------------------------

/// Paths.
impl PathIndex {
    /// Returns the number of paths in the index.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Returns the name of the path with the given rank, or [`None`] if there is no such path.
    #[inline]
    pub fn path_name(&self, rank: usize) -> Option<&str> {
        self.names.get(rank).map(|x| x.as_str())
    }

    /// Returns the rank of the path with the given name, or [`None`] if there is no such path.
    #[inline]
    pub fn find_path(&self, name: &str) -> Option<usize> {
        self.name_to_rank.get(name).copied()
    }

    /// Returns the path with the given rank as a sequence of handles, or [`None`] if there is no such path.
    #[inline]
    pub fn path(&self, rank: usize) -> Option<&[usize]> {
        self.paths.get(rank).map(|x| x.as_slice())
    }

    /// Returns the offsets at which the given node occurs on the path with the given rank.
    ///
    /// The offsets are in increasing order.
    /// Returns an empty slice if the node does not occur on the path or if there is no such path.
    pub fn occurrences(&self, node_id: usize, rank: usize) -> &[usize] {
        self.occurrences.get(rank).and_then(|x| x.get(&node_id)).map(|x| x.as_slice()).unwrap_or(&[])
    }

    /// Returns an iterator over the (name, path) pairs in rank order.
    pub fn path_iter(&self) -> impl Iterator<Item = (&str, &[usize])> + '_ {
        self.names.iter().map(|x| x.as_str()).zip(self.paths.iter().map(|x| x.as_slice()))
    }
}

//-----------------------------------------------------------------------------
