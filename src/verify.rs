//! Verifying that paths in the original graph can be found in an unfolded graph.
//!
//! Unfolding replaces some nodes with one or more duplicates.
//! A path over original nodes is present in the unfolded graph if we can replace each node with a duplicate (or the node itself, if it is still in the graph) so that all consecutive nodes are connected by edges.
//! [`PathVerifier`] checks this with a branching search, and [`verify_paths`] checks all reference paths and haplotypes in parallel.

use crate::{Graph, HaplotypeIndex, NodeMapping, PathIndex};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use gbwt::support;

use rayon::prelude::*;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

// A partial match of a path in the unfolded graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PathBranch {
    // Offset in the path.
    offset: usize,
    // Candidate to use at `offset`.
    curr: usize,
    // Candidate to try at `offset + 1`.
    next: usize,
}

impl PathBranch {
    fn new(offset: usize, curr: usize, next: usize) -> Self {
        PathBranch { offset, curr, next }
    }

    fn advance(&mut self) {
        self.offset += 1;
        self.curr = self.next;
        self.next = 0;
    }
}

//-----------------------------------------------------------------------------

/// Checks whether paths over original node identifiers exist in an unfolded graph.
///
/// # Examples
///
/// ```
/// use gbz_unfold::{Graph, NodeMapping, PathVerifier};
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// // Node 2 has been replaced with duplicates 3 and 4.
/// let mut mapping = NodeMapping::new(2);
/// assert_eq!(mapping.insert(2), 3);
/// assert_eq!(mapping.insert(2), 4);
///
/// let mut graph = Graph::new();
/// for node_id in [1, 3, 4] {
///     graph.add_node(node_id, b"A".to_vec());
/// }
/// let handle = |id| support::encode_node(id, Orientation::Forward);
/// graph.add_edge(handle(4), handle(1)).unwrap();
///
/// let verifier = PathVerifier::new(&graph, &mapping);
/// assert!(verifier.verify_path(&[handle(2), handle(1)]));
/// assert!(!verifier.verify_path(&[handle(1), handle(2)]));
/// ```
#[derive(Clone, Debug)]
pub struct PathVerifier<'a> {
    graph: &'a Graph,

    // Original node identifier to candidate identifiers in the unfolded graph.
    reverse_mapping: HashMap<usize, Vec<usize>>,
}

impl<'a> PathVerifier<'a> {
    /// Creates a verifier for the given unfolded graph.
    ///
    /// The candidates for an original node are all of its duplicates in the mapping, as well as the node itself if it is still in the graph.
    /// Nodes without duplicates are used as such.
    pub fn new(graph: &'a Graph, mapping: &NodeMapping) -> Self {
        let mut reverse_mapping: HashMap<usize, Vec<usize>> = HashMap::new();
        for (duplicate, original) in mapping.iter() {
            let candidates = reverse_mapping.entry(original).or_default();
            candidates.push(duplicate);
            if graph.has_node(original) {
                candidates.push(original);
            }
        }
        for candidates in reverse_mapping.values_mut() {
            candidates.sort_unstable();
            candidates.dedup();
        }
        PathVerifier { graph, reverse_mapping }
    }

    /// Returns the candidates for the given original node, or [`None`] if the node has no duplicates.
    pub fn candidates(&self, node_id: usize) -> Option<&[usize]> {
        self.reverse_mapping.get(&node_id).map(|x| x.as_slice())
    }

    // Returns the handle for the given candidate of the original handle.
    fn resolve(&self, handle: usize, candidate: usize) -> usize {
        let node_id = support::node_id(handle);
        let resolved = self.candidates(node_id).and_then(|x| x.get(candidate).copied()).unwrap_or(node_id);
        support::encode_node(resolved, support::node_orientation(handle))
    }

    /// Returns `true` if the path over original handles exists in the unfolded graph.
    ///
    /// Paths of length 0 or 1 are always considered present.
    pub fn verify_path(&self, path: &[usize]) -> bool {
        if path.len() < 2 {
            return true;
        }

        let mut branches: Vec<PathBranch> = Vec::new();
        let first_candidates = self.candidates(support::node_id(path[0])).map(|x| x.len()).unwrap_or(1);
        for candidate in 0..first_candidates {
            branches.push(PathBranch::new(0, candidate, 0));
        }

        while let Some(mut branch) = branches.pop() {
            let mut curr = self.resolve(path[branch.offset], branch.curr);
            while branch.offset + 1 < path.len() {
                let next_handle = path[branch.offset + 1];
                let duplicates = self.candidates(support::node_id(next_handle)).map(|x| x.len()).unwrap_or(0);
                if branch.next + 1 < duplicates {
                    branches.push(PathBranch::new(branch.offset, branch.curr, branch.next + 1));
                }
                let next = self.resolve(next_handle, branch.next);
                if !self.graph.has_edge(curr, next) {
                    break;
                }
                // Every match continuing from here must use this node.
                if duplicates <= 1 {
                    branches.clear();
                }
                curr = next;
                branch.advance();
            }
            if branch.offset + 1 >= path.len() {
                return true;
            }
        }

        false
    }
}

//-----------------------------------------------------------------------------

// Print progress after verifying this many paths.
const PROGRESS_INTERVAL: usize = 1000;

/// Verifies all reference paths and haplotype sequences against the unfolded graph.
///
/// Returns the number of paths that could not be found in the graph.
/// The paths are verified independently using a pool of `threads` worker threads.
///
/// # Arguments
///
/// * `path_index`: Reference paths.
/// * `haplotypes`: Haplotype index.
/// * `mapping`: Mapping from duplicate node identifiers to original identifiers.
/// * `graph`: The unfolded graph.
/// * `threads`: Number of worker threads.
/// * `verbose`: Print progress information to stderr.
///
/// # Errors
///
/// Returns an error if the thread pool cannot be created.
pub fn verify_paths<H: HaplotypeIndex + Sync>(
    path_index: &PathIndex, haplotypes: &H, mapping: &NodeMapping,
    graph: &Graph, threads: usize, verbose: bool
) -> Result<usize, String> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|x| x.to_string())?;

    let verifier = PathVerifier::new(graph, mapping);
    let reference_paths = path_index.path_count();
    let total_paths = reference_paths + haplotypes.sequences();
    if verbose {
        eprintln!("Verifying {} paths using {} threads", total_paths, pool.current_num_threads());
    }

    let verified = AtomicUsize::new(0);
    let failures = AtomicUsize::new(0);
    pool.install(|| {
        (0..total_paths).into_par_iter().for_each(|i| {
            let successful = if i < reference_paths {
                verifier.verify_path(path_index.path(i).unwrap_or(&[]))
            } else {
                verifier.verify_path(&haplotypes.extract(i - reference_paths))
            };
            if !successful {
                failures.fetch_add(1, Ordering::Relaxed);
            }
            let done = verified.fetch_add(1, Ordering::Relaxed) + 1;
            if verbose && done % PROGRESS_INTERVAL == 0 {
                eprintln!("Verified {} / {} paths", done, total_paths);
            }
        });
    });

    let failures = failures.into_inner();
    if verbose {
        eprintln!("Verified {} paths: {} failures", total_paths, failures);
    }
    Ok(failures)
}

//-----------------------------------------------------------------------------
