// Shared helpers for tests.

use crate::{Graph, HaplotypeSet, PathIndex};

use gbwt::{GBZ, Orientation};
use gbwt::support;

use rand::{thread_rng, Rng};

use simple_sds::serialize;

//-----------------------------------------------------------------------------

pub(crate) fn forward(node_id: usize) -> usize {
    support::encode_node(node_id, Orientation::Forward)
}

pub(crate) fn reverse(node_id: usize) -> usize {
    support::encode_node(node_id, Orientation::Reverse)
}

// Sequence of node `i` is `i` copies of a base determined by `i`.
pub(crate) fn node_sequence(node_id: usize) -> Vec<u8> {
    let bases = b"ACGT";
    vec![bases[node_id % bases.len()]; node_id]
}

pub(crate) fn create_graph(nodes: &[usize], edges: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new();
    for node_id in nodes {
        graph.add_node(*node_id, node_sequence(*node_id));
    }
    for (from, to) in edges {
        let result = graph.add_edge(*from, *to);
        assert!(result.is_ok(), "Failed to add edge ({}, {}): {}", from, to, result.unwrap_err());
    }
    graph
}

pub(crate) fn create_path_index(nodes: usize, paths: &[(&str, Vec<usize>)]) -> PathIndex {
    let mut path_index = PathIndex::new();
    for node_id in 1..=nodes {
        path_index.add_node(node_id, node_sequence(node_id));
    }
    for (name, path) in paths {
        let result = path_index.add_path(name, path.clone());
        assert!(result.is_ok(), "Failed to add path {}: {}", name, result.unwrap_err());
    }
    path_index
}

//-----------------------------------------------------------------------------

// Test case: one reference path through two pruned nodes.
// Full graph: 1 -> 2 -> 3 -> 4; pruned graph: nodes 1 and 4 with edge 1 -> 4.
pub(crate) fn single_path_case() -> (PathIndex, HaplotypeSet, Graph) {
    let path = vec![forward(1), forward(2), forward(3), forward(4)];
    let path_index = create_path_index(4, &[("ref", path)]);
    let haplotypes = HaplotypeSet::new(Vec::new());
    let graph = create_graph(&[1, 4], &[(forward(1), forward(4))]);
    (path_index, haplotypes, graph)
}

// Test case: two haplotypes sharing a prefix.
// Haplotypes: 1 -> 2 -> 3 -> 4 and 1 -> 2 -> 3 -> 5; pruned graph: nodes 1, 4, and 5.
pub(crate) fn shared_prefix_case() -> (PathIndex, HaplotypeSet, Graph) {
    let path_index = create_path_index(5, &[]);
    let haplotypes = HaplotypeSet::new(vec![
        vec![forward(1), forward(2), forward(3), forward(4)],
        vec![forward(1), forward(2), forward(3), forward(5)],
    ]);
    let graph = create_graph(&[1, 4, 5], &[]);
    (path_index, haplotypes, graph)
}

//-----------------------------------------------------------------------------

pub(crate) fn load_gbz(filename: &'static str) -> GBZ {
    let gbz_file = support::get_test_data(filename);
    let graph = serialize::load_from(&gbz_file);
    if let Err(err) = graph {
        panic!("Failed to load GBZ graph from {}: {}", gbz_file.display(), err);
    }
    graph.unwrap()
}

// Returns a random walk of the given length over handles of nodes `1..=nodes`.
pub(crate) fn random_walk(nodes: usize, len: usize) -> Vec<usize> {
    let mut rng = thread_rng();
    (0..len).map(|_| {
        let node_id = rng.gen_range(1..=nodes);
        if rng.gen_bool(0.5) { forward(node_id) } else { reverse(node_id) }
    }).collect()
}

//-----------------------------------------------------------------------------
