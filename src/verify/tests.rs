use super::*;

use crate::internal::{forward, reverse, create_graph};

use crate::HaplotypeSet;

//-----------------------------------------------------------------------------

// Original nodes 1 to 3; node 2 has been replaced with duplicates 4 and 5.
fn duplicated_mapping() -> NodeMapping {
    let mut mapping = NodeMapping::new(3);
    assert_eq!(mapping.insert(2), 4, "Wrong first duplicate");
    assert_eq!(mapping.insert(2), 5, "Wrong second duplicate");
    mapping
}

//-----------------------------------------------------------------------------

#[test]
fn candidates() {
    let mapping = duplicated_mapping();
    let graph = create_graph(&[1, 3, 4, 5], &[]);
    let verifier = PathVerifier::new(&graph, &mapping);
    assert_eq!(verifier.candidates(2), Some([4, 5].as_slice()), "Wrong candidates for a replaced node");
    assert!(verifier.candidates(1).is_none(), "Found candidates for a node without duplicates");

    // The original node is still in the graph.
    let graph = create_graph(&[1, 2, 3, 4, 5], &[]);
    let verifier = PathVerifier::new(&graph, &mapping);
    assert_eq!(verifier.candidates(2), Some([2, 4, 5].as_slice()), "Wrong candidates for a kept node");
}

#[test]
fn trivial_paths() {
    let mapping = NodeMapping::new(3);
    let graph = Graph::new();
    let verifier = PathVerifier::new(&graph, &mapping);
    assert!(verifier.verify_path(&[]), "Empty path was not verified");
    assert!(verifier.verify_path(&[forward(7)]), "Single-node path was not verified");
    assert!(!verifier.verify_path(&[forward(1), forward(2)]), "Verified a path in an empty graph");
}

#[test]
fn backtracking() {
    let mapping = duplicated_mapping();
    // Only the second duplicate continues to node 3.
    let graph = create_graph(&[1, 3, 4, 5], &[
        (forward(1), forward(4)),
        (forward(1), forward(5)),
        (forward(5), forward(3)),
    ]);
    let verifier = PathVerifier::new(&graph, &mapping);
    assert!(verifier.verify_path(&[forward(1), forward(2), forward(3)]), "Failed to find 1 2 3");
    assert!(verifier.verify_path(&[reverse(3), reverse(2), reverse(1)]), "Failed to find the reverse of 1 2 3");
    assert!(verifier.verify_path(&[forward(1), forward(2)]), "Failed to find 1 2");
    assert!(!verifier.verify_path(&[forward(2), forward(1)]), "Found 2 1");
    assert!(!verifier.verify_path(&[forward(1), forward(2), reverse(3)]), "Found 1 2 3-");
}

#[test]
fn first_node_duplicated() {
    let mapping = duplicated_mapping();
    let graph = create_graph(&[1, 3, 4, 5], &[
        (forward(4), forward(1)),
        (forward(5), forward(3)),
    ]);
    let verifier = PathVerifier::new(&graph, &mapping);
    assert!(verifier.verify_path(&[forward(2), forward(1)]), "Failed to find 2 1");
    assert!(verifier.verify_path(&[forward(2), forward(3)]), "Failed to find 2 3");
    assert!(!verifier.verify_path(&[forward(2), forward(1), forward(3)]), "Found 2 1 3");
}

#[test]
fn repeated_nodes() {
    // Node 2 is visited twice, through different duplicates.
    let mapping = duplicated_mapping();
    let graph = create_graph(&[1, 3, 4, 5], &[
        (forward(1), forward(4)),
        (forward(4), forward(3)),
        (forward(3), forward(5)),
        (forward(5), forward(1)),
    ]);
    let verifier = PathVerifier::new(&graph, &mapping);
    let path = vec![forward(1), forward(2), forward(3), forward(2), forward(1)];
    assert!(verifier.verify_path(&path), "Failed to find a path with a repeated node");
    let path = vec![forward(3), forward(2), forward(3)];
    assert!(!verifier.verify_path(&path), "Found a path using a missing edge");
}

//-----------------------------------------------------------------------------

#[test]
fn parallel_verification() {
    let mapping = duplicated_mapping();
    let graph = create_graph(&[1, 3, 4, 5], &[
        (forward(1), forward(4)),
        (forward(1), forward(5)),
        (forward(5), forward(3)),
    ]);

    let mut path_index = PathIndex::new();
    for node_id in 1..=3 {
        path_index.add_node(node_id, b"A".to_vec());
    }
    let _ = path_index.add_path("good", vec![forward(1), forward(2), forward(3)]);
    let _ = path_index.add_path("bad", vec![forward(3), forward(1)]);
    let haplotypes = HaplotypeSet::new(vec![
        vec![forward(1), forward(2)],
        vec![forward(2), forward(1)],
    ]);

    for threads in [1, 2, 4] {
        let failures = verify_paths(&path_index, &haplotypes, &mapping, &graph, threads, false);
        assert!(failures.is_ok(), "Verification failed with {} threads: {}", threads, failures.unwrap_err());
        // Path "bad" and the haplotype 2 1 in both orientations.
        assert_eq!(failures.unwrap(), 3, "Wrong number of failures with {} threads", threads);
    }
}

//-----------------------------------------------------------------------------
