use super::*;

use crate::internal::{forward, reverse, load_gbz};

use std::collections::BTreeSet;

//-----------------------------------------------------------------------------

// Two components: 1 -> 2 -> 3 with 2- -> 4+, and 5 -> 6 -> 5.
fn example_graph() -> Graph {
    let mut graph = Graph::new();
    for node_id in 1..=6 {
        graph.add_node(node_id, vec![b'A'; node_id]);
    }
    let edges = vec![
        (forward(1), forward(2)),
        (forward(2), forward(3)),
        (reverse(2), forward(4)),
        (forward(5), forward(6)),
        (forward(6), forward(5)),
    ];
    for (from, to) in edges {
        let result = graph.add_edge(from, to);
        assert_eq!(result, Ok(true), "Failed to add edge ({}, {})", from, to);
    }
    graph
}

//-----------------------------------------------------------------------------

#[test]
fn canonical_edges() {
    for from in 2..20 {
        for to in 2..20 {
            let edge = canonical_edge(from, to);
            let other = canonical_edge(support::flip_node(to), support::flip_node(from));
            assert_eq!(edge, other, "Different canonical edges for ({}, {})", from, to);
            assert!(edge <= (from, to), "Canonical edge for ({}, {}) is not the smaller one", from, to);
        }
    }
}

#[test]
fn nodes() {
    let mut graph = example_graph();
    assert_eq!(graph.node_count(), 6, "Wrong number of nodes");
    assert_eq!(graph.max_node(), Some(6), "Wrong maximum node id");
    assert!(!graph.has_node(7), "Found a nonexistent node");
    assert_eq!(graph.sequence(3), Some(b"AAA".as_slice()), "Wrong sequence for node 3");
    assert!(!graph.add_node(3, b"C".to_vec()), "Added an existing node");
    assert_eq!(graph.sequence(3), Some(b"AAA".as_slice()), "Adding an existing node changed the sequence");

    let ids: Vec<usize> = graph.node_iter().collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6], "Wrong node ids");

    assert!(graph.remove_node(2), "Failed to remove node 2");
    assert!(!graph.remove_node(2), "Removed node 2 twice");
    assert_eq!(graph.node_count(), 5, "Wrong number of nodes after removal");
    assert_eq!(graph.edge_count(), 2, "Removing a node did not remove its edges");
    assert!(graph.edges_of(1).is_empty(), "Node 1 still has edges");
    assert!(graph.edges_of(4).is_empty(), "Node 4 still has edges");
}

#[test]
fn edges() {
    let mut graph = example_graph();
    assert_eq!(graph.edge_count(), 5, "Wrong number of edges");
    assert!(graph.has_edge(forward(1), forward(2)), "Missing edge 1+ -> 2+");
    assert!(graph.has_edge(reverse(2), reverse(1)), "Missing edge 2- -> 1-");
    assert!(!graph.has_edge(forward(2), forward(1)), "Found edge 2+ -> 1+");
    assert_eq!(graph.add_edge(reverse(2), reverse(1)), Ok(false), "Added an existing edge");
    assert!(graph.add_edge(forward(1), forward(9)).is_err(), "Added an edge to a nonexistent node");

    assert_eq!(graph.successors(forward(2)), vec![forward(3)], "Wrong successors for 2+");
    let mut successors = graph.successors(reverse(2));
    successors.sort();
    assert_eq!(successors, vec![reverse(1), forward(4)], "Wrong successors for 2-");
    assert_eq!(graph.successors(reverse(4)), vec![forward(2)], "Wrong successors for 4-");
    assert!(graph.successors(forward(4)).is_empty(), "Node 4+ has successors");

    assert!(graph.remove_edge(reverse(3), reverse(2)), "Failed to remove edge 2+ -> 3+");
    assert!(!graph.has_edge(forward(2), forward(3)), "Edge 2+ -> 3+ still exists");
    assert!(!graph.remove_edge(forward(2), forward(3)), "Removed edge 2+ -> 3+ twice");
    assert!(graph.edges_of(3).is_empty(), "Node 3 still has edges");
    assert_eq!(graph.edge_count(), 4, "Wrong number of edges after removal");
}

#[test]
fn self_loops() {
    let mut graph = Graph::new();
    graph.add_node(1, b"A".to_vec());
    assert_eq!(graph.add_edge(forward(1), forward(1)), Ok(true), "Failed to add a self-loop");
    assert_eq!(graph.add_edge(forward(1), reverse(1)), Ok(true), "Failed to add a reversing self-loop");
    assert_eq!(graph.edges_of(1).len(), 2, "Wrong number of incident edges");
    assert_eq!(graph.successors(forward(1)), vec![forward(1), reverse(1)], "Wrong successors for 1+");
    assert_eq!(graph.successors(reverse(1)), vec![reverse(1)], "Wrong successors for 1-");
    assert!(graph.remove_node(1), "Failed to remove the node");
    assert_eq!(graph.edge_count(), 0, "Self-loops were not removed");
}

//-----------------------------------------------------------------------------

#[test]
fn components() {
    let graph = example_graph();
    let components = graph.components();
    assert_eq!(components.len(), 2, "Wrong number of components");

    let first: Vec<usize> = components[0].node_iter().collect();
    let second: Vec<usize> = components[1].node_iter().collect();
    assert_eq!(first, vec![1, 2, 3, 4], "Wrong nodes in the first component");
    assert_eq!(second, vec![5, 6], "Wrong nodes in the second component");
    assert_eq!(components[0].edge_count(), 3, "Wrong number of edges in the first component");
    assert_eq!(components[1].edge_count(), 2, "Wrong number of edges in the second component");

    let mut merged = Graph::new();
    for component in components.iter() {
        merged.extend(component);
    }
    assert_eq!(merged, graph, "Merged components differ from the graph");
}

#[test]
fn extend() {
    let mut graph = example_graph();
    let mut other = Graph::new();
    other.add_node(3, b"CCC".to_vec());
    other.add_node(7, b"GG".to_vec());
    let _ = other.add_edge(forward(3), reverse(7));
    graph.extend(&other);

    assert_eq!(graph.node_count(), 7, "Wrong number of nodes");
    assert_eq!(graph.sequence(3), Some(b"AAA".as_slice()), "Existing node sequence was replaced");
    assert_eq!(graph.sequence(7), Some(b"GG".as_slice()), "Wrong sequence for the new node");
    assert!(graph.has_edge(forward(7), reverse(3)), "Missing the new edge");
    assert_eq!(graph.components().len(), 2, "The new node is not in the first component");
}

//-----------------------------------------------------------------------------

#[test]
fn from_gbz() {
    let gbz = load_gbz("example.gbz");
    let graph = Graph::from_gbz(&gbz);

    assert_eq!(graph.node_count(), gbz.nodes(), "Wrong number of nodes");
    for node_id in gbz.node_iter() {
        assert_eq!(graph.sequence(node_id), gbz.sequence(node_id), "Wrong sequence for node {}", node_id);
        for orientation in [Orientation::Forward, Orientation::Reverse] {
            let handle = support::encode_node(node_id, orientation);
            let truth: BTreeSet<usize> = gbz.successors(node_id, orientation).unwrap().map(
                |(id, o)| support::encode_node(id, o)
            ).collect();
            let successors: BTreeSet<usize> = graph.successors(handle).into_iter().collect();
            assert_eq!(successors, truth, "Wrong successors for handle {}", handle);
        }
    }
}

#[test]
fn gfa_output() {
    let mut graph = Graph::new();
    graph.add_node(1, b"GAT".to_vec());
    graph.add_node(2, b"TA".to_vec());
    let _ = graph.add_edge(forward(1), reverse(2));
    let paths = vec![(String::from("path"), vec![forward(1), reverse(2)])];

    let mut output: Vec<u8> = Vec::new();
    let result = graph.write_gfa(&paths, &mut output);
    assert!(result.is_ok(), "Failed to write GFA: {}", result.unwrap_err());
    let truth = "H\tVN:Z:1.1\nS\t1\tGAT\nS\t2\tTA\nL\t1\t+\t2\t-\t0M\nP\tpath\t1+,2-\t*\n";
    assert_eq!(String::from_utf8_lossy(&output), truth, "Wrong GFA output");
}

//-----------------------------------------------------------------------------
