//! Maximal walks through a component of the complement graph.
//!
//! A walk starts from a border node and continues within the component until it reaches another border node or cannot be extended further.
//! Walks are generated from reference paths and from the haplotype index.

use crate::{Graph, HaplotypeIndex, PathIndex};

use std::collections::BTreeSet;

use gbwt::Orientation;
use gbwt::support;

//-----------------------------------------------------------------------------

// Extends the walk over `handles` while the edges exist in the component.
fn extend_walk<I: Iterator<Item = usize>>(start: usize, handles: I, component: &Graph, border: &BTreeSet<usize>) -> Vec<usize> {
    let mut walk = vec![start];
    let mut prev = start;
    for curr in handles {
        if !component.has_edge(prev, curr) {
            break;
        }
        walk.push(curr);
        if border.contains(&support::node_id(curr)) {
            break;
        }
        prev = curr;
    }
    walk
}

/// Returns the walks induced by reference paths that visit the given border node.
///
/// For each occurrence of the node on each path, the path is followed forward and backward within the component.
/// The backward walk is reported in reverse orientation.
/// A walk stops after the first border node following the start, or when the next edge is not in the component.
pub fn path_walks(path_index: &PathIndex, component: &Graph, border: &BTreeSet<usize>, from: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    for rank in 0..path_index.path_count() {
        let path = path_index.path(rank).unwrap_or(&[]);
        for &offset in path_index.occurrences(from, rank) {
            let forward = path[offset + 1..].iter().copied();
            result.push(extend_walk(path[offset], forward, component, border));

            let backward = path[..offset].iter().rev().map(|handle| support::flip_node(*handle));
            result.push(extend_walk(support::flip_node(path[offset]), backward, component, border));
        }
    }
    result
}

//-----------------------------------------------------------------------------

/// Returns the maximal haplotype-consistent walks starting from the given border node.
///
/// The walks start from both orientations of the node and follow the edges in the component, as long as some haplotype matches the walk.
/// A walk is reported when it reaches another border node or when no haplotype continues it.
pub fn thread_walks<H: HaplotypeIndex>(haplotypes: &H, component: &Graph, border: &BTreeSet<usize>, from: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();

    let mut stack: Vec<(H::State, Vec<usize>)> = Vec::new();
    for orientation in [Orientation::Forward, Orientation::Reverse] {
        let handle = support::encode_node(from, orientation);
        if let Some(state) = haplotypes.find(handle) {
            stack.push((state, vec![handle]));
        }
    }

    while let Some((state, walk)) = stack.pop() {
        let last = walk[walk.len() - 1];
        if walk.len() >= 2 && border.contains(&support::node_id(last)) {
            result.push(walk);
            continue;
        }

        let mut extended = false;
        for next in component.successors(last) {
            if let Some(next_state) = haplotypes.extend(&state, next) {
                let mut next_walk = walk.clone();
                next_walk.push(next);
                stack.push((next_state, next_walk));
                extended = true;
            }
        }
        if !extended {
            result.push(walk);
        }
    }

    result
}

//-----------------------------------------------------------------------------
