//! Prefix and suffix tries for deduplicating walks in a component.

use crate::NodeMapping;

use std::collections::{BTreeMap, BTreeSet};

use gbwt::support;

//-----------------------------------------------------------------------------

/// Returns the canonical orientation of the walk: the smaller of the walk and its reverse complement.
pub fn canonical_walk(walk: &[usize]) -> Vec<usize> {
    let reverse = support::reverse_path(walk);
    if reverse.as_slice() < walk {
        reverse
    } else {
        walk.to_vec()
    }
}

//-----------------------------------------------------------------------------

/// Walks through a component, merged into a prefix trie and a suffix trie.
///
/// Each walk is split in the middle.
/// The first half becomes a path in the prefix trie, starting from the first handle of the walk.
/// The second half becomes a path in the suffix trie, ending at the last handle of the walk.
/// All handles except the first and the last are duplicates of the original handles, allocated from a [`NodeMapping`].
/// Walks that share a prefix share the duplicates for it, and likewise for suffixes.
/// Finally, a crossing edge connects the end of the prefix to the start of the suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tries {
    // (from, original handle) -> duplicate handle following `from`.
    prefixes: BTreeMap<(usize, usize), usize>,

    // (original handle, to) -> duplicate handle preceding `to`.
    suffixes: BTreeMap<(usize, usize), usize>,

    crossing_edges: BTreeSet<(usize, usize)>,
}

impl Tries {
    /// Creates empty tries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct walks inserted into the tries.
    #[inline]
    pub fn walks(&self) -> usize {
        self.crossing_edges.len()
    }

    /// Returns `true` if no walks have been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.crossing_edges.is_empty()
    }

    /// Inserts the walk into the tries, creating new duplicates in the mapping when necessary.
    ///
    /// A walk and its reverse complement are inserted in the same canonical orientation.
    /// Walks with fewer than two handles are ignored.
    pub fn insert(&mut self, walk: &[usize], mapping: &mut NodeMapping) {
        if walk.len() < 2 {
            return;
        }
        let walk = canonical_walk(walk);
        let n = walk.len();
        let mid = (n + 1) / 2;

        let mut from = walk[0];
        for handle in walk[1..mid].iter() {
            from = *self.prefixes.entry((from, *handle)).or_insert_with(|| duplicate(*handle, mapping));
        }

        let mut to = walk[n - 1];
        for handle in walk[mid..n - 1].iter().rev() {
            to = *self.suffixes.entry((*handle, to)).or_insert_with(|| duplicate(*handle, mapping));
        }

        self.crossing_edges.insert((from, to));
    }

    /// Returns all edges in the tries, including the crossing edges.
    ///
    /// Prefix trie edges are listed first, followed by suffix trie edges and crossing edges.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let prefixes = self.prefixes.iter().map(|((from, _), to)| (*from, *to));
        let suffixes = self.suffixes.iter().map(|((_, to), from)| (*from, *to));
        prefixes.chain(suffixes).chain(self.crossing_edges.iter().copied())
    }

    /// Returns an iterator over the crossing edges.
    pub fn crossing_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.crossing_edges.iter().copied()
    }
}

// Creates a duplicate of the node with the same orientation.
fn duplicate(handle: usize, mapping: &mut NodeMapping) -> usize {
    let node_id = mapping.insert(support::node_id(handle));
    support::encode_node(node_id, support::node_orientation(handle))
}

//-----------------------------------------------------------------------------
