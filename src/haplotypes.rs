//! Haplotype indexes used for discovering and verifying haplotype-consistent walks.
//!
//! [`HaplotypeIndex`] is the interface the unfolder needs from a haplotype index.
//! It is implemented for [`GBWT`], which is the intended index for real data, and for [`HaplotypeSet`], which stores the haplotypes as explicit paths.
//!
//! Both implementations assume that the index is bidirectional: if a haplotype visits handles `a` and `b` consecutively, there is also a haplotype visiting `flip(b)` and `flip(a)` consecutively.

use std::collections::{BTreeSet, HashMap};

use gbwt::{ENDMARKER, GBWT};
use gbwt::bwt::BWT;
use gbwt::support;


//-----------------------------------------------------------------------------

/// The interface of a haplotype index.
///
/// Nodes are represented as handles (see [`gbwt::support::encode_node`]).
/// A search state represents the haplotypes matching a pattern that ends at a specific handle.
pub trait HaplotypeIndex {
    /// A search state for a pattern.
    type State: Clone;

    /// Returns the handles used by the haplotypes in increasing order.
    fn alphabet(&self) -> Vec<usize>;

    /// Returns the handles that follow the given handle in at least one haplotype.
    ///
    /// The endmarker is never returned.
    fn successors(&self, handle: usize) -> Vec<usize>;

    /// Returns a search state for the pattern consisting of the given handle, or [`None`] if no haplotype visits it.
    fn find(&self, handle: usize) -> Option<Self::State>;

    /// Extends the pattern of the search state with the given handle.
    ///
    /// Returns [`None`] if no haplotype matching the pattern continues with the handle.
    fn extend(&self, state: &Self::State, handle: usize) -> Option<Self::State>;

    /// Returns the number of sequences in the index.
    fn sequences(&self) -> usize;

    /// Returns the sequence with the given identifier as a vector of handles.
    ///
    /// Returns an empty vector if there is no such sequence.
    fn extract(&self, sequence_id: usize) -> Vec<usize>;
}

//-----------------------------------------------------------------------------

impl HaplotypeIndex for GBWT {
    type State = gbwt::SearchState;

    fn alphabet(&self) -> Vec<usize> {
        (self.first_node()..self.alphabet_size()).filter(|handle| self.has_node(*handle)).collect()
    }

    fn successors(&self, handle: usize) -> Vec<usize> {
        if !self.has_node(handle) {
            return Vec::new();
        }
        let bwt: &BWT = self.as_ref();
        let mut result = Vec::new();
        if let Some(record) = bwt.record(self.node_to_record(handle)) {
            for i in 0..record.outdegree() {
                let successor = record.successor(i);
                if successor != ENDMARKER {
                    result.push(successor);
                }
            }
        }
        result
    }

    fn find(&self, handle: usize) -> Option<Self::State> {
        // Nodes in the effective alphabet may have empty records.
        GBWT::find(self, handle).filter(|state| !state.is_empty())
    }

    fn extend(&self, state: &Self::State, handle: usize) -> Option<Self::State> {
        GBWT::extend(self, state, handle)
    }

    fn sequences(&self) -> usize {
        GBWT::sequences(self)
    }

    fn extract(&self, sequence_id: usize) -> Vec<usize> {
        let mut result = Vec::new();
        if sequence_id >= GBWT::sequences(self) {
            return result;
        }
        let mut pos = self.start(sequence_id);
        while let Some(p) = pos {
            result.push(p.node);
            pos = self.forward(p);
        }
        result
    }
}

//-----------------------------------------------------------------------------

/// A search state in a [`HaplotypeSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaplotypeMatches {
    /// The last handle in the pattern.
    pub node: usize,

    /// Occurrences of the last handle in matching haplotypes as (sequence identifier, offset).
    pub matches: Vec<(usize, usize)>,
}

impl HaplotypeMatches {
    /// Returns the number of haplotypes matching the pattern.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if no haplotype matches the pattern.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// A bidirectional haplotype index storing the haplotypes as paths.
///
/// Path `i` is stored as sequence `2 * i` and its reverse as sequence `2 * i + 1`, following the GBWT convention.
///
/// # Examples
///
/// ```
/// use gbz_unfold::{HaplotypeIndex, HaplotypeSet};
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// let a = support::encode_node(1, Orientation::Forward);
/// let b = support::encode_node(2, Orientation::Forward);
/// let c = support::encode_node(3, Orientation::Reverse);
/// let haplotypes = HaplotypeSet::new(vec![vec![a, b, c], vec![a, c]]);
/// assert_eq!(haplotypes.sequences(), 4);
/// assert_eq!(haplotypes.successors(a), vec![b, c]);
///
/// let state = haplotypes.find(a).unwrap();
/// assert_eq!(state.len(), 2);
/// let state = haplotypes.extend(&state, b).unwrap();
/// assert_eq!(state.len(), 1);
/// assert!(haplotypes.extend(&state, a).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HaplotypeSet {
    sequences: Vec<Vec<usize>>,

    // Handle to its occurrences as (sequence identifier, offset).
    occurrences: HashMap<usize, Vec<(usize, usize)>>,
}

impl HaplotypeSet {
    /// Creates a haplotype set with the given paths and their reverse paths.
    ///
    /// Empty paths are stored as empty sequences.
    pub fn new(paths: Vec<Vec<usize>>) -> Self {
        let mut sequences = Vec::with_capacity(2 * paths.len());
        for path in paths {
            let reverse = support::reverse_path(&path);
            sequences.push(path);
            sequences.push(reverse);
        }
        let mut occurrences: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for (sequence_id, sequence) in sequences.iter().enumerate() {
            for (offset, handle) in sequence.iter().enumerate() {
                occurrences.entry(*handle).or_default().push((sequence_id, offset));
            }
        }
        HaplotypeSet { sequences, occurrences }
    }

    /// Returns the number of paths in the set, which is half the number of sequences.
    #[inline]
    pub fn paths(&self) -> usize {
        self.sequences.len() / 2
    }
}

impl HaplotypeIndex for HaplotypeSet {
    type State = HaplotypeMatches;

    fn alphabet(&self) -> Vec<usize> {
        let alphabet: BTreeSet<usize> = self.occurrences.keys().copied().collect();
        alphabet.into_iter().collect()
    }

    fn successors(&self, handle: usize) -> Vec<usize> {
        let mut result: BTreeSet<usize> = BTreeSet::new();
        if let Some(occurrences) = self.occurrences.get(&handle) {
            for (sequence_id, offset) in occurrences.iter() {
                if let Some(next) = self.sequences[*sequence_id].get(offset + 1) {
                    result.insert(*next);
                }
            }
        }
        result.into_iter().collect()
    }

    fn find(&self, handle: usize) -> Option<Self::State> {
        let matches = self.occurrences.get(&handle)?.clone();
        Some(HaplotypeMatches { node: handle, matches })
    }

    fn extend(&self, state: &Self::State, handle: usize) -> Option<Self::State> {
        let matches: Vec<(usize, usize)> = state.matches.iter().filter_map(|(sequence_id, offset)| {
            match self.sequences[*sequence_id].get(offset + 1) {
                Some(next) if *next == handle => Some((*sequence_id, offset + 1)),
                _ => None,
            }
        }).collect();
        if matches.is_empty() {
            return None;
        }
        Some(HaplotypeMatches { node: handle, matches })
    }

    fn sequences(&self) -> usize {
        self.sequences.len()
    }

    fn extract(&self, sequence_id: usize) -> Vec<usize> {
        self.sequences.get(sequence_id).cloned().unwrap_or_default()
    }
}

//-----------------------------------------------------------------------------
