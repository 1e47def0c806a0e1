//! # GBZ-unfold: phase unfolding for pruned pangenome graphs.
//!
//! Indexing a pangenome graph often requires pruning complex regions first.
//! Pruning removes high-degree nodes and regions with too many paths, which also breaks the reference paths and the haplotypes.
//! This crate adds the missing paths back to the pruned graph in an acyclic form.
//! New nodes are duplicates of the original nodes, and the mapping between them can be saved for later use.
//!
//! The crate builds on the [`gbwt`] crate.
//! The full graph is represented by a [`PathIndex`], which stores node sequences and reference paths.
//! Haplotypes come from a [`HaplotypeIndex`], which is usually a [`gbwt::GBWT`].
//! The pruned graph is a [`Graph`], which can be read from and written to GFA files (see [`formats`]).
//!
//! See [`PhaseUnfolder`] for the unfolding algorithm and [`PathVerifier`] for checking the results.
//! See [`NodeMapping`] for the mapping between duplicate and original nodes.
//!
//! ### Basic concepts
//!
//! Nodes are accessed by handles, which are [`gbwt::GBWT`] node identifiers.
//! A handle encodes both the identifier of the node in the underlying graph and its orientation.
//! Paths, haplotypes, and walks are sequences of handles.
//!
//! An edge can be traversed in both directions.
//! Edge `(from, to)` is the same edge as `(flip(to), flip(from))`, and graphs store edges in canonical form.

pub mod formats;
pub mod graph;
pub mod haplotypes;
pub mod mapping;
pub mod path_index;
pub mod unfolder;
pub mod utils;
pub mod verify;

pub use formats::GFAGraph;
pub use graph::Graph;
pub use haplotypes::{HaplotypeIndex, HaplotypeMatches, HaplotypeSet};
pub use mapping::NodeMapping;
pub use path_index::PathIndex;
pub use unfolder::PhaseUnfolder;
pub use verify::PathVerifier;

#[cfg(test)]
pub(crate) mod internal;
