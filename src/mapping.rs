//! A mapping from duplicate node identifiers to original node identifiers.
//!
//! Phase unfolding creates new copies of existing nodes.
//! Each copy gets a fresh identifier from a contiguous range starting after the largest identifier in the original graph.
//! [`NodeMapping`] remembers the original node for each copy, so that the sequence of the copy and paths in the unfolded graph can be interpreted in terms of the original graph.

use std::io::{self, Error, ErrorKind, Read, Write};
use std::ops::Range;
use std::path::Path;

use simple_sds::serialize::{self, Serialize};


//-----------------------------------------------------------------------------

/// A mapping from duplicate node identifiers to original node identifiers.
///
/// Duplicate identifiers form the range `begin()..end()`.
/// Identifiers below `begin()` are original identifiers and map to themselves.
/// The mapping is valid for a graph only if `begin()` is greater than the largest node identifier in the graph.
/// Constructors and [`NodeMapping::load_from`] enforce this.
///
/// # Examples
///
/// ```
/// use gbz_unfold::NodeMapping;
///
/// // The largest node identifier in the graph is 10.
/// let mut mapping = NodeMapping::new(10);
/// assert_eq!(mapping.begin(), 11);
/// assert!(mapping.is_empty());
///
/// let first = mapping.insert(4);
/// let second = mapping.insert(4);
/// assert_eq!((first, second), (11, 12));
/// assert_eq!(mapping.end(), 13);
///
/// assert_eq!(mapping.map(first), 4);
/// assert_eq!(mapping.map(second), 4);
/// assert_eq!(mapping.map(7), 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeMapping {
    // First duplicate identifier.
    first_id: usize,

    // Original identifier for duplicate `first_id + i`.
    originals: Vec<usize>,
}

//-----------------------------------------------------------------------------

/// Construction and validation.
impl NodeMapping {
    /// Creates an empty mapping for a graph with the given largest node identifier.
    ///
    /// Duplicate identifiers will start from `max_node + 1`.
    pub fn new(max_node: usize) -> Self {
        NodeMapping {
            first_id: max_node + 1,
            originals: Vec::new(),
        }
    }

    /// Creates an empty mapping with duplicate identifiers starting from `first_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `first_id` is not greater than `max_node`.
    pub fn with_first_id(first_id: usize, max_node: usize) -> Result<Self, String> {
        let result = NodeMapping {
            first_id,
            originals: Vec::new(),
        };
        result.check(max_node)?;
        Ok(result)
    }

    /// Checks that the mapping can be used with a graph with the given largest node identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if duplicate identifiers could overlap with original identifiers.
    pub fn check(&self, max_node: usize) -> Result<(), String> {
        if self.first_id <= max_node {
            return Err(format!(
                "Duplicate node ids start from {}, but the graph contains node ids up to {}",
                self.first_id, max_node
            ));
        }
        Ok(())
    }

    /// Loads a mapping from the given file and checks it against the largest node identifier in the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the mapping is not valid for the graph.
    pub fn load_from<P: AsRef<Path>>(filename: P, max_node: usize) -> Result<Self, String> {
        let mapping: NodeMapping = serialize::load_from(&filename).map_err(|x| {
            format!("Cannot load node mapping from {}: {}", filename.as_ref().display(), x)
        })?;
        mapping.check(max_node)?;
        Ok(mapping)
    }

    /// Writes the mapping to the given file.
    ///
    /// # Errors
    ///
    /// Passes through any I/O errors.
    pub fn save_to<P: AsRef<Path>>(&self, filename: P) -> Result<(), String> {
        serialize::serialize_to(self, &filename).map_err(|x| {
            format!("Cannot write node mapping to {}: {}", filename.as_ref().display(), x)
        })
    }
}

//-----------------------------------------------------------------------------

/// Operations.
impl NodeMapping {
    /// Returns the first duplicate identifier.
    #[inline]
    pub fn begin(&self) -> usize {
        self.first_id
    }

    /// Returns the identifier that will be assigned to the next duplicate.
    #[inline]
    pub fn end(&self) -> usize {
        self.first_id + self.originals.len()
    }

    /// Returns the range of duplicate identifiers.
    #[inline]
    pub fn duplicates(&self) -> Range<usize> {
        self.begin()..self.end()
    }

    /// Returns the number of duplicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns `true` if there are no duplicates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Creates a new duplicate of the given original node and returns its identifier.
    ///
    /// Each call creates a new duplicate, even if the node has been duplicated before.
    pub fn insert(&mut self, original: usize) -> usize {
        let result = self.end();
        self.originals.push(original);
        result
    }

    /// Returns the original identifier for the given node identifier.
    ///
    /// Identifiers outside the range of duplicates are returned unchanged.
    #[inline]
    pub fn map(&self, node_id: usize) -> usize {
        if node_id < self.first_id {
            return node_id;
        }
        self.originals.get(node_id - self.first_id).copied().unwrap_or(node_id)
    }

    /// Returns an iterator over the pairs (duplicate identifier, original identifier).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.originals.iter().enumerate().map(|(offset, original)| (self.first_id + offset, *original))
    }
}

//-----------------------------------------------------------------------------

impl Serialize for NodeMapping {
    fn serialize_header<T: Write>(&self, writer: &mut T) -> io::Result<()> {
        writer.write_all(&(self.first_id as u64).to_le_bytes())
    }

    fn serialize_body<T: Write>(&self, writer: &mut T) -> io::Result<()> {
        let originals: Vec<u64> = self.originals.iter().map(|x| *x as u64).collect();
        originals.serialize(writer)
    }

    fn load<T: Read>(reader: &mut T) -> io::Result<Self> {
        let mut buffer = [0u8; 8];
        reader.read_exact(&mut buffer)?;
        let first_id = u64::from_le_bytes(buffer) as usize;
        if first_id == 0 {
            return Err(Error::new(ErrorKind::InvalidData, "NodeMapping: Duplicate ids cannot start from 0"));
        }
        let originals = Vec::<u64>::load(reader)?;
        let originals: Vec<usize> = originals.into_iter().map(|x| x as usize).collect();
        Ok(NodeMapping { first_id, originals })
    }

    fn size_in_elements(&self) -> usize {
        // First id, vector length, and vector data.
        2 + self.originals.len()
    }
}

//-----------------------------------------------------------------------------
