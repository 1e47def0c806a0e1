//! Support for reading and writing GFA files.
//!
//! The GFA format is a text-based format for representing sequence graphs.
//! The format is documented in the [GFA1 repository](https://github.com/GFA-spec/GFA-spec/blob/master/GFA1.md).
//!
//! ### Writing
//!
//! The following functions support line-by-line writing of GFA version 1.1:
//!
//! * [`write_gfa_header`]: Write a GFA file header.
//! * [`write_gfa_node`]: Write a segment line for a node.
//! * [`write_gfa_edge`]: Write a link line for an edge.
//! * [`write_gfa_path`]: Write a path line for a path.
//!
//! [`crate::Graph::write_gfa`] writes an entire graph.
//!
//! ### Reading
//!
//! [`read_gfa`] reads a graph with integer segment names from S, L, and P lines.
//! Other line types are ignored.

use crate::Graph;

use std::io::{self, BufRead, Write};
use std::str;

use gbwt::Orientation;
use gbwt::support;


//-----------------------------------------------------------------------------

/// Writes the GFA header line.
pub fn write_gfa_header<T: Write>(output: &mut T) -> io::Result<()> {
    output.write_all(b"H\tVN:Z:1.1\n")?;
    Ok(())
}

/// Writes a GFA segment line corresponding to a node with an integer identifier.
pub fn write_gfa_node<T: Write>(node_id: usize, sequence: &[u8], output: &mut T) -> io::Result<()> {
    let mut buffer: Vec<u8> = Vec::new();

    buffer.extend_from_slice(b"S\t");
    buffer.extend_from_slice(node_id.to_string().as_bytes());
    buffer.push(b'\t');
    buffer.extend_from_slice(sequence);
    buffer.push(b'\n');

    output.write_all(&buffer)?;
    Ok(())
}

/// Writes a GFA link line corresponding to an edge between two oriented nodes.
pub fn write_gfa_edge<T: Write>(from: (usize, Orientation), to: (usize, Orientation), output: &mut T) -> io::Result<()> {
    let mut buffer: Vec<u8> = Vec::new();

    buffer.extend_from_slice(b"L\t");
    buffer.extend_from_slice(from.0.to_string().as_bytes());
    match from.1 {
        Orientation::Forward => buffer.extend_from_slice(b"\t+\t"),
        Orientation::Reverse => buffer.extend_from_slice(b"\t-\t"),
    }
    buffer.extend_from_slice(to.0.to_string().as_bytes());
    match to.1 {
        Orientation::Forward => buffer.extend_from_slice(b"\t+\t0M\n"),
        Orientation::Reverse => buffer.extend_from_slice(b"\t-\t0M\n"),
    }

    output.write_all(&buffer)?;
    Ok(())
}

/// Appends a GFA path (e.g. `12+,13-`) to a string represented as `Vec<u8>`.
pub fn append_path(buffer: &mut Vec<u8>, path: &[usize]) {
    for (i, handle) in path.iter().enumerate() {
        if i > 0 {
            buffer.push(b',');
        }
        buffer.extend_from_slice(support::node_id(*handle).to_string().as_bytes());
        match support::node_orientation(*handle) {
            Orientation::Forward => buffer.push(b'+'),
            Orientation::Reverse => buffer.push(b'-'),
        }
    }
}

/// Writes a GFA path line corresponding to a named path.
///
/// The path is given as a sequence of handles, and the overlaps field is always `*`.
pub fn write_gfa_path<T: Write>(name: &str, path: &[usize], output: &mut T) -> io::Result<()> {
    let mut buffer: Vec<u8> = Vec::new();

    buffer.extend_from_slice(b"P\t");
    buffer.extend_from_slice(name.as_bytes());
    buffer.push(b'\t');
    append_path(&mut buffer, path);
    buffer.extend_from_slice(b"\t*\n");

    output.write_all(&buffer)?;
    Ok(())
}

//-----------------------------------------------------------------------------

/// A graph read from a GFA file, with the paths stored in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GFAGraph {
    /// Nodes and edges from S and L lines.
    pub graph: Graph,

    /// Named paths from P lines as sequences of handles.
    pub paths: Vec<(String, Vec<usize>)>,
}

// Parses a positive integer field.
fn parse_node_id(field: &[u8], line_num: usize) -> Result<usize, String> {
    let number = str::from_utf8(field).map_err(|err| {
        format!("Line {}: Invalid segment name: {}", line_num, err)
    })?;
    let node_id: usize = number.parse().map_err(|err| {
        format!("Line {}: Invalid segment name {}: {}", line_num, number, err)
    })?;
    if node_id == 0 {
        return Err(format!("Line {}: Segment name 0 is reserved", line_num));
    }
    Ok(node_id)
}

fn parse_orientation(field: &[u8], line_num: usize) -> Result<Orientation, String> {
    match field {
        b"+" => Ok(Orientation::Forward),
        b"-" => Ok(Orientation::Reverse),
        _ => Err(format!("Line {}: Invalid orientation {}", line_num, String::from_utf8_lossy(field))),
    }
}

// Parses a GFA path (e.g. `12+,13-`) into a sequence of handles.
fn parse_path(field: &[u8], line_num: usize) -> Result<Vec<usize>, String> {
    let mut result = Vec::new();
    if field.is_empty() {
        return Ok(result);
    }
    for visit in field.split(|c| *c == b',') {
        if visit.len() < 2 {
            return Err(format!("Line {}: Invalid path segment {}", line_num, String::from_utf8_lossy(visit)));
        }
        let (name, orientation) = visit.split_at(visit.len() - 1);
        let node_id = parse_node_id(name, line_num)?;
        let orientation = parse_orientation(orientation, line_num)?;
        result.push(support::encode_node(node_id, orientation));
    }
    Ok(result)
}

/// Reads a GFA graph with integer segment names from the reader.
///
/// S lines become nodes, L lines become edges, and P lines become named paths.
/// Overlaps are ignored, and so are all other line types.
/// Links may refer to segments defined later in the file.
///
/// # Errors
///
/// Returns an error if reading fails, if a line cannot be parsed, or if a link or a path refers to a nonexistent segment.
///
/// # Examples
///
/// ```
/// use gbz_unfold::formats;
/// use gbwt::Orientation;
/// use gbwt::support;
///
/// let gfa = b"H\tVN:Z:1.1\nS\t1\tGAT\nS\t2\tTACA\nL\t1\t+\t2\t-\t0M\nP\tref\t1+,2-\t*\n";
/// let result = formats::read_gfa(&mut gfa.as_slice()).unwrap();
/// assert_eq!(result.graph.node_count(), 2);
/// assert_eq!(result.graph.edge_count(), 1);
///
/// let path = vec![
///     support::encode_node(1, Orientation::Forward),
///     support::encode_node(2, Orientation::Reverse),
/// ];
/// assert_eq!(result.paths, vec![(String::from("ref"), path)]);
/// ```
pub fn read_gfa<R: BufRead>(reader: &mut R) -> Result<GFAGraph, String> {
    let mut result = GFAGraph::default();
    let mut links: Vec<(usize, usize, usize)> = Vec::new();

    let mut line_num = 0;
    loop {
        let mut line: Vec<u8> = Vec::new();
        let bytes_read = reader.read_until(b'\n', &mut line).map_err(|x| x.to_string())?;
        if bytes_read == 0 {
            break;
        }
        line_num += 1;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        let fields: Vec<&[u8]> = line.split(|c| *c == b'\t').collect();
        match fields[0] {
            b"S" => {
                if fields.len() < 3 {
                    return Err(format!("Line {}: Segment line with {} fields", line_num, fields.len()));
                }
                let node_id = parse_node_id(fields[1], line_num)?;
                if !result.graph.add_node(node_id, fields[2].to_vec()) {
                    return Err(format!("Line {}: Duplicate segment {}", line_num, node_id));
                }
            },
            b"L" => {
                if fields.len() < 5 {
                    return Err(format!("Line {}: Link line with {} fields", line_num, fields.len()));
                }
                let from = support::encode_node(parse_node_id(fields[1], line_num)?, parse_orientation(fields[2], line_num)?);
                let to = support::encode_node(parse_node_id(fields[3], line_num)?, parse_orientation(fields[4], line_num)?);
                links.push((line_num, from, to));
            },
            b"P" => {
                if fields.len() < 3 {
                    return Err(format!("Line {}: Path line with {} fields", line_num, fields.len()));
                }
                let name = String::from_utf8_lossy(fields[1]).to_string();
                let path = parse_path(fields[2], line_num)?;
                result.paths.push((name, path));
            },
            _ => {},
        }
    }

    for (line_num, from, to) in links {
        result.graph.add_edge(from, to).map_err(|err| format!("Line {}: {}", line_num, err))?;
    }
    for (name, path) in result.paths.iter() {
        for handle in path.iter() {
            if !result.graph.has_node(support::node_id(*handle)) {
                return Err(format!("Path {} visits nonexistent node {}", name, support::node_id(*handle)));
            }
        }
    }

    Ok(result)
}

//-----------------------------------------------------------------------------
