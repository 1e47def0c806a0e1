//! Utility functions for working with files.

use std::fs::{self, File};
use std::path::Path;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use flate2::read::MultiGzDecoder;

//-----------------------------------------------------------------------------

const SIZE_UNITS: [(f64, &str); 6] = [
    (1.0, "B"),
    (1024.0, "KiB"),
    (1024.0 * 1024.0, "MiB"),
    (1024.0 * 1024.0 * 1024.0, "GiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0, "TiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0, "PiB"),
];

/// Returns a human-readable representation of the given number of bytes.
pub fn human_readable_size(bytes: usize) -> String {
    let mut unit = 0;
    let value = bytes as f64;
    while unit + 1 < SIZE_UNITS.len() && value >= SIZE_UNITS[unit + 1].0 {
        unit += 1;
    }
    format!("{:.3} {}", value / SIZE_UNITS[unit].0, SIZE_UNITS[unit].1)
}

/// Returns a human-readable size of the file, or [`None`] if the file cannot be accessed.
pub fn file_size<P: AsRef<Path>>(filename: P) -> Option<String> {
    let metadata = fs::metadata(filename).ok()?;
    Some(human_readable_size(metadata.len() as usize))
}

/// Returns `true` if the file exists.
pub fn file_exists<P: AsRef<Path>>(filename: P) -> bool {
    fs::metadata(filename).is_ok()
}

//-----------------------------------------------------------------------------

/// Returns `true` if the file appears to be gzip-compressed.
pub fn is_gzipped<P: AsRef<Path>>(filename: P) -> bool {
    let file = match File::open(filename) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut reader = BufReader::new(file);
    let mut magic = [0; 2];
    let len = reader.read(&mut magic).ok();
    len == Some(2) && magic == [0x1F, 0x8B]
}

/// Returns a buffered reader for the file, which may be gzip-compressed.
pub fn open_file<P: AsRef<Path>>(filename: P) -> Result<Box<dyn BufRead>, String> {
    let file = File::open(&filename).map_err(|x| {
        format!("Cannot open {}: {}", filename.as_ref().display(), x)
    })?;
    let inner = BufReader::new(file);
    if is_gzipped(&filename) {
        let inner = MultiGzDecoder::new(inner);
        Ok(Box::new(BufReader::new(inner)))
    } else {
        Ok(Box::new(inner))
    }
}

/// Returns a buffered writer for the file, or for standard output if no file name is given.
pub fn create_output<P: AsRef<Path>>(filename: Option<P>) -> Result<Box<dyn Write>, String> {
    match filename {
        Some(filename) => {
            let file = File::create(&filename).map_err(|x| {
                format!("Cannot create {}: {}", filename.as_ref().display(), x)
            })?;
            Ok(Box::new(BufWriter::new(file)))
        },
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

//-----------------------------------------------------------------------------


//-----------------------------------------------------------------------------
