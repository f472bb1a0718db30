//! Delimiter auto-detection.
//!
//! Only the first physical line is sampled. Each candidate splits that line
//! with the tokenizer and the one producing the most fields wins; ties go to
//! the earlier candidate. A quoted field spanning lines can mislead the
//! guess since the rest of the record is never seen.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::error::Result;

/// Candidates in tie-break order: semicolon, comma, tab, pipe.
pub const CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Number of fields `line` splits into with `delimiter`.
fn field_count(line: &[u8], delimiter: u8) -> usize {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line);
    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record.len(),
        _ => 0,
    }
}

/// Pick the candidate delimiter that splits `line` into the most fields.
pub fn detect_delimiter(line: &[u8]) -> u8 {
    let mut best = CANDIDATES[0];
    let mut best_count = field_count(line, best);
    for &candidate in &CANDIDATES[1..] {
        let count = field_count(line, candidate);
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Read the first line of the file at `path` and detect its delimiter.
pub fn sniff_delimiter(path: impl AsRef<Path>) -> Result<u8> {
    let path = path.as_ref();
    let mut first_line = Vec::new();
    BufReader::new(File::open(path)?).read_until(b'\n', &mut first_line)?;

    let delimiter = detect_delimiter(&first_line);
    debug!(
        path = %path.display(),
        delimiter = %char::from(delimiter).escape_default(),
        "detected delimiter"
    );
    Ok(delimiter)
}
