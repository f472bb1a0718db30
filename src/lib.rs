//! # delimited-table
//!
//! Reads delimited text files (CSV and friends) as positional rows or as
//! rows keyed by a header, with offset and limit windowing.
//!
//! ## Overview
//!
//! - **[`RecordReader`]**: a cursor over one stream. Tracks the header, the
//!   limit and a row counter, and exposes check / read / advance as separate
//!   steps.
//! - **[`DelimitedTableParser`]**: opens a file, detects the delimiter from
//!   the first line when none is given, configures a reader and hands rows
//!   out eagerly or lazily.
//!
//! Offsets accumulate across calls and [`RecordReader::reset`] rewinds only
//! the row counter, never the stream.
//!
//! ## Example
//!
//! ```
//! use delimited_table::{DelimitedTableParser, ParseOptions};
//! # use std::io::Write;
//! # let mut file = tempfile::NamedTempFile::new().unwrap();
//! # write!(file, "Brand;Color\nSector 9;White\nABEC 11\n").unwrap();
//! # let path = file.path();
//!
//! let mut parser = DelimitedTableParser::open(path, &ParseOptions::new().as_table(true))?;
//! assert_eq!(parser.delimiter(), b';');
//!
//! let rows = parser.get_rows_as_table(0, 0, true)?;
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].get("Brand"), Some("ABEC 11"));
//! assert_eq!(rows[1].get("Color"), Some(""));
//! # Ok::<(), delimited_table::TableError>(())
//! ```

pub mod delimiter;
pub mod error;
pub mod options;
pub mod parser;
pub mod reader;
pub mod record;

pub use delimiter::{CANDIDATES, detect_delimiter, sniff_delimiter};
pub use error::{Result, TableError};
pub use options::ParseOptions;
pub use parser::DelimitedTableParser;
pub use reader::{RecordReader, Rows};
pub use record::{Header, IndexedRecord, Record, Row};
