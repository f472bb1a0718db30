//! File-level facade over [`RecordReader`].
//!
//! The parser validates the path, resolves the delimiter, configures a
//! reader once at construction and then hands rows out either eagerly
//! ([`get_rows`](DelimitedTableParser::get_rows),
//! [`get_rows_as_table`](DelimitedTableParser::get_rows_as_table)) or lazily
//! ([`iterate`](DelimitedTableParser::iterate),
//! [`rows`](DelimitedTableParser::rows)). All access paths share the same
//! stream, so rows consumed by one are gone for the others.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::delimiter::sniff_delimiter;
use crate::error::{Result, TableError};
use crate::options::ParseOptions;
use crate::reader::{RecordReader, Rows};
use crate::record::{Header, IndexedRecord, Record, Row};

/// Reads one delimited file as positional or header-keyed rows.
pub struct DelimitedTableParser {
    reader: RecordReader<File>,
}

impl DelimitedTableParser {
    /// Open `path` with default options: positional rows, detected delimiter.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, &ParseOptions::default())
    }

    /// Open `path` and configure the reader.
    ///
    /// The header, when requested, is captured before the offset is applied,
    /// so the offset counts data records only.
    pub fn open(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TableError::FileNotFound(path.to_path_buf()));
        }

        let delimiter = match options.delimiter {
            Some(delimiter) => delimiter,
            None => sniff_delimiter(path)?,
        };

        let mut reader = RecordReader::open(path, delimiter)?;
        if options.as_table {
            reader.capture_header(options.ignore_blank_headers)?;
        }
        reader.apply_offset(options.offset)?.set_limit(options.limit);

        debug!(
            path = %path.display(),
            as_table = options.as_table,
            offset = options.offset,
            limit = options.limit,
            "configured parser"
        );
        Ok(Self { reader })
    }

    pub fn delimiter(&self) -> u8 {
        self.reader.delimiter()
    }

    pub fn header(&self) -> Option<&Header> {
        self.reader.header()
    }

    /// Collect the remaining records as positional rows.
    ///
    /// `offset` skips further records on top of anything already skipped;
    /// `limit` replaces the current limit and counts from this call.
    pub fn get_rows(&mut self, offset: usize, limit: usize) -> Result<Vec<Record>> {
        self.reader.apply_offset(offset)?.set_limit(limit);
        self.reader.reset();

        let mut rows = Vec::new();
        while self.reader.has_more()? {
            let Some(record) = self.reader.next_plain()? else {
                break;
            };
            rows.push(record);
            self.reader.advance();
        }
        debug!(rows = rows.len(), "collected rows");
        Ok(rows)
    }

    /// Collect the remaining records keyed by the header.
    ///
    /// Captures the header first if none is set yet; an existing header is
    /// kept and `ignore_blank_headers` is then unused. Offset and limit
    /// behave as in [`get_rows`](Self::get_rows).
    ///
    /// A header whose names were all filtered out yields empty records here;
    /// [`rows`](Self::rows) keeps such rows positional instead.
    pub fn get_rows_as_table(
        &mut self,
        offset: usize,
        limit: usize,
        ignore_blank_headers: bool,
    ) -> Result<Vec<IndexedRecord>> {
        if self.reader.header().is_none() {
            self.reader.capture_header(ignore_blank_headers)?;
        }
        let rows = self
            .get_rows(offset, limit)?
            .into_iter()
            .map(|record| self.index(record))
            .collect();
        Ok(rows)
    }

    /// The live reader, for step-by-step iteration with whatever header,
    /// offset and limit are configured.
    pub fn iterate(&mut self) -> &mut RecordReader<File> {
        &mut self.reader
    }

    /// Std iterator over the remaining rows.
    pub fn rows(&mut self) -> Rows<'_, File> {
        self.reader.rows()
    }

    pub fn into_reader(self) -> RecordReader<File> {
        self.reader
    }

    fn index(&self, record: Record) -> IndexedRecord {
        match self.reader.header() {
            Some(header) => header.index(record),
            None => IndexedRecord::new(),
        }
    }
}

impl<'a> IntoIterator for &'a mut DelimitedTableParser {
    type Item = Result<Row>;
    type IntoIter = Rows<'a, File>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
