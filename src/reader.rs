//! Stateful cursor over a delimited stream.
//!
//! A [`RecordReader`] sequences calls to the tokenizer and applies header,
//! offset and limit policy on top. Iteration is external and split into
//! three steps, which callers must run in this order:
//!
//! 1. [`has_more`](RecordReader::has_more) checks availability without
//!    consuming input,
//! 2. [`next_record`](RecordReader::next_record) reads the value for the
//!    current position,
//! 3. [`advance`](RecordReader::advance) moves the row counter forward.
//!
//! Reading without checking first may run past the limit. [`Rows`] wraps
//! the sequence into a std [`Iterator`].
//!
//! Configuration is cumulative. [`apply_offset`](RecordReader::apply_offset)
//! skips from wherever the stream currently is, so calling it twice skips
//! both amounts. [`reset`](RecordReader::reset) only rewinds the row
//! counter; the stream is never rewound.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, trace};

use crate::error::Result;
use crate::record::{Header, Record, Row};

/// Cursor over the records of one delimited stream.
pub struct RecordReader<R = File> {
    /// `None` once the stream has been released.
    inner: Option<csv::Reader<R>>,
    delimiter: u8,
    header: Option<Header>,
    /// 0 means unbounded.
    limit: usize,
    row_counter: usize,
    /// Record read ahead by `has_more`, handed out by the next read.
    lookahead: Option<Record>,
    buf: ByteRecord,
}

impl RecordReader<File> {
    /// Open the file at `path` for reading with `delimiter`.
    pub fn open(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened delimited file");
        Ok(Self::from_reader(file, delimiter))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap an already open stream.
    pub fn from_reader(rdr: R, delimiter: u8) -> Self {
        let inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);
        Self {
            inner: Some(inner),
            delimiter,
            header: None,
            limit: 0,
            row_counter: 0,
            lookahead: None,
            buf: ByteRecord::new(),
        }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The configured limit, if any.
    pub fn limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    /// Number of records yielded since the last reset.
    pub fn position(&self) -> usize {
        self.row_counter
    }

    /// Read the next record as the header.
    ///
    /// Should be called before offset and limit so the header is the first
    /// record of the stream. An exhausted stream yields an empty header.
    pub fn capture_header(&mut self, ignore_blank: bool) -> Result<&mut Self> {
        let fields = self.read_raw()?.unwrap_or_default();
        let header = Header::new(fields, ignore_blank);
        debug!(columns = header.len(), ignore_blank, "captured header");
        self.header = Some(header);
        Ok(self)
    }

    /// Read and discard `n` records from the current position.
    ///
    /// Repeated calls accumulate.
    pub fn apply_offset(&mut self, n: usize) -> Result<&mut Self> {
        let mut skipped = 0;
        while skipped < n && self.read_raw()?.is_some() {
            skipped += 1;
        }
        if n > 0 {
            debug!(requested = n, skipped, "applied offset");
        }
        Ok(self)
    }

    /// Cap the number of records yielded, counted by the row counter.
    /// `0` removes the cap.
    pub fn set_limit(&mut self, n: usize) -> &mut Self {
        if n != self.limit {
            debug!(limit = n, "set row limit");
        }
        self.limit = n;
        self
    }

    /// Whether another record can be read within the limit.
    ///
    /// Probes the stream by reading one record ahead and keeping it for the
    /// next read, so no input is lost.
    pub fn has_more(&mut self) -> Result<bool> {
        if self.limit > 0 && self.row_counter >= self.limit {
            return Ok(false);
        }
        if self.lookahead.is_none() {
            self.lookahead = self.read_stream()?;
        }
        Ok(self.lookahead.is_some())
    }

    /// Read the record at the current position.
    ///
    /// Yields a [`Row::Indexed`] once a non-empty header has been captured,
    /// otherwise a [`Row::Plain`]. A header whose names were all filtered
    /// out counts as no header. Does not move the row counter.
    pub fn next_record(&mut self) -> Result<Option<Row>> {
        let Some(record) = self.read_raw()? else {
            return Ok(None);
        };
        Ok(Some(match &self.header {
            Some(header) if !header.is_empty() => Row::Indexed(header.index(record)),
            _ => Row::Plain(record),
        }))
    }

    /// Read the record at the current position, ignoring any header.
    pub fn next_plain(&mut self) -> Result<Option<Record>> {
        self.read_raw()
    }

    /// Move the row counter to the next position.
    pub fn advance(&mut self) {
        self.row_counter += 1;
    }

    /// Rewind the row counter to zero. The stream stays where it is.
    pub fn reset(&mut self) {
        self.row_counter = 0;
    }

    /// Release the underlying stream. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            self.lookahead = None;
            debug!(rows = self.row_counter, "closed delimited stream");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Iterate over the remaining rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }

    fn read_raw(&mut self) -> Result<Option<Record>> {
        match self.lookahead.take() {
            Some(record) => Ok(Some(record)),
            None => self.read_stream(),
        }
    }

    fn read_stream(&mut self) -> Result<Option<Record>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        if !inner.read_byte_record(&mut self.buf)? {
            return Ok(None);
        }
        let record: Record = self
            .buf
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        trace!(fields = record.len(), "read record");
        Ok(Some(record))
    }
}

/// Std iterator over a [`RecordReader`].
///
/// Each step runs `has_more`, `next_record` and `advance`. Dropping it early
/// leaves the reader where the last read stopped.
pub struct Rows<'a, R> {
    reader: &'a mut RecordReader<R>,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.has_more() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
        }
        let row = self.reader.next_record().transpose()?;
        self.reader.advance();
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DATA: &str = "id,name\n1,Ann\n2,Bob\n3,Cid\n4,Dee\n";

    fn reader(data: &str) -> RecordReader<Cursor<Vec<u8>>> {
        RecordReader::from_reader(Cursor::new(data.as_bytes().to_vec()), b',')
    }

    fn drain(reader: &mut RecordReader<Cursor<Vec<u8>>>) -> Vec<Row> {
        reader.rows().collect::<Result<Vec<_>>>().unwrap()
    }

    fn plain(fields: &[&str]) -> Row {
        Row::Plain(fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_plain_rows() {
        let mut r = reader("a,b\nc,d\n");
        assert_eq!(drain(&mut r), vec![plain(&["a", "b"]), plain(&["c", "d"])]);
    }

    #[test]
    fn test_has_more_does_not_consume() {
        let mut r = reader("a\nb\n");
        assert!(r.has_more().unwrap());
        assert!(r.has_more().unwrap());
        assert_eq!(r.next_record().unwrap(), Some(plain(&["a"])));
        r.advance();
        assert!(r.has_more().unwrap());
        assert_eq!(r.next_record().unwrap(), Some(plain(&["b"])));
        r.advance();
        assert!(!r.has_more().unwrap());
        assert_eq!(r.next_record().unwrap(), None);
    }

    #[test]
    fn test_empty_stream() {
        let mut r = reader("");
        assert!(!r.has_more().unwrap());
        assert_eq!(r.next_record().unwrap(), None);
    }

    #[test]
    fn test_header_indexes_rows() {
        let mut r = reader(DATA);
        r.capture_header(true).unwrap();
        let rows = drain(&mut r);
        assert_eq!(rows.len(), 4);
        let first = rows[0].as_indexed().unwrap();
        assert_eq!(first.get("id"), Some("1"));
        assert_eq!(first.get("name"), Some("Ann"));
    }

    #[test]
    fn test_next_plain_ignores_header() {
        let mut r = reader(DATA);
        r.capture_header(true).unwrap();
        assert_eq!(r.next_plain().unwrap(), Some(vec!["1".to_string(), "Ann".to_string()]));
    }

    #[test]
    fn test_offset_after_header_skips_data() {
        let mut r = reader(DATA);
        r.capture_header(true).unwrap().apply_offset(2).unwrap();
        let rows = drain(&mut r);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_indexed().unwrap().get("id"), Some("3"));
    }

    #[test]
    fn test_offset_before_header_counts_header() {
        let mut r = reader(DATA);
        r.apply_offset(1).unwrap().capture_header(true).unwrap();
        assert_eq!(r.header().unwrap().names(), ["1", "Ann"]);
    }

    #[test]
    fn test_offset_accumulates() {
        let mut r = reader(DATA);
        r.apply_offset(1).unwrap();
        r.apply_offset(1).unwrap();
        assert_eq!(r.next_plain().unwrap(), Some(vec!["2".to_string(), "Bob".to_string()]));
    }

    #[test]
    fn test_offset_past_end() {
        let mut r = reader(DATA);
        r.apply_offset(100).unwrap();
        assert!(!r.has_more().unwrap());
    }

    #[test]
    fn test_offset_consumes_lookahead() {
        let mut r = reader("a\nb\nc\n");
        assert!(r.has_more().unwrap());
        r.apply_offset(1).unwrap();
        assert_eq!(r.next_record().unwrap(), Some(plain(&["b"])));
    }

    #[test]
    fn test_limit() {
        let mut r = reader(DATA);
        r.capture_header(true).unwrap().set_limit(3);
        assert_eq!(r.limit(), Some(3));
        assert_eq!(drain(&mut r).len(), 3);
        assert_eq!(r.position(), 3);
        assert!(!r.has_more().unwrap());
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut r = reader(DATA);
        r.set_limit(2).set_limit(0);
        assert_eq!(r.limit(), None);
        assert_eq!(drain(&mut r).len(), 5);
    }

    #[test]
    fn test_limit_larger_than_input() {
        let mut r = reader(DATA);
        r.set_limit(50);
        assert_eq!(drain(&mut r).len(), 5);
    }

    #[test]
    fn test_reset_rewinds_counter_not_stream() {
        let mut r = reader(DATA);
        r.capture_header(true).unwrap().set_limit(2);
        let first = drain(&mut r);
        assert_eq!(first.len(), 2);
        assert!(!r.has_more().unwrap());

        r.reset();
        assert_eq!(r.position(), 0);
        let second = drain(&mut r);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].as_indexed().unwrap().get("id"), Some("3"));
    }

    #[test]
    fn test_early_stop_keeps_position() {
        let mut r = reader("a\nb\nc\nd\n");
        let taken: Vec<Row> = r.rows().take(2).map(|row| row.unwrap()).collect();
        assert_eq!(taken, vec![plain(&["a"]), plain(&["b"])]);
        assert_eq!(r.position(), 2);
        assert_eq!(r.next_record().unwrap(), Some(plain(&["c"])));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut r = reader(DATA);
        assert!(r.has_more().unwrap());
        r.close();
        r.close();
        assert!(r.is_closed());
        assert!(!r.has_more().unwrap());
        assert_eq!(r.next_record().unwrap(), None);
    }

    #[test]
    fn test_quoted_fields() {
        let mut r = reader("\"a,b\",\"\"\"q\"\"\"\n\"multi\nline\",x\n");
        assert_eq!(
            drain(&mut r),
            vec![plain(&["a,b", "\"q\""]), plain(&["multi\nline", "x"])]
        );
    }

    #[test]
    fn test_other_delimiter() {
        let mut r = RecordReader::from_reader(Cursor::new(b"a;b,c\n".to_vec()), b';');
        assert_eq!(r.delimiter(), b';');
        assert_eq!(r.next_record().unwrap(), Some(plain(&["a", "b,c"])));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut r = RecordReader::from_reader(Cursor::new(b"caf\xe9,x\n".to_vec()), b',');
        assert_eq!(r.next_record().unwrap(), Some(plain(&["caf\u{fffd}", "x"])));
    }

    #[test]
    fn test_all_blank_header_keeps_rows_positional() {
        let mut r = reader(" , \n1,2\n");
        r.capture_header(true).unwrap();
        assert!(r.header().unwrap().is_empty());
        assert_eq!(drain(&mut r), vec![plain(&["1", "2"])]);
    }

    #[test]
    fn test_blank_header_kept_when_not_ignored() {
        let mut r = reader(" , \n1,2\n");
        r.capture_header(false).unwrap();
        let rows = drain(&mut r);
        let row = rows[0].as_indexed().unwrap();
        assert_eq!(row.get(" "), Some("2"));
    }

    #[test]
    fn test_empty_header_on_exhausted_stream() {
        let mut r = reader("");
        r.capture_header(true).unwrap();
        assert!(r.header().unwrap().is_empty());
        assert!(!r.has_more().unwrap());
    }
}
