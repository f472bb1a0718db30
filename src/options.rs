//! Parser construction options.

/// How a [`DelimitedTableParser`](crate::DelimitedTableParser) prepares its
/// reader at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Capture the first record as the header. Default: `false`.
    pub as_table: bool,
    /// Drop header names that are blank after trimming. Default: `true`.
    pub ignore_blank_headers: bool,
    /// Records to skip before yielding. Default: `0`.
    pub offset: usize,
    /// Maximum records to yield, `0` for no cap. Default: `0`.
    pub limit: usize,
    /// Field delimiter. Default: `None`, detected from the first line
    /// among `;`, `,`, tab and `|`.
    pub delimiter: Option<u8>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            as_table: false,
            ignore_blank_headers: true,
            offset: 0,
            limit: 0,
            delimiter: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_table(mut self, as_table: bool) -> Self {
        self.as_table = as_table;
        self
    }

    pub fn ignore_blank_headers(mut self, ignore: bool) -> Self {
        self.ignore_blank_headers = ignore;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}
