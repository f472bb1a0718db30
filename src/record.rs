//! Row shapes produced by the reader.
//!
//! A [`Record`] is one decoded line as positional fields. Once a [`Header`]
//! has been captured, records are re-expressed as [`IndexedRecord`]s that map
//! each header name to the value found at the same position.

use std::collections::HashMap;

/// One decoded line of delimited text.
pub type Record = Vec<String>;

/// Field names taken from the first record of a parse session.
///
/// Names keep their relative order. When blank names are filtered out the
/// remaining names are renumbered, so data field `i` always pairs with
/// `names()[i]` rather than with its original column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Build a header from a raw record.
    ///
    /// With `ignore_blank` set, fields that are empty after trimming
    /// surrounding whitespace are dropped.
    pub fn new(fields: Record, ignore_blank: bool) -> Self {
        let names = if ignore_blank {
            fields
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect()
        } else {
            fields
        };
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pair a record with this header.
    ///
    /// Missing trailing values become empty strings and fields beyond the
    /// header length are dropped. A repeated name keeps the last value.
    pub fn index(&self, record: Record) -> IndexedRecord {
        let mut values = record.into_iter();
        let mut indexed = IndexedRecord::with_capacity(self.names.len());
        for name in &self.names {
            indexed.insert(name.clone(), values.next().unwrap_or_default());
        }
        indexed
    }
}

/// A record keyed by header name, in header order.
///
/// Lookups and inserts go through a name index, so pairing a row with a
/// wide header stays linear in the number of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedRecord {
    fields: Vec<(String, String)>,
    /// Position of each name in `fields`.
    positions: HashMap<String, usize>,
}

impl IndexedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Set the value for `name`, returning the previous value if the name
    /// was already present. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        match self.positions.get(&name) {
            Some(&pos) => Some(std::mem::replace(&mut self.fields[pos].1, value)),
            None => {
                self.positions.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&pos| self.fields[pos].1.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IndexedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = IndexedRecord::new();
        for (key, value) in iter {
            record.insert(key.into(), value.into());
        }
        record
    }
}

/// A row yielded by the reader: positional until a header is captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Plain(Record),
    Indexed(IndexedRecord),
}

impl Row {
    pub fn as_plain(&self) -> Option<&Record> {
        match self {
            Row::Plain(record) => Some(record),
            Row::Indexed(_) => None,
        }
    }

    pub fn as_indexed(&self) -> Option<&IndexedRecord> {
        match self {
            Row::Indexed(record) => Some(record),
            Row::Plain(_) => None,
        }
    }

    pub fn into_plain(self) -> Option<Record> {
        match self {
            Row::Plain(record) => Some(record),
            Row::Indexed(_) => None,
        }
    }

    pub fn into_indexed(self) -> Option<IndexedRecord> {
        match self {
            Row::Indexed(record) => Some(record),
            Row::Plain(_) => None,
        }
    }
}
