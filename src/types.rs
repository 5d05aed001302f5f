//! Header and record types

use crate::error::{CsvFoldError, Result};
use indexmap::IndexMap;
use std::fmt;

/// Ordered column names keying every record of one read
///
/// Always holds at least one name. Names are not required to be unique;
/// see [`Record::from_fields`] for how duplicates resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    names: Vec<String>,
}

impl HeaderSet {
    /// Build a header set, rejecting an empty list
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CsvFoldError::MissingHeaders);
        }
        Ok(HeaderSet { names })
    }

    /// Column names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Never true for a set built through [`HeaderSet::new`]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over column names
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    /// Check whether a column name is present
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl fmt::Display for HeaderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}

/// One line of input keyed by header name
///
/// Values stay raw strings; the reader performs no type coercion.
/// Iteration follows header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip headers with field values by position
    ///
    /// Values past the last header are dropped. Headers past the last value
    /// are left absent, not defaulted to an empty string. A repeated header
    /// keeps its first position and takes the later value.
    pub fn from_fields<I>(headers: &HeaderSet, values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut fields = IndexMap::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(values) {
            fields.insert(header.clone(), value);
        }
        Record { fields }
    }

    /// Get a field value by header name
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    /// Check whether a header has a value in this record
    pub fn contains_key(&self, header: &str) -> bool {
        self.fields.contains_key(header)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(header, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Header names present in this record
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// Take the underlying map
    pub fn into_map(self) -> IndexMap<String, String> {
        self.fields
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl std::ops::Index<&str> for Record {
    type Output = str;

    /// Panics if the header is absent
    fn index(&self, header: &str) -> &str {
        match self.get(header) {
            Some(v) => v,
            None => panic!("no field named '{}' in record", header),
        }
    }
}
