//! One parsed CSV row keyed by header name.

use std::collections::HashMap;

/// Column name → value for a single data row. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Pairs header names with row fields. Header columns without a field map
    /// to `""`; fields beyond the header are ignored. A repeated header name
    /// keeps the right-most value.
    pub(crate) fn from_row(headers: &csv::StringRecord, row: &csv::StringRecord) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), row.get(i).unwrap_or("").to_string()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
