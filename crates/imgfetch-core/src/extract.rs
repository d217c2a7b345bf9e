//! Reference extractor: flattens the image columns of validated records.

use crate::table::Record;

/// Collects non-empty image locations row by row, columns in `image_columns`
/// order. Locations are not validated here.
pub fn extract_references(records: &[Record], image_columns: &[String]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| {
            image_columns
                .iter()
                .filter_map(move |col| record.get(col))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .collect()
}
