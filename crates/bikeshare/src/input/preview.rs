//! Raw previews of auxiliary tables.

use serde::{Deserialize, Serialize};

/// First rows of a delimited table, kept as text.
///
/// Used for tables the engine does not aggregate, such as the hourly
/// companion of the daily dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    /// File name without path, empty for in-memory data.
    pub file: String,
    /// Header row.
    pub headers: Vec<String>,
    /// Leading data rows.
    pub rows: Vec<Vec<String>>,
    /// Number of data rows in the whole table.
    pub total_rows: usize,
}

impl TablePreview {
    /// Whether the table has more rows than the preview holds.
    pub fn truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}
