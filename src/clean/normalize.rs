use anyhow::Result;
use arrow::{
    array::{ArrayRef, StringArray},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::table::{column, replace_column, string_values, CATEGORY};

/// Trimmed, lower-cased form of a category label.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Apply [`normalize_text`] to every `category` value; missing stays missing.
pub fn normalize_category(table: &RecordBatch) -> Result<RecordBatch> {
    let categories = string_values(column(table, CATEGORY)?)?;
    let normalized: StringArray = categories
        .iter()
        .map(|opt| opt.map(normalize_text))
        .collect();
    replace_column(table, CATEGORY, Arc::new(normalized) as ArrayRef)
}
