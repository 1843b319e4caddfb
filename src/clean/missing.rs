use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    compute::{filter_record_batch, is_not_null},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::table::{column, replace_column, string_values, PRODUCT_ID, PRODUCT_NAME};

/// Stand-in for a product without a name.
pub const PLACEHOLDER_NAME: &str = "Unknown Product";

/// Drop rows without a `product_id`.
pub fn drop_missing_ids(table: &RecordBatch) -> Result<RecordBatch> {
    let keep = is_not_null(column(table, PRODUCT_ID)?.as_ref())?;
    filter_record_batch(table, &keep).context("dropping rows without product_id")
}

/// Substitute [`PLACEHOLDER_NAME`] for missing `product_name` values.
pub fn fill_missing_names(table: &RecordBatch) -> Result<RecordBatch> {
    let names = string_values(column(table, PRODUCT_NAME)?)?;
    let filled: StringArray = names
        .iter()
        .map(|opt| Some(opt.unwrap_or(PLACEHOLDER_NAME)))
        .collect();
    replace_column(table, PRODUCT_NAME, Arc::new(filled) as ArrayRef)
}

pub fn handle_missing(table: &RecordBatch) -> Result<RecordBatch> {
    let with_ids = drop_missing_ids(table)?;
    fill_missing_names(&with_ids)
}
