use anyhow::Result;
use arrow::{
    array::{Array, ArrayRef},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

use crate::table::{column, numeric_values, replace_column, sales_columns};

/// Turn every monthly sales column into `Float64`. Cells that do not parse
/// become missing.
pub fn coerce_sales_columns(table: &RecordBatch) -> Result<RecordBatch> {
    let mut out = table.clone();
    for name in sales_columns(table) {
        let before = column(&out, &name)?.null_count();
        let values = numeric_values(column(&out, &name)?)?;
        let coerced = values.null_count() - before;
        if coerced > 0 {
            debug!(column = %name, coerced, "unparsable sales values set to missing");
        }
        out = replace_column(&out, &name, Arc::new(values) as ArrayRef)?;
    }
    Ok(out)
}
