use anyhow::Result;
use arrow::record_batch::RecordBatch;

use crate::stats::{mean, quantile, sample_std, sorted_present};
use crate::table::numeric_values;

/// `count / mean / std / min / quartiles / max` of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    pub fn from_values(name: &str, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let sorted = sorted_present(values);
        Self {
            name: name.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied(),
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Describe every integer or floating-point column, in column order.
pub fn describe(table: &RecordBatch) -> Result<Vec<ColumnStats>> {
    let schema = table.schema();
    let mut out = Vec::new();
    for (field, array) in schema.fields().iter().zip(table.columns()) {
        if !field.data_type().is_numeric() {
            continue;
        }
        let values = numeric_values(array)?;
        out.push(ColumnStats::from_values(field.name(), values.iter()));
    }
    Ok(out)
}
