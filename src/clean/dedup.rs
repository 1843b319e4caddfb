use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, AsArray, BooleanArray},
    compute::filter_record_batch,
    datatypes::{DataType, Float64Type},
    record_batch::RecordBatch,
    row::{RowConverter, SortField},
};
use std::{collections::HashSet, sync::Arc};

/// Remove rows equal in every column to an earlier row. Missing values
/// compare equal to each other; survivors keep their relative order.
pub fn drop_duplicates(table: &RecordBatch) -> Result<RecordBatch> {
    if table.num_rows() == 0 {
        return Ok(table.clone());
    }

    // all-null columns hold no information to tell rows apart
    let schema = table.schema();
    let (fields, columns): (Vec<SortField>, Vec<ArrayRef>) = schema
        .fields()
        .iter()
        .zip(table.columns())
        .filter(|(f, _)| f.data_type() != &DataType::Null)
        .map(|(f, c)| (SortField::new(f.data_type().clone()), comparable(c)))
        .unzip();

    let keep: BooleanArray = if columns.is_empty() {
        (0..table.num_rows()).map(|i| Some(i == 0)).collect()
    } else {
        let converter = RowConverter::new(fields).context("building row converter")?;
        let rows = converter
            .convert_columns(&columns)
            .context("encoding rows for deduplication")?;
        let mut seen = HashSet::with_capacity(rows.num_rows());
        rows.iter().map(|row| Some(seen.insert(row))).collect()
    };

    filter_record_batch(table, &keep).context("dropping duplicate rows")
}

/// Row encoding keeps the sign of zero, so `-0.0` is folded into `0.0`
/// before rows are compared.
fn comparable(column: &ArrayRef) -> ArrayRef {
    match column.data_type() {
        DataType::Float64 => Arc::new(
            column
                .as_primitive::<Float64Type>()
                .unary::<_, Float64Type>(|v| v + 0.0),
        ),
        _ => column.clone(),
    }
}
