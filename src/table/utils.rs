use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, AsArray, Float64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Float64Type, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::SALES_MONTH;

/// Parse a cell as a number after trimming; anything unparsable (or NaN) is
/// missing.
pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Look up a column by name.
pub fn column<'a>(table: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    table
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column `{}` not found", name))
}

/// Names of the monthly sales columns, in column order.
pub fn sales_columns(table: &RecordBatch) -> Vec<String> {
    table
        .schema()
        .fields()
        .iter()
        .filter(|f| f.name().contains(SALES_MONTH))
        .map(|f| f.name().to_string())
        .collect()
}

/// View any column as `Float64`. Booleans become 1/0. Text is parsed cell by
/// cell; cells that do not parse become null.
pub fn numeric_values(array: &ArrayRef) -> Result<Float64Array> {
    match array.data_type() {
        DataType::Float64 => Ok(array.as_primitive::<Float64Type>().clone()),
        dt if dt.is_numeric() || dt == &DataType::Boolean => {
            let cast_arr = cast(array, &DataType::Float64)
                .with_context(|| format!("casting {} to Float64", dt))?;
            Ok(cast_arr.as_primitive::<Float64Type>().clone())
        }
        _ => {
            let sarr = string_values(array)?;
            Ok(sarr.iter().map(|opt| opt.and_then(parse_f64)).collect())
        }
    }
}

/// View any column as UTF-8 text.
pub fn string_values(array: &ArrayRef) -> Result<StringArray> {
    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().clone()),
        dt => {
            let cast_arr =
                cast(array, &DataType::Utf8).with_context(|| format!("casting {} to Utf8", dt))?;
            Ok(cast_arr.as_string::<i32>().clone())
        }
    }
}

/// Swap the column called `name` for `values`, adopting its data type.
pub fn replace_column(table: &RecordBatch, name: &str, values: ArrayRef) -> Result<RecordBatch> {
    let schema = table.schema();
    let idx = schema
        .index_of(name)
        .with_context(|| format!("column `{}` not found", name))?;

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if i == idx {
                f.as_ref()
                    .clone()
                    .with_data_type(values.data_type().clone())
                    .with_nullable(true)
            } else {
                f.as_ref().clone()
            }
        })
        .collect();

    let mut columns = table.columns().to_vec();
    columns[idx] = values;

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .with_context(|| format!("rebuilding table with new `{}` column", name))
}
