use anyhow::{bail, Context, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs::File,
    io::{BufReader, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};
use tracing::{debug, info};

use super::{sales_columns, REQUIRED_COLUMNS};

const BATCH_SIZE: usize = 8192;

/// Cells read as missing: the usual null markers of dataframe tooling.
static NULL_VALUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(|NA|N/A|n/a|NaN|nan|-NaN|-nan|null|NULL|None|#N/A|#NA|<NA>)$")
        .expect("null marker pattern is valid")
});

/// Read the CSV at `path` into a single table, inferring a type per column
/// from every record.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    // 1) infer the schema over the whole file
    let format = Format::default()
        .with_header(true)
        .with_null_regex(NULL_VALUES.clone());
    let (schema, records) = format
        .infer_schema(BufReader::new(&mut file), None)
        .with_context(|| format!("CSV parse error while inferring schema of {:?}", path))?;
    let schema = Arc::new(schema);
    debug!(records, fields = schema.fields().len(), "inferred schema");

    // 2) rewind and decode every record with that schema
    file.seek(SeekFrom::Start(0))
        .with_context(|| format!("Failed to rewind {:?}", path))?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_null_regex(NULL_VALUES.clone())
        .with_batch_size(BATCH_SIZE)
        .build(BufReader::new(file))
        .context("creating CSV reader")?;
    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("CSV parse error in {:?}", path))?;

    let table = concat_batches(&schema, &batches).context("concatenating CSV batches")?;
    ensure_required_columns(&table)?;

    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        sales_columns = sales_columns(&table).len(),
        "loaded table"
    );
    Ok(table)
}

fn ensure_required_columns(table: &RecordBatch) -> Result<()> {
    let schema = table.schema();
    for name in REQUIRED_COLUMNS {
        if schema.column_with_name(name).is_none() {
            bail!("required column `{}` is missing from the input", name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{init_test_logging, table_from_csv};
    use arrow::array::Array;
    use arrow::datatypes::DataType;

    const HEADER: &str =
        "product_id,product_name,category,price,review_score,review_count,sales_month_1,sales_month_2";

    #[test]
    fn infers_types_and_reads_nulls() -> Result<()> {
        let csv = format!(
            "{HEADER}\n\
             1,Lamp,Home,19.99,4.5,10,5,7\n\
             2,,Books,12.00,3.9,4,N/A,abc\n"
        );
        let table = table_from_csv(&csv)?;
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 8);

        let schema = table.schema();
        assert_eq!(schema.field_with_name("product_id")?.data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("price")?.data_type(), &DataType::Float64);
        assert_eq!(schema.field_with_name("sales_month_1")?.data_type(), &DataType::Int64);
        assert_eq!(schema.field_with_name("sales_month_2")?.data_type(), &DataType::Utf8);

        assert_eq!(table.column_by_name("product_name").unwrap().null_count(), 1);
        assert_eq!(table.column_by_name("sales_month_1").unwrap().null_count(), 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        init_test_logging();
        let err = load_table("/definitely/not/here.csv").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to open CSV file"));
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let csv = format!("{HEADER}\n1,Lamp,Home,19.99,4.5,10,5,7\n2,Desk\n");
        assert!(table_from_csv(&csv).is_err());
    }

    #[test]
    fn missing_required_column_is_named() {
        let err = table_from_csv("product_id,product_name,category,price\n1,a,b,2\n").unwrap_err();
        assert!(err.to_string().contains("review_score"));
    }

    #[test]
    fn header_only_file_loads_empty() -> Result<()> {
        let table = table_from_csv(&format!("{HEADER}\n"))?;
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 8);
        Ok(())
    }
}
