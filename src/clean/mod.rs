// src/clean/mod.rs
pub mod convert;
pub mod dedup;
pub mod missing;
pub mod normalize;
pub mod outliers;

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use std::io::Write;
use tracing::info;

use crate::stats::IqrFences;
use crate::table::sales_columns;

pub use convert::coerce_sales_columns;
pub use dedup::drop_duplicates;
pub use missing::{drop_missing_ids, fill_missing_names, handle_missing, PLACEHOLDER_NAME};
pub use normalize::{normalize_category, normalize_text};
pub use outliers::{filter_price_outliers, price_fences};

/// Row counts after each cleaning step, plus the outlier fences used.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub after_missing: usize,
    pub after_dedup: usize,
    pub after_outliers: usize,
    pub coerced_columns: Vec<String>,
    pub price_fences: Option<IqrFences>,
}

impl CleaningReport {
    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Cleaning Report:")?;
        writeln!(out, "Rows loaded: {}", self.input_rows)?;
        writeln!(
            out,
            "Rows without product_id removed: {}",
            self.input_rows - self.after_missing
        )?;
        writeln!(
            out,
            "Duplicate rows removed: {}",
            self.after_missing - self.after_dedup
        )?;
        writeln!(
            out,
            "Sales columns converted to numeric: {}",
            self.coerced_columns.len()
        )?;
        match &self.price_fences {
            Some(f) => writeln!(
                out,
                "Price outlier bounds: [{:.2}, {:.2}] (Q1={:.2}, Q3={:.2}, IQR={:.2})",
                f.lower,
                f.upper,
                f.q1,
                f.q3,
                f.iqr()
            )?,
            None => writeln!(out, "Price outlier bounds: none (no price values)")?,
        }
        writeln!(
            out,
            "Price outliers removed: {}",
            self.after_dedup - self.after_outliers
        )?;
        writeln!(out, "Rows after cleaning: {}\n", self.after_outliers)?;
        Ok(())
    }
}

/// Run the cleaning steps in their fixed order; each step sees the output
/// of the one before it.
pub fn clean_table(table: &RecordBatch) -> Result<(RecordBatch, CleaningReport)> {
    let input_rows = table.num_rows();

    let table = handle_missing(table)?;
    let after_missing = table.num_rows();
    info!(before = input_rows, after = after_missing, "handled missing values");

    let table = drop_duplicates(&table)?;
    let after_dedup = table.num_rows();
    info!(before = after_missing, after = after_dedup, "removed duplicates");

    let coerced_columns = sales_columns(&table);
    let table = coerce_sales_columns(&table)?;
    info!(columns = coerced_columns.len(), "converted sales columns");

    let (table, price_fences) = filter_price_outliers(&table)?;
    let after_outliers = table.num_rows();
    info!(before = after_dedup, after = after_outliers, "filtered price outliers");

    let table = normalize_category(&table)?;
    info!("normalized categories");

    Ok((
        table,
        CleaningReport {
            input_rows,
            after_missing,
            after_dedup,
            after_outliers,
            coerced_columns,
            price_fences,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{column, numeric_values, string_values};
    use crate::table::{CATEGORY, PRICE, PRODUCT_ID, PRODUCT_NAME};
    use crate::test_support::table_from_csv;
    use arrow::array::Array;
    use arrow::datatypes::DataType;

    const DIRTY: &str = "product_id,product_name,category,price,review_score,review_count,sales_month_1,sales_month_2\n\
                         1,Lamp, Home ,20.0,4.1,10,5,6\n\
                         1,Lamp, Home ,20.0,4.1,10,5,6\n\
                         ,Lamp, Home ,20.0,4.1,10,5,6\n\
                         2,,BOOKS,22.0,3.5,4,N/A,2\n\
                         3,Desk,books,21.0,4.8,7,oops,1\n\
                         4,Chair,Garden,19.0,2.0,1,3,3\n\
                         5,Yacht,Garden,5000.0,5.0,1,1,1\n";

    #[test]
    fn cleaned_table_upholds_every_invariant() -> Result<()> {
        let (out, report) = clean_table(&table_from_csv(DIRTY)?)?;

        assert_eq!(report.input_rows, 7);
        assert_eq!(report.after_missing, 6);
        assert_eq!(report.after_dedup, 5);
        assert_eq!(report.after_outliers, 4);
        assert_eq!(out.num_rows(), 4);
        assert_eq!(report.coerced_columns, vec!["sales_month_1", "sales_month_2"]);

        assert_eq!(column(&out, PRODUCT_ID)?.null_count(), 0);
        assert_eq!(column(&out, PRODUCT_NAME)?.null_count(), 0);

        let schema = out.schema();
        for name in sales_columns(&out) {
            assert_eq!(schema.field_with_name(&name)?.data_type(), &DataType::Float64);
        }

        let fences = report.price_fences.unwrap();
        let prices = numeric_values(column(&out, PRICE)?)?;
        assert!(prices.iter().flatten().all(|p| fences.contains(p)));

        let cats = string_values(column(&out, CATEGORY)?)?;
        for c in cats.iter().flatten() {
            assert_eq!(c, normalize_text(c));
        }
        assert_eq!(
            cats.iter().collect::<Vec<_>>(),
            vec![Some("home"), Some("books"), Some("books"), Some("garden")]
        );

        let rebuilt = drop_duplicates(&out)?;
        assert_eq!(rebuilt.num_rows(), out.num_rows());
        Ok(())
    }

    #[test]
    fn row_differing_only_by_missing_id_is_removed_once() -> Result<()> {
        let (out, _) = clean_table(&table_from_csv(
            "product_id,product_name,category,price,review_score,review_count\n\
             7,Mug,kitchen,9.5,4.0,3\n\
             ,Mug,kitchen,9.5,4.0,3\n",
        )?)?;
        assert_eq!(out.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn report_mentions_each_step() -> Result<()> {
        let (_, report) = clean_table(&table_from_csv(DIRTY)?)?;
        let mut buf = Vec::new();
        report.write_report(&mut buf)?;
        let text = String::from_utf8(buf)?;
        assert!(text.contains("Rows without product_id removed: 1"));
        assert!(text.contains("Duplicate rows removed: 1"));
        assert!(text.contains("Price outliers removed: 1"));
        assert!(text.contains("Rows after cleaning: 4"));
        Ok(())
    }
}
