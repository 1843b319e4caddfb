// src/summary/mod.rs
pub mod describe;

use anyhow::Result;
use arrow::{array::Array, record_batch::RecordBatch};
use prettytable::{format, Cell, Row, Table};
use std::{collections::HashSet, io::Write};

use crate::stats::{mean, sorted_present};
use crate::table::{
    column, numeric_values, string_values, CATEGORY, PRICE, REVIEW_COUNT, REVIEW_SCORE,
};
pub use describe::{describe, ColumnStats};

/// How a missing category shows up in the distinct-value listing.
pub const MISSING_LABEL: &str = "<missing>";

/// Everything printed about the raw table before cleaning.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    /// Column name → Arrow data type.
    pub dtypes: Vec<(String, String)>,
    pub numeric: Vec<ColumnStats>,
    pub mean_price: Option<f64>,
    pub mean_review_score: Option<f64>,
    pub mean_review_count: Option<f64>,
    /// Column name → null count.
    pub missing: Vec<(String, usize)>,
    /// Distinct categories in first-appearance order; `None` is missing.
    pub categories: Vec<Option<String>>,
}

impl DatasetSummary {
    pub fn from_table(table: &RecordBatch) -> Result<Self> {
        let schema = table.schema();
        let dtypes = schema
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), f.data_type().to_string()))
            .collect();
        let missing = schema
            .fields()
            .iter()
            .zip(table.columns())
            .map(|(f, a)| (f.name().to_string(), a.null_count()))
            .collect();

        Ok(Self {
            rows: table.num_rows(),
            columns: table.num_columns(),
            dtypes,
            numeric: describe(table)?,
            mean_price: column_mean(table, PRICE)?,
            mean_review_score: column_mean(table, REVIEW_SCORE)?,
            mean_review_count: column_mean(table, REVIEW_COUNT)?,
            missing,
            categories: distinct_categories(table)?,
        })
    }

    /// Emit the report sections in their fixed order.
    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Dimensions of the dataset:")?;
        writeln!(out, "Rows: {}, Columns: {}\n", self.rows, self.columns)?;

        writeln!(out, "Column Names and Data Types:")?;
        let mut dtypes = plain_table();
        for (name, ty) in &self.dtypes {
            dtypes.add_row(Row::new(vec![Cell::new(name), Cell::new(ty)]));
        }
        dtypes.print(out)?;
        writeln!(out, "\n")?;

        writeln!(out, "Summary Statistics for Numerical Columns:")?;
        self.describe_table().print(out)?;
        writeln!(out, "\n")?;

        writeln!(out, "Mean Values:")?;
        writeln!(out, "Mean Price: {}", fmt_fixed(self.mean_price, 2))?;
        writeln!(out, "Mean Review Score: {}", fmt_fixed(self.mean_review_score, 2))?;
        writeln!(out, "Mean Review Count: {}", fmt_fixed(self.mean_review_count, 2))?;
        writeln!(out, "\n")?;

        writeln!(out, "Missing Values per Column:")?;
        let mut missing = plain_table();
        for (name, n) in &self.missing {
            missing.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&n.to_string()).style_spec("r"),
            ]));
        }
        missing.print(out)?;
        writeln!(out, "\n")?;

        writeln!(out, "Unique Categories in 'category':")?;
        let listed: Vec<String> = self
            .categories
            .iter()
            .map(|c| match c {
                Some(c) => format!("'{}'", c),
                None => MISSING_LABEL.to_string(),
            })
            .collect();
        writeln!(out, "[{}]", listed.join(", "))?;
        Ok(())
    }

    fn describe_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let mut header = vec![Cell::new("")];
        header.extend(self.numeric.iter().map(|s| Cell::new(&s.name).style_spec("b")));
        table.add_row(Row::new(header));

        let rows: [(&str, fn(&ColumnStats) -> Option<f64>); 8] = [
            ("count", |s: &ColumnStats| Some(s.count as f64)),
            ("mean", |s: &ColumnStats| s.mean),
            ("std", |s: &ColumnStats| s.std),
            ("min", |s: &ColumnStats| s.min),
            ("25%", |s: &ColumnStats| s.q1),
            ("50%", |s: &ColumnStats| s.median),
            ("75%", |s: &ColumnStats| s.q3),
            ("max", |s: &ColumnStats| s.max),
        ];
        for (label, get) in rows {
            let mut cells = vec![Cell::new(label).style_spec("b")];
            cells.extend(
                self.numeric
                    .iter()
                    .map(|s| Cell::new(&fmt_fixed(get(s), 6)).style_spec("r")),
            );
            table.add_row(Row::new(cells));
        }
        table
    }
}

fn plain_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table
}

fn fmt_fixed(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => "NaN".to_string(),
    }
}

fn column_mean(table: &RecordBatch, name: &str) -> Result<Option<f64>> {
    let values = numeric_values(column(table, name)?)?;
    Ok(mean(&sorted_present(values.iter())))
}

fn distinct_categories(table: &RecordBatch) -> Result<Vec<Option<String>>> {
    let values = string_values(column(table, CATEGORY)?)?;
    let mut seen = HashSet::new();
    Ok(values
        .iter()
        .filter(|v| seen.insert(*v))
        .map(|v| v.map(str::to_string))
        .collect())
}
