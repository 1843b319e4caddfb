use anyhow::Result;
use arrow::{array::Array, compute::sum, record_batch::RecordBatch};
use prettytable::{format, Cell, Row, Table};
use std::{collections::BTreeMap, io::Write};

use crate::stats::pearson;
use crate::table::{
    column, numeric_values, sales_columns, string_values, CATEGORY, PRICE, REVIEW_COUNT,
    REVIEW_SCORE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub column: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySales {
    pub category: String,
    pub total: f64,
}

/// Square matrix of Pearson coefficients; `values[i][j]` pairs
/// `labels[i]` with `labels[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Views derived from the cleaned table for the report and the charts.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub monthly: Vec<MonthlySales>,
    pub categories: Vec<CategorySales>,
    pub correlation: CorrelationMatrix,
}

impl Aggregates {
    pub fn from_table(table: &RecordBatch) -> Result<Self> {
        Ok(Self {
            monthly: monthly_sales(table)?,
            categories: category_sales(table)?,
            correlation: correlation_matrix(table, &correlation_columns(table))?,
        })
    }

    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Monthly Sales Totals:")?;
        let mut monthly = Table::new();
        monthly.set_format(*format::consts::FORMAT_CLEAN);
        for m in &self.monthly {
            monthly.add_row(Row::new(vec![
                Cell::new(&m.column),
                Cell::new(&format!("{:.2}", m.total)).style_spec("r"),
            ]));
        }
        monthly.print(out)?;
        writeln!(out)?;

        writeln!(out, "Sales by Category:")?;
        let mut categories = Table::new();
        categories.set_format(*format::consts::FORMAT_CLEAN);
        for c in &self.categories {
            categories.add_row(Row::new(vec![
                Cell::new(&c.category),
                Cell::new(&format!("{:.2}", c.total)).style_spec("r"),
            ]));
        }
        categories.print(out)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Total of each sales column over all rows, in column order. Missing
/// values add nothing.
pub fn monthly_sales(table: &RecordBatch) -> Result<Vec<MonthlySales>> {
    sales_columns(table)
        .into_iter()
        .map(|name| {
            let values = numeric_values(column(table, &name)?)?;
            Ok(MonthlySales {
                total: sum(&values).unwrap_or(0.0),
                column: name,
            })
        })
        .collect()
}

/// Sum of every sales value per category, largest first. Rows without a
/// category belong to no group.
pub fn category_sales(table: &RecordBatch) -> Result<Vec<CategorySales>> {
    let categories = string_values(column(table, CATEGORY)?)?;
    let sales = sales_columns(table)
        .iter()
        .map(|name| numeric_values(column(table, name)?))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (row, category) in categories.iter().enumerate() {
        let Some(category) = category else {
            continue;
        };
        let row_total: f64 = sales
            .iter()
            .filter(|col| col.is_valid(row))
            .map(|col| col.value(row))
            .sum();
        *groups.entry(category.to_string()).or_default() += row_total;
    }

    let mut out: Vec<CategorySales> = groups
        .into_iter()
        .map(|(category, total)| CategorySales { category, total })
        .collect();
    // stable: equal totals stay in ascending name order
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    Ok(out)
}

/// `price`, `review_score`, `review_count`, then every sales column.
pub fn correlation_columns(table: &RecordBatch) -> Vec<String> {
    let mut cols: Vec<String> = [PRICE, REVIEW_SCORE, REVIEW_COUNT]
        .iter()
        .map(|s| s.to_string())
        .collect();
    cols.extend(sales_columns(table));
    cols
}

pub fn correlation_matrix(table: &RecordBatch, columns: &[String]) -> Result<CorrelationMatrix> {
    let data = columns
        .iter()
        .map(|name| {
            let values = numeric_values(column(table, name)?)?;
            Ok(values.iter().collect::<Vec<Option<f64>>>())
        })
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.to_vec(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_table;
    use crate::test_support::table_from_csv;

    const HEADER: &str =
        "product_id,product_name,category,price,review_score,review_count,sales_month_1,sales_month_2\n";

    #[test]
    fn monthly_totals_follow_column_order() -> Result<()> {
        let table = table_from_csv(&format!(
            "{HEADER}1,a,x,10.0,4.0,1,5,1\n2,b,y,10.0,4.0,2,N/A,2\n3,c,y,10.0,4.0,3,2,3\n"
        ))?;
        let monthly = monthly_sales(&table)?;
        assert_eq!(
            monthly,
            vec![
                MonthlySales {
                    column: "sales_month_1".into(),
                    total: 7.0,
                },
                MonthlySales {
                    column: "sales_month_2".into(),
                    total: 6.0,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn boolean_sales_count_as_one_and_zero() -> Result<()> {
        let table = table_from_csv(&format!(
            "{HEADER}1,a,x,10.0,4.0,1,true,1\n2,b,x,10.0,4.0,2,false,2\n"
        ))?;
        let monthly = monthly_sales(&table)?;
        assert_eq!(monthly[0].total, 1.0);
        Ok(())
    }

    #[test]
    fn normalized_categories_share_one_group() -> Result<()> {
        let raw = table_from_csv(&format!(
            "{HEADER}1,a,\" Books \",10.0,4.0,1,1,2\n\
             2,b,BOOKS,10.0,4.0,1,3,4\n\
             3,c,books,10.0,4.0,1,5,6\n\
             4,d,Toys,10.0,4.0,1,100,0\n\
             5,e,,10.0,4.0,1,50,50\n"
        ))?;
        let (cleaned, _) = clean_table(&raw)?;
        let totals = category_sales(&cleaned)?;
        assert_eq!(
            totals,
            vec![
                CategorySales {
                    category: "toys".into(),
                    total: 100.0,
                },
                CategorySales {
                    category: "books".into(),
                    total: 21.0,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn category_totals_are_non_increasing() -> Result<()> {
        let table = table_from_csv(&format!(
            "{HEADER}1,a,c,1.0,1.0,1,1,1\n2,b,a,1.0,1.0,1,9,9\n3,c,b,1.0,1.0,1,4,\n4,d,d,1.0,1.0,1,4,\n"
        ))?;
        let totals = category_sales(&table)?;
        assert!(totals.windows(2).all(|w| w[0].total >= w[1].total));
        // ties keep name order
        let names: Vec<&str> = totals.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "d", "c"]);
        Ok(())
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() -> Result<()> {
        let table = table_from_csv(&format!(
            "{HEADER}1,a,x,10.0,1.0,5,1,4\n2,b,x,20.0,2.0,3,2,3\n3,c,x,30.0,3.0,9,3,2\n4,d,x,40.0,4.0,1,4,1\n"
        ))?;
        let cols = correlation_columns(&table);
        assert_eq!(cols.len(), 5);
        let m = correlation_matrix(&table, &cols)?;
        for i in 0..5 {
            assert!((m.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..5 {
                assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
            }
        }
        // price rises with review_score and falls with sales_month_2
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
        assert!((m.values[0][4] + 1.0).abs() < 1e-12);
        Ok(())
    }
}
