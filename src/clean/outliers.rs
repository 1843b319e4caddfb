use anyhow::{Context, Result};
use arrow::{array::BooleanArray, compute::filter_record_batch, record_batch::RecordBatch};
use tracing::{debug, warn};

use crate::stats::{sorted_present, IqrFences};
use crate::table::{column, numeric_values, PRICE};

/// IQR fences of the table's own `price` distribution.
pub fn price_fences(table: &RecordBatch) -> Result<Option<IqrFences>> {
    let prices = numeric_values(column(table, PRICE)?)?;
    Ok(IqrFences::from_sorted(&sorted_present(prices.iter())))
}

/// Keep rows whose `price` lies inside the IQR fences, inclusive. A missing
/// price never lies inside, and without any price every row goes.
pub fn filter_price_outliers(table: &RecordBatch) -> Result<(RecordBatch, Option<IqrFences>)> {
    let fences = price_fences(table)?;
    match &fences {
        Some(f) => debug!(q1 = f.q1, q3 = f.q3, lower = f.lower, upper = f.upper, "price fences"),
        None => warn!("no price values; every row fails the outlier filter"),
    }

    let prices = numeric_values(column(table, PRICE)?)?;
    let keep: BooleanArray = prices
        .iter()
        .map(|p| Some(matches!((p, &fences), (Some(v), Some(f)) if f.contains(v))))
        .collect();

    let filtered = filter_record_batch(table, &keep).context("filtering price outliers")?;
    Ok((filtered, fences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::table_from_csv;
    use arrow::array::AsArray;
    use arrow::datatypes::Float64Type;

    const HEADER: &str = "product_id,product_name,category,price,review_score,review_count\n";

    #[test]
    fn far_price_is_dropped() -> Result<()> {
        let table = table_from_csv(&format!(
            "{HEADER}1,a,x,10.0,4,1\n2,b,x,12.0,4,1\n3,c,x,11.0,4,1\n4,d,x,13.0,4,1\n5,e,x,1000.0,4,1\n"
        ))?;
        let (out, fences) = filter_price_outliers(&table)?;
        let fences = fences.unwrap();
        assert_eq!((fences.q1, fences.q3), (11.0, 13.0));

        let prices = column(&out, PRICE)?.as_primitive::<Float64Type>();
        assert_eq!(
            prices.iter().collect::<Vec<_>>(),
            vec![Some(10.0), Some(12.0), Some(11.0), Some(13.0)]
        );
        Ok(())
    }

    #[test]
    fn rows_without_price_are_dropped() -> Result<()> {
        let table = table_from_csv(&format!("{HEADER}1,a,x,10.5,4,1\n2,b,x,,4,1\n3,c,x,11,4,1\n"))?;
        let (out, _) = filter_price_outliers(&table)?;
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn no_prices_at_all_empties_the_table() -> Result<()> {
        let table = table_from_csv(&format!("{HEADER}1,a,x,,4,1\n2,b,x,,4,1\n"))?;
        let (out, fences) = filter_price_outliers(&table)?;
        assert!(fences.is_none());
        assert_eq!(out.num_rows(), 0);
        Ok(())
    }
}
