use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::{axis_range, canvas, label_at};
use crate::aggregate::{CategorySales, MonthlySales};

const TEAL: RGBColor = RGBColor(0, 128, 128);

/// Line plot with point markers of the monthly totals.
pub fn draw_monthly_sales(path: &Path, monthly: &[MonthlySales]) -> Result<()> {
    let root = canvas(path, (1200, 600))?;
    let labels: Vec<String> = monthly.iter().map(|m| m.column.clone()).collect();
    let (lo, hi) = value_span(monthly.iter().map(|m| m.total));
    let n = monthly.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Sales Over Time", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n - 0.5), axis_range(lo, hi, 0.05))?;
    chart
        .configure_mesh()
        .x_desc("Months")
        .y_desc("Total Sales")
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| label_at(&labels, *x))
        .draw()?;

    let points: Vec<(f64, f64)> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, m.total))
        .collect();
    chart.draw_series(LineSeries::new(points.clone(), &BLUE))?;
    chart.draw_series(points.into_iter().map(|p| Circle::new(p, 5, BLUE.filled())))?;

    root.present()?;
    Ok(())
}

/// Bar chart of category totals, in the order given (largest first).
pub fn draw_category_sales(path: &Path, categories: &[CategorySales]) -> Result<()> {
    let root = canvas(path, (1000, 600))?;
    let labels: Vec<String> = categories.iter().map(|c| c.category.clone()).collect();
    let (lo, hi) = value_span(categories.iter().map(|c| c.total));
    let n = categories.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Sales by Product Category", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n - 0.5), axis_range(lo, hi, 0.05))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Product Category")
        .y_desc("Total Quantity Sold")
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| label_at(&labels, *x))
        .draw()?;

    chart.draw_series(categories.iter().enumerate().map(|(i, c)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, c.total)], TEAL.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Range of `values` always including zero, so bars start at the axis.
fn value_span<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((0.0, 0.0), |(lo, hi): (f64, f64), v| (lo.min(v), hi.max(v)))
}
