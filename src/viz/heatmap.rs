use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::geometry::coolwarm;
use super::{canvas, label_at};
use crate::aggregate::CorrelationMatrix;

/// Annotated heatmap of the correlation matrix; row 0 is drawn on top.
pub fn draw_correlation_heatmap(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let root = canvas(path, (1000, 800))?;
    let n = matrix.labels.len();
    let extent = n.max(1) as f64;

    // rows are flipped so the first label sits at the top
    let row_labels: Vec<String> = matrix.labels.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix of Numerical Features", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(120)
        .build_cartesian_2d(-0.5f64..(extent - 0.5), -0.5f64..(extent - 0.5))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n.max(1))
        .y_labels(n.max(1))
        .x_label_formatter(&|x| label_at(&matrix.labels, *x))
        .y_label_formatter(&|y| label_at(&row_labels, *y))
        .draw()?;

    let cells: Vec<(f64, f64, f64)> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, v)| (j as f64, (n - 1 - i) as f64, *v))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, v)| {
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            coolwarm(v).filled(),
        )
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, _)| {
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            WHITE.stroke_width(1),
        )
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, v)| {
        Text::new(
            annotation(v),
            (x - 0.2, y + 0.1),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn annotation(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", v)
    }
}
