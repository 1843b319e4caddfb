// src/viz/mod.rs
pub mod charts;
pub mod distribution;
pub mod geometry;
pub mod heatmap;

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use plotters::{coord::Shift, prelude::*};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::aggregate::Aggregates;
use crate::config::PipelineConfig;
use crate::table::{column, numeric_values, PRICE, REVIEW_SCORE};
pub use geometry::{coolwarm, histogram, kde_curve, Bin, BoxStats};

/// One chart panel on a PNG canvas.
pub type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub const SALES_OVER_TIME: &str = "sales_over_time.png";
pub const SALES_BY_CATEGORY: &str = "sales_by_category.png";
pub const PRICE_DISTRIBUTION: &str = "price_distribution.png";
pub const PRICE_BOXPLOT: &str = "price_boxplot.png";
pub const CORRELATION_HEATMAP: &str = "correlation_heatmap.png";
pub const PRICE_OVERVIEW: &str = "price_overview.png";

/// Figure file names in render order.
pub const FIGURES: [&str; 6] = [
    SALES_OVER_TIME,
    SALES_BY_CATEGORY,
    PRICE_DISTRIBUTION,
    PRICE_BOXPLOT,
    CORRELATION_HEATMAP,
    PRICE_OVERVIEW,
];

/// Render every figure into `config.figures_dir`, returning the written paths
/// in order.
pub fn render_all(
    table: &RecordBatch,
    aggregates: &Aggregates,
    config: &PipelineConfig,
) -> Result<Vec<PathBuf>> {
    let dir = &config.figures_dir;
    fs::create_dir_all(dir).with_context(|| format!("creating figures directory {:?}", dir))?;

    let prices = present(numeric_values(column(table, PRICE)?)?.iter());
    let scores = numeric_values(column(table, REVIEW_SCORE)?)?;
    let price_vs_score: Vec<(f64, f64)> = numeric_values(column(table, PRICE)?)?
        .iter()
        .zip(scores.iter())
        .filter_map(|pair| match pair {
            (Some(p), Some(s)) => Some((p, s)),
            _ => None,
        })
        .collect();

    let mut written = Vec::with_capacity(FIGURES.len());

    let path = dir.join(SALES_OVER_TIME);
    charts::draw_monthly_sales(&path, &aggregates.monthly).context("rendering sales over time")?;
    written.push(logged(path));

    let path = dir.join(SALES_BY_CATEGORY);
    charts::draw_category_sales(&path, &aggregates.categories)
        .context("rendering sales by category")?;
    written.push(logged(path));

    let path = dir.join(PRICE_DISTRIBUTION);
    distribution::draw_price_distribution(
        &path,
        &prices,
        config.distribution_bins,
        config.kde_points,
    )
    .context("rendering price distribution")?;
    written.push(logged(path));

    let path = dir.join(PRICE_BOXPLOT);
    distribution::draw_price_boxplot(&path, &prices).context("rendering price box plot")?;
    written.push(logged(path));

    let path = dir.join(CORRELATION_HEATMAP);
    heatmap::draw_correlation_heatmap(&path, &aggregates.correlation)
        .context("rendering correlation heatmap")?;
    written.push(logged(path));

    let path = dir.join(PRICE_OVERVIEW);
    distribution::draw_price_overview(&path, &prices, &price_vs_score, config.overview_bins)
        .context("rendering price overview")?;
    written.push(logged(path));

    Ok(written)
}

fn logged(path: PathBuf) -> PathBuf {
    info!(path = %path.display(), "wrote figure");
    path
}

fn present<I: IntoIterator<Item = Option<f64>>>(values: I) -> Vec<f64> {
    values.into_iter().flatten().filter(|v| v.is_finite()).collect()
}

/// Open a white PNG canvas of `size` pixels at `path`.
pub(crate) fn canvas(path: &Path, size: (u32, u32)) -> Result<Panel<'_>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Widen a degenerate or empty range so an axis can be built over it, and
/// pad it by `pad` of its width on both sides.
pub(crate) fn axis_range(lo: f64, hi: f64, pad: f64) -> std::ops::Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 0.5)..(hi + 0.5);
    }
    let margin = (hi - lo) * pad;
    (lo - margin)..(hi + margin)
}

/// Category label for an integer tick, blank elsewhere.
pub(crate) fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
