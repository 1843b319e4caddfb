use anyhow::Result;
use arrow::record_batch::RecordBatch;
use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};
use tracing::info;

use crate::aggregate::Aggregates;
use crate::clean::{clean_table, CleaningReport};
use crate::config::PipelineConfig;
use crate::summary::DatasetSummary;
use crate::table::load_table;
use crate::viz::render_all;

/// What a run produced, for callers that want more than the printed report.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub summary: DatasetSummary,
    pub cleaned: RecordBatch,
    pub report: CleaningReport,
    pub aggregates: Aggregates,
    pub figures: Vec<PathBuf>,
}

/// load → describe → clean → aggregate → render, reporting on stdout.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(config, &mut out)
}

pub fn run_with_output<W: Write + ?Sized>(
    config: &PipelineConfig,
    out: &mut W,
) -> Result<PipelineOutcome> {
    let start = Instant::now();

    let table = load_table(&config.input_path)?;

    let summary = DatasetSummary::from_table(&table)?;
    summary.write_report(out)?;
    writeln!(out, "\n")?;

    let (cleaned, report) = clean_table(&table)?;
    drop(table);
    report.write_report(out)?;

    let aggregates = Aggregates::from_table(&cleaned)?;
    aggregates.write_report(out)?;
    out.flush()?;

    let figures = if config.render {
        render_all(&cleaned, &aggregates, config)?
    } else {
        info!("rendering disabled");
        Vec::new()
    };

    info!(
        rows = cleaned.num_rows(),
        figures = figures.len(),
        elapsed = ?start.elapsed(),
        "pipeline finished"
    );
    Ok(PipelineOutcome {
        summary,
        cleaned,
        report,
        aggregates,
        figures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_test_logging;
    use std::fs;

    const SALES_CSV: &str = "product_id,product_name,category,price,review_score,review_count,sales_month_1,sales_month_2,sales_month_3\n\
                             1,Lamp,Home ,25.0,4.2,120,10,12,N/A\n\
                             2,Desk, home,80.0,4.6,45,4,5,6\n\
                             2,Desk, home,80.0,4.6,45,4,5,6\n\
                             3,,Books,15.0,3.9,300,30,28,25\n\
                             ,Ghost,Books,15.0,3.9,300,30,28,25\n\
                             4,Novel,BOOKS,18.0,4.8,210,22,abc,19\n\
                             5,Throne,Home,9999.0,1.0,2,1,0,0\n\
                             6,Kite,Toys,30.0,4.0,60,7,9,11\n";

    #[test]
    fn end_to_end_without_rendering() -> Result<()> {
        init_test_logging();
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("sales.csv");
        fs::write(&input, SALES_CSV)?;

        let config = PipelineConfig {
            input_path: input,
            figures_dir: dir.path().join("figures"),
            render: false,
            ..PipelineConfig::default()
        };
        let mut buf = Vec::new();
        let outcome = run_with_output(&config, &mut buf)?;
        let text = String::from_utf8(buf)?;

        assert_eq!(outcome.summary.rows, 8);
        assert_eq!(outcome.report.after_missing, 7);
        assert_eq!(outcome.report.after_dedup, 6);
        assert_eq!(outcome.report.after_outliers, 5);
        assert!(outcome.figures.is_empty());
        assert!(!config.figures_dir.exists());

        let monthly: Vec<f64> = outcome.aggregates.monthly.iter().map(|m| m.total).collect();
        assert_eq!(monthly, vec![73.0, 54.0, 61.0]);

        let categories: Vec<(&str, f64)> = outcome
            .aggregates
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.total))
            .collect();
        assert_eq!(
            categories,
            vec![("books", 124.0), ("home", 37.0), ("toys", 27.0)]
        );

        assert!(text.contains("Dimensions of the dataset:"));
        assert!(text.contains("Cleaning Report:"));
        assert!(text.contains("Sales by Category:"));
        Ok(())
    }

    #[test]
    fn missing_input_is_fatal() {
        init_test_logging();
        let config = PipelineConfig {
            input_path: PathBuf::from("/no/such/sales.csv"),
            render: false,
            ..PipelineConfig::default()
        };
        let mut buf = Vec::new();
        assert!(run_with_output(&config, &mut buf).is_err());
        assert!(buf.is_empty());
    }
}
