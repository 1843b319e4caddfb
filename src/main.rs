use anyhow::{Context, Result};
use salescope::{config::CONFIG_FILE, pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr, so stdout carries only the report) ───
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) fixed parameters, optionally overridden on disk ────────────
    let config = PipelineConfig::load_or_default(CONFIG_FILE)?;
    info!(input = %config.input_path.display(), figures = %config.figures_dir.display(), "config");

    // ─── 3) run the pipeline ───────────────────────────────────────────
    let outcome = pipeline::run(&config)
        .with_context(|| format!("analysing {}", config.input_path.display()))?;

    info!(figures = outcome.figures.len(), "all done");
    Ok(())
}
