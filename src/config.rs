use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Optional overrides file, looked up in the working directory.
pub const CONFIG_FILE: &str = "salescope.yaml";

pub const DEFAULT_INPUT: &str = "ecommerce_sales_analysis.csv";
pub const DEFAULT_FIGURES_DIR: &str = "figures";

/// Fixed parameters of a pipeline run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV file to analyse.
    pub input_path: PathBuf,
    /// Directory that receives one PNG per figure.
    pub figures_dir: PathBuf,
    /// Bins of the standalone price histogram.
    pub distribution_bins: usize,
    /// Bins of the histogram panel in the overview figure.
    pub overview_bins: usize,
    /// Sample points of the density overlay.
    pub kde_points: usize,
    pub render: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            figures_dir: PathBuf::from(DEFAULT_FIGURES_DIR),
            distribution_bins: 20,
            overview_bins: 30,
            kde_points: 200,
            render: true,
        }
    }
}

impl PipelineConfig {
    /// Read overrides from `path` when it exists, otherwise use the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: Self =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        info!(path = %path.display(), "loaded config overrides");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = PipelineConfig::load_or_default(dir.path().join(CONFIG_FILE))?;
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.distribution_bins, 20);
        assert_eq!(config.overview_bins, 30);
        Ok(())
    }

    #[test]
    fn partial_file_overrides_named_fields() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "input_path: data/sales.csv")?;
        writeln!(tmp, "render: false")?;
        let config = PipelineConfig::load_or_default(tmp.path())?;
        assert_eq!(config.input_path, PathBuf::from("data/sales.csv"));
        assert!(!config.render);
        assert_eq!(config.figures_dir, PathBuf::from(DEFAULT_FIGURES_DIR));
        assert_eq!(config.kde_points, 200);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "distribution_bins: [not, a, number]")?;
        assert!(PipelineConfig::load_or_default(tmp.path()).is_err());
        Ok(())
    }
}
