pub mod aggregate;
pub mod clean;
pub mod config;
pub mod pipeline;
pub mod stats;
pub mod summary;
pub mod table;
pub mod viz;

pub use aggregate::Aggregates;
pub use clean::{clean_table, CleaningReport};
pub use config::PipelineConfig;
pub use summary::DatasetSummary;
pub use table::load_table;
