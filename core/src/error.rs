use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Missing required input files in {}: {}", .dir.display(), .missing.join(", "))]
    MissingInputs { dir: PathBuf, missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot remove {removed_count} sellers from a portfolio of {total}")]
    RemovedCountOutOfBounds { removed_count: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type InsightResult<T> = Result<T, InsightError>;
