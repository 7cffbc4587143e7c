use miniflow_core::MiniflowError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum DataError {
    #[error("Features have {features} row(s) but targets have {targets} value(s)")]
    LengthMismatch { features: usize, targets: usize },

    #[error("Targets must be a single row or column, got shape {0:?}")]
    TargetsNotVector((usize, usize)),

    #[error("Cannot sample from an empty dataset")]
    EmptyDataset,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error(transparent)]
    Engine(#[from] MiniflowError),
}
