//! Data helpers for training MiniFlow graphs: standardisation, mini-batch resampling and
//! the simple regression metric used while training.

pub mod error;
pub mod metrics;
pub mod regression_dataset;
pub mod resampler;
pub mod standardize;

pub use error::DataError;
pub use metrics::{accuracy_within, steps_per_epoch};
pub use regression_dataset::RegressionDataset;
pub use resampler::Resampler;
pub use standardize::{standardize, Standardizer};

/// Trait representing a dataset.
///
/// A dataset provides access to individual samples (input features and the
/// corresponding target) via an index.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    type Item;

    /// Returns the sample at the given index, or `None` if out of bounds.
    fn get(&self, index: usize) -> Option<Self::Item>;

    /// Returns the total number of samples in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
