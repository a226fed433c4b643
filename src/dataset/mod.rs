//! Training data: loading, perturbation and splitting

pub mod loader;
pub mod perturb;
pub mod split;

pub use loader::{DataLoader, LoadedDataset};
pub use perturb::PerturbationSummary;
pub use split::{train_test_split, TrainTestSplit};
