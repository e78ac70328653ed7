pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{ConfscopeConfig, SimilarityMetric};
pub use error::{ConfscopeError, ExitCode, Result};
pub use models::*;
