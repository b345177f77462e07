pub mod config;
pub mod error;

pub use config::SemstoreConfig;
pub use error::{Result, SemstoreError};
