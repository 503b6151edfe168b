pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod health;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod store;
pub mod types;

pub use error::{Result, TaskgenError};
pub use extract::ExtractionError;
pub use store::{FileStore, SpecStore, MAX_SPECS};
pub use types::{FeatureRequest, GeneratedBreakdown, StoredSpec};
