//! Static dashboard output: the JSON payload, the HTML viewer around it and
//! the all-or-nothing file write.

pub mod payload;
pub mod template;
pub mod writer;

pub use payload::*;
pub use template::*;
pub use writer::*;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Payload serialization failed")]
    Serialize(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
