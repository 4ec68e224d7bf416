//! Error types for topology synthesis.
//!
//! Only input-data absence is fatal; band infeasibility, geometry rejection
//! and connectivity shortfall are logged recoverables handled inline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopoError {
    #[error("location table is empty, nothing to place sites on")]
    EmptyLocationTable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TopoError>;
