//! Error types for loading and writing board snapshots

use thiserror::Error;

/// Errors that can occur when reading or writing a board snapshot
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("failed to read board file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse board TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("card '{id}' is defined more than once")]
    DuplicateCard { id: String },

    #[error("card '{id}' has degenerate bounds ({width} x {height} at {x}, {y})")]
    DegenerateCard {
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}
