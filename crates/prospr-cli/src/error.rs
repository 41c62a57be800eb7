use prospr_core::core::models::lattice::LatticeError;
use prospr_core::core::models::model::ModelError;
use prospr_core::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid energy model: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid folding problem: {0}")]
    Lattice(#[from] LatticeError),

    #[error("Failed to parse model file '{path}': {source}", path = path.display())]
    ModelFileParsing {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Scenario check failed: {0}")]
    Check(String),
}
