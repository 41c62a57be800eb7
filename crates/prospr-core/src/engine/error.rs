use thiserror::Error;

use super::checkpoint::CheckpointError;
use crate::core::models::lattice::LatticeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Lattice operation failed: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Checkpoint handling failed: {source}")]
    Checkpoint {
        #[from]
        source: CheckpointError,
    },
}
