use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed size literal {literal:?}: {reason}")]
    MalformedSize { literal: String, reason: String },

    #[error("size literal {literal:?} does not fit in a 64-bit byte count")]
    SizeOverflow { literal: String },

    #[error("cannot allocate {bytes} bytes on this platform")]
    AllocationTooLarge { bytes: u64 },

    #[error("failed to spawn cpu worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("cpu worker {index} panicked before reporting")]
    WorkerPanicked { index: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Errors the driver reports and moves past instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::MalformedSize { .. }
                | Error::SizeOverflow { .. }
                | Error::AllocationTooLarge { .. }
        )
    }
}
