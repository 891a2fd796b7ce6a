// One error type for the whole binary. Every variant states *where* things
// went wrong; startup variants abort before the window shows, the inference
// variant is recovered per prediction by the session.

use std::path::PathBuf;

use burn::record::RecorderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Pushing the frame buffer to the window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// The classifier checkpoint is missing or unreadable.
    #[error("classifier checkpoint {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        source: RecorderError,
    },

    /// A single classifier call failed (bad shape, unreadable output).
    #[error("inference error: {0}")]
    Inference(String),
}
