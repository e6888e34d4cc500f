use crate::modes::session::SessionParamsBuilderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the tool before or instead of a transfer loop.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Missing 'mode'. Use '-h' for usage")]
    MissingMode,

    #[error("Unknown 'mode = {0}'. Use '-h' for usage")]
    InvalidMode(String),

    #[error("Invalid RAW frame '{frame}': {source}")]
    InvalidFrame {
        frame: String,
        source: hex::FromHexError,
    },

    #[error("Invalid session parameters: {0}")]
    Params(#[from] SessionParamsBuilderError),

    #[error("Cannot open log file {}: {source}", .path.display())]
    Journal { path: PathBuf, source: io::Error },

    #[error("Connection to {addr} failed: {source}")]
    Connect { addr: String, source: io::Error },
}
