use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while opening or parsing a trace.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid line: {line:?}")]
    InvalidLine { line: String },
    #[error("unknown trace file type: {}", path.display())]
    UnknownFormat { path: PathBuf },
}
