use thiserror::Error;

/// Errors raised by the navigation engine.
///
/// `IndexOutOfRange` and `InvalidState` are contract violations: the caller
/// handed in a row or cursor that does not exist. They are reported instead
/// of clamped so UI code notices them during development.
#[derive(Error, Debug)]
pub enum Error {
    #[error("index {index} out of range for pane of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
