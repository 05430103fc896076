//! Error types for the margin writers.
//!
//! Every writer in this crate implements [`std::io::Write`], so failures cross
//! the trait boundary as [`io::Error`]. The concrete stage that failed is kept
//! as a [`MarginError`] inside the I/O error and can be recovered with
//! [`MarginError::from_io`].

use std::io;

/// Errors produced while writing through or closing a writer chain.
#[derive(Debug, thiserror::Error)]
pub enum MarginError {
    /// Forwarding a content byte (or newline) downstream failed.
    #[error("margin: error writing bytes: {0}")]
    WriteBytes(#[source] io::Error),

    /// Emitting trailing padding failed.
    #[error("margin: error writing padding: {0}")]
    WritePadding(#[source] io::Error),

    /// Emitting leading indentation failed.
    #[error("margin: error writing indentation: {0}")]
    WriteIndentation(#[source] io::Error),

    /// One or more writers in the chain failed to close.
    #[error("margin: error closing writer: {}", join_messages(.0))]
    Close(Vec<io::Error>),

    /// Layout parameters could not be parsed.
    #[error("margin: invalid layout configuration: {message}")]
    Config { message: String },
}

impl MarginError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the `MarginError` carried inside an I/O error, if any.
    pub fn from_io(err: &io::Error) -> Option<&MarginError> {
        err.get_ref()?.downcast_ref::<MarginError>()
    }

    pub(crate) fn into_io(self) -> io::Error {
        io::Error::other(self)
    }
}

fn join_messages(errors: &[io::Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Combines close results so neither failure is dropped.
///
/// A single failure is returned unchanged; several are wrapped in
/// [`MarginError::Close`].
pub(crate) fn join_close(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    let mut errors: Vec<io::Error> = results.into_iter().filter_map(Result::err).collect();
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        n => {
            log::warn!("{} writers failed to close", n);
            Err(MarginError::Close(errors).into_io())
        }
    }
}
