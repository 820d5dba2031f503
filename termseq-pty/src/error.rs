//! Error types for PTY operations

use std::io;
use thiserror::Error;

/// PTY error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A system call failed; carries the call's name.
    #[error("{op} failed: {source}")]
    Sys {
        op: &'static str,
        source: nix::Error,
    },

    /// Failed to spawn the child process
    #[error("failed to spawn child: {0}")]
    Spawn(String),
}

impl Error {
    /// Wrap a `nix` error with the failing call's name.
    pub(crate) fn sys(op: &'static str) -> impl FnOnce(nix::Error) -> Error {
        move |source| Error::Sys { op, source }
    }

    /// Capture `errno` after a failed libc call.
    pub(crate) fn last(op: &'static str) -> Error {
        Error::Sys {
            op,
            source: nix::Error::last(),
        }
    }
}

/// Result type for PTY operations
pub type Result<T> = std::result::Result<T, Error>;
