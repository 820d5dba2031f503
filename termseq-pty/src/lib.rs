//! termseq-pty — POSIX pseudoterminal endpoint.
//!
//! The I/O collaborator of the termseq parser: acquires a PTY master,
//! manages window size and the UTF-8 line discipline, opens the peer
//! side, and spawns child processes with proper session setup.
//!
//! Key pieces:
//! - [`TtyFd`]: the capability set a terminal descriptor must offer
//!   (window size, UTF-8 mode, peer access)
//! - [`PosixFd`]: the POSIX implementation, with the `TIOCGPTPEER` /
//!   `ptsname` fallback and packet mode
//! - [`Pty`]: a master plus stream I/O and flag-aware peer opening
//! - [`Child`] / [`ChildBuilder`]: process spawning on the peer
//!
//! The parser crate is independent of all of this; bytes read here are
//! decoded upstream and fed to the parser as code points.

mod child;
mod error;
mod fd;
mod pty;
mod size;

pub use child::{Child, ChildBuilder};
pub use error::{Error, Result};
pub use fd::{PosixFd, PtyFlags, TtyFd};
pub use pty::Pty;
pub use size::WindowSize;
