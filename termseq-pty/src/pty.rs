//! PTY (pseudoterminal) master management.
//!
//! [`Pty`] wraps a [`PosixFd`] master with the conveniences consumers
//! need: size updates that derive pixel dimensions from the cell size,
//! the UTF-8 mode toggle, peer access honoring the PTY flags, and plain
//! stream I/O.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use crate::error::Result;
use crate::fd::{PosixFd, PtyFlags, TtyFd};
use crate::size::WindowSize;

/// A pseudoterminal master
pub struct Pty {
    fd: PosixFd,
    /// Duplicate of the master for stream I/O
    file: File,
    flags: PtyFlags,
}

impl Pty {
    /// Provision a fresh PTY master (grant, unlock, close-on-exec,
    /// non-blocking, packet mode).
    pub fn create(flags: PtyFlags) -> Result<Self> {
        let fd = PosixFd::open()?;
        Self::wrap(fd, flags)
    }

    /// Adopt a foreign PTY master descriptor.
    pub fn from_fd(fd: OwnedFd, flags: PtyFlags) -> Result<Self> {
        let fd = PosixFd::from_fd(fd)?;
        Self::wrap(fd, flags)
    }

    fn wrap(fd: PosixFd, flags: PtyFlags) -> Result<Self> {
        let file = File::from(fd.try_clone()?);
        Ok(Pty { fd, file, flags })
    }

    pub fn fd(&self) -> &PosixFd {
        &self.fd
    }

    pub fn flags(&self) -> PtyFlags {
        self.flags
    }

    /// Resize the terminal. Non-positive dimensions fall back to 80x24;
    /// pixel sizes are derived from the cell size when given. On success
    /// the kernel delivers SIGWINCH to the foreground process group.
    pub fn set_size(
        &self,
        rows: u16,
        columns: u16,
        cell_width_px: u16,
        cell_height_px: u16,
    ) -> Result<()> {
        let rows = if rows > 0 { rows } else { 24 };
        let columns = if columns > 0 { columns } else { 80 };
        let size = WindowSize {
            rows,
            columns,
            xpixels: columns.saturating_mul(cell_width_px),
            ypixels: rows.saturating_mul(cell_height_px),
        };
        log::debug!("setting window size to ({},{})", columns, rows);
        self.fd.set_window_size(size)
    }

    /// Read the terminal's window size.
    pub fn get_size(&self) -> Result<WindowSize> {
        let size = self.fd.window_size()?;
        log::debug!("window size is ({},{})", size.columns, size.rows);
        Ok(size)
    }

    /// Toggle the UTF-8 line discipline.
    pub fn set_utf8(&self, utf8: bool) -> Result<()> {
        self.fd.set_utf8_mode(utf8)
    }

    /// Open the peer side, honoring [`PtyFlags::NO_CTTY`].
    pub fn peer(&self, cloexec: bool) -> Result<OwnedFd> {
        let mut flags = libc::O_RDWR;
        if self.flags.contains(PtyFlags::NO_CTTY) {
            flags |= libc::O_NOCTTY;
        }
        if cloexec {
            flags |= libc::O_CLOEXEC;
        }
        self.fd.open_peer(flags)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    /// Read, mapping would-block to zero bytes.
    pub fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl AsRawFd for Pty {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for Pty {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let pty = Pty::create(PtyFlags::empty());
        assert!(pty.is_ok());
    }

    #[test]
    fn test_size_round_trip() {
        let pty = Pty::create(PtyFlags::empty()).unwrap();
        pty.set_size(40, 120, 0, 0).unwrap();
        let size = pty.get_size().unwrap();
        assert_eq!(size.rows, 40);
        assert_eq!(size.columns, 120);
    }

    #[test]
    fn test_size_clamps_zero() {
        let pty = Pty::create(PtyFlags::empty()).unwrap();
        pty.set_size(0, 0, 0, 0).unwrap();
        let size = pty.get_size().unwrap();
        assert_eq!(size.rows, 24);
        assert_eq!(size.columns, 80);
    }

    #[test]
    fn test_pixel_size_follows_cells() {
        let pty = Pty::create(PtyFlags::empty()).unwrap();
        pty.set_size(24, 80, 10, 20).unwrap();
        let size = pty.get_size().unwrap();
        assert_eq!(size.xpixels, 800);
        assert_eq!(size.ypixels, 480);
    }

    #[test]
    fn test_utf8_toggle() {
        let pty = Pty::create(PtyFlags::empty()).unwrap();
        let peer = pty.peer(true).unwrap();
        drop(peer);
        assert!(pty.set_utf8(true).is_ok());
        assert!(pty.set_utf8(false).is_ok());
    }
}
