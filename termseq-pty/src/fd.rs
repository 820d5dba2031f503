//! Terminal I/O endpoint abstraction.
//!
//! [`TtyFd`] is the capability set the rest of the system needs from a
//! terminal descriptor: window-size queries and updates, the UTF-8 line
//! discipline toggle, and peer access. [`PosixFd`] implements it for a
//! POSIX PTY master.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

use bitflags::bitflags;
use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};

use crate::error::{Error, Result};
use crate::size::WindowSize;

bitflags! {
    /// Behavior flags for a PTY and the child attached to it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PtyFlags: u32 {
        /// Do not start a new session for the child.
        const NO_SESSION = 1 << 0;
        /// Do not make the peer the child's controlling TTY.
        const NO_CTTY = 1 << 1;
    }
}

/// Capability set of a terminal I/O endpoint.
pub trait TtyFd {
    fn window_size(&self) -> Result<WindowSize>;
    fn set_window_size(&self, size: WindowSize) -> Result<()>;
    /// Tell the line discipline whether the stream is UTF-8, so multibyte
    /// backspace works.
    fn set_utf8_mode(&self, utf8: bool) -> Result<()>;
    /// Open the peer (slave) side. `flags` are `open(2)` flags.
    fn open_peer(&self, flags: libc::c_int) -> Result<OwnedFd>;
}

/// A PTY master backed by a POSIX file descriptor.
pub struct PosixFd {
    fd: OwnedFd,
}

impl PosixFd {
    /// Provision a fresh PTY master: `posix_openpt`, grant and unlock the
    /// peer, close-on-exec, non-blocking, and packet mode where available.
    pub fn open() -> Result<Self> {
        let mut need_cloexec = false;
        let mut need_nonblock = false;

        let mut fd = unsafe {
            libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY | libc::O_NONBLOCK | libc::O_CLOEXEC)
        };
        // Some kernels reject the extra open flags; retry without them and
        // apply the missing ones through fcntl below.
        if fd < 0 && nix::Error::last() == nix::Error::EINVAL {
            need_nonblock = true;
            fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY | libc::O_CLOEXEC) };
            if fd < 0 && nix::Error::last() == nix::Error::EINVAL {
                need_cloexec = true;
                fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
            }
        }
        if fd < 0 {
            return Err(Error::last("posix_openpt"));
        }

        let this = PosixFd {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
        };
        if need_cloexec {
            this.set_cloexec()?;
        }
        if need_nonblock {
            this.set_nonblocking(true)?;
        }
        this.init()?;
        Ok(this)
    }

    /// Adopt an existing PTY master descriptor, running the same
    /// grant/unlock/flags initialization as [`PosixFd::open`].
    pub fn from_fd(fd: OwnedFd) -> Result<Self> {
        let this = PosixFd { fd };
        this.init()?;
        Ok(this)
    }

    fn init(&self) -> Result<()> {
        let fd = self.fd.as_raw_fd();
        if unsafe { libc::grantpt(fd) } != 0 {
            return Err(Error::last("grantpt"));
        }
        if unsafe { libc::unlockpt(fd) } != 0 {
            return Err(Error::last("unlockpt"));
        }
        self.set_cloexec()?;
        self.set_nonblocking(true)?;
        self.set_packet_mode()?;
        Ok(())
    }

    fn set_cloexec(&self) -> Result<()> {
        fcntl(
            self.fd.as_raw_fd(),
            FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC),
        )
        .map_err(Error::sys("fcntl(F_SETFD)"))?;
        Ok(())
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        let fd = self.fd.as_raw_fd();
        let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(Error::sys("fcntl(F_GETFL)"))?;
        let flags = OFlag::from_bits_truncate(flags);
        let new_flags = if nonblocking {
            flags | OFlag::O_NONBLOCK
        } else {
            flags & !OFlag::O_NONBLOCK
        };
        fcntl(fd, FcntlArg::F_SETFL(new_flags)).map_err(Error::sys("fcntl(F_SETFL)"))?;
        Ok(())
    }

    /// Packet mode prepends a status byte to every read, surfacing
    /// stop/start events.
    fn set_packet_mode(&self) -> Result<()> {
        let one: libc::c_int = 1;
        let res = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                libc::TIOCPKT as libc::c_ulong,
                &one,
            )
        };
        if res == -1 {
            return Err(Error::last("ioctl(TIOCPKT)"));
        }
        Ok(())
    }

    /// Duplicate the descriptor for stream I/O.
    pub fn try_clone(&self) -> Result<OwnedFd> {
        Ok(self.fd.try_clone()?)
    }
}

impl TtyFd for PosixFd {
    fn window_size(&self) -> Result<WindowSize> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let res = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                libc::TIOCGWINSZ as libc::c_ulong,
                &mut ws,
            )
        };
        if res == -1 {
            return Err(Error::last("ioctl(TIOCGWINSZ)"));
        }
        Ok(WindowSize::from(ws))
    }

    fn set_window_size(&self, size: WindowSize) -> Result<()> {
        let ws = size.to_winsize();
        let res = unsafe {
            libc::ioctl(
                self.fd.as_raw_fd(),
                libc::TIOCSWINSZ as libc::c_ulong,
                &ws,
            )
        };
        if res == -1 {
            return Err(Error::last("ioctl(TIOCSWINSZ)"));
        }
        Ok(())
    }

    fn set_utf8_mode(&self, utf8: bool) -> Result<()> {
        #[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
        {
            use nix::sys::termios::{self, InputFlags, SetArg};

            let mut tio = termios::tcgetattr(&self.fd).map_err(Error::sys("tcgetattr"))?;
            let saved = tio.input_flags;
            tio.input_flags.set(InputFlags::IUTF8, utf8);
            // Only touch the device when the flag actually changes.
            if saved != tio.input_flags {
                termios::tcsetattr(&self.fd, SetArg::TCSANOW, &tio)
                    .map_err(Error::sys("tcsetattr"))?;
            }
        }
        #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
        let _ = utf8;
        Ok(())
    }

    fn open_peer(&self, flags: libc::c_int) -> Result<OwnedFd> {
        let fd = self.fd.as_raw_fd();

        #[cfg(target_os = "linux")]
        {
            let peer = unsafe { libc::ioctl(fd, libc::TIOCGPTPEER as libc::c_ulong, flags) };
            if peer >= 0 {
                return Ok(unsafe { OwnedFd::from_raw_fd(peer) });
            }
            let errno = nix::Error::last();
            // Kernels without this ioctl are documented to report EINVAL
            // but actually report ENOTTY; fall back on either.
            if errno != nix::Error::EINVAL && errno != nix::Error::ENOTTY {
                return Err(Error::Sys {
                    op: "ioctl(TIOCGPTPEER)",
                    source: errno,
                });
            }
        }

        let name = unsafe { libc::ptsname(fd) };
        if name.is_null() {
            return Err(Error::last("ptsname"));
        }
        log::debug!("opening pty peer of master fd {fd}");
        let peer = unsafe { libc::open(name, flags) };
        if peer < 0 {
            return Err(Error::last("open(peer)"));
        }
        Ok(unsafe { OwnedFd::from_raw_fd(peer) })
    }
}

impl AsRawFd for PosixFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for PosixFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_master() {
        let fd = PosixFd::open().expect("failed to open PTY master");
        assert!(fd.as_raw_fd() >= 0);
    }

    #[test]
    fn test_window_size_round_trip() {
        let fd = PosixFd::open().unwrap();
        fd.set_window_size(WindowSize::with_pixels(132, 50, 1320, 1000))
            .unwrap();
        let size = fd.window_size().unwrap();
        assert_eq!(size.columns, 132);
        assert_eq!(size.rows, 50);
        assert_eq!(size.xpixels, 1320);
        assert_eq!(size.ypixels, 1000);
    }

    #[test]
    fn test_open_peer() {
        let fd = PosixFd::open().unwrap();
        let peer = fd.open_peer(libc::O_RDWR | libc::O_NOCTTY).unwrap();
        assert!(peer.as_raw_fd() >= 0);
    }

    #[test]
    fn test_utf8_mode_on_peer() {
        // IUTF8 is a property of the line discipline, visible through the
        // peer side.
        let fd = PosixFd::open().unwrap();
        let peer = fd.open_peer(libc::O_RDWR | libc::O_NOCTTY).unwrap();
        let peer = PosixFd { fd: peer };
        peer.set_utf8_mode(true).unwrap();
        peer.set_utf8_mode(false).unwrap();
    }
}
