//! Child process management.
//!
//! Spawns a process on the peer side of a PTY with proper session setup:
//! signals unblocked and reset, a fresh session, the peer as controlling
//! TTY, and stdio wired to the peer.

use std::ffi::{CStr, CString, OsStr};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::signal::{self, SigHandler, SigSet, SigmaskHow, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use crate::error::{Error, Result};
use crate::fd::PtyFlags;
use crate::pty::Pty;
use crate::size::WindowSize;

/// A child process attached to a PTY.
pub struct Child {
    pty: Pty,
    pid: Pid,
}

/// Builder for spawning a child process on a fresh PTY.
pub struct ChildBuilder {
    program: CString,
    /// Arguments, including the program name as argv[0]
    args: Vec<CString>,
    env: Vec<CString>,
    cwd: Option<CString>,
    size: WindowSize,
    flags: PtyFlags,
}

impl ChildBuilder {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Result<Self> {
        let program = CString::new(program.as_ref().as_bytes())
            .map_err(|e| Error::Spawn(e.to_string()))?;
        Ok(ChildBuilder {
            args: vec![program.clone()],
            program,
            env: Self::default_env(),
            cwd: None,
            size: WindowSize::default(),
            flags: PtyFlags::empty(),
        })
    }

    /// Builder for the user's shell.
    pub fn default_shell() -> Result<Self> {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        Self::new(shell)
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Result<Self> {
        let arg =
            CString::new(arg.as_ref().as_bytes()).map_err(|e| Error::Spawn(e.to_string()))?;
        self.args.push(arg);
        Ok(self)
    }

    pub fn args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg)?;
        }
        Ok(self)
    }

    pub fn env<K: AsRef<OsStr>, V: AsRef<OsStr>>(mut self, key: K, value: V) -> Result<Self> {
        let mut var = key.as_ref().as_bytes().to_vec();
        var.push(b'=');
        var.extend_from_slice(value.as_ref().as_bytes());
        let var = CString::new(var).map_err(|e| Error::Spawn(e.to_string()))?;
        self.env.push(var);
        Ok(self)
    }

    pub fn current_dir<S: AsRef<OsStr>>(mut self, dir: S) -> Result<Self> {
        let dir =
            CString::new(dir.as_ref().as_bytes()).map_err(|e| Error::Spawn(e.to_string()))?;
        self.cwd = Some(dir);
        Ok(self)
    }

    pub fn size(mut self, size: WindowSize) -> Self {
        self.size = size;
        self
    }

    pub fn flags(mut self, flags: PtyFlags) -> Self {
        self.flags = flags;
        self
    }

    fn default_env() -> Vec<CString> {
        let mut env = Vec::new();
        for (key, value) in std::env::vars() {
            if key == "TERM" {
                continue;
            }
            if let Ok(var) = CString::new(format!("{}={}", key, value)) {
                env.push(var);
            }
        }
        if let Ok(term) = CString::new("TERM=xterm-256color") {
            env.push(term);
        }
        env
    }

    /// Spawn the child process.
    pub fn spawn(self) -> Result<Child> {
        let pty = Pty::create(self.flags)?;
        pty.set_size(self.size.rows, self.size.columns, 0, 0)?;

        match unsafe { unistd::fork() }.map_err(Error::sys("fork"))? {
            ForkResult::Parent { child } => Ok(Child { pty, pid: child }),
            ForkResult::Child => self.setup_child(&pty),
        }
    }

    /// Runs in the forked child; never returns.
    fn setup_child(&self, pty: &Pty) -> ! {
        // Undo whatever signal state the parent carries: unblock
        // everything and restore default dispositions.
        let empty = SigSet::empty();
        if signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&empty), None).is_err() {
            unsafe { libc::_exit(127) };
        }
        for sig in Signal::iterator() {
            if sig == Signal::SIGKILL || sig == Signal::SIGSTOP {
                continue;
            }
            unsafe {
                let _ = signal::signal(sig, SigHandler::SigDfl);
            }
        }

        if !pty.flags().contains(PtyFlags::NO_SESSION) && unistd::setsid().is_err() {
            unsafe { libc::_exit(127) };
        }

        let peer = match pty.peer(false) {
            Ok(peer) => peer,
            Err(_) => unsafe { libc::_exit(127) },
        };
        let peer_fd = peer.as_raw_fd();

        // Opening the peer after setsid already acquired the controlling
        // TTY on Linux; the BSDs need the explicit ioctl.
        if !pty.flags().contains(PtyFlags::NO_CTTY) {
            unsafe {
                libc::ioctl(peer_fd, libc::TIOCSCTTY as libc::c_ulong, 0);
            }
        }

        for stdio in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
            if peer_fd != stdio && unistd::dup2(peer_fd, stdio).is_err() {
                unsafe { libc::_exit(127) };
            }
        }
        if peer_fd > libc::STDERR_FILENO {
            drop(peer);
        }

        if let Some(ref cwd) = self.cwd {
            let _ = unistd::chdir(cwd.as_c_str());
        }

        let args: Vec<&CStr> = self.args.iter().map(|s| s.as_c_str()).collect();
        let env: Vec<&CStr> = self.env.iter().map(|s| s.as_c_str()).collect();
        let _ = unistd::execve(self.program.as_c_str(), &args, &env);

        unsafe { libc::_exit(127) }
    }
}

impl Child {
    /// Spawn the user's shell on a fresh PTY.
    pub fn spawn_shell() -> Result<Self> {
        ChildBuilder::default_shell()?.spawn()
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn pty(&self) -> &Pty {
        &self.pty
    }

    pub fn pty_mut(&mut self) -> &mut Pty {
        &mut self.pty
    }

    /// Resize the terminal and notify the child with SIGWINCH.
    pub fn resize(&self, rows: u16, columns: u16) -> Result<()> {
        self.pty.set_size(rows, columns, 0, 0)?;
        signal::kill(self.pid, Signal::SIGWINCH).map_err(Error::sys("kill(SIGWINCH)"))
    }

    /// Check whether the child has exited, without blocking.
    pub fn try_wait(&self) -> Result<Option<ExitStatus>> {
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(_, code)) => Ok(Some(ExitStatus::from_raw(code << 8))),
            Ok(WaitStatus::Signaled(_, sig, _)) => Ok(Some(ExitStatus::from_raw(sig as i32))),
            Ok(_) => Ok(None),
            // Already reaped.
            Err(nix::Error::ECHILD) => Ok(Some(ExitStatus::from_raw(0))),
            Err(e) => Err(Error::sys("waitpid")(e)),
        }
    }

    /// Wait for the child to exit.
    pub fn wait(&self) -> Result<ExitStatus> {
        match waitpid(self.pid, None) {
            Ok(WaitStatus::Exited(_, code)) => Ok(ExitStatus::from_raw(code << 8)),
            Ok(WaitStatus::Signaled(_, sig, _)) => Ok(ExitStatus::from_raw(sig as i32)),
            Ok(_) => Ok(ExitStatus::from_raw(0)),
            Err(nix::Error::ECHILD) => Ok(ExitStatus::from_raw(0)),
            Err(e) => Err(Error::sys("waitpid")(e)),
        }
    }

    pub fn signal(&self, sig: Signal) -> Result<()> {
        signal::kill(self.pid, sig).map_err(Error::sys("kill"))
    }

    pub fn kill(&self) -> Result<()> {
        self.signal(Signal::SIGKILL)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pty.read(buf)
    }

    pub fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pty.try_read(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.pty.write_all(buf)
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        // Reap if already dead so we don't leave a zombie behind.
        let _ = self.try_wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn read_for(child: &mut Child, ms: u64) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        let deadline = std::time::Instant::now() + Duration::from_millis(ms);
        while std::time::Instant::now() < deadline {
            match child.try_read(&mut buf) {
                Ok(0) => std::thread::sleep(Duration::from_millis(10)),
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(_) => break,
            }
        }
        out
    }

    #[test]
    fn test_spawn_echo() {
        let mut child = ChildBuilder::new("/bin/echo")
            .unwrap()
            .arg("termseq test output")
            .unwrap()
            .spawn()
            .unwrap();

        let output = read_for(&mut child, 500);
        // Packet mode prefixes each read with a status byte, so search
        // rather than compare.
        let text = String::from_utf8_lossy(&output).to_string();
        assert!(text.contains("termseq test output"), "got {text:?}");

        let _ = child.wait();
    }

    #[test]
    fn test_resize_round_trip() {
        let mut child = ChildBuilder::new("/bin/cat").unwrap().spawn().unwrap();

        child.resize(30, 100).unwrap();
        let size = child.pty().get_size().unwrap();
        assert_eq!(size.rows, 30);
        assert_eq!(size.columns, 100);

        let _ = child.kill();
        let _ = child.wait();
        drop(read_for(&mut child, 50));
    }
}
