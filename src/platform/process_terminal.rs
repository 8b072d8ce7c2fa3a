//! Process-based terminal implementation over the controlling tty.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::core::terminal::{InputRead, Terminal};

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::SigId;

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    // POLLHUP without POLLIN still needs a read() to observe end of file.
    Ok(result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0)
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Terminal backed by the process's stdin.
///
/// Raw mode clears `ISIG`, so Ctrl+C arrives as a byte. SIGINT/SIGTERM sent
/// from elsewhere are trapped into a flag and surfaced through
/// [`Terminal::take_interrupt`].
#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    original_termios: Option<libc::termios>,
    interrupted: Arc<AtomicBool>,
    signal_ids: Vec<SigId>,
    panic_guard: Option<PanicHookGuard>,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            original_termios: None,
            interrupted: Arc::new(AtomicBool::new(false)),
            signal_ids: Vec::new(),
            panic_guard: None,
        }
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        // Keep output post-processing so plain "\n" still returns the carriage.
        raw.c_oflag |= libc::OPOST;
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> io::Result<()> {
        if let Some(original) = self.original_termios.take() {
            set_termios(self.stdin_fd, &original)?;
        }
        Ok(())
    }

    fn register_signals(&mut self) -> io::Result<()> {
        for signal in [libc::SIGINT, libc::SIGTERM] {
            let id = signal_hook::flag::register(signal, Arc::clone(&self.interrupted))?;
            self.signal_ids.push(id);
        }
        Ok(())
    }

    fn unregister_signals(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.interrupted.store(false, Ordering::SeqCst);
        self.enable_raw_mode()?;

        if let Some(original) = self.original_termios {
            let fd = self.stdin_fd;
            self.panic_guard = Some(install_panic_hook(move || {
                let _ = set_termios(fd, &original);
            }));
        }

        if let Err(err) = self.register_signals() {
            self.unregister_signals();
            self.panic_guard = None;
            let _ = self.restore_raw_mode();
            return Err(err);
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.unregister_signals();
        self.panic_guard = None;

        // Flush input before leaving raw mode so unread keystrokes do not leak
        // into the shell.
        let _ = unsafe { libc::tcflush(self.stdin_fd, libc::TCIFLUSH) };

        self.restore_raw_mode()
    }

    fn read_input(&mut self, buf: &mut [u8], timeout_ms: i32) -> io::Result<InputRead> {
        if !poll_readable(self.stdin_fd, timeout_ms)? {
            return Ok(InputRead::Timeout);
        }

        let read_len = unsafe { libc::read(self.stdin_fd, buf.as_mut_ptr() as *mut _, buf.len()) };
        if read_len < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(InputRead::Timeout),
                _ => Err(err),
            };
        }
        if read_len == 0 {
            return Ok(InputRead::Closed);
        }
        Ok(InputRead::Bytes(read_len as usize))
    }

    fn take_interrupt(&mut self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        if self.original_termios.is_some() {
            let _ = self.stop();
        }
    }
}

/// Keeps a panic-time cleanup armed until dropped.
pub struct PanicHookGuard {
    active: Arc<AtomicBool>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Install a panic hook that runs `cleanup` once, then delegates to the
/// previously installed hook.
///
/// The wrapper stays installed after the guard drops; it just stops running
/// `cleanup`.
pub fn install_panic_hook<F>(cleanup: F) -> PanicHookGuard
where
    F: Fn() + Send + Sync + 'static,
{
    let active = Arc::new(AtomicBool::new(true));
    let armed = Arc::clone(&active);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if armed.swap(false, Ordering::SeqCst) {
            cleanup();
        }
        previous(info);
    }));
    PanicHookGuard { active }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::{get_termios, ProcessTerminal};
    use crate::core::terminal::{InputRead, Terminal};

    use libc::{self, c_int};

    struct Pty {
        master: c_int,
        slave: c_int,
    }

    impl Drop for Pty {
        fn drop(&mut self) {
            unsafe {
                libc::close(self.master);
                libc::close(self.slave);
            }
        }
    }

    fn open_pty() -> Pty {
        let mut master: c_int = 0;
        let mut slave: c_int = 0;
        let result = unsafe {
            libc::openpty(
                &mut master,
                &mut slave,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, 0, "openpty failed");
        Pty { master, slave }
    }

    fn pty_terminal(pty: &Pty) -> ProcessTerminal {
        let mut terminal = ProcessTerminal::new();
        terminal.stdin_fd = pty.slave;
        terminal
    }

    #[test]
    fn start_enters_raw_mode_and_stop_restores_it() {
        let pty = open_pty();
        let original = get_termios(pty.slave).expect("get termios");
        assert_ne!(original.c_lflag & libc::ICANON, 0, "pty starts canonical");

        let mut terminal = pty_terminal(&pty);
        terminal.start().expect("terminal start");
        let raw = get_termios(pty.slave).expect("get raw termios");
        assert_eq!(raw.c_lflag & (libc::ICANON | libc::ECHO | libc::ISIG), 0);

        terminal.stop().expect("terminal stop");
        let restored = get_termios(pty.slave).expect("get restored termios");
        assert_eq!(restored.c_lflag, original.c_lflag);
        assert_eq!(restored.c_iflag, original.c_iflag);
        assert_eq!(restored.c_oflag, original.c_oflag);
    }

    #[test]
    fn drop_restores_mode_without_explicit_stop() {
        let pty = open_pty();
        let original = get_termios(pty.slave).expect("get termios");
        {
            let mut terminal = pty_terminal(&pty);
            terminal.start().expect("terminal start");
        }
        let restored = get_termios(pty.slave).expect("get restored termios");
        assert_eq!(restored.c_lflag, original.c_lflag);
    }

    #[test]
    fn reads_bytes_written_to_master() {
        let pty = open_pty();
        let mut terminal = pty_terminal(&pty);
        terminal.start().expect("terminal start");

        let mut buf = [0u8; 16];
        assert_eq!(terminal.read_input(&mut buf, 0).unwrap(), InputRead::Timeout);

        let written = unsafe { libc::write(pty.master, b"3".as_ptr() as *const _, 1) };
        assert_eq!(written, 1);
        std::thread::sleep(Duration::from_millis(20));

        let read = terminal.read_input(&mut buf, 200).unwrap();
        assert_eq!(read, InputRead::Bytes(1));
        assert_eq!(buf[0], b'3');
        terminal.stop().expect("terminal stop");
    }

    #[test]
    fn start_returns_err_on_tcgetattr_failure() {
        let mut terminal = ProcessTerminal::new();
        terminal.stdin_fd = -1;

        let err = terminal.start().expect_err("expected start to fail");
        assert_eq!(
            err.raw_os_error(),
            Some(libc::EBADF),
            "expected EBADF, got: {err:?}"
        );
    }

    #[test]
    fn interrupt_flag_is_taken_once() {
        let mut terminal = ProcessTerminal::new();
        terminal
            .interrupted
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(terminal.take_interrupt());
        assert!(!terminal.take_interrupt());
    }
}
