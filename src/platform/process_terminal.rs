//! Process-backed, line-oriented terminal.
//!
//! The terminal stays in cooked mode: the kernel handles line editing and echo, and Ctrl-C
//! raises SIGINT. A reader thread polls stdin, splits complete lines and hands them to the input
//! handler; end of input is reported once as [`TerminalInput::Closed`].

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::terminal::{Terminal, TerminalInput};

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::iterator::Signals;

const DEFAULT_COLUMNS: u16 = 80;
const POLL_INTERVAL_MS: i32 = 50;

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0
}

/// Splits raw stdin bytes into lines. A trailing `\r` is dropped.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(position) = self.pending.iter().position(|byte| *byte == b'\n') {
            let mut line = self.pending.drain(..=position).collect::<Vec<_>>();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    input_thread: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            input_thread: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    fn start_input_thread(
        &mut self,
        mut on_input: Box<dyn FnMut(TerminalInput) + Send>,
    ) -> std::io::Result<()> {
        let stdin_fd = self.stdin_fd;
        let stop_flag = Arc::clone(&self.stop_flag);

        let handle = thread::Builder::new()
            .name("drill-stdin".to_string())
            .spawn(move || {
                let mut buffer = [0u8; 4096];
                let mut lines = LineBuffer::default();

                while !stop_flag.load(Ordering::SeqCst) {
                    if !poll_readable(stdin_fd, POLL_INTERVAL_MS) {
                        continue;
                    }

                    let read_len = unsafe {
                        libc::read(stdin_fd, buffer.as_mut_ptr() as *mut _, buffer.len())
                    };
                    if read_len < 0
                        && std::io::Error::last_os_error().kind()
                            == std::io::ErrorKind::Interrupted
                    {
                        continue;
                    }
                    if read_len <= 0 {
                        if let Some(rest) = lines.finish() {
                            on_input(TerminalInput::Line(rest));
                        }
                        on_input(TerminalInput::Closed);
                        break;
                    }

                    for line in lines.push(&buffer[..read_len as usize]) {
                        on_input(TerminalInput::Line(line));
                    }
                }
            })?;

        self.input_thread = Some(handle);
        Ok(())
    }

    fn stop_input_thread(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.input_thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self, on_input: Box<dyn FnMut(TerminalInput) + Send>) -> std::io::Result<()> {
        if self.input_thread.is_some() {
            return Ok(());
        }
        self.stop_flag.store(false, Ordering::SeqCst);
        self.start_input_thread(on_input)
    }

    fn stop(&mut self) -> std::io::Result<()> {
        self.stop_input_thread();
        std::io::stdout().flush()
    }

    fn write(&mut self, data: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = stdout.write_all(data.as_bytes()).and_then(|()| stdout.flush()) {
            tracing::warn!(error = %err, "terminal write failed");
        }
    }

    fn columns(&self) -> u16 {
        read_winsize(self.stdout_fd)
            .map(|(columns, _)| columns)
            .unwrap_or(DEFAULT_COLUMNS)
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        self.stop_input_thread();
    }
}

/// Signal handler guard. Dropping it unregisters the handlers and joins the listener thread.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Runs `on_signal` for every SIGINT/SIGTERM until the guard is dropped.
#[cfg(unix)]
pub fn install_signal_handlers<F>(on_signal: F) -> std::io::Result<SignalHookGuard>
where
    F: Fn() + Send + 'static,
{
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM])?;
    let handle = signals.handle();

    let thread = thread::Builder::new()
        .name("drill-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                tracing::info!(signal, "termination signal received");
                on_signal();
            }
        })?;

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}
