// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, size queries, and guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and raw fd writes. These are the
// standard POSIX interfaces for terminal control. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition. `RawModeGuard::enter` saves the
// original termios and switches the terminal to raw mode; the guard
// gives it back exactly once, whichever way the program leaves: an
// explicit `restore()` on quit or on a fatal error, `Drop` on an early
// return, or the panic hook below if something panics mid-frame.
//
// The panic hook can't see the guard, so the original termios is also
// kept in a process-wide backup behind a `Mutex`.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::TerminalError;
use crate::reader::ByteSource;

/// Longest cursor report we accept, terminator included.
const CURSOR_REPORT_MAX: usize = 32;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { cols, rows }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(ws.ws_row, ws.ws_col))
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Determine the screen size, falling back to the cursor probe.
///
/// The probe pushes the cursor to the bottom-right corner with
/// [`ansi::MOVE_FAR_BOTTOM_RIGHT`] and asks where it ended up.
///
/// # Errors
///
/// Returns [`TerminalError::WindowSize`] wrapping the probe's failure if
/// neither path yields a size.
pub fn query_window_size(
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size, TerminalError> {
    if let Some(size) = get_size() {
        tracing::debug!(target: "terminal", rows = size.rows, cols = size.cols, "size_from_ioctl");
        return Ok(size);
    }

    tracing::debug!(target: "terminal", "ioctl_size_unavailable_probing");
    size_from_cursor_probe(out, input).map_err(|e| TerminalError::WindowSize(Box::new(e)))
}

/// Size the screen by moving the cursor as far as it goes and reading
/// back its position.
///
/// # Errors
///
/// Returns an error if the probe can't be written or the cursor report
/// is malformed.
pub fn size_from_cursor_probe(
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size, TerminalError> {
    ansi::move_far_bottom_right(out)?;
    query_cursor_position(out, input)
}

/// Ask the terminal where the cursor is.
///
/// Sends `ESC [ 6 n` and reads the reply up to the terminating `R`, a
/// read timeout, or [`CURSOR_REPORT_MAX`] bytes, whichever comes first.
/// The result is 1-based, so it doubles as a size once the cursor sits
/// in the bottom-right corner.
///
/// # Errors
///
/// Returns [`TerminalError::Write`] or [`TerminalError::Read`] on I/O
/// failure and [`TerminalError::CursorReport`] if the reply does not
/// parse.
pub fn query_cursor_position(
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size, TerminalError> {
    ansi::request_cursor_position(out)?;
    out.flush()?;

    let mut reply = Vec::with_capacity(CURSOR_REPORT_MAX);
    while reply.len() < CURSOR_REPORT_MAX - 1 {
        match input.read_byte().map_err(TerminalError::Read)? {
            Some(b'R') | None => break,
            Some(byte) => reply.push(byte),
        }
    }

    parse_cursor_report(&reply)
}

/// Parse a cursor position report with its final `R` already removed.
///
/// Expects exactly `ESC [ rows ; cols`, both values positive decimals.
///
/// # Errors
///
/// Returns [`TerminalError::CursorReport`] if the bytes don't match.
pub fn parse_cursor_report(reply: &[u8]) -> Result<Size, TerminalError> {
    let malformed = || TerminalError::CursorReport(String::from_utf8_lossy(reply).into_owned());

    let body = reply.strip_prefix(b"\x1b[").ok_or_else(malformed)?;
    let split = body.iter().position(|&b| b == b';').ok_or_else(malformed)?;
    let rows = parse_u16(&body[..split]).ok_or_else(malformed)?;
    let cols = parse_u16(&body[split + 1..]).ok_or_else(malformed)?;

    if rows == 0 || cols == 0 {
        return Err(malformed());
    }
    Ok(Size::new(rows, cols))
}

/// Parse a non-empty run of ASCII digits. `None` on anything else or
/// on overflow.
fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &b| {
        if b.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add(u16::from(b - b'0'))
        } else {
            None
        }
    })
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(libc::c_int, libc::termios)>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, original)) = guard.take() {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const original);
            }
        }
    }
}

/// Clear the screen, home the cursor, and make it visible.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard. Ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal with no
/// echo and no line editing, and the panic message lands mid-screen.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] straight to fd 1.
///
/// Bypasses `io::stdout()`'s lock in case the panic happened while a
/// frame flush held it.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Compute the raw-mode attributes from the terminal's original ones.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no stripping
/// of the 8th bit, no XON/XOFF flow control. Output: no post-processing
/// (so `\n` is not turned into `\r\n`). Local: no echo, no canonical
/// line buffering, no Ctrl-V literal-next, no signal keys. Characters
/// are 8 bits. Reads return after one decisecond with or without data.
#[cfg(unix)]
#[must_use]
pub fn raw_attributes(original: &libc::termios) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = 1;
    raw
}

/// Raw mode, held for as long as the guard lives.
///
/// ```no_run
/// use kilo_term::terminal::RawModeGuard;
///
/// let mut guard = RawModeGuard::enter()?;
/// // ... render frames, read keys ...
/// guard.restore()?;
/// # Ok::<(), kilo_term::TerminalError>(())
/// ```
pub struct RawModeGuard {
    /// Original termios saved before entering raw mode. `None` once
    /// restored.
    #[cfg(unix)]
    original: Option<libc::termios>,
    /// Terminal the attributes belong to.
    #[cfg(unix)]
    fd: libc::c_int,
    #[cfg(not(unix))]
    active: bool,
}

impl RawModeGuard {
    /// Switch stdin's terminal to raw mode.
    ///
    /// # Errors
    ///
    /// See [`enter_fd`](Self::enter_fd).
    #[cfg(unix)]
    pub fn enter() -> Result<Self, TerminalError> {
        Self::enter_fd(libc::STDIN_FILENO)
    }

    /// Switch the terminal open on `fd` to raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::GetAttributes`] if `fd` is not a terminal
    /// and [`TerminalError::SetAttributes`] if the raw configuration can't
    /// be applied. In the latter case the original attributes are put back
    /// before returning.
    #[cfg(unix)]
    pub fn enter_fd(fd: libc::c_int) -> Result<Self, TerminalError> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut original) } != 0 {
            return Err(TerminalError::GetAttributes(io::Error::last_os_error()));
        }

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some((fd, original));
        }
        install_panic_hook();

        // From here on, Drop puts the original attributes back.
        let guard = Self {
            original: Some(original),
            fd,
        };

        let raw_mode = raw_attributes(&original);
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const raw_mode) } != 0 {
            return Err(TerminalError::SetAttributes(io::Error::last_os_error()));
        }

        tracing::info!(target: "terminal", "raw_mode_entered");
        Ok(guard)
    }

    #[cfg(not(unix))]
    pub fn enter() -> Result<Self, TerminalError> {
        install_panic_hook();
        Ok(Self { active: true })
    }

    /// Whether raw mode is still held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            self.active
        }
    }

    /// Put the original attributes back.
    ///
    /// Only the first successful call touches the terminal; later calls
    /// are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::SetAttributes`] if `tcsetattr` fails.
    #[cfg(unix)]
    pub fn restore(&mut self) -> Result<(), TerminalError> {
        if let Some(ref original) = self.original {
            if unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, original) } != 0 {
                return Err(TerminalError::SetAttributes(io::Error::last_os_error()));
            }

            // Clear the global backup now that the restore succeeded.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                if guard.as_ref().is_some_and(|(fd, _)| *fd == self.fd) {
                    *guard = None;
                }
            }

            self.original = None;
            tracing::info!(target: "terminal", "raw_mode_restored");
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn restore(&mut self) -> Result<(), TerminalError> {
        self.active = false;
        Ok(())
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
