// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources: where terminal input comes from.
//
// The editor reads stdin one byte at a time. In raw mode with VMIN=0 and
// VTIME=1, `read()` returns after at most a tenth of a second, with or
// without a byte. That bounded read is the only place the program waits:
// between frames the loop sits here, polling.
//
// `ByteSource` abstracts the poll so the key decoder and the event loop
// can run against a scripted byte queue in tests. `None` means "the read
// timed out"; errors are real I/O failures.

use std::collections::VecDeque;
use std::io;

/// A source of single input bytes with a bounded wait.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` if the read timed out without data.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error for anything other than a timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Reads stdin's file descriptor directly, one byte per call.
///
/// Bypasses `io::stdin()`'s internal buffer so the timeout set in the
/// termios applies to every byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinBytes;

impl StdinBytes {
    /// Create a stdin byte source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── Scripted ────────────────────────────────────────────────────────────────

/// A pre-recorded input stream of bytes and timeouts.
///
/// Each entry is either a byte or a simulated read timeout. Once the
/// script runs out, reads fail with `UnexpectedEof` so a test that
/// expects more input than it scripted fails instead of hanging.
///
/// ```
/// use kilo_term::reader::{ByteSource, ScriptedBytes};
///
/// let mut input = ScriptedBytes::new(b"\x1b").timeout();
/// assert_eq!(input.read_byte().unwrap(), Some(0x1b));
/// assert_eq!(input.read_byte().unwrap(), None);
/// assert!(input.read_byte().is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptedBytes {
    script: VecDeque<Option<u8>>,
}

impl ScriptedBytes {
    /// Script the given bytes, in order, with no timeouts.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Append more bytes to the script.
    #[must_use]
    pub fn then(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append one simulated read timeout.
    #[must_use]
    pub fn timeout(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Number of scripted entries (bytes and timeouts) not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.script
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ScriptedBytes ───────────────────────────────────────────────────

    #[test]
    fn scripted_yields_bytes_in_order() {
        let mut src = ScriptedBytes::new(b"ab");
        assert_eq!(src.read_byte().unwrap(), Some(b'a'));
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn scripted_timeouts_interleave() {
        let mut src = ScriptedBytes::new(b"x").timeout().then(b"y");
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.read_byte().unwrap(), Some(b'x'));
        assert_eq!(src.read_byte().unwrap(), None);
        assert_eq!(src.read_byte().unwrap(), Some(b'y'));
    }

    #[test]
    fn scripted_exhaustion_is_an_error() {
        let mut src = ScriptedBytes::new(b"");
        let err = src.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn mutable_reference_is_a_source() {
        fn first(mut src: impl ByteSource) -> Option<u8> {
            src.read_byte().unwrap()
        }

        let mut src = ScriptedBytes::new(b"qz");
        assert_eq!(first(&mut src), Some(b'q'));
        assert_eq!(src.remaining(), 1);
    }
}
