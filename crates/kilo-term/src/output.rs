// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Frame output buffering.
//
// AppendBuffer accumulates every byte of one frame (cursor moves, row
// text, line clears) so the whole frame reaches the terminal in a single
// write. A frame is built once and consumed by the flush; nothing carries
// over to the next frame.
//
// Growth is best-effort. If the allocator refuses to grow the buffer, the
// append is dropped and the frame goes out without it. A short frame is
// redrawn in full on the next keypress anyway.
//
// `io::stdout()` is line-buffered and splits a frame at every newline,
// so frames go out through `RawStdout`, which hands the bytes to
// `write(2)` on fd 1 untouched.

use std::io::{self, Write};

/// A byte buffer that collects one frame for a single `write()`.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    /// Create an empty buffer. Nothing is allocated until the first append.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `bytes` to the frame.
    ///
    /// Returns `false` if the buffer could not grow. The bytes are dropped
    /// in that case and the buffer keeps its previous contents.
    pub fn append(&mut self, bytes: &[u8]) -> bool {
        if let Err(e) = self.buf.try_reserve(bytes.len()) {
            tracing::trace!(target: "render", requested = bytes.len(), error = %e, "append_dropped");
            return false;
        }
        self.buf.extend_from_slice(bytes);
        true
    }

    /// Write the whole frame to `w` in one call and release the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
        }
        Ok(())
    }
}

impl Write for AppendBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A dropped append still reports the bytes as taken so `write!`
        // does not spin on a short write.
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing happens in flush_to().
        Ok(())
    }
}

// ─── RawStdout ───────────────────────────────────────────────────────────────

/// Unbuffered writer for stdout's file descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawStdout;

impl RawStdout {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Write for RawStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(not(unix))]
impl Write for RawStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi;

    /// Writer that records how many `write` calls it received.
    #[derive(Default)]
    struct CountingWriter {
        bytes: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    // ── AppendBuffer ────────────────────────────────────────────────────

    #[test]
    fn new_is_empty() {
        let buf = AppendBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn append_accumulates_in_order() {
        let mut buf = AppendBuffer::new();
        assert!(buf.append(b"~"));
        assert!(buf.append(b"\x1b[K"));
        assert!(buf.append(b"\r\n"));
        assert_eq!(buf.as_bytes(), b"~\x1b[K\r\n");
    }

    #[test]
    fn append_empty_slice_is_noop() {
        let mut buf = AppendBuffer::new();
        assert!(buf.append(b""));
        assert!(buf.is_empty());
    }

    #[test]
    fn write_trait_feeds_ansi_helpers() {
        let mut buf = AppendBuffer::new();
        ansi::cursor_hide(&mut buf).unwrap();
        write!(buf, "row {}", 7).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[?25lrow 7");
    }

    #[test]
    fn flush_is_a_single_write() {
        let mut buf = AppendBuffer::new();
        for _ in 0..100 {
            buf.append(b"~\x1b[K\r\n");
        }
        let expected = buf.as_bytes().to_vec();

        let mut out = CountingWriter::default();
        buf.flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 1);
        assert_eq!(out.flushes, 1);
        assert_eq!(out.bytes, expected);
    }

    #[test]
    fn raw_stdout_accepts_empty_write() {
        assert_eq!(RawStdout::new().write(b"").unwrap(), 0);
    }

    #[test]
    fn flush_of_empty_buffer_writes_nothing() {
        let mut out = CountingWriter::default();
        AppendBuffer::new().flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 0);
    }
}
