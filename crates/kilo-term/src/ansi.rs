// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. This module just knows the byte-level
// encoding of every terminal command the editor needs.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI CUP uses 1-based coordinates).
use std::io::{self, Write};

/// Cursor position request (DSR 6). The terminal answers `ESC [ r ; c R`.
pub const REQUEST_CURSOR_POSITION: &[u8] = b"\x1b[6n";

/// Push the cursor as far right and down as the terminal allows.
///
/// CUF/CUD stop at the screen edge, unlike CUP which has undefined
/// behavior past it. Used to size the screen when `TIOCGWINSZ` fails.
pub const MOVE_FAR_BOTTOM_RIGHT: &[u8] = b"\x1b[999C\x1b[998B";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: usize, y: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Move the cursor to the top-left corner.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Ask the terminal to report the cursor position.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(REQUEST_CURSOR_POSITION)
}

/// Emit the bottom-right probe used by the fallback size query.
#[inline]
pub fn move_far_bottom_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MOVE_FAR_BOTTOM_RIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_position() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_large_coordinates() {
        assert_eq!(emit(|w| cursor_to(w, 999, 499)), "\x1b[500;1000H");
    }

    #[test]
    fn cursor_home_sequence() {
        assert_eq!(emit(cursor_home), "\x1b[H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(cursor_hide), "\x1b[?25l");
        assert_eq!(emit(cursor_show), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_sequences() {
        assert_eq!(emit(clear_screen), "\x1b[2J");
        assert_eq!(emit(clear_line), "\x1b[K");
    }

    // ── Queries ─────────────────────────────────────────────────────────

    #[test]
    fn cursor_position_request() {
        assert_eq!(emit(request_cursor_position), "\x1b[6n");
    }

    #[test]
    fn bottom_right_probe() {
        let s = emit(move_far_bottom_right);
        assert_eq!(s, "\x1b[999C\x1b[998B");
        assert_eq!(s.len(), 12);
    }
}
