//! Render: compose one frame from the document and cursor.
//!
//! A frame is built front to back into an [`AppendBuffer`]:
//!
//! ```text
//! ESC[?25l  ESC[H                      hide cursor, go home
//! row 0 .. row N-1                     each followed by ESC[K,
//!                                      joined with \r\n
//! ESC[y;xH  ESC[?25h                   place cursor, show it
//! ```
//!
//! Each screen row shows either a document row (sliced at the column
//! offset and clamped to the screen width), a `~` filler past the end of
//! the document, or the welcome banner when the document is empty.
//! Widths are byte counts.

use std::io;

use kilo_term::ansi;
use kilo_term::output::AppendBuffer;
use kilo_term::terminal::Size;

use crate::cursor::CursorState;
use crate::document::Document;
use crate::viewport::Viewport;

/// Program version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The welcome banner text.
#[must_use]
pub fn welcome_message() -> String {
    format!("kilo editor --version {VERSION}")
}

/// Draw a complete frame.
///
/// `viewport` must already have been scrolled to `cursor`.
///
/// # Errors
///
/// Propagates write errors from the frame. An [`AppendBuffer`] never
/// reports one.
pub fn draw_frame(
    frame: &mut AppendBuffer,
    doc: &Document,
    cursor: CursorState,
    viewport: Viewport,
    screen: Size,
) -> io::Result<()> {
    ansi::cursor_hide(frame)?;
    ansi::cursor_home(frame)?;

    draw_rows(frame, doc, viewport, screen)?;

    let (x, y) = viewport.screen_position(cursor);
    ansi::cursor_to(frame, x, y)?;
    ansi::cursor_show(frame)
}

/// Draw every screen row.
///
/// # Errors
///
/// Propagates write errors from the frame.
pub fn draw_rows(
    frame: &mut AppendBuffer,
    doc: &Document,
    viewport: Viewport,
    screen: Size,
) -> io::Result<()> {
    let rows = usize::from(screen.rows);
    let cols = usize::from(screen.cols);

    for y in 0..rows {
        let file_row = y + viewport.row_offset;

        match doc.row(file_row) {
            Some(row) => {
                frame.append(row.visible(viewport.col_offset, cols));
            }
            None if doc.is_empty() && y == rows / 3 => draw_welcome(frame, cols),
            None => {
                frame.append(b"~");
            }
        }

        ansi::clear_line(frame)?;
        if y + 1 < rows {
            frame.append(b"\r\n");
        }
    }
    Ok(())
}

/// The centered banner. The first padding column keeps its `~` so the
/// filler column stays unbroken.
fn draw_welcome(frame: &mut AppendBuffer, cols: usize) {
    let welcome = welcome_message();
    let len = welcome.len().min(cols);

    let mut padding = (cols - len) / 2;
    if padding > 0 {
        frame.append(b"~");
        padding -= 1;
    }
    frame.append(" ".repeat(padding).as_bytes());
    frame.append(&welcome.as_bytes()[..len]);
}
