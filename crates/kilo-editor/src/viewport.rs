//! Viewport: which part of the document is on screen.
//!
//! The offsets are the document coordinates of the screen's top-left
//! cell. Before every frame they are recomputed from the cursor so that
//! the cursor is always visible:
//!
//! ```text
//! row_offset <= cursor.row <= row_offset + screen_rows - 1
//! col_offset <= cursor.col <= col_offset + screen_cols - 1
//! ```
//!
//! The offsets only move as far as needed. A cursor already on screen
//! leaves them untouched.

use kilo_term::terminal::Size;

use crate::cursor::CursorState;

/// Top-left corner of the visible window, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(row_offset: usize, col_offset: usize) -> Self {
        Self {
            row_offset,
            col_offset,
        }
    }

    /// Scroll just enough to bring `cursor` into a `screen`-sized window.
    pub fn scroll(&mut self, cursor: CursorState, screen: Size) {
        let rows = usize::from(screen.rows).max(1);
        let cols = usize::from(screen.cols).max(1);

        if cursor.row < self.row_offset {
            self.row_offset = cursor.row;
        }
        if cursor.row >= self.row_offset + rows {
            self.row_offset = cursor.row - rows + 1;
        }
        if cursor.col < self.col_offset {
            self.col_offset = cursor.col;
        }
        if cursor.col >= self.col_offset + cols {
            self.col_offset = cursor.col - cols + 1;
        }
    }

    /// Where `cursor` lands on screen, 0-based `(x, y)`.
    ///
    /// Only meaningful after [`scroll`](Self::scroll) with the same cursor.
    #[must_use]
    pub const fn screen_position(&self, cursor: CursorState) -> (usize, usize) {
        (
            cursor.col.saturating_sub(self.col_offset),
            cursor.row.saturating_sub(self.row_offset),
        )
    }
}
