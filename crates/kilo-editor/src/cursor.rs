//! Cursor: a logical position in document coordinates.
//!
//! The row ranges over `0..=row_count`: one past the last row is allowed
//! so the cursor can sit on the empty line after the file. The column is
//! only bounded below. Moving right never stops at the end of the row or
//! the edge of the screen; the viewport scrolls to follow instead.

/// Cursor position: byte column and row index, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CursorState {
    pub col: usize,
    pub row: usize,
}

impl CursorState {
    /// The top-left corner of the document.
    pub const ORIGIN: Self = Self { col: 0, row: 0 };

    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { col, row }
    }

    /// One column left, stopping at column 0.
    pub const fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    /// One column right. Unbounded.
    pub const fn move_right(&mut self) {
        self.col = self.col.saturating_add(1);
    }

    /// One row up, stopping at row 0.
    pub const fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// One row down, stopping one past the last row.
    pub const fn move_down(&mut self, row_count: usize) {
        if self.row < row_count {
            self.row += 1;
        }
    }

    /// Jump to column 0.
    pub const fn home(&mut self) {
        self.col = 0;
    }

    /// Jump to the last screen column.
    pub const fn end(&mut self, screen_cols: usize) {
        self.col = screen_cols.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_stops_at_zero() {
        let mut c = CursorState::ORIGIN;
        c.move_left();
        assert_eq!(c, CursorState::ORIGIN);

        let mut c = CursorState::new(0, 2);
        c.move_left();
        assert_eq!(c.col, 1);
    }

    #[test]
    fn right_is_unbounded() {
        let mut c = CursorState::ORIGIN;
        for _ in 0..500 {
            c.move_right();
        }
        assert_eq!(c.col, 500);
    }

    #[test]
    fn home_and_end() {
        let mut c = CursorState::new(3, 17);
        c.end(80);
        assert_eq!(c, CursorState::new(3, 79));
        c.home();
        assert_eq!(c, CursorState::new(3, 0));
    }

    #[test]
    fn end_on_zero_width_screen() {
        let mut c = CursorState::new(0, 5);
        c.end(0);
        assert_eq!(c.col, 0);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn up_stops_at_zero() {
        let mut c = CursorState::ORIGIN;
        c.move_up();
        assert_eq!(c.row, 0);
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let mut c = CursorState::ORIGIN;
        for _ in 0..10 {
            c.move_down(3);
        }
        assert_eq!(c.row, 3);
    }

    #[test]
    fn down_in_empty_document_stays() {
        let mut c = CursorState::ORIGIN;
        c.move_down(0);
        assert_eq!(c.row, 0);
    }

    #[test]
    fn arbitrary_walks_stay_in_bounds() {
        // Deterministic pseudo-random walk over the four arrow moves.
        let row_count = 7;
        let mut c = CursorState::ORIGIN;
        let mut seed: u32 = 0x2545_F491;
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 4 {
                0 => c.move_left(),
                1 => c.move_right(),
                2 => c.move_up(),
                _ => c.move_down(row_count),
            }
            assert!(c.row <= row_count);
        }
    }
}
