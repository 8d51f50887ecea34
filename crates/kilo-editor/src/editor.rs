//! Editor: cursor state, key handling, and the glue to the event loop.
//!
//! The `Editor` owns the document, the cursor, and the viewport, and
//! implements [`App`] so the event loop can drive it:
//!
//! - [`paint`](App::paint) scrolls the viewport to the cursor and draws.
//! - [`on_key`](App::on_key) maps one decoded key to a cursor move, or to
//!   [`Action::Quit`] for Ctrl-Q.
//!
//! | Key              | Effect                                         |
//! |------------------|------------------------------------------------|
//! | Left / Right     | column −1 (not below 0) / column +1 (no limit) |
//! | Up / Down        | row −1 (not below 0) / row +1 (up to row count)|
//! | PageUp / PageDown| Up / Down repeated once per screen row         |
//! | Home / End       | column 0 / last screen column                  |
//! | Ctrl-Q           | quit                                           |
//!
//! Everything else is ignored.

use std::io;

use kilo_term::event_loop::{Action, App};
use kilo_term::input::{Key, KeyCode};
use kilo_term::output::AppendBuffer;
use kilo_term::terminal::Size;

use crate::cursor::CursorState;
use crate::document::Document;
use crate::render;
use crate::viewport::Viewport;

/// Letter that, with Control, quits.
pub const QUIT_KEY: u8 = b'q';

/// The viewer's state.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    cursor: CursorState,
    viewport: Viewport,
    screen: Size,
}

impl Editor {
    /// An editor over `document` on a screen of the given size, cursor at
    /// the origin.
    #[must_use]
    pub fn new(document: Document, screen: Size) -> Self {
        Self {
            document,
            cursor: CursorState::ORIGIN,
            viewport: Viewport::default(),
            screen,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn cursor(&self) -> CursorState {
        self.cursor
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn screen(&self) -> Size {
        self.screen
    }

    /// Apply one key.
    pub fn process_key(&mut self, key: Key) -> Action {
        if key.is_ctrl(QUIT_KEY) {
            return Action::Quit;
        }

        match key.code {
            KeyCode::ArrowLeft
            | KeyCode::ArrowRight
            | KeyCode::ArrowUp
            | KeyCode::ArrowDown => self.move_cursor(key.code),
            KeyCode::PageUp | KeyCode::PageDown => {
                let step = if key.code == KeyCode::PageUp {
                    KeyCode::ArrowUp
                } else {
                    KeyCode::ArrowDown
                };
                for _ in 0..self.screen.rows {
                    self.move_cursor(step);
                }
            }
            KeyCode::Home => self.cursor.home(),
            KeyCode::End => self.cursor.end(usize::from(self.screen.cols)),
            KeyCode::Char(_) | KeyCode::Escape | KeyCode::Delete => {
                tracing::trace!(target: "editor", ?key, "key_ignored");
            }
        }

        Action::Continue
    }

    fn move_cursor(&mut self, direction: KeyCode) {
        match direction {
            KeyCode::ArrowLeft => self.cursor.move_left(),
            KeyCode::ArrowRight => self.cursor.move_right(),
            KeyCode::ArrowUp => self.cursor.move_up(),
            KeyCode::ArrowDown => self.cursor.move_down(self.document.len()),
            _ => {}
        }
    }

    /// Scroll the viewport to the cursor and draw the frame.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the frame.
    pub fn refresh(&mut self, frame: &mut AppendBuffer) -> io::Result<()> {
        self.viewport.scroll(self.cursor, self.screen);
        render::draw_frame(frame, &self.document, self.cursor, self.viewport, self.screen)
    }
}

impl App for Editor {
    fn paint(&mut self, frame: &mut AppendBuffer) -> io::Result<()> {
        self.refresh(frame)
    }

    fn on_key(&mut self, key: Key) -> Action {
        self.process_key(key)
    }
}
