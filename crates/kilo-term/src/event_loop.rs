// SPDX-License-Identifier: MIT
//
// Event loop: render, read, dispatch.
//
// The loop is strictly sequential: paint a frame, flush it in one write,
// block on the next key, hand it to the application, repeat. State is
// never touched while a frame is being built and no frame is drawn while
// a key is being handled, so nothing here needs a lock or a thread.
//
// The only wait is inside `read_key`, which polls the byte source with
// the terminal's one-decisecond read timeout until a byte shows up.

use std::io::{self, Write};

use crate::ansi;
use crate::error::TerminalError;
use crate::input::{self, Key};
use crate::output::AppendBuffer;
use crate::reader::ByteSource;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Leave the loop. The caller restores the terminal and exits.
    Quit,
}

/// Application interface for the event loop.
pub trait App {
    /// Build the next frame into `frame`.
    ///
    /// Takes `&mut self` so the application can settle derived state (the
    /// viewport) before drawing.
    ///
    /// # Errors
    ///
    /// A write error aborts the loop.
    fn paint(&mut self, frame: &mut AppendBuffer) -> io::Result<()>;

    /// Handle one decoded key.
    fn on_key(&mut self, key: Key) -> Action;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The render→read→dispatch loop over a byte source and an output.
///
/// ```no_run
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::Key;
/// use kilo_term::output::{AppendBuffer, RawStdout};
/// use kilo_term::reader::StdinBytes;
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn paint(&mut self, frame: &mut AppendBuffer) -> std::io::Result<()> {
///         frame.append(b"press ctrl-q");
///         Ok(())
///     }
///
///     fn on_key(&mut self, key: Key) -> Action {
///         if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
/// }
///
/// let mut event_loop = EventLoop::new(StdinBytes::new(), RawStdout::new());
/// event_loop.run(&mut Quitter)?;
/// # Ok::<(), kilo_term::TerminalError>(())
/// ```
#[derive(Debug)]
pub struct EventLoop<I, O> {
    input: I,
    output: O,
    frames: u64,
}

impl<I: ByteSource, O: Write> EventLoop<I, O> {
    pub const fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            frames: 0,
        }
    }

    /// Number of frames flushed so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Borrow the byte source and the output together, e.g. for the
    /// startup size query which writes a request and reads the reply.
    pub const fn parts_mut(&mut self) -> (&mut I, &mut O) {
        (&mut self.input, &mut self.output)
    }

    /// Tear the loop apart into its source and output.
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// On quit the screen is cleared and the cursor homed. Terminal mode is
    /// left to the caller's guard.
    ///
    /// # Errors
    ///
    /// Returns the first read or write failure. The screen is not cleared
    /// in that case; see [`clear_screen`](Self::clear_screen).
    pub fn run(&mut self, app: &mut impl App) -> Result<(), TerminalError> {
        loop {
            let mut frame = AppendBuffer::new();
            app.paint(&mut frame)?;
            frame.flush_to(&mut self.output)?;
            self.frames += 1;

            let key = input::read_key(&mut self.input)?;
            if app.on_key(key) == Action::Quit {
                tracing::info!(target: "runtime", frames = self.frames, "quit");
                break;
            }
        }

        self.clear_screen()
    }

    /// Clear the screen and home the cursor in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear_screen(&mut self) -> Result<(), TerminalError> {
        let mut frame = AppendBuffer::new();
        ansi::clear_screen(&mut frame)?;
        ansi::cursor_home(&mut frame)?;
        frame.flush_to(&mut self.output)?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::reader::ScriptedBytes;
    use pretty_assertions::assert_eq;

    /// Records every key and paints a frame counter.
    #[derive(Default)]
    struct Recorder {
        keys: Vec<Key>,
        paints: usize,
    }

    impl App for Recorder {
        fn paint(&mut self, frame: &mut AppendBuffer) -> io::Result<()> {
            self.paints += 1;
            write!(frame, "[{}]", self.paints)
        }

        fn on_key(&mut self, key: Key) -> Action {
            self.keys.push(key);
            if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
        }
    }

    #[test]
    fn paints_before_every_key() {
        let input = ScriptedBytes::new(b"ab\x11");
        let mut event_loop = EventLoop::new(input, Vec::new());
        let mut app = Recorder::default();

        event_loop.run(&mut app).unwrap();

        assert_eq!(app.paints, 3);
        assert_eq!(event_loop.frames(), 3);
        assert_eq!(
            app.keys,
            vec![
                Key::plain(KeyCode::Char(b'a')),
                Key::plain(KeyCode::Char(b'b')),
                Key::ctrl(b'q'),
            ]
        );
        let (_, out) = event_loop.into_parts();
        assert_eq!(out, b"[1][2][3]\x1b[2J\x1b[H");
    }

    #[test]
    fn quit_stops_reading() {
        let input = ScriptedBytes::new(b"\x11zz");
        let mut event_loop = EventLoop::new(input, Vec::new());
        event_loop.run(&mut Recorder::default()).unwrap();
        assert_eq!(event_loop.parts_mut().0.remaining(), 2);
    }

    #[test]
    fn read_failure_ends_loop_without_clearing() {
        let input = ScriptedBytes::new(b"a");
        let mut event_loop = EventLoop::new(input, Vec::new());
        let err = event_loop.run(&mut Recorder::default()).unwrap_err();

        assert!(matches!(err, TerminalError::Read(_)));
        let (_, out) = event_loop.into_parts();
        assert_eq!(out, b"[1][2]");
    }

    #[test]
    fn idle_timeouts_do_not_repaint() {
        let input = ScriptedBytes::default().timeout().timeout().then(b"\x11");
        let mut event_loop = EventLoop::new(input, Vec::new());
        let mut app = Recorder::default();
        event_loop.run(&mut app).unwrap();
        assert_eq!(app.paints, 1);
    }

    #[test]
    fn clear_screen_sequence() {
        let mut event_loop = EventLoop::new(ScriptedBytes::default(), Vec::new());
        event_loop.clear_screen().unwrap();
        assert_eq!(event_loop.parts_mut().1.as_slice(), b"\x1b[2J\x1b[H");
    }
}
