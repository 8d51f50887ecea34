// SPDX-License-Identifier: MIT
//
// Terminal errors.
//
// Every variant here is fatal for the editor: there is no recovery path
// once the terminal cannot be configured, read, or written. The binary
// restores cooked mode and prints the message before exiting.

use std::io;

use thiserror::Error;

/// Failure of a terminal-level operation.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// `tcgetattr` failed (usually: stdin is not a terminal).
    #[error("tcgetattr: {0}")]
    GetAttributes(#[source] io::Error),

    /// `tcsetattr` failed while entering or leaving raw mode.
    #[error("tcsetattr: {0}")]
    SetAttributes(#[source] io::Error),

    /// Reading a byte from the terminal failed for a reason other than a
    /// timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// The reply to a cursor-position request was absent or malformed.
    #[error("malformed cursor position report: {0:?}")]
    CursorReport(String),

    /// Neither `TIOCGWINSZ` nor the cursor probe produced a size.
    #[error("getWindowSize: {0}")]
    WindowSize(#[source] Box<TerminalError>),
}

impl From<io::Error> for TerminalError {
    fn from(e: io::Error) -> Self {
        Self::Write(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_os_error() {
        let err = TerminalError::GetAttributes(io::Error::other("not a tty"));
        let msg = err.to_string();
        assert!(msg.starts_with("tcgetattr: "), "{msg}");
    }

    #[test]
    fn window_size_wraps_cause() {
        let inner = TerminalError::CursorReport("\u{1b}[R".to_string());
        let err = TerminalError::WindowSize(Box::new(inner));
        assert!(err.to_string().starts_with("getWindowSize: malformed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_error_converts_to_write() {
        let err: TerminalError = io::Error::other("broken pipe").into();
        assert!(matches!(err, TerminalError::Write(_)));
    }
}
