// SPDX-License-Identifier: MIT
//
// kilo-term: terminal layer for kilo.
//
// Direct terminal control over raw termios and ANSI escape sequences:
// entering and leaving raw mode, sizing the screen, decoding keys from
// the byte stream, and pushing each frame out in a single write.
//
// No TUI framework (ratatui, crossterm) sits in between. Every byte
// sent to the terminal is written by this crate.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::TerminalError;
