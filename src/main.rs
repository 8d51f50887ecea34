// SPDX-License-Identifier: MIT
//
// kilo: a minimal terminal text viewer.
//
// This is the binary that wires the two crates together:
//
//   kilo-term   → raw mode, size queries, key decoding, event loop
//   kilo-editor → document rows, cursor, viewport, frame rendering
//
// Startup order matters: raw mode first (the size probe's reply must not
// echo), then the screen size, then the file. Every way out of `run`
// passes through the same exit path, which clears the screen on failure
// and restores the terminal before anything is printed.
//
//   kilo            empty document, welcome banner
//   kilo <file>     view <file>
//
// Exit status is 0 after Ctrl-Q and 1 after any terminal or file error.

mod logging;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use kilo_editor::document::Document;
use kilo_editor::{Editor, FileError};
use kilo_term::TerminalError;
use kilo_term::event_loop::EventLoop;
use kilo_term::output::RawStdout;
use kilo_term::reader::StdinBytes;
use kilo_term::terminal::{self, RawModeGuard};
use thiserror::Error;
use tracing::{error, info};

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Anything that ends the program with status 1.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Terminal(#[from] TerminalError),
    #[error(transparent)]
    File(#[from] FileError),
}

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Command-line arguments: an optional file to open.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    path: Option<PathBuf>,
}

impl Args {
    /// Take the first argument after the program name as the file.
    /// Anything after it is ignored.
    fn parse(args: impl IntoIterator<Item = OsString>) -> Self {
        Self {
            path: args.into_iter().nth(1).map(PathBuf::from),
        }
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Hold raw mode for the whole session and give it back on every path.
fn run(args: &Args) -> Result<(), AppError> {
    let mut guard = RawModeGuard::enter()?;
    let mut event_loop = EventLoop::new(StdinBytes::new(), RawStdout::new());

    let result = session(&mut event_loop, args);
    if result.is_err() {
        let _ = event_loop.clear_screen();
    }

    let restored = guard.restore();
    result?;
    restored?;
    Ok(())
}

/// Size the screen, load the document, and run the loop until Ctrl-Q.
fn session(
    event_loop: &mut EventLoop<StdinBytes, RawStdout>,
    args: &Args,
) -> Result<(), AppError> {
    let (input, output) = event_loop.parts_mut();
    let screen = terminal::query_window_size(output, input)?;

    let document = match &args.path {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    info!(
        target: "runtime.startup",
        path = ?args.path,
        rows = document.len(),
        screen_rows = screen.rows,
        screen_cols = screen.cols,
        "bootstrap_complete"
    );

    let mut editor = Editor::new(document, screen);
    event_loop.run(&mut editor)?;
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let _log_guard = logging::init();
    let args = Args::parse(env::args_os());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "runtime", error = %e, "fatal");
            eprintln!("kilo: {e}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
