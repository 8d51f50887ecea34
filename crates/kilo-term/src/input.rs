// SPDX-License-Identifier: MIT
//
// Key decoding.
//
// Turns raw stdin bytes into one logical key per call. Handles exactly
// the sequences a plain xterm-style terminal sends for the editing keys:
//
// - Legacy CSI sequences: `ESC [ A..D` arrows, `ESC [ H` / `ESC [ F`
// - CSI tilde sequences: `ESC [ 1..8 ~` (Home, Delete, End, PageUp/Down)
// - SS3 sequences: `ESC O H` / `ESC O F`
// - Control bytes (Ctrl+letter) and everything else as literal bytes
//
// # Design
//
// Decoding is single-shot. Nothing is buffered between calls: once the
// first byte arrives, the rest of a sequence must follow within the
// read timeout or the whole thing degrades to a bare Escape. Unknown
// sequences degrade the same way. The decoder always returns *some*
// key; it never waits for more input than a sequence can use.

use bitflags::bitflags;

use crate::error::TerminalError;
use crate::reader::ByteSource;

/// The escape byte.
pub const ESC: u8 = 0x1B;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A literal byte. Control bytes are reported as their letter with
    /// [`Modifiers::CTRL`] set.
    Char(u8),
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0001;
    }
}

/// A decoded key: identity plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl Key {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Control plus a lowercase letter, e.g. `Key::ctrl(b'q')`.
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Control plus `letter`.
    #[must_use]
    pub fn is_ctrl(self, letter: u8) -> bool {
        self.code == KeyCode::Char(letter) && self.modifiers.contains(Modifiers::CTRL)
    }

    /// Decode a single byte that is not part of an escape sequence.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::plain(KeyCode::Escape),
            b @ 0x01..=0x1A => Self::ctrl(b + b'a' - 1),
            b => Self::plain(KeyCode::Char(b)),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Block until a key arrives and decode it.
///
/// Read timeouts before the first byte are retried; this is the loop's
/// idle wait. Timeouts inside an escape sequence end decoding with
/// [`KeyCode::Escape`].
///
/// # Errors
///
/// Returns [`TerminalError::Read`] if the byte source fails.
pub fn read_key(input: &mut impl ByteSource) -> Result<Key, TerminalError> {
    loop {
        if let Some(first) = next_byte(input)? {
            return decode(first, input);
        }
    }
}

/// Decode a key whose first byte has already been read.
///
/// # Errors
///
/// Returns [`TerminalError::Read`] if the byte source fails while reading
/// the rest of an escape sequence.
pub fn decode(first: u8, input: &mut impl ByteSource) -> Result<Key, TerminalError> {
    if first != ESC {
        return Ok(Key::from_byte(first));
    }

    let escape = Key::plain(KeyCode::Escape);

    let Some(introducer) = next_byte(input)? else {
        return Ok(escape);
    };
    let Some(second) = next_byte(input)? else {
        return Ok(escape);
    };

    let code = match (introducer, second) {
        (b'[', digit @ b'0'..=b'9') => {
            let Some(third) = next_byte(input)? else {
                return Ok(escape);
            };
            if third == b'~' { tilde_key(digit) } else { None }
        }
        (b'[', letter) => csi_key(letter),
        (b'O', letter) => ss3_key(letter),
        _ => None,
    };

    Ok(code.map_or_else(
        || {
            tracing::trace!(target: "input", introducer, second, "unrecognized_escape_sequence");
            escape
        },
        Key::plain,
    ))
}

fn next_byte(input: &mut impl ByteSource) -> Result<Option<u8>, TerminalError> {
    input.read_byte().map_err(TerminalError::Read)
}

/// `ESC [ n ~` editing keys. Both xterm (1/4) and rxvt (7/8) numbering
/// for Home/End.
const fn tilde_key(digit: u8) -> Option<KeyCode> {
    match digit {
        b'1' | b'7' => Some(KeyCode::Home),
        b'3' => Some(KeyCode::Delete),
        b'4' | b'8' => Some(KeyCode::End),
        b'5' => Some(KeyCode::PageUp),
        b'6' => Some(KeyCode::PageDown),
        _ => None,
    }
}

/// `ESC [ x` with a letter final byte.
const fn csi_key(letter: u8) -> Option<KeyCode> {
    match letter {
        b'A' => Some(KeyCode::ArrowUp),
        b'B' => Some(KeyCode::ArrowDown),
        b'C' => Some(KeyCode::ArrowRight),
        b'D' => Some(KeyCode::ArrowLeft),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

/// `ESC O x` (application cursor mode Home/End).
const fn ss3_key(letter: u8) -> Option<KeyCode> {
    match letter {
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
