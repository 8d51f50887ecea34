//! Document: the rows of the file being viewed.
//!
//! A `Document` is an ordered list of [`Row`]s, one per line of the source
//! file, in file order. Rows are loaded once at startup and never change
//! afterwards.
//!
//! # Design choices
//!
//! - **Rows are bytes**, not `String`s. The viewer draws whatever the file
//!   contains and measures columns in bytes, so there is nothing to gain
//!   from UTF-8 validation.
//!
//! - **Line terminators are stripped** on load. `\n`, `\r\n`, and any run
//!   of trailing `\r`/`\n` bytes at the end of a line all disappear; a
//!   `\r` in the middle of a line stays.
//!
//! - **A final line without a terminator** still becomes a row. A file
//!   ending in `\n` does not get an extra empty row.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::FileError;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    chars: Vec<u8>,
}

impl Row {
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            chars: bytes.to_vec(),
        }
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// The bytes visible in a window `width` columns wide starting at
    /// column `offset`. Empty if the row ends before `offset`.
    #[must_use]
    pub fn visible(&self, offset: usize, width: usize) -> &[u8] {
        let start = offset.min(self.chars.len());
        let end = start + width.min(self.chars.len() - start);
        &self.chars[start..end]
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The rows of the loaded file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Row>,
}

impl Document {
    /// An empty document (no file given on the command line).
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Load a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Open`] if the file can't be opened and
    /// [`FileError::Read`] if reading it fails part-way.
    pub fn open(path: &Path) -> Result<Self, FileError> {
        let file = File::open(path).map_err(|source| FileError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Self::from_reader(BufReader::new(file)).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(target: "io", file = %path.display(), rows = doc.len(), "file_read_ok");
        Ok(doc)
    }

    /// Read rows from any buffered reader until EOF.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error.
    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut doc = Self::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            doc.append_row(strip_terminator(&line));
        }

        Ok(doc)
    }

    /// Add a row at the end.
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, if the document is that long.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Drop every trailing `\r` and `\n`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(text: &[u8]) -> Document {
        Document::from_reader(text).unwrap()
    }

    fn contents(doc: &Document) -> Vec<&[u8]> {
        doc.rows().iter().map(Row::as_bytes).collect()
    }

    // -- Loading ------------------------------------------------------------

    #[test]
    fn empty_input_has_no_rows() {
        let doc = load(b"");
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn lf_lines() {
        let doc = load(b"one\ntwo\nthree\n");
        assert_eq!(doc.len(), 3);
        assert_eq!(contents(&doc), vec![&b"one"[..], b"two", b"three"]);
    }

    #[test]
    fn crlf_lines() {
        let doc = load(b"one\r\ntwo\r\n");
        assert_eq!(contents(&doc), vec![&b"one"[..], b"two"]);
    }

    #[test]
    fn final_line_without_terminator() {
        let doc = load(b"one\ntwo");
        assert_eq!(contents(&doc), vec![&b"one"[..], b"two"]);
    }

    #[test]
    fn blank_lines_are_rows() {
        let doc = load(b"\n\n\n");
        assert_eq!(doc.len(), 3);
        assert!(doc.rows().iter().all(Row::is_empty));
    }

    #[test]
    fn trailing_carriage_returns_all_stripped() {
        let doc = load(b"abc\r\r\n");
        assert_eq!(contents(&doc), vec![&b"abc"[..]]);
    }

    #[test]
    fn interior_carriage_return_kept() {
        let doc = load(b"a\rb\n");
        assert_eq!(contents(&doc), vec![&b"a\rb"[..]]);
    }

    #[test]
    fn non_utf8_bytes_preserved() {
        let doc = load(b"\xff\xfe\n");
        assert_eq!(doc.row(0).unwrap().as_bytes(), b"\xff\xfe");
    }

    #[test]
    fn row_count_matches_line_count() {
        for n in 0..50 {
            let text: Vec<u8> = (0..n).flat_map(|i| format!("line {i}\n").into_bytes()).collect();
            let doc = load(&text);
            assert_eq!(doc.len(), n);
            for (i, row) in doc.rows().iter().enumerate() {
                assert_eq!(row.as_bytes(), format!("line {i}").as_bytes());
            }
        }
    }

    #[test]
    fn append_row_keeps_order() {
        let mut doc = Document::new();
        doc.append_row(b"b");
        doc.append_row(b"a");
        assert_eq!(contents(&doc), vec![&b"b"[..], b"a"]);
        assert!(doc.row(2).is_none());
    }

    // -- Files --------------------------------------------------------------

    #[test]
    fn open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first\r\nsecond\nthird").unwrap();

        let doc = Document::open(file.path()).unwrap();
        assert_eq!(contents(&doc), vec![&b"first"[..], b"second", b"third"]);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = Document::open(&path).unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn open_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::open(dir.path()).is_err());
    }

    // -- Row ----------------------------------------------------------------

    #[test]
    fn visible_clamps_to_width() {
        let row = Row::new(b"hello world");
        assert_eq!(row.visible(0, 5), b"hello");
        assert_eq!(row.visible(6, 80), b"world");
    }

    #[test]
    fn visible_past_end_is_empty() {
        let row = Row::new(b"abc");
        assert_eq!(row.visible(3, 10), b"");
        assert_eq!(row.visible(100, 10), b"");
        assert_eq!(row.visible(0, 0), b"");
    }
}
