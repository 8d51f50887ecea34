//! # kilo-editor: editor core for kilo
//!
//! - **[`document`]**: `Document` and `Row`: the file's lines, loaded once
//! - **[`cursor`]**: `CursorState` and its movement rules
//! - **[`viewport`]**: row/column offsets that keep the cursor on screen
//! - **[`render`]**: frame composition into an `AppendBuffer`
//! - **[`editor`]**: `Editor`: key handling, implements the event loop's `App`
//! - **[`error`]**: `FileError`

pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod render;
pub mod viewport;

pub use editor::Editor;
pub use error::FileError;
