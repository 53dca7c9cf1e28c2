//! Shared utility functions.
//!
//! - `chunk`: size-bounded text splitting for oversized documents

mod chunk;

pub use chunk::{char_len, chunk_text};
