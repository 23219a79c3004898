//! JSONL (JSON Lines) persistence primitives for labdag.
//!
//! Reading is strict: the first line that is not valid JSON for the
//! requested type aborts the read with its line number. Writing is buffered,
//! and [`write_jsonl_atomic_iter`] replaces a file via temp-file-then-rename
//! so readers never observe a half-written file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{read_jsonl, JsonlReader};
pub use writer::JsonlWriter;
