//! JSONL reading operations.
//!
//! [`JsonlReader`] pulls one record per non-blank line and keeps a 1-based
//! line counter so parse failures can point at the offending line.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for JSONL data.
///
/// # Examples
///
/// ```no_run
/// use labdag_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("products.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_line::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// Line number of the last line read (0 before the first read).
    line_number: usize,
    buffer: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the 1-based number of the last line read, or 0 before any read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next record, skipping blank lines.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the current line number when a line is
    /// not valid JSON for `T`, [`Error::InvalidFormat`] on invalid UTF-8, and
    /// [`Error::Io`] on read failures.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::InvalidData {
                    Error::InvalidFormat(format!(
                        "line {} is not valid UTF-8",
                        self.line_number + 1
                    ))
                } else {
                    Error::Io(e)
                }
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| Error::Parse {
                    line_number: self.line_number,
                    source,
                });
        }
    }

    /// Reads every remaining record.
    ///
    /// # Errors
    ///
    /// Stops at the first failing line; see [`read_line`](Self::read_line).
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_line().await? {
            records.push(record);
        }
        Ok(records)
    }
}

/// Reads every record of a JSONL file.
///
/// # Errors
///
/// Fails if the file cannot be opened or any line fails to parse.
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut reader = JsonlReader::new(file);
    let records = reader.read_all().await?;
    tracing::debug!(path = %path.display(), records = records.len(), "Read JSONL file");
    Ok(records)
}
