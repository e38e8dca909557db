// LogSieve - platform/fs.rs
//
// Streaming line source over a log file on disk.
//
// The file handle is owned by the `LogLines` iterator and released when it
// is dropped, whether iteration finished, failed, or was abandoned early.

use crate::util::error::SourceError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One raw line from the source, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number within the file.
    pub number: u64,
    /// Line text without its `\n` / `\r\n` terminator.
    pub text: String,
}

/// Lazy, forward-only sequence of lines from one file.
///
/// Holds a single line buffer at a time. After a read error the iterator
/// yields that error once and then ends.
#[derive(Debug)]
pub struct LogLines {
    path: PathBuf,
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_number: u64,
    done: bool,
}

/// Open `path` and return a fresh iterator positioned at its first line.
///
/// Every call re-opens the file. Directories and missing or unreadable
/// paths fail with `SourceError::FileNotFound`.
pub fn open_lines(path: &Path) -> Result<LogLines, SourceError> {
    let not_found = |source: io::Error| SourceError::FileNotFound {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    let metadata = file.metadata().map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    tracing::debug!(path = %path.display(), size = metadata.len(), "Opened log file");

    Ok(LogLines {
        path: path.to_path_buf(),
        reader: BufReader::new(file),
        buf: Vec::new(),
        line_number: 0,
        done: false,
    })
}

impl LogLines {
    /// Number of lines yielded so far.
    pub fn lines_read(&self) -> u64 {
        self.line_number
    }
}

impl Iterator for LogLines {
    type Item = Result<SourceLine, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                // Invalid UTF-8 is replaced rather than aborting the run.
                let text = String::from_utf8_lossy(&self.buf).into_owned();
                Some(Ok(SourceLine {
                    number: self.line_number,
                    text,
                }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(SourceError::Read {
                    path: self.path.clone(),
                    line_number: self.line_number + 1,
                    source: e,
                }))
            }
        }
    }
}

impl std::iter::FusedIterator for LogLines {}
