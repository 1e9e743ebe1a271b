//! Streaming line reader over an instrumentation log.
//!
//! Yields lines in order without buffering the whole file, tolerates a
//! partial final line (no trailing newline), and keeps a running count
//! of bytes and UTF-8 characters consumed for the report info block.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub struct LineReader<R: BufRead> {
    inner: R,
    bytes_read: u64,
    chars_read: u64,
    lines_read: u64,
}

impl LineReader<BufReader<File>> {
    /// Open a log file for reading. Filesystem errors (not-found,
    /// permission-denied) surface to the caller; there is no retry.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
            chars_read: 0,
            lines_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn chars_read(&self) -> u64 {
        self.chars_read
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) => None,
            Ok(n) => {
                self.bytes_read += n as u64;
                self.chars_read += line.chars().count() as u64;
                self.lines_read += 1;

                // Strip the terminator; a final line without one is
                // still a line.
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
