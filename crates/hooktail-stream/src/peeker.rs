//! Buffered line reading with one-line lookahead.

use std::io::{self, BufRead};

/// A line reader that can look at the next line without consuming it.
///
/// Line endings are stripped; a blank line comes back as an empty string,
/// end of input as `None`.
#[derive(Debug)]
pub struct LinePeeker<R> {
    reader: R,
    peeked: Option<String>,
    done: bool,
}

impl<R: BufRead> LinePeeker<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            done: false,
        }
    }

    /// Returns the next line without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn peek_line(&mut self) -> io::Result<Option<&str>> {
        if self.peeked.is_none() && !self.done {
            self.peeked = self.read_raw()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Returns and consumes the next line.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }
        if self.done {
            return Ok(None);
        }
        self.read_raw()
    }

    fn read_raw(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            self.done = true;
            return Ok(None);
        }
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }
}
