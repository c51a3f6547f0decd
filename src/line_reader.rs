// Copyright © 2019 Felix Obenhuber
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::{encoding::TextEncoding, lines::LineSplitter};
use std::io::{self, Read};

const CHUNK_SIZE: usize = 8 * 1024;

/// Blocking line reader over any byte source.
pub struct LineReader<T>
where
    T: Read,
{
    reader: T,
    splitter: LineSplitter,
    buffer: Vec<u8>,
    // Reported once the lines decoded before it are handed out
    error: Option<io::Error>,
    eof: bool,
}

impl<T: Read> LineReader<T> {
    pub fn new(reader: T, encoding: TextEncoding) -> LineReader<T> {
        LineReader {
            reader,
            splitter: LineSplitter::new(encoding),
            buffer: vec![0; CHUNK_SIZE],
            error: None,
            eof: false,
        }
    }

    /// Read the next line. Returns `Ok(None)` once the source is exhausted.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.splitter.next_line() {
                return Ok(Some(line));
            }
            if let Some(e) = self.error.take() {
                return Err(e);
            }
            if self.eof {
                return Ok(self.splitter.finish());
            }
            if let Err(e) = self.fill() {
                self.error = Some(e);
            }
        }
    }

    pub fn into_inner(self) -> T {
        self.reader
    }

    fn fill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.reader.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if n == 0 {
            self.eof = true;
            self.splitter.feed(&[], true)
        } else {
            self.splitter.feed(&self.buffer[..n], false)
        }
    }
}

impl<T: Read> Iterator for LineReader<T> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}
