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

//! Incremental decoding of a byte stream into text lines.
//!
//! Bytes are decoded first and split afterwards, so encodings where a line
//! feed is not the single byte `0x0a` (UTF-16) split correctly and a
//! character that straddles two reads is never torn apart.

use crate::encoding::{Malformed, TextEncoding};
use encoding_rs::{CoderResult, Decoder, DecoderResult};
use std::io;

pub struct LineSplitter {
    encoding: TextEncoding,
    decoder: Decoder,
    // Decoded text. Everything before `next` was already handed out.
    text: String,
    next: usize,
    // No terminator in `text[next..scan_from]`
    scan_from: usize,
    // The last line ended with '\r'. A '\n' right after it belongs to the
    // same terminator.
    skip_lf: bool,
}

impl LineSplitter {
    pub fn new(encoding: TextEncoding) -> LineSplitter {
        LineSplitter {
            encoding,
            decoder: encoding.decoder(),
            text: String::new(),
            next: 0,
            scan_from: 0,
            skip_lf: false,
        }
    }

    /// Decode a chunk. Pass `last` exactly once after the final chunk so
    /// that an incomplete trailing sequence is flushed (or reported).
    pub fn feed(&mut self, mut bytes: &[u8], last: bool) -> io::Result<()> {
        self.compact();
        loop {
            let (output_full, read) = match self.encoding.policy() {
                Malformed::Replace => {
                    let needed = self
                        .decoder
                        .max_utf8_buffer_length(bytes.len())
                        .ok_or_else(overflow)?;
                    self.text.reserve(needed);
                    let (result, read, _) = self.decoder.decode_to_string(bytes, &mut self.text, last);
                    (result == CoderResult::OutputFull, read)
                }
                Malformed::Fail => {
                    let needed = self
                        .decoder
                        .max_utf8_buffer_length_without_replacement(bytes.len())
                        .ok_or_else(overflow)?;
                    self.text.reserve(needed);
                    match self
                        .decoder
                        .decode_to_string_without_replacement(bytes, &mut self.text, last)
                    {
                        (DecoderResult::InputEmpty, read) => (false, read),
                        (DecoderResult::OutputFull, read) => (true, read),
                        (DecoderResult::Malformed(_, _), _) => {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("Malformed {} input", self.encoding.name()),
                            ));
                        }
                    }
                }
            };
            bytes = &bytes[read..];
            if !output_full {
                return Ok(());
            }
        }
    }

    /// Next complete line, terminator stripped.
    pub fn next_line(&mut self) -> Option<String> {
        self.skip_line_feed();
        let from = self.scan_from.max(self.next);
        let end = match self.text[from..].find(&['\n', '\r'][..]) {
            Some(offset) => from + offset,
            None => {
                self.scan_from = self.text.len();
                return None;
            }
        };
        let line = self.text[self.next..end].to_owned();
        self.skip_lf = self.text.as_bytes()[end] == b'\r';
        self.next = end + 1;
        self.scan_from = self.next;
        Some(line)
    }

    /// The unterminated remainder. Only meaningful after the last chunk
    /// was fed and `next_line` returned `None`.
    pub fn finish(&mut self) -> Option<String> {
        self.skip_line_feed();
        if self.next == self.text.len() {
            None
        } else {
            let line = self.text[self.next..].to_owned();
            self.next = self.text.len();
            self.scan_from = self.next;
            Some(line)
        }
    }

    fn skip_line_feed(&mut self) {
        if self.skip_lf && self.next < self.text.len() {
            if self.text.as_bytes()[self.next] == b'\n' {
                self.next += 1;
            }
            self.skip_lf = false;
        }
    }

    fn compact(&mut self) {
        if self.next > 0 {
            self.text.drain(..self.next);
            self.scan_from = self.scan_from.saturating_sub(self.next);
            self.next = 0;
        }
    }
}

fn overflow() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "decode buffer size overflow")
}
