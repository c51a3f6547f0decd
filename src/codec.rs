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
use bytes::BytesMut;
use std::io;
use tokio::codec::Decoder;

/// A `Codec` that decodes a byte stream with a configurable encoding and
/// splits it into lines. Terminators (`\n`, `\r\n`, `\r`) are stripped.
pub struct LinesCodec {
    splitter: LineSplitter,
    // Malformed input found while decoding. Lines decoded before it are
    // returned first.
    error: Option<io::Error>,
    // The decoder was flushed after EOF.
    flushed: bool,
}

impl LinesCodec {
    pub fn new(encoding: TextEncoding) -> LinesCodec {
        LinesCodec {
            splitter: LineSplitter::new(encoding),
            error: None,
            flushed: false,
        }
    }
}

impl Default for LinesCodec {
    fn default() -> Self {
        LinesCodec::new(TextEncoding::default())
    }
}

impl Decoder for LinesCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if !buf.is_empty() {
            let chunk = buf.take();
            if let Err(e) = self.splitter.feed(&chunk, false) {
                self.error = Some(e);
            }
        }
        match self.splitter.next_line() {
            Some(line) => Ok(Some(line)),
            None => self.error.take().map_or(Ok(None), Err),
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if !self.flushed {
            self.flushed = true;
            self.splitter.feed(&[], true)?;
        }
        // No terminating newline - return remaining data, if any
        Ok(self.splitter.next_line().or_else(|| self.splitter.finish()))
    }
}
