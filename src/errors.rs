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

use failure::Fail;
use std::io;

/// Errors reported by a line collector.
#[derive(Debug, Fail)]
pub enum CollectError {
    /// The encoding label is unknown. Raised before the source is touched.
    #[fail(display = "Unsupported encoding \"{}\"", _0)]
    UnsupportedEncoding(String),
    /// Reading or decoding failed. `lines` holds everything collected before
    /// the fault.
    #[fail(display = "Failed to read line from source: {}", cause)]
    StreamRead {
        lines: Vec<String>,
        #[cause]
        cause: io::Error,
    },
    /// A collector thread or a child process could not be started.
    #[fail(display = "Failed to spawn: {}", _0)]
    Spawn(#[cause] io::Error),
    #[fail(display = "Failed to wait for process: {}", _0)]
    Wait(#[cause] io::Error),
    #[fail(display = "Line collector terminated without a result")]
    Aborted,
}

impl CollectError {
    /// Lines collected before the failure. Empty for errors that occur
    /// before reading starts.
    pub fn lines(&self) -> &[String] {
        match self {
            CollectError::StreamRead { lines, .. } => lines.as_slice(),
            _ => &[],
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            CollectError::StreamRead { lines, .. } => lines,
            _ => Vec::new(),
        }
    }
}
