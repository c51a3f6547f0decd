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

//! Collect decoded text lines from byte sources on a background task.
//!
//! ```no_run
//! use futures::Future;
//! use linedrain::LineCollector;
//! use std::fs::File;
//!
//! let file = File::open("build.log").unwrap();
//! let collection = LineCollector::with_encoding(file, "latin1")
//!     .unwrap()
//!     .spawn()
//!     .unwrap();
//! for line in collection.wait().unwrap() {
//!     println!("{}", line);
//! }
//! ```

pub mod codec;
pub mod collector;
pub mod command;
pub mod encoding;
pub mod errors;
pub mod line_reader;
pub mod lines;
pub mod source;

pub use crate::{
    collector::{Collection, LineCollector},
    encoding::{Malformed, TextEncoding},
    errors::CollectError,
    source::Close,
};

/// Decoded lines in read order
pub type Lines = Vec<String>;
