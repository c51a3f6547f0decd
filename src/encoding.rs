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

use crate::errors::CollectError;
use encoding_rs::{Decoder, Encoding, UTF_8};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// What to do with byte sequences that are invalid in the configured
/// encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Malformed {
    /// Substitute U+FFFD and keep going.
    Replace,
    /// Treat the sequence as a read failure.
    Fail,
}

impl Default for Malformed {
    fn default() -> Self {
        Malformed::Replace
    }
}

impl FromStr for Malformed {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Malformed::Replace),
            "fail" => Ok(Malformed::Fail),
            _ => Err("Malformed policy parsing error"),
        }
    }
}

/// A named text encoding plus the policy for malformed input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    malformed: Malformed,
}

impl TextEncoding {
    /// Resolve an encoding label like "UTF-8", "latin1" or "Shift_JIS".
    ///
    /// Labels are matched case-insensitively against the WHATWG encoding
    /// registry. Labels that only resolve to the "replacement" encoding are
    /// rejected since decoding with it discards the input.
    ///
    /// WHATWG names do not always mean what the same charset name means
    /// elsewhere, e.g. in Java: "ISO-8859-1" and "US-ASCII" both resolve to
    /// windows-1252, which decodes 0x80..0x9F as printable characters instead
    /// of C1 controls, and "UTF-16" resolves to UTF-16LE. There is no BOM
    /// sniffing, so "UTF-16" input is read little-endian even when it starts
    /// with a big-endian BOM. Use "UTF-16BE" for big-endian input.
    pub fn for_label(label: &str) -> Result<TextEncoding, CollectError> {
        Encoding::for_label_no_replacement(label.as_bytes())
            .map(|encoding| TextEncoding {
                encoding,
                malformed: Malformed::default(),
            })
            .ok_or_else(|| CollectError::UnsupportedEncoding(label.to_owned()))
    }

    pub fn malformed(self, malformed: Malformed) -> TextEncoding {
        TextEncoding { malformed, ..self }
    }

    pub fn policy(&self) -> Malformed {
        self.malformed
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub(crate) fn decoder(&self) -> Decoder {
        self.encoding.new_decoder_with_bom_removal()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding {
            encoding: UTF_8,
            malformed: Malformed::default(),
        }
    }
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
