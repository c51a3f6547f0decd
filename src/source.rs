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

//! Byte sources that can be released explicitly.
//!
//! Dropping a source closes the underlying handle but swallows any error.
//! `Close` gives collectors a fallible release step that runs exactly once
//! before the source is dropped.

use std::{
    fs::File,
    io::{self, Cursor, Stdin},
    net::{Shutdown, TcpStream},
    process::{ChildStderr, ChildStdout},
};

pub trait Close {
    fn close(&mut self) -> io::Result<()>;
}

impl<C: Close + ?Sized> Close for Box<C> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl Close for File {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Read)
    }
}

impl Close for ChildStdout {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for ChildStderr {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for Stdin {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> Close for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> Close for &'a [u8] {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for tokio::io::Stdin {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for tokio::fs::File {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for tokio::net::TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Read)
    }
}
