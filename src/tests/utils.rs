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

use crate::source::Close;
use std::{
    fs::File,
    io::{self, prelude::*, Cursor},
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
};
use tempdir::TempDir;
use tokio::io::AsyncRead;

macro_rules! svec {
    ( $( $x:expr ),* ) => {
        vec![$( $x.to_string(), )*]
    };
}

/// Counts how often a `MockSource` was read and closed.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    reads: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Counters {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct MockSource {
    data: Cursor<Vec<u8>>,
    fault: bool,
    close_fault: bool,
    counters: Counters,
}

impl MockSource {
    pub fn new(data: &[u8]) -> MockSource {
        MockSource {
            data: Cursor::new(data.to_vec()),
            fault: false,
            close_fault: false,
            counters: Counters::default(),
        }
    }

    /// Fail with a read error once `data` is exhausted
    pub fn with_fault(self) -> MockSource {
        MockSource {
            fault: true,
            ..self
        }
    }

    pub fn with_close_fault(self) -> MockSource {
        MockSource {
            close_fault: true,
            ..self
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl Read for MockSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        let n = self.data.read(buf)?;
        if n == 0 && self.fault {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device disconnected"))
        } else {
            Ok(n)
        }
    }
}

impl AsyncRead for MockSource {}

impl Close for MockSource {
    fn close(&mut self) -> io::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.close_fault {
            Err(io::Error::new(io::ErrorKind::Other, "close failed"))
        } else {
            Ok(())
        }
    }
}

/// An async source that never becomes readable.
#[derive(Default)]
pub struct PendingSource {
    counters: Counters,
}

impl PendingSource {
    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl Read for PendingSource {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::WouldBlock, "not ready"))
    }
}

impl AsyncRead for PendingSource {}

impl Close for PendingSource {
    fn close(&mut self) -> io::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A source whose reader dies on the first read.
pub struct PanickingSource;

impl Read for PanickingSource {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        panic!("reader died")
    }
}

impl Close for PanickingSource {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A source that blocks until chunks are pushed through the returned
/// sender. Dropping the sender ends the stream.
pub struct GatedSource {
    chunks: Receiver<Vec<u8>>,
    pending: Cursor<Vec<u8>>,
}

impl GatedSource {
    pub fn new() -> (GatedSource, Sender<Vec<u8>>) {
        let (tx, rx) = channel();
        let source = GatedSource {
            chunks: rx,
            pending: Cursor::new(Vec::new()),
        };
        (source, tx)
    }
}

impl Read for GatedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.pending.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            match self.chunks.recv() {
                Ok(chunk) => self.pending = Cursor::new(chunk),
                Err(_) => return Ok(0),
            }
        }
    }
}

impl Close for GatedSource {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn tempfile_with_content(content: &[u8]) -> Result<(TempDir, PathBuf), io::Error> {
    let dir = TempDir::new("linedrain")?;
    let path = dir.path().join("input.txt");
    File::create(&path)?.write_all(content)?;
    Ok((dir, path))
}
