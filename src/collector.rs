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

//! Drain a byte source into a list of decoded lines without blocking the
//! caller.
//!
//! A `LineCollector` is configured with a source and an encoding and then
//! started either on a dedicated thread (`spawn`, for blocking `Read`
//! sources) or as a task on a futures executor (`spawn_on`, for `AsyncRead`
//! sources). Both return a `Collection`: a future that resolves to the final
//! list of lines, or to the error that stopped the read loop together with
//! the lines read up to that point.
//!
//! The source is closed exactly once when the loop ends, whatever the
//! reason. A failing close is logged and otherwise ignored.

use crate::{
    codec::LinesCodec, encoding::TextEncoding, errors::CollectError, line_reader::LineReader,
    source::Close, Lines,
};
use futures::{future::Executor, sync::oneshot, Async, Future, Poll, Stream};
use log::{debug, info, warn};
use std::{
    io::{self, Read},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
    thread,
};
use tokio::{codec::FramedRead, io::AsyncRead};

const DEFAULT_NAME: &str = "linedrain";

pub struct LineCollector<R> {
    source: R,
    encoding: TextEncoding,
    name: String,
    tee: bool,
}

impl<R> LineCollector<R> {
    /// Collect from `source` with the default encoding (UTF-8, lossy).
    pub fn new(source: R) -> LineCollector<R> {
        LineCollector {
            source,
            encoding: TextEncoding::default(),
            name: DEFAULT_NAME.to_owned(),
            tee: false,
        }
    }

    /// Collect from `source` decoding with the encoding named `label`.
    ///
    /// Fails with `CollectError::UnsupportedEncoding` if the label is
    /// unknown. The source is dropped unread in that case.
    pub fn with_encoding(source: R, label: &str) -> Result<LineCollector<R>, CollectError> {
        let encoding = TextEncoding::for_label(label)?;
        Ok(LineCollector::new(source).encoding(encoding))
    }

    pub fn encoding(self, encoding: TextEncoding) -> LineCollector<R> {
        LineCollector { encoding, ..self }
    }

    /// Name of the collector thread. Also used as log prefix.
    pub fn name(self, name: &str) -> LineCollector<R> {
        LineCollector {
            name: name.to_owned(),
            ..self
        }
    }

    /// Log every line at info level as it is collected
    pub fn tee(self, tee: bool) -> LineCollector<R> {
        LineCollector { tee, ..self }
    }
}

impl<R: Read + Close> LineCollector<R> {
    /// Run the read loop on the calling thread.
    pub fn collect(self) -> Result<Lines, CollectError> {
        let LineCollector {
            source,
            encoding,
            name,
            tee,
        } = self;
        let mut lines = Vec::new();
        match drain(source, encoding, &name, tee, |line| lines.push(line)) {
            Ok(()) => Ok(lines),
            Err(cause) => Err(CollectError::StreamRead { lines, cause }),
        }
    }
}

impl<R: Read + Close + Send + 'static> LineCollector<R> {
    /// Run the read loop on a dedicated thread.
    pub fn spawn(self) -> Result<Collection, CollectError> {
        let LineCollector {
            source,
            encoding,
            name,
            tee,
        } = self;
        let shared = Shared::default();
        let state = shared.clone();
        let (tx, rx) = oneshot::channel();

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let result = drain(source, encoding, &name, tee, |line| state.push(line));
                state.finish();
                if let Err(ref e) = result {
                    debug!("{}: read loop failed: {}", name, e);
                }
                // The collection may have been dropped already
                tx.send(result).ok();
            })
            .map_err(CollectError::Spawn)?;

        Ok(Collection {
            shared,
            done: completion(rx),
        })
    }
}

impl<A: AsyncRead + Close + Send + 'static> LineCollector<A> {
    /// Run the read loop as a task on `executor`, e.g. the `TaskExecutor` of
    /// a tokio `Runtime`. Dropping the returned `Collection` cancels the task.
    ///
    /// A task the executor refuses is `CollectError::Spawn`. A task the
    /// executor drops before it completes, e.g. on runtime shutdown,
    /// resolves to `CollectError::Aborted`.
    pub fn spawn_on<E>(self, executor: &E) -> Result<Collection, CollectError>
    where
        E: Executor<Drain<A>>,
    {
        let shared = Shared::default();
        let (tx, rx) = oneshot::channel();
        debug!("{}: collecting {} lines", self.name, self.encoding);
        let task = Drain {
            lines: Some(FramedRead::new(self.source, LinesCodec::new(self.encoding))),
            shared: shared.clone(),
            done: Some(tx),
            name: self.name,
            tee: self.tee,
        };

        // A rejected task is dropped with the error, which closes its source
        executor.execute(task).map_err(|e| {
            CollectError::Spawn(io::Error::new(
                io::ErrorKind::Other,
                format!("Executor rejected collector: {:?}", e.kind()),
            ))
        })?;

        Ok(Collection {
            shared,
            done: completion(rx),
        })
    }
}

/// Completion handle of a running collector.
///
/// Resolves to the complete list of lines once the source is exhausted. A
/// read or decode failure resolves to `CollectError::StreamRead` carrying
/// the lines read before the fault.
pub struct Collection {
    shared: Shared,
    done: Box<dyn Future<Item = (), Error = Failure> + Send>,
}

impl Collection {
    /// Copy of the lines collected so far. Final only once
    /// `is_finished` returns true.
    pub fn snapshot(&self) -> Lines {
        self.shared.snapshot()
    }

    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::SeqCst)
    }
}

impl Future for Collection {
    type Item = Lines;
    type Error = CollectError;

    fn poll(&mut self) -> Poll<Lines, CollectError> {
        match self.done.poll() {
            Ok(Async::Ready(())) => Ok(Async::Ready(self.shared.snapshot())),
            Ok(Async::NotReady) => Ok(Async::NotReady),
            Err(Failure::Read(cause)) => Err(CollectError::StreamRead {
                lines: self.shared.snapshot(),
                cause,
            }),
            Err(Failure::Aborted) => Err(CollectError::Aborted),
        }
    }
}

/// Read loop of an asynchronous collector.
pub struct Drain<A>
where
    A: AsyncRead + Close,
{
    lines: Option<FramedRead<A, LinesCodec>>,
    shared: Shared,
    done: Option<oneshot::Sender<io::Result<()>>>,
    name: String,
    tee: bool,
}

impl<A: AsyncRead + Close> Drain<A> {
    fn release(&mut self) {
        if let Some(lines) = self.lines.take() {
            close_source(lines.into_inner(), &self.name);
            self.shared.finish();
        }
    }

    fn canceled(&mut self) -> bool {
        match self.done.as_mut() {
            Some(done) => done.poll_cancel() == Ok(Async::Ready(())),
            None => false,
        }
    }
}

impl<A: AsyncRead + Close> Future for Drain<A> {
    type Item = ();
    type Error = ();

    fn poll(&mut self) -> Poll<(), ()> {
        if self.canceled() {
            debug!("{}: collection dropped", self.name);
            self.release();
            return Ok(Async::Ready(()));
        }

        let result = loop {
            let polled = match self.lines.as_mut() {
                Some(lines) => lines.poll(),
                None => return Ok(Async::Ready(())),
            };
            match polled {
                Ok(Async::Ready(Some(line))) => {
                    echo(&self.name, self.tee, &line);
                    self.shared.push(line);
                }
                Ok(Async::Ready(None)) => break Ok(()),
                Ok(Async::NotReady) => return Ok(Async::NotReady),
                Err(e) => {
                    debug!("{}: read loop failed: {}", self.name, e);
                    break Err(e);
                }
            }
        };

        self.release();
        if let Some(done) = self.done.take() {
            // The collection may have been dropped already
            done.send(result).ok();
        }
        Ok(Async::Ready(()))
    }
}

impl<A: AsyncRead + Close> Drop for Drain<A> {
    fn drop(&mut self) {
        self.release();
    }
}

fn completion(
    rx: oneshot::Receiver<io::Result<()>>,
) -> Box<dyn Future<Item = (), Error = Failure> + Send> {
    Box::new(rx.then(|r| match r {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Failure::Read(e)),
        Err(_) => Err(Failure::Aborted),
    }))
}

enum Failure {
    Read(io::Error),
    Aborted,
}

#[derive(Clone, Default)]
struct Shared {
    lines: Arc<RwLock<Vec<String>>>,
    finished: Arc<AtomicBool>,
}

impl Shared {
    fn push(&self, line: String) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    fn snapshot(&self) -> Lines {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

fn drain<R, F>(source: R, encoding: TextEncoding, name: &str, tee: bool, mut f: F) -> io::Result<()>
where
    R: Read + Close,
    F: FnMut(String),
{
    debug!("{}: collecting {} lines", name, encoding);
    let mut reader = LineReader::new(source, encoding);
    let result = loop {
        match reader.read_line() {
            Ok(Some(line)) => {
                echo(name, tee, &line);
                f(line);
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };
    close_source(reader.into_inner(), name);
    result
}

fn close_source<C: Close>(mut source: C, name: &str) {
    match source.close() {
        Ok(()) => debug!("{}: closed source", name),
        Err(e) => warn!("{}: failed to close source: {}", name, e),
    }
}

fn echo(name: &str, tee: bool, line: &str) {
    if tee {
        info!("{}: {}", name, line);
    }
}
