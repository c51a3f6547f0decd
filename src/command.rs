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

//! Run a process and drain its stdout and stderr into lines.

use crate::{collector::LineCollector, encoding::TextEncoding, errors::CollectError, Lines};
use futures::Future;
use log::debug;
use std::{
    io,
    process::{Command, ExitStatus, Stdio},
};

#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Outcome of a finished process. When a stream failed to decode or read,
/// `stdout` and `stderr` hold the lines collected up to the fault and
/// `error` carries the first failure (stdout before stderr).
#[derive(Debug)]
pub struct Output {
    pub status: ExitStatus,
    pub stdout: Lines,
    pub stderr: Lines,
    pub error: Option<CollectError>,
}

impl Output {
    /// Stdout joined with the platform line separator
    pub fn joined(&self) -> String {
        self.stdout.join(LINE_SEPARATOR)
    }
}

/// Build a command that runs `command` through the platform shell.
pub fn shell(command: &str) -> Command {
    #[cfg(not(windows))]
    let (shell, option) = ("/bin/sh", "-c");
    #[cfg(windows)]
    let (shell, option) = ("cmd.exe", "/c");

    let mut cmd = Command::new(shell);
    cmd.arg(option).arg(command);
    cmd
}

/// Spawn `command` and collect stdout and stderr on two collector threads
/// while waiting for the process to exit.
pub fn run(mut command: Command, encoding: TextEncoding, tee: bool) -> Result<Output, CollectError> {
    debug!("Running {:?}", command);
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(CollectError::Spawn)?;

    let stdout = child.stdout.take().ok_or_else(|| not_captured("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| not_captured("stderr"))?;

    let stdout = LineCollector::new(stdout)
        .encoding(encoding)
        .name("stdout")
        .tee(tee)
        .spawn()?;
    let stderr = LineCollector::new(stderr)
        .encoding(encoding)
        .name("stderr")
        .tee(tee)
        .spawn()?;

    let status = child.wait().map_err(CollectError::Wait)?;
    debug!("Process exited with {}", status);

    let (stdout, stdout_error) = settle(stdout.wait());
    let (stderr, stderr_error) = settle(stderr.wait());

    Ok(Output {
        status,
        stdout,
        stderr,
        error: stdout_error.or(stderr_error),
    })
}

fn settle(result: Result<Lines, CollectError>) -> (Lines, Option<CollectError>) {
    match result {
        Ok(lines) => (lines, None),
        Err(e) => (e.lines().to_vec(), Some(e)),
    }
}

fn not_captured(stream: &str) -> CollectError {
    CollectError::Spawn(io::Error::new(
        io::ErrorKind::Other,
        format!("Failed to get {}", stream),
    ))
}
