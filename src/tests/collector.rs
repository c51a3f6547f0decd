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

use crate::{
    tests::utils::*, CollectError, LineCollector, Malformed, TextEncoding,
};
use futures::Future;
use std::{
    io,
    thread,
    time::{Duration, Instant},
};

#[test]
fn lines_without_trailing_newline() {
    let source = MockSource::new(b"alpha\nbeta\ngamma");
    let counters = source.counters();
    let lines = LineCollector::new(source).spawn().unwrap().wait().unwrap();
    assert_eq!(lines, svec!("alpha", "beta", "gamma"));
    assert_eq!(counters.closes(), 1);
}

#[test]
fn empty_source() {
    let source = MockSource::new(b"");
    let counters = source.counters();
    let lines = LineCollector::new(source).spawn().unwrap().wait().unwrap();
    assert!(lines.is_empty());
    assert_eq!(counters.closes(), 1);
}

#[test]
fn line_count_and_order() {
    for n in 0..20 {
        let expected: Vec<String> = (0..n).map(|i| format!("line {}", i)).collect();
        let mut input = expected.join("\n");
        if n % 2 == 0 && n > 0 {
            input.push('\n');
        }
        let lines = LineCollector::new(MockSource::new(input.as_bytes()))
            .spawn()
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(lines, expected);
    }
}

#[test]
fn large_input_spans_many_reads() {
    let expected: Vec<String> = (0..10_000).map(|i| format!("{:08}", i)).collect();
    let input = expected.join("\r\n");
    let lines = LineCollector::new(MockSource::new(input.as_bytes()))
        .collect()
        .unwrap();
    assert_eq!(lines, expected);
}

#[test]
fn unsupported_encoding_leaves_source_untouched() {
    let source = MockSource::new(b"alpha\n");
    let counters = source.counters();
    match LineCollector::with_encoding(source, "klingon") {
        Err(CollectError::UnsupportedEncoding(label)) => assert_eq!(label, "klingon"),
        Err(e) => panic!("Unexpected error: {}", e),
        Ok(_) => panic!("Expected an unsupported encoding"),
    }
    assert_eq!(counters.reads(), 0);
    assert_eq!(counters.closes(), 0);
}

#[test]
fn encoding_sensitivity() {
    let input = "héllo\n".as_bytes();

    let utf8 = LineCollector::with_encoding(MockSource::new(input), "UTF-8")
        .unwrap()
        .spawn()
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(utf8, svec!("héllo"));

    let latin = LineCollector::with_encoding(MockSource::new(input), "windows-1252")
        .unwrap()
        .spawn()
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(latin, svec!("hÃ©llo"));
    assert_ne!(latin, utf8);
}

#[test]
fn read_fault_keeps_lines_and_closes() {
    let source = MockSource::new(b"first\n").with_fault();
    let counters = source.counters();
    match LineCollector::new(source).spawn().unwrap().wait() {
        Err(CollectError::StreamRead { lines, cause }) => {
            assert_eq!(lines, svec!("first"));
            assert_eq!(cause.kind(), io::ErrorKind::BrokenPipe);
        }
        r => panic!("Unexpected result: {:?}", r),
    }
    assert_eq!(counters.closes(), 1);
}

#[test]
fn read_fault_on_calling_thread() {
    let source = MockSource::new(b"first\n").with_fault();
    let counters = source.counters();
    let err = LineCollector::new(source).collect().unwrap_err();
    assert_eq!(err.lines(), &svec!("first")[..]);
    assert_eq!(counters.closes(), 1);
}

#[test]
fn close_failure_does_not_change_outcome() {
    let source = MockSource::new(b"a\nb\n").with_close_fault();
    let counters = source.counters();
    let lines = LineCollector::new(source).spawn().unwrap().wait().unwrap();
    assert_eq!(lines, svec!("a", "b"));
    assert_eq!(counters.closes(), 1);

    let source = MockSource::new(b"a\n").with_fault().with_close_fault();
    let counters = source.counters();
    let err = LineCollector::new(source).spawn().unwrap().wait().unwrap_err();
    assert_eq!(err.into_lines(), svec!("a"));
    assert_eq!(counters.closes(), 1);
}

#[test]
fn strict_decoding_reports_malformed_input() {
    let source = MockSource::new(b"ok\n\xff\nnever\n");
    let counters = source.counters();
    let encoding = TextEncoding::default().malformed(Malformed::Fail);
    match LineCollector::new(source).encoding(encoding).spawn().unwrap().wait() {
        Err(CollectError::StreamRead { lines, cause }) => {
            assert_eq!(lines, svec!("ok"));
            assert_eq!(cause.kind(), io::ErrorKind::InvalidData);
        }
        r => panic!("Unexpected result: {:?}", r),
    }
    assert_eq!(counters.closes(), 1);
}

#[test]
fn running_and_finished_are_distinguishable() {
    let (source, gate) = GatedSource::new();
    let collection = LineCollector::new(source).name("gated").spawn().unwrap();
    assert!(!collection.is_finished());
    assert!(collection.snapshot().is_empty());

    gate.send(b"one\ntw".to_vec()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    while collection.snapshot().is_empty() {
        assert!(Instant::now() < deadline, "Line never arrived");
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(collection.snapshot(), svec!("one"));
    assert!(!collection.is_finished());

    gate.send(b"o\n".to_vec()).unwrap();
    drop(gate);
    let lines = collection.wait().unwrap();
    assert_eq!(lines, svec!("one", "two"));
}

#[test]
fn finished_with_zero_lines() {
    let (source, gate) = GatedSource::new();
    let collection = LineCollector::new(source).spawn().unwrap();
    assert!(!collection.is_finished());
    drop(gate);

    let deadline = Instant::now() + Duration::from_secs(10);
    while !collection.is_finished() {
        assert!(Instant::now() < deadline, "Collector never finished");
        thread::sleep(Duration::from_millis(5));
    }
    assert!(collection.snapshot().is_empty());
    assert!(collection.wait().unwrap().is_empty());
}

#[test]
fn file_source() {
    let (_dir, path) = tempfile_with_content(b"A\nB\nC\n").unwrap();
    let file = std::fs::File::open(path).unwrap();
    let lines = LineCollector::new(file).tee(true).spawn().unwrap().wait().unwrap();
    assert_eq!(lines, svec!("A", "B", "C"));
}

#[test]
fn dead_collector_thread_aborts() {
    let collection = LineCollector::new(PanickingSource).name("doomed").spawn().unwrap();
    match collection.wait() {
        Err(CollectError::Aborted) => (),
        r => panic!("Unexpected result: {:?}", r),
    }
}
