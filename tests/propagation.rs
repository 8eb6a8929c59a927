//! End-to-end tests for warning propagation through nested call chains.
//!
//! These tests model the intended usage: library code reports warnings into
//! whatever context it was handed, and an outer scope decides how they are
//! collected, rewritten and drained.

use std::sync::Arc;
use std::thread;

use undercurrent::compose::{filter, map, reduce, tap};
use undercurrent::prelude::*;
use undercurrent::testing::{FailingWriter, RecordingWriter};
use undercurrent::{assert_messages, warning};

// Example domain: a config loader several layers deep
#[derive(Debug, Clone, PartialEq)]
struct Setting {
    key: String,
    value: String,
}

fn parse_line(ctx: &Context, line: &str) -> Option<Setting> {
    let Some((key, value)) = line.split_once('=') else {
        let _ = warnf!(ctx, "skipping malformed line {:?}", line);
        return None;
    };
    if value.trim().is_empty() {
        let _ = warnf!(ctx, "empty value for {}", key.trim());
    }
    Some(Setting {
        key: key.trim().to_string(),
        value: value.trim().to_string(),
    })
}

fn parse_file(ctx: &Context, body: &str) -> Vec<Setting> {
    body.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| parse_line(ctx, l))
        .collect()
}

fn load(ctx: &Context, files: &[&str]) -> Vec<Setting> {
    files.iter().flat_map(|body| parse_file(ctx, body)).collect()
}

const FILES: [&str; 2] = ["port = 8080\nbogus\nhost =", "debug = true\n???"];

#[test]
fn test_nested_calls_report_to_ancestor_collector() {
    let collector = Arc::new(Collector::new());
    let ctx = Context::new().attach(collector.clone());

    let settings = load(&ctx, &FILES);
    assert_eq!(settings.len(), 3);

    assert_messages!(
        collector,
        [
            "skipping malformed line \"bogus\"",
            "empty value for host",
            "skipping malformed line \"???\"",
        ]
    );
    collector.close().unwrap();
}

#[test]
fn test_unconfigured_context_is_silent() {
    let settings = load(&Context::new(), &FILES);
    assert_eq!(settings.len(), 3);
}

#[test]
fn test_scoped_collector_sees_only_inner_scope() {
    let outer = Arc::new(RecordingWriter::new());
    let ctx = Context::new().attach(outer.clone());

    let inner = Arc::new(Collector::new());
    let scoped = ctx.attach(inner.clone());

    let _ = warnf!(&ctx, "outer only");
    let _ = warnf!(&scoped, "both");

    assert_eq!(outer.messages(), vec!["outer only", "both"]);
    assert_messages!(inner, ["both"]);
}

#[test]
fn test_detached_subtree_is_silent() {
    let recorder = Arc::new(RecordingWriter::new());
    let ctx = Context::new().attach(recorder.clone());

    let quiet = ctx.detach();
    load(&quiet, &FILES);

    assert!(recorder.messages().is_empty());
}

#[test]
fn test_pipeline_of_operators() {
    let collector = Arc::new(Collector::new());
    let taps = Arc::new(RecordingWriter::new());
    let ctx = Context::new().attach(collector.clone());

    let observer = Arc::clone(&taps);
    let ctx = tap(&ctx, move |w| {
        let _ = observer.write_warning(warning::new(w.message().into_owned()));
    });
    let ctx = map(&ctx, |w: SharedWarning| warning::new(format!("config: {}", w)));
    let ctx = filter(&ctx, |w| !w.message().starts_with("empty"));

    load(&ctx, &FILES);

    assert_messages!(
        collector,
        [
            "config: skipping malformed line \"bogus\"",
            "config: skipping malformed line \"???\"",
        ]
    );
    assert_eq!(taps.messages().len(), 2);
}

#[test]
fn test_reduce_summarises_a_batch() {
    let recorder = Arc::new(RecordingWriter::new());
    let ctx = Context::new().attach(recorder.clone());

    {
        let (batch, _flush) = reduce(&ctx, |acc: Option<Message>, w| match acc {
            None => Message::new(format!("1 problem: {}", w)),
            Some(prev) => Message::new(format!("{}; {}", prev, w)),
        });
        load(&batch, &FILES);
        assert!(recorder.messages().is_empty());
    }

    let messages = recorder.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("1 problem: skipping malformed line"));
    assert!(messages[0].ends_with("\"???\""));
}

#[test]
fn test_fan_out_failure_is_reported_and_delivery_continues() {
    let healthy = Arc::new(RecordingWriter::new());
    let ctx = Context::new()
        .attach(Arc::new(FailingWriter::new("audit log unavailable")))
        .attach(healthy.clone());

    let err = warn(&ctx, [warning::new("a"), warning::new("b")]).unwrap_err();

    assert_eq!(err.len(), 2);
    assert!(!err.is_closed());
    assert_eq!(healthy.messages(), vec!["a", "b"]);
}

#[test]
fn test_closed_collector_surfaces_through_warn() {
    let collector = Arc::new(Collector::new());
    let ctx = Context::new().attach(collector.clone());
    collector.close().unwrap();

    let err = warnf!(&ctx, "too late").unwrap_err();
    assert!(err.is_closed());
}

#[test]
fn test_contexts_shared_across_threads() {
    let collector = Arc::new(Collector::new());
    let ctx = Context::new().attach(collector.clone());

    thread::scope(|s| {
        for worker in 0..8 {
            let ctx = ctx.clone();
            s.spawn(move || {
                let ctx = map(&ctx, move |w: SharedWarning| {
                    warning::new(format!("worker {}: {}", worker, w))
                });
                for i in 0..25 {
                    warnf!(&ctx, "item {}", i).unwrap();
                }
            });
        }
    });

    let mut scanner = Scanner::new(&*collector);
    let mut count = 0;
    while Scanner::scan(&mut scanner) {
        assert!(scanner.warning().unwrap().message().starts_with("worker "));
        count += 1;
    }
    assert!(scanner.err().is_none());
    assert_eq!(count, 200);
}

#[test]
fn test_reader_concurrent_with_writers() {
    let collector = Arc::new(Collector::new());
    let ctx = Context::new().attach(collector.clone());

    let drained = thread::scope(|s| {
        let producer = s.spawn(|| {
            for i in 0..500 {
                warnf!(&ctx, "{}", i).unwrap();
            }
        });

        let mut drained = Vec::new();
        loop {
            let finished = producer.is_finished();
            drained.extend(read_all(&*collector).unwrap());
            if finished {
                break;
            }
            thread::yield_now();
        }
        drained
    });

    let numbers: Vec<usize> = drained
        .iter()
        .map(|w| w.message().parse().unwrap())
        .collect();
    assert_eq!(numbers, (0..500).collect::<Vec<_>>());
}
