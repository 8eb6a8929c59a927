//! Composition operators over a context's writer
//!
//! Each operator reads the writer bound to a [`Context`] and returns a new
//! context whose writer wraps it:
//!
//! | Operator | Installs | Effect |
//! |----------|----------|--------|
//! | [`map`] | [`MapWriter`] | Transform each warning |
//! | [`filter`] | [`FilterWriter`] | Drop warnings failing a predicate |
//! | [`tap`] | [`TapWriter`] | Observe each warning |
//! | [`reduce`] | a private [`Collector`] | Fold everything into one warning on [`Flush`] |
//!
//! When no writer is bound, every operator returns a context with the same
//! binding and installs nothing; composing over a missing sink is inert.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use undercurrent::compose::{filter, map};
//! use undercurrent::{read_all, warn, warning, Collector, Context, SharedWarning};
//!
//! let collector = Arc::new(Collector::new());
//! let ctx = Context::new().attach(collector.clone());
//!
//! let ctx = filter(&ctx, |w| !w.message().starts_with("debug"));
//! let ctx = map(&ctx, |w: SharedWarning| warning::new(format!("[db] {}", w)));
//!
//! warn(&ctx, [warning::new("debug: pool warm"), warning::new("slow query")]).unwrap();
//!
//! let seen = read_all(&collector).unwrap();
//! assert_eq!(seen.len(), 1);
//! assert_eq!(seen[0].message(), "[db] slow query");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::collector::{ClosePolicy, Collector};
use crate::context::Context;
use crate::reader::read_all;
use crate::warning::{SharedWarning, Warning};
use crate::writer::{FilterWriter, MapWriter, TapWriter, Writer};

/// Return a context that transforms every warning with `f` before it
/// reaches the current writer.
pub fn map<F>(ctx: &Context, f: F) -> Context
where
    F: Fn(SharedWarning) -> SharedWarning + Send + Sync + 'static,
{
    match ctx.writer() {
        Some(writer) => ctx.with_writer(Arc::new(MapWriter::new(Arc::clone(writer), f))),
        None => ctx.clone(),
    }
}

/// Return a context that forwards only warnings for which `predicate`
/// returns `true`. Rejected warnings are dropped without error.
pub fn filter<P>(ctx: &Context, predicate: P) -> Context
where
    P: Fn(&dyn Warning) -> bool + Send + Sync + 'static,
{
    match ctx.writer() {
        Some(writer) => ctx.with_writer(Arc::new(FilterWriter::new(Arc::clone(writer), predicate))),
        None => ctx.clone(),
    }
}

/// Return a context that calls `observe` on every warning, then forwards it
/// unchanged.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use undercurrent::compose::tap;
/// use undercurrent::{warn, warning, Collector, Context};
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let collector = Arc::new(Collector::new());
///
/// let counter = Arc::clone(&seen);
/// let ctx = tap(&Context::new().attach(collector.clone()), move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// warn(&ctx, [warning::new("a"), warning::new("b")]).unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 2);
/// assert_eq!(collector.len(), 2);
/// ```
pub fn tap<F>(ctx: &Context, observe: F) -> Context
where
    F: Fn(&dyn Warning) + Send + Sync + 'static,
{
    match ctx.writer() {
        Some(writer) => ctx.with_writer(Arc::new(TapWriter::new(Arc::clone(writer), observe))),
        None => ctx.clone(),
    }
}

/// Return a context that buffers warnings, plus a [`Flush`] handle that
/// folds them into a single warning for the current writer.
///
/// Warnings written to the returned context accumulate in a fresh internal
/// collector instead of reaching the current writer. Flushing closes that
/// collector, folds its warnings in write order with `combine` starting from
/// `None`, and writes the result to the original writer, but only if at
/// least one warning was collected.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use std::sync::Arc;
/// use undercurrent::compose::reduce;
/// use undercurrent::{read_all, warn, warning, Collector, Context, Warning};
///
/// #[derive(Debug, Default)]
/// struct Summary(Vec<String>);
///
/// impl Warning for Summary {
///     fn message(&self) -> Cow<'_, str> {
///         Cow::Owned(self.0.join(", "))
///     }
/// }
///
/// let collector = Arc::new(Collector::new());
/// let ctx = Context::new().attach(collector.clone());
///
/// let (batch, flush) = reduce(&ctx, |acc: Option<Summary>, w| {
///     let mut acc = acc.unwrap_or_default();
///     acc.0.push(w.to_string());
///     acc
/// });
///
/// warn(&batch, ["one", "two", "three"].map(warning::new)).unwrap();
/// flush.flush();
///
/// let seen = read_all(&collector).unwrap();
/// assert_eq!(seen.len(), 1);
/// assert_eq!(seen[0].message(), "one, two, three");
/// ```
pub fn reduce<T, F>(ctx: &Context, mut combine: F) -> (Context, Flush)
where
    T: Warning,
    F: FnMut(Option<T>, SharedWarning) -> T + Send + 'static,
{
    let Some(writer) = ctx.writer() else {
        return (ctx.clone(), Flush::inert());
    };

    let buffer = Arc::new(Collector::with_policy(ClosePolicy::Drain));
    let target = Arc::clone(writer);
    let source = Arc::clone(&buffer);

    let finish = move || {
        // Close first: a racing write either lands in the fold or fails.
        let _ = source.close();
        let drained = read_all(&*source);

        let warnings = match drained {
            Ok(warnings) => warnings,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Warning reduction failed to drain buffer: {}", _err);
                return;
            }
        };

        let mut acc = None;
        for warning in warnings {
            acc = Some(combine(acc, warning));
        }

        if let Some(reduced) = acc {
            if let Err(_err) = target.write_warning(Arc::new(reduced)) {
                #[cfg(feature = "tracing")]
                tracing::warn!("Reduced warning could not be written: {}", _err);
            }
        }
    };

    (ctx.with_writer(buffer), Flush::new(finish))
}

/// Finalizer returned by [`reduce`].
///
/// Call [`flush`](Self::flush) to fold and forward the buffered warnings.
/// A `Flush` that is dropped without being flushed flushes itself, so it can
/// be held as a scope guard. Bind it to a named variable: `let (ctx, _) =
/// reduce(..)` drops the guard, and flushes, immediately, so every later
/// write to `ctx` fails with [`Error::Closed`](crate::Error::Closed).
///
/// Failures are never surfaced; they are logged when the `tracing` feature
/// is enabled.
#[must_use = "dropping a Flush flushes it immediately"]
pub struct Flush {
    finish: Option<Box<dyn FnOnce() + Send>>,
}

impl Flush {
    fn new(finish: impl FnOnce() + Send + 'static) -> Self {
        Self {
            finish: Some(Box::new(finish)),
        }
    }

    fn inert() -> Self {
        Self { finish: None }
    }

    /// Whether this flush does nothing because no writer was bound.
    pub fn is_inert(&self) -> bool {
        self.finish.is_none()
    }

    /// Close the buffer and forward the reduced warning, if any.
    pub fn flush(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(finish) = self.finish.take() {
            finish();
        }
    }
}

impl Drop for Flush {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Flush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flush")
            .field("pending", &self.finish.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::warn;
    use crate::testing::{FailingWriter, RecordingWriter};
    use crate::warning;
    use std::borrow::Cow;
    use std::sync::Mutex;
    use std::thread;

    #[derive(Debug, Default)]
    struct Joined(Vec<String>);

    impl Warning for Joined {
        fn message(&self) -> Cow<'_, str> {
            Cow::Owned(self.0.join(", "))
        }
    }

    fn join_all(acc: Option<Joined>, w: SharedWarning) -> Joined {
        let mut acc = acc.unwrap_or_default();
        acc.0.push(w.message().into_owned());
        acc
    }

    fn recorded() -> (Arc<RecordingWriter>, Context) {
        let recorder = Arc::new(RecordingWriter::new());
        let ctx = Context::new().attach(recorder.clone());
        (recorder, ctx)
    }

    #[test]
    fn test_map_transforms_each_warning_once() {
        let (recorder, ctx) = recorded();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);

        let ctx = map(&ctx, move |w: SharedWarning| {
            *counter.lock().unwrap() += 1;
            warning::new(w.message().to_uppercase())
        });

        warn(&ctx, [warning::new("test"), warning::new("other")]).unwrap();

        assert_eq!(recorder.messages(), vec!["TEST", "OTHER"]);
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_map_original_never_reaches_sink() {
        let (recorder, ctx) = recorded();
        let original = warning::new("original");
        let ctx = map(&ctx, |_| warning::new("replacement"));

        warn(&ctx, [Arc::clone(&original)]).unwrap();

        let delivered = recorder.warnings();
        assert_eq!(delivered.len(), 1);
        assert!(!Arc::ptr_eq(&delivered[0], &original));
    }

    #[test]
    fn test_map_without_writer() {
        let ctx = map(&Context::new(), |w| w);
        assert!(!ctx.is_attached());
        assert!(warn(&ctx, [warning::new("test")]).is_ok());
    }

    #[test]
    fn test_filter_drops_rejected() {
        let (recorder, ctx) = recorded();
        let ctx = filter(&ctx, |w| w.message() != "ignore");

        warn(&ctx, [warning::new("this")]).unwrap();
        assert!(warn(&ctx, [warning::new("ignore")]).is_ok());
        warn(&ctx, [warning::new("that")]).unwrap();

        assert_eq!(recorder.messages(), vec!["this", "that"]);
    }

    #[test]
    fn test_filter_failure_only_when_accepted() {
        let ctx = Context::new().attach(Arc::new(FailingWriter::new("down")));
        let ctx = filter(&ctx, |w| w.message() == "keep");

        assert!(warn(&ctx, [warning::new("drop")]).is_ok());
        assert!(warn(&ctx, [warning::new("keep")]).is_err());
    }

    #[test]
    fn test_filter_without_writer() {
        let base = Context::new();
        let ctx = filter(&base, |_| false);
        assert!(ctx.same_binding(&base));
    }

    #[test]
    fn test_tap_observes_in_order_and_forwards_original() {
        let (recorder, ctx) = recorded();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&observed);

        let ctx = tap(&ctx, move |w| log.lock().unwrap().push(w.message().into_owned()));

        let first = warning::new("first");
        warn(&ctx, [Arc::clone(&first), warning::new("second")]).unwrap();

        assert_eq!(*observed.lock().unwrap(), vec!["first", "second"]);
        let delivered = recorder.warnings();
        assert!(Arc::ptr_eq(&delivered[0], &first));
        assert_eq!(recorder.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_tap_without_writer() {
        let touched = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&touched);
        let base = Context::new();

        let ctx = tap(&base, move |_| *flag.lock().unwrap() = true);
        warn(&ctx, [warning::new("test")]).unwrap();

        assert!(ctx.same_binding(&base));
        assert!(!*touched.lock().unwrap());
    }

    #[test]
    fn test_reduce_folds_in_write_order() {
        let (recorder, ctx) = recorded();
        let (batch, flush) = reduce(&ctx, join_all);

        warn(&batch, [warning::new("this")]).unwrap();
        warn(&batch, [warning::new("that")]).unwrap();
        assert!(recorder.messages().is_empty());

        flush.flush();

        assert_eq!(recorder.messages(), vec!["this, that"]);
    }

    #[test]
    fn test_reduce_nothing_written_delivers_nothing() {
        let (recorder, ctx) = recorded();
        let (_batch, flush) = reduce(&ctx, join_all);

        assert!(!flush.is_inert());
        flush.flush();

        assert!(recorder.messages().is_empty());
    }

    #[test]
    fn test_reduce_without_writer_is_inert() {
        let base = Context::new();
        let (ctx, flush) = reduce(&base, join_all);

        assert!(ctx.same_binding(&base));
        assert!(flush.is_inert());
        warn(&ctx, [warning::new("this")]).unwrap();
        flush.flush();
    }

    #[test]
    fn test_reduce_writes_after_flush_fail_closed() {
        let (_recorder, ctx) = recorded();
        let (batch, flush) = reduce(&ctx, join_all);
        flush.flush();

        assert!(warn(&batch, [warning::new("late")]).unwrap_err().is_closed());
    }

    #[test]
    fn test_reduce_swallows_sink_failure() {
        let ctx = Context::new().attach(Arc::new(FailingWriter::new("down")));
        let (batch, flush) = reduce(&ctx, join_all);

        warn(&batch, [warning::new("lost")]).unwrap();
        flush.flush();
    }

    #[derive(Debug)]
    struct Tally(usize);

    impl Warning for Tally {
        fn message(&self) -> Cow<'_, str> {
            Cow::Owned(self.0.to_string())
        }
    }

    #[test]
    fn test_reduce_flush_racing_writer_loses_nothing() {
        for _ in 0..50 {
            let (recorder, ctx) = recorded();
            let (batch, flush) = reduce(&ctx, |acc: Option<Tally>, _| {
                Tally(acc.map_or(1, |t| t.0 + 1))
            });

            let accepted = thread::scope(|s| {
                let producer = s.spawn(|| {
                    let mut accepted = 0;
                    while warn(&batch, [warning::new("x")]).is_ok() {
                        accepted += 1;
                    }
                    accepted
                });
                thread::yield_now();
                flush.flush();
                producer.join().unwrap()
            });

            let delivered: usize = recorder
                .messages()
                .first()
                .map_or(0, |m| m.parse().unwrap());
            assert_eq!(delivered, accepted);
        }
    }

    #[test]
    fn test_reduce_discarded_guard_flushes_immediately() {
        let (recorder, ctx) = recorded();
        let (batch, _) = reduce(&ctx, join_all);

        // The guard is already gone, so the buffer is closed.
        assert!(warn(&batch, [warning::new("late")]).unwrap_err().is_closed());
        assert!(recorder.messages().is_empty());
    }

    #[test]
    fn test_reduce_flushes_on_drop() {
        let (recorder, ctx) = recorded();
        {
            let (batch, _flush) = reduce(&ctx, join_all);
            warn(&batch, [warning::new("scoped")]).unwrap();
        }

        assert_eq!(recorder.messages(), vec!["scoped"]);
    }

    #[test]
    fn test_operators_stack() {
        let (recorder, ctx) = recorded();
        let ctx = map(&ctx, |w: SharedWarning| warning::new(format!("<{}>", w)));
        let ctx = filter(&ctx, |w| w.message().len() > 1);

        warn(&ctx, ["a", "bb", "ccc"].map(warning::new)).unwrap();

        assert_eq!(recorder.messages(), vec!["<bb>", "<ccc>"]);
    }

    #[cfg(feature = "tracing")]
    mod tracing_tests {
        use super::*;
        use tracing_test::traced_test;

        #[test]
        #[traced_test]
        fn test_swallowed_failure_is_logged() {
            let ctx = Context::new().attach(Arc::new(FailingWriter::new("sink offline")));
            let (batch, flush) = reduce(&ctx, join_all);

            warn(&batch, [warning::new("lost")]).unwrap();
            flush.flush();

            assert!(logs_contain("Reduced warning could not be written"));
            assert!(logs_contain("sink offline"));
        }
    }
}
