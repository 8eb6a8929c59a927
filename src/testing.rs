//! Testing utilities for code that reports warnings
//!
//! This module provides writers that make assertions about warning flow easy,
//! an assertion macro, and (behind the `proptest` feature) strategies for
//! property-based tests.
//!
//! # Examples
//!
//! ## RecordingWriter
//!
//! ```rust
//! use std::sync::Arc;
//! use undercurrent::testing::RecordingWriter;
//! use undercurrent::{warn, warning, Context};
//!
//! let recorder = Arc::new(RecordingWriter::new());
//! let ctx = Context::new().attach(recorder.clone());
//!
//! warn(&ctx, [warning::new("checked")]).unwrap();
//! assert_eq!(recorder.messages(), vec!["checked"]);
//! ```
//!
//! ## Assertion Macro
//!
//! ```rust
//! use undercurrent::{assert_messages, warning, Collector, Writer};
//!
//! let collector = Collector::new();
//! collector.write_warning(warning::new("a")).unwrap();
//! collector.write_warning(warning::new("b")).unwrap();
//!
//! assert_messages!(collector, ["a", "b"]);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::warning::SharedWarning;
use crate::writer::Writer;

/// A writer that records every warning it accepts.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    seen: Mutex<Vec<SharedWarning>>,
}

impl RecordingWriter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded warning, in arrival order.
    pub fn warnings(&self) -> Vec<SharedWarning> {
        self.lock().clone()
    }

    /// The text of every recorded warning, in arrival order.
    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|w| w.message().into_owned())
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SharedWarning>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Writer for RecordingWriter {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        self.lock().push(warning);
        Ok(())
    }
}

/// A writer that rejects every warning with a sink error.
#[derive(Debug, Clone)]
pub struct FailingWriter {
    reason: String,
}

impl FailingWriter {
    /// Create a writer failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Writer for FailingWriter {
    fn write_warning(&self, _warning: SharedWarning) -> Result<()> {
        Err(Error::sink(self.reason.clone()))
    }
}

/// Assert that a reader yields exactly the given messages, in order.
///
/// The reader is drained by the assertion.
///
/// # Example
///
/// ```rust
/// use undercurrent::reader::Replay;
/// use undercurrent::{assert_messages, warning};
///
/// let replay = Replay::new(vec![warning::new("only")]);
/// assert_messages!(replay, ["only"]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($reader:expr, [$($msg:expr),* $(,)?]) => {
        match $crate::reader::read_all(&$reader) {
            Ok(warnings) => {
                let actual: Vec<String> = warnings
                    .iter()
                    .map(|w| w.message().into_owned())
                    .collect();
                let expected: Vec<String> = vec![$(String::from($msg)),*];
                assert_eq!(actual, expected, "Warning messages differ");
            }
            Err(err) => panic!("Expected warnings, got error: {}", err),
        }
    };
}

/// Proptest strategies for warnings.
#[cfg(feature = "proptest")]
pub mod strategies {
    use proptest::prelude::*;

    use crate::warning::{self, Message, SharedWarning};

    /// Arbitrary printable warning text.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[ -~]{0,40}"
    }

    /// Arbitrary [`Message`] warnings.
    pub fn arb_message() -> impl Strategy<Value = Message> {
        arb_text().prop_map(Message::new)
    }

    /// Arbitrary sequences of shared warnings.
    pub fn arb_warnings(max_len: usize) -> impl Strategy<Value = Vec<SharedWarning>> {
        prop::collection::vec(arb_text().prop_map(warning::new), 0..=max_len)
    }
}
