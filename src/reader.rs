//! Readers: the source side of the pipeline
//!
//! A [`Reader`] yields previously written warnings one at a time. Running out
//! is reported as `Ok(None)`, never as an error, so consumers can tell a
//! drained source from a failing one.
//!
//! # Examples
//!
//! ```
//! use undercurrent::reader::{read_all, Replay};
//! use undercurrent::warning;
//!
//! let log = Replay::new(vec![warning::new("a"), warning::new("b")]);
//! let all = read_all(&log).unwrap();
//!
//! let messages: Vec<_> = all.iter().map(|w| w.to_string()).collect();
//! assert_eq!(messages, vec!["a", "b"]);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::warning::SharedWarning;

/// A source of previously written warnings.
pub trait Reader: Send + Sync {
    /// Read the next warning.
    ///
    /// Returns `Ok(None)` once the source has nothing more to give.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`](crate::Error::Closed) for a closed collector,
    /// or any source-specific failure.
    fn read_warning(&self) -> Result<Option<SharedWarning>>;
}

impl<R: Reader + ?Sized> Reader for &R {
    fn read_warning(&self) -> Result<Option<SharedWarning>> {
        (**self).read_warning()
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn read_warning(&self) -> Result<Option<SharedWarning>> {
        (**self).read_warning()
    }
}

impl<R: Reader + ?Sized> Reader for Arc<R> {
    fn read_warning(&self) -> Result<Option<SharedWarning>> {
        (**self).read_warning()
    }
}

/// Read every remaining warning from `reader`, in order.
///
/// Stops at exhaustion and returns what was read. On the first genuine error
/// the error is returned and the warnings read so far are dropped.
///
/// # Example
///
/// ```
/// use undercurrent::{read_all, warning, Collector};
/// use undercurrent::writer::Writer;
///
/// let collector = Collector::new();
/// collector.write_warning(warning::new("one")).unwrap();
/// collector.write_warning(warning::new("two")).unwrap();
///
/// assert_eq!(read_all(&collector).unwrap().len(), 2);
/// assert!(read_all(&collector).unwrap().is_empty());
/// ```
pub fn read_all<R: Reader + ?Sized>(reader: &R) -> Result<Vec<SharedWarning>> {
    let mut warnings = Vec::new();
    while let Some(warning) = reader.read_warning()? {
        warnings.push(warning);
    }
    Ok(warnings)
}

/// A finite reader replaying a fixed list of warnings.
///
/// Yields the warnings in order, then reports exhaustion forever.
#[derive(Debug, Default)]
pub struct Replay {
    remaining: Mutex<VecDeque<SharedWarning>>,
}

impl Replay {
    /// Create a replay log over `warnings`.
    pub fn new(warnings: impl IntoIterator<Item = SharedWarning>) -> Self {
        Self {
            remaining: Mutex::new(warnings.into_iter().collect()),
        }
    }

    /// Number of warnings not yet replayed.
    pub fn remaining(&self) -> usize {
        self.remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Reader for Replay {
    fn read_warning(&self) -> Result<Option<SharedWarning>> {
        Ok(self
            .remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front())
    }
}

impl FromIterator<SharedWarning> for Replay {
    fn from_iter<I: IntoIterator<Item = SharedWarning>>(iter: I) -> Self {
        Self::new(iter)
    }
}
