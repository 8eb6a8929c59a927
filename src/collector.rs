//! Collector - an in-memory warning queue with an explicit lifecycle
//!
//! A [`Collector`] is both a [`Writer`] and a [`Reader`]: producers write
//! warnings into it (usually through a [`Context`](crate::Context)) and a
//! consumer later drains them.
//!
//! # Lifecycle
//!
//! ```text
//! Open --close()--> Closed
//! ```
//!
//! While open, writes enqueue and reads dequeue in FIFO order; reading an
//! empty open collector reports exhaustion (`Ok(None)`). Once closed, writes
//! and further `close` calls fail with [`Error::Closed`]. What reads do after
//! close is governed by the [`ClosePolicy`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use undercurrent::{read_all, warn, warning, Collector, Context};
//!
//! let collector = Arc::new(Collector::new());
//! let ctx = Context::new().attach(collector.clone());
//!
//! warn(&ctx, [warning::new("cache miss")]).unwrap();
//!
//! let warnings = read_all(&collector).unwrap();
//! assert_eq!(warnings[0].message(), "cache miss");
//!
//! collector.close().unwrap();
//! assert!(collector.close().unwrap_err().is_closed());
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::warning::SharedWarning;
use crate::writer::Writer;

/// What reads observe once a collector has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Every read after close fails with [`Error::Closed`], even when
    /// unread warnings remain buffered.
    #[default]
    HardStop,
    /// Reads after close keep returning buffered warnings, then report
    /// exhaustion (`Ok(None)`) once the queue is empty.
    Drain,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<SharedWarning>,
    closed: bool,
}

/// Concurrency-safe, unbounded warning queue.
///
/// Any number of threads may write while another reads or closes. Each
/// write is atomic; ordering is preserved per writer.
///
/// # Example
///
/// ```
/// use undercurrent::{warning, ClosePolicy, Collector, Reader, Writer};
///
/// let collector = Collector::with_policy(ClosePolicy::Drain);
/// collector.write_warning(warning::new("late")).unwrap();
/// collector.close().unwrap();
///
/// // Drain keeps buffered warnings readable after close
/// assert_eq!(collector.read_warning().unwrap().unwrap().message(), "late");
/// assert!(collector.read_warning().unwrap().is_none());
/// assert!(collector.write_warning(warning::new("later")).unwrap_err().is_closed());
/// ```
#[derive(Debug, Default)]
pub struct Collector {
    state: Mutex<State>,
    policy: ClosePolicy,
}

impl Collector {
    /// Create an open, empty collector with [`ClosePolicy::HardStop`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an open collector with the given close policy.
    pub fn with_policy(policy: ClosePolicy) -> Self {
        Self {
            state: Mutex::default(),
            policy,
        }
    }

    /// Create an open collector with room for `capacity` warnings before
    /// reallocating. The queue still grows without bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            policy: ClosePolicy::default(),
        }
    }

    /// The close policy this collector was built with.
    pub fn policy(&self) -> ClosePolicy {
        self.policy
    }

    /// Close the collector.
    ///
    /// Buffered warnings are kept. Never blocks on pending reads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the collector was already closed.
    pub fn close(&self) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(Error::Closed);
        }
        state.closed = true;

        #[cfg(feature = "tracing")]
        tracing::trace!(buffered = state.queue.len(), "warning collector closed");

        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of buffered, unread warnings.
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Whether no warnings are buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    // The state is consistent between statements, so a panic on another
    // thread never leaves it half-updated.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Writer for Collector {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(Error::Closed);
        }
        state.queue.push_back(warning);
        Ok(())
    }
}

impl Reader for Collector {
    fn read_warning(&self) -> Result<Option<SharedWarning>> {
        let mut state = self.lock();
        match (state.closed, self.policy) {
            (false, _) => Ok(state.queue.pop_front()),
            (true, ClosePolicy::HardStop) => Err(Error::Closed),
            (true, ClosePolicy::Drain) => Ok(state.queue.pop_front()),
        }
    }
}
