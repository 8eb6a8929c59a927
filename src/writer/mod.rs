//! Writers: the sink side of the pipeline.
//!
//! A [`Writer`] accepts warnings one at a time and may fail. Everything that
//! can receive a warning implements it: the [`Collector`](crate::Collector),
//! the fan-out [`MultiWriter`], and the decorators installed by the
//! composition operators in [`compose`](crate::compose).
//!
//! # Overview
//!
//! | Writer | Behaviour |
//! |--------|-----------|
//! | [`MultiWriter`] | Forwards to every child, joins failures |
//! | [`MapWriter`] | Transforms before forwarding |
//! | [`FilterWriter`] | Forwards only when a predicate holds |
//! | [`TapWriter`] | Observes, then forwards unchanged |
//! | [`FnWriter`] | Adapts a closure |
//! | [`Discard`] | Accepts and drops everything |
//! | `TracingWriter` | Emits `tracing` events (feature `tracing`) |
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use undercurrent::writer::{self, Writer};
//! use undercurrent::warning;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = {
//!     let seen = Arc::clone(&seen);
//!     writer::from_fn(move |w| {
//!         seen.lock().unwrap().push(w.message().into_owned());
//!         Ok(())
//!     })
//! };
//!
//! sink.write_warning(warning::new("first")).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec!["first".to_string()]);
//! ```

mod filter;
mod map;
mod multi;
mod tap;
#[cfg(feature = "tracing")]
mod tracing;

use std::sync::Arc;

use crate::error::Result;
use crate::warning::SharedWarning;

pub use filter::FilterWriter;
pub use map::MapWriter;
pub use multi::MultiWriter;
pub use tap::TapWriter;
#[cfg(feature = "tracing")]
pub use self::tracing::TracingWriter;

/// A sink that accepts warnings.
///
/// Writers are shared between threads through [`Context`](crate::Context)
/// values, so `write_warning` takes `&self`; implementations that keep state
/// use interior mutability.
pub trait Writer: Send + Sync {
    /// Accept one warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`](crate::Error::Closed) when the sink has been
    /// closed, or any sink-specific failure.
    fn write_warning(&self, warning: SharedWarning) -> Result<()>;
}

impl<W: Writer + ?Sized> Writer for &W {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        (**self).write_warning(warning)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        (**self).write_warning(warning)
    }
}

impl<W: Writer + ?Sized> Writer for Arc<W> {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        (**self).write_warning(warning)
    }
}

/// Writer backed by a closure.
///
/// Created by [`from_fn`].
pub struct FnWriter<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnWriter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnWriter")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F> Writer for FnWriter<F>
where
    F: Fn(SharedWarning) -> Result<()> + Send + Sync,
{
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        (self.f)(warning)
    }
}

/// Build a writer from a closure.
pub fn from_fn<F>(f: F) -> FnWriter<F>
where
    F: Fn(SharedWarning) -> Result<()> + Send + Sync,
{
    FnWriter { f }
}

/// A writer that accepts and drops every warning.
///
/// ```rust
/// use undercurrent::writer::{Discard, Writer};
/// use undercurrent::warning;
///
/// assert!(Discard.write_warning(warning::new("ignored")).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Writer for Discard {
    fn write_warning(&self, _warning: SharedWarning) -> Result<()> {
        Ok(())
    }
}
