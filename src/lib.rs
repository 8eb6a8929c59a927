//! # Undercurrent
//!
//! > *"Warnings flow beneath the surface"*
//!
//! A Rust library for reporting non-fatal diagnostics from deep inside a call
//! chain without changing any function signatures.
//!
//! ## Philosophy
//!
//! **Undercurrent** separates *reporting* a warning from *deciding* what
//! happens to it:
//! - **Producers** call [`warn`] or [`warnf!`] with the [`Context`] they were
//!   handed. They never know whether anyone is listening.
//! - **Ancestors** bind a [`Writer`] (usually a [`Collector`]) to the context,
//!   optionally rewrite it with [`compose`] operators, and later drain what
//!   was collected with [`read_all`] or a [`Scanner`].
//!
//! A context with nothing attached swallows warnings silently, so
//! instrumentation never needs conditional guards.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use undercurrent::{read_all, warnf, Collector, Context};
//!
//! fn load_settings(ctx: &Context, keys: &[&str]) -> usize {
//!     let mut known = 0;
//!     for key in keys {
//!         if key.starts_with("x-") {
//!             let _ = warnf!(ctx, "ignoring unknown key {}", key);
//!         } else {
//!             known += 1;
//!         }
//!     }
//!     known
//! }
//!
//! let collector = Arc::new(Collector::new());
//! let ctx = Context::new().attach(collector.clone());
//!
//! assert_eq!(load_settings(&ctx, &["port", "x-colour", "host"]), 2);
//!
//! let warnings = read_all(&collector).unwrap();
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].message(), "ignoring unknown key x-colour");
//!
//! collector.close().unwrap();
//! ```
//!
//! ## Features
//!
//! - `tracing`: [`writer::TracingWriter`] and logging of swallowed failures
//! - `serde`: serialize warnings as JSON strings
//! - `async`: `stream::ReaderStream`, a `futures::Stream` over any reader
//! - `proptest`: strategies in `testing::strategies`

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod collector;
pub mod compose;
pub mod context;
pub mod error;
pub mod reader;
pub mod scanner;
#[cfg(feature = "async")]
pub mod stream;
pub mod testing;
pub mod warning;
pub mod writer;

// Re-exports
pub use collector::{ClosePolicy, Collector};
pub use context::{warn, warnf, Context};
pub use error::{Error, Result};
pub use reader::{read_all, Reader};
pub use scanner::Scanner;
pub use warning::{Message, SharedWarning, Warning};
pub use writer::{MultiWriter, Writer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collector::{ClosePolicy, Collector};
    pub use crate::compose::{filter, map, reduce, tap, Flush};
    pub use crate::context::{warn, Context};
    pub use crate::error::{Error, Result};
    pub use crate::reader::{read_all, Reader};
    pub use crate::scanner::Scanner;
    pub use crate::warning::{Message, SharedWarning, Warning};
    pub use crate::writer::{MultiWriter, Writer};
    pub use crate::warnf;
}
