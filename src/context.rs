//! Context plumbing: carrying a writer through call chains
//!
//! A [`Context`] is an immutable value threaded through function calls that
//! carries at most one bound [`Writer`]. Code deep in a call chain reports
//! warnings with [`warn`] or [`warnf!`](crate::warnf) without knowing who, if
//! anyone, is listening. An ancestor decides by binding a writer with
//! [`Context::attach`].
//!
//! Deriving a context ([`attach`](Context::attach),
//! [`detach`](Context::detach), or the operators in
//! [`compose`](crate::compose)) never mutates the original; it returns a new
//! value. Contexts are cheap to clone and safe to share across threads.
//!
//! A context with no writer is perfectly valid: every warning written to it
//! is silently dropped, so instrumentation can be added without guards.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use undercurrent::{read_all, warn, warnf, warning, Collector, Context};
//!
//! fn parse_port(ctx: &Context, raw: &str) -> u16 {
//!     raw.parse().unwrap_or_else(|_| {
//!         let _ = warnf!(ctx, "invalid port {:?}, using 8080", raw);
//!         8080
//!     })
//! }
//!
//! let collector = Arc::new(Collector::new());
//! let ctx = Context::new().attach(collector.clone());
//!
//! assert_eq!(parse_port(&ctx, "eighty"), 8080);
//! assert_eq!(parse_port(&Context::new(), "eighty"), 8080);
//!
//! let warnings = read_all(&collector).unwrap();
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].message(), r#"invalid port "eighty", using 8080"#);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::warning::{self, SharedWarning};
use crate::writer::{MultiWriter, Writer};

#[derive(Clone, Default)]
enum Binding {
    #[default]
    Unset,
    Detached,
    Bound(Arc<dyn Writer>),
}

/// Request-scoped carrier of the current warning writer.
#[derive(Clone, Default)]
pub struct Context {
    binding: Binding,
}

impl Context {
    /// A context with no writer bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// The writer currently bound to this context, if any.
    pub fn writer(&self) -> Option<&Arc<dyn Writer>> {
        match &self.binding {
            Binding::Bound(writer) => Some(writer),
            Binding::Unset | Binding::Detached => None,
        }
    }

    /// Whether a writer is bound.
    pub fn is_attached(&self) -> bool {
        self.writer().is_some()
    }

    /// Whether this context was explicitly detached.
    pub fn is_detached(&self) -> bool {
        matches!(self.binding, Binding::Detached)
    }

    /// Return a context whose warnings also reach `writer`.
    ///
    /// If a writer is already bound, the new context fans out to both, the
    /// existing writer first. Otherwise `writer` is bound directly.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use undercurrent::{warn, warning, Collector, Context};
    ///
    /// let outer = Arc::new(Collector::new());
    /// let inner = Arc::new(Collector::new());
    ///
    /// let ctx = Context::new().attach(outer.clone()).attach(inner.clone());
    /// warn(&ctx, [warning::new("seen twice")]).unwrap();
    ///
    /// assert_eq!(outer.len(), 1);
    /// assert_eq!(inner.len(), 1);
    /// ```
    pub fn attach(&self, writer: Arc<dyn Writer>) -> Context {
        let writer: Arc<dyn Writer> = match self.writer() {
            Some(found) => Arc::new(MultiWriter::pair(Arc::clone(found), writer)),
            None => writer,
        };
        self.with_writer(writer)
    }

    /// Return a context that no longer propagates warnings.
    ///
    /// If nothing is bound the result shares this context's binding
    /// unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use undercurrent::{warn, warning, Collector, Context};
    ///
    /// let collector = Arc::new(Collector::new());
    /// let ctx = Context::new().attach(collector.clone()).detach();
    ///
    /// warn(&ctx, [warning::new("dropped")]).unwrap();
    /// assert!(collector.is_empty());
    /// ```
    pub fn detach(&self) -> Context {
        if !self.is_attached() {
            return self.clone();
        }
        Context {
            binding: Binding::Detached,
        }
    }

    /// Whether two contexts carry the same binding: the same writer
    /// instance, or the same absence of one.
    pub fn same_binding(&self, other: &Context) -> bool {
        match (&self.binding, &other.binding) {
            (Binding::Unset, Binding::Unset) | (Binding::Detached, Binding::Detached) => true,
            (Binding::Bound(a), Binding::Bound(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn with_writer(&self, writer: Arc<dyn Writer>) -> Context {
        Context {
            binding: Binding::Bound(writer),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = match &self.binding {
            Binding::Unset => "unset",
            Binding::Detached => "detached",
            Binding::Bound(_) => "<writer>",
        };
        f.debug_struct("Context").field("binding", &binding).finish()
    }
}

/// Write warnings to the context's writer, in order.
///
/// Does nothing and returns `Ok(())` when no writer is bound. Every warning is
/// attempted even if an earlier one fails; all failures are joined into the
/// returned error.
///
/// # Example
///
/// ```
/// use undercurrent::{warn, warning, Context};
///
/// // No writer bound: silently ignored
/// assert!(warn(&Context::new(), [warning::new("nobody listens")]).is_ok());
/// ```
pub fn warn<I>(ctx: &Context, warnings: I) -> Result<()>
where
    I: IntoIterator<Item = SharedWarning>,
{
    let Some(writer) = ctx.writer() else {
        return Ok(());
    };

    let errors = warnings
        .into_iter()
        .filter_map(|warning| writer.write_warning(warning).err())
        .collect();

    Error::join(errors)
}

/// Format a message and write it as a single warning.
///
/// Usually called through the [`warnf!`](crate::warnf) macro. A
/// [`SharedWarning`] used as a format argument renders as its message.
pub fn warnf(ctx: &Context, args: fmt::Arguments<'_>) -> Result<()> {
    if !ctx.is_attached() {
        return Ok(());
    }
    warn(ctx, [warning::new(fmt::format(args))])
}

/// Format a message and write it to a [`Context`] as one warning.
///
/// Expands to [`warnf`](crate::context::warnf) with `format_args!`.
///
/// ```
/// use std::sync::Arc;
/// use undercurrent::{read_all, warnf, warning, Collector, Context};
///
/// let collector = Arc::new(Collector::new());
/// let ctx = Context::new().attach(collector.clone());
///
/// let cause = warning::new("timeout");
/// warnf!(&ctx, "retrying after {}", cause).unwrap();
///
/// assert_eq!(read_all(&collector).unwrap()[0].message(), "retrying after timeout");
/// ```
#[macro_export]
macro_rules! warnf {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::context::warnf($ctx, ::std::format_args!($($arg)+))
    };
}
