//! Error type shared by every writer and reader
//!
//! Failures in the pipeline fall into three shapes:
//!
//! - [`Error::Closed`]: the collector was explicitly closed.
//! - [`Error::Sink`]: an opaque failure from some downstream writer.
//! - [`Error::Multiple`]: several of the above, produced by fan-out and by
//!   writing several warnings at once.
//!
//! Running out of warnings is *not* an error: readers report exhaustion as
//! `Ok(None)`.
//!
//! # Examples
//!
//! ```
//! use undercurrent::Error;
//!
//! let err = Error::join(vec![Error::Closed, Error::sink("disk full")]).unwrap_err();
//! assert!(err.is_closed());
//! assert_eq!(err.len(), 2);
//! ```

use std::error::Error as StdError;
use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed underlying failure carried by [`Error::Sink`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors reported by writers, readers and collectors.
#[derive(Debug)]
pub enum Error {
    /// The warning stream is closed.
    Closed,
    /// A downstream sink failed.
    Sink(BoxError),
    /// More than one failure occurred. Values built by [`Error::join`] and
    /// [`Error::combine`] hold at least two errors and never nest another
    /// `Multiple`; hand-built values carry no such guarantee.
    Multiple(Vec<Error>),
}

impl Error {
    /// Wrap an arbitrary failure from a downstream sink.
    ///
    /// # Example
    ///
    /// ```
    /// use undercurrent::Error;
    ///
    /// let err = Error::sink("connection reset");
    /// assert_eq!(err.to_string(), "connection reset");
    /// ```
    pub fn sink(err: impl Into<BoxError>) -> Self {
        Error::Sink(err.into())
    }

    /// Join a batch of errors into one.
    ///
    /// Returns `Ok(())` when `errors` is empty, the error itself when there is
    /// exactly one, and a flattened [`Error::Multiple`] otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use undercurrent::Error;
    ///
    /// assert!(Error::join(Vec::new()).is_ok());
    /// assert!(matches!(Error::join(vec![Error::Closed]), Err(Error::Closed)));
    /// ```
    pub fn join(errors: Vec<Error>) -> Result<()> {
        let mut flat: Vec<Error> = errors.into_iter().flat_map(Error::into_errors).collect();

        match flat.len() {
            0 => Ok(()),
            1 => Err(flat.remove(0)),
            _ => Err(Error::Multiple(flat)),
        }
    }

    /// Combine two errors into one aggregate.
    pub fn combine(self, other: Error) -> Error {
        let mut errors = self.into_errors();
        errors.extend(other.into_errors());
        Error::Multiple(errors)
    }

    /// Split this error into its individual failures, flattening nested
    /// aggregates.
    pub fn into_errors(self) -> Vec<Error> {
        match self {
            Error::Multiple(errors) => errors.into_iter().flat_map(Error::into_errors).collect(),
            single => vec![single],
        }
    }

    /// Iterate over the individual failures, flattening aggregates.
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        let slice = match self {
            Error::Multiple(errors) => errors.as_slice(),
            single => std::slice::from_ref(single),
        };
        slice.iter()
    }

    /// Number of individual failures represented by this error.
    pub fn len(&self) -> usize {
        match self {
            Error::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    /// Always `false`; an `Error` represents at least one failure.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether any contributing failure is [`Error::Closed`].
    pub fn is_closed(&self) -> bool {
        self.iter().any(|err| matches!(err, Error::Closed))
    }

    /// Find the first contributing sink failure of type `E`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::fmt;
    /// use undercurrent::Error;
    ///
    /// #[derive(Debug)]
    /// struct Quota;
    ///
    /// impl fmt::Display for Quota {
    ///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    ///         f.write_str("quota exceeded")
    ///     }
    /// }
    ///
    /// impl std::error::Error for Quota {}
    ///
    /// let err = Error::Closed.combine(Error::sink(Quota));
    /// assert!(err.find::<Quota>().is_some());
    /// ```
    pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
        self.iter().find_map(|err| match err {
            Error::Sink(inner) => inner.downcast_ref::<E>(),
            _ => None,
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Closed => f.write_str("warning stream is closed"),
            Error::Sink(err) => write!(f, "{}", err),
            Error::Multiple(errors) => {
                for (idx, err) in errors.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Sink(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
