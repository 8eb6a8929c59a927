//! Warning values
//!
//! A [`Warning`] is an immutable diagnostic that knows how to render itself as
//! human-readable text. Warnings travel through the pipeline as
//! [`SharedWarning`] handles so that fan-out and buffering never copy the
//! underlying value.
//!
//! # Examples
//!
//! ```
//! use undercurrent::warning;
//!
//! let w = warning::new("disk almost full");
//! assert_eq!(w.message(), "disk almost full");
//! assert_eq!(w.to_string(), "disk almost full");
//! ```
//!
//! ## Custom warnings
//!
//! Any `Debug + Send + Sync` type can be a warning:
//!
//! ```
//! use std::borrow::Cow;
//! use undercurrent::Warning;
//!
//! #[derive(Debug)]
//! struct Deprecated {
//!     field: &'static str,
//! }
//!
//! impl Warning for Deprecated {
//!     fn message(&self) -> Cow<'_, str> {
//!         Cow::Owned(format!("field `{}` is deprecated", self.field))
//!     }
//! }
//!
//! let w = Deprecated { field: "user_name" };
//! assert_eq!(w.message(), "field `user_name` is deprecated");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A non-fatal diagnostic message.
///
/// Implementations must be immutable once constructed; the only capability a
/// warning exposes is rendering its text.
pub trait Warning: fmt::Debug + Send + Sync + 'static {
    /// The human-readable text of this warning.
    fn message(&self) -> Cow<'_, str>;
}

/// Shared handle to a type-erased warning.
pub type SharedWarning = Arc<dyn Warning>;

impl fmt::Display for dyn Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// The stock warning: a plain message string.
///
/// # Example
///
/// ```
/// use undercurrent::warning::Message;
/// use undercurrent::Warning;
///
/// let msg = Message::from("retrying request");
/// assert_eq!(msg.message(), "retrying request");
/// assert_eq!(msg.as_str(), "retrying request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    text: String,
}

impl Message {
    /// Create a message warning.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Borrow the message text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the message and return its text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl Warning for Message {
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Create a shared warning rendering exactly `message`.
///
/// # Example
///
/// ```
/// use undercurrent::warning;
///
/// let w = warning::new(format!("{} files skipped", 3));
/// assert_eq!(w.message(), "3 files skipped");
/// ```
pub fn new(message: impl Into<String>) -> SharedWarning {
    Arc::new(Message::new(message))
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::{Serialize, Serializer};

    use super::{Message, Warning};

    impl Serialize for Message {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.text)
        }
    }

    impl Serialize for dyn Warning {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.message())
        }
    }
}
