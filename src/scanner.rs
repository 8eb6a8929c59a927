//! Scanner - pull-style iteration over a [`Reader`]
//!
//! The scanner turns a reader's `Result<Option<_>>` into a two-phase
//! protocol: call [`Scanner::scan`] to advance, then inspect
//! [`Scanner::warning`]. Once the loop ends, [`Scanner::err`] tells whether it
//! ended by exhaustion (`None`) or by a failure.
//!
//! # Examples
//!
//! ```
//! use undercurrent::{warning, Collector, Scanner, Writer};
//!
//! let collector = Collector::new();
//! collector.write_warning(warning::new("first")).unwrap();
//! collector.write_warning(warning::new("second")).unwrap();
//!
//! let mut scanner = Scanner::new(&collector);
//! let mut seen = Vec::new();
//! while Scanner::scan(&mut scanner) {
//!     if let Some(w) = scanner.warning() {
//!         seen.push(w.to_string());
//!     }
//! }
//!
//! assert!(scanner.err().is_none());
//! assert_eq!(seen, vec!["first", "second"]);
//! ```

use crate::error::Error;
use crate::reader::Reader;
use crate::warning::SharedWarning;

#[derive(Debug)]
enum Cursor {
    Start,
    Item(SharedWarning),
    Exhausted,
    Errored(Error),
}

/// Sticky-error cursor over a reader.
///
/// Errors are terminal: after the first failure the scanner never touches
/// the reader again. Exhaustion is not terminal; a later `scan` asks the
/// reader again, which lets a scanner follow a collector that is still being
/// written to.
///
/// `scan` takes `&mut self`, so a scanner is driven by one caller at a time.
#[derive(Debug)]
pub struct Scanner<R> {
    reader: R,
    cursor: Cursor,
}

impl<R: Reader> Scanner<R> {
    /// Create a scanner over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cursor: Cursor::Start,
        }
    }

    /// Advance to the next warning.
    ///
    /// Returns `true` when a new warning is available from
    /// [`warning`](Self::warning), `false` on exhaustion or failure.
    pub fn scan(&mut self) -> bool {
        if matches!(self.cursor, Cursor::Errored(_)) {
            return false;
        }

        match self.reader.read_warning() {
            Ok(Some(warning)) => {
                self.cursor = Cursor::Item(warning);
                true
            }
            Ok(None) => {
                self.cursor = Cursor::Exhausted;
                false
            }
            Err(err) => {
                self.cursor = Cursor::Errored(err);
                false
            }
        }
    }

    /// The warning produced by the last successful [`scan`](Self::scan).
    ///
    /// `None` before the first scan, after exhaustion, and after a failure.
    pub fn warning(&self) -> Option<&SharedWarning> {
        match &self.cursor {
            Cursor::Item(warning) => Some(warning),
            _ => None,
        }
    }

    /// The first failure encountered, if any.
    pub fn err(&self) -> Option<&Error> {
        match &self.cursor {
            Cursor::Errored(err) => Some(err),
            _ => None,
        }
    }

    /// Consume the scanner, returning the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Iterating yields warnings until the scanner stops; check
/// [`Scanner::err`] afterwards.
///
/// ```
/// use undercurrent::reader::Replay;
/// use undercurrent::{warning, Scanner};
///
/// let mut scanner = Scanner::new(Replay::new(vec![warning::new("a")]));
/// let messages: Vec<String> = scanner.by_ref().map(|w| w.to_string()).collect();
///
/// assert_eq!(messages, vec!["a"]);
/// assert!(scanner.err().is_none());
/// ```
impl<R: Reader> Iterator for Scanner<R> {
    type Item = SharedWarning;

    fn next(&mut self) -> Option<Self::Item> {
        if self.scan() {
            self.warning().cloned()
        } else {
            None
        }
    }
}
