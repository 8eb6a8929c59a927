//! MultiWriter - fan a warning out to several writers.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::warning::SharedWarning;
use crate::writer::Writer;

/// Forwards every warning to each child writer in registration order.
///
/// Delivery is best-effort: a failing child does not stop later children
/// from receiving the warning, and every failure is joined into the
/// returned error. Callers must not assume all-or-nothing delivery.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use undercurrent::writer::{MultiWriter, Writer};
/// use undercurrent::{warning, Collector};
///
/// let first = Arc::new(Collector::new());
/// let second = Arc::new(Collector::new());
/// second.close().unwrap();
///
/// let fan_out = MultiWriter::pair(first.clone(), second.clone());
/// let err = fan_out.write_warning(warning::new("hello")).unwrap_err();
///
/// assert!(err.is_closed());
/// assert_eq!(first.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MultiWriter {
    writers: Vec<Arc<dyn Writer>>,
}

impl MultiWriter {
    /// Create a fan-out writer over `writers`.
    pub fn new(writers: Vec<Arc<dyn Writer>>) -> Self {
        Self { writers }
    }

    /// Fan out to exactly two writers, `first` receiving each warning first.
    pub fn pair(first: Arc<dyn Writer>, second: Arc<dyn Writer>) -> Self {
        Self::new(vec![first, second])
    }

    /// Register another child writer at the end of the sequence.
    pub fn push(&mut self, writer: Arc<dyn Writer>) {
        self.writers.push(writer);
    }

    /// Number of child writers.
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    /// Whether there are no child writers.
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl std::fmt::Debug for MultiWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiWriter")
            .field("writers", &self.writers.len())
            .finish()
    }
}

impl Writer for MultiWriter {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        let errors = self
            .writers
            .iter()
            .filter_map(|writer| writer.write_warning(Arc::clone(&warning)).err())
            .collect();

        Error::join(errors)
    }
}
