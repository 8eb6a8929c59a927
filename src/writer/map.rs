//! MapWriter - transform warnings before forwarding.

use crate::error::Result;
use crate::warning::SharedWarning;
use crate::writer::Writer;

/// Transforms each warning with a function, then forwards the result.
///
/// The original warning never reaches the inner writer.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use undercurrent::writer::{MapWriter, Writer};
/// use undercurrent::{read_all, warning, Collector};
///
/// let collector = Arc::new(Collector::new());
/// let upper = MapWriter::new(collector.clone(), |w: warning::SharedWarning| {
///     warning::new(w.message().to_uppercase())
/// });
///
/// upper.write_warning(warning::new("quiet")).unwrap();
/// let seen = read_all(&collector).unwrap();
/// assert_eq!(seen[0].message(), "QUIET");
/// ```
pub struct MapWriter<W, F> {
    pub(crate) inner: W,
    pub(crate) f: F,
}

impl<W, F> MapWriter<W, F>
where
    W: Writer,
    F: Fn(SharedWarning) -> SharedWarning + Send + Sync,
{
    /// Wrap `inner`, transforming every warning with `f`.
    pub fn new(inner: W, f: F) -> Self {
        Self { inner, f }
    }
}

impl<W, F> std::fmt::Debug for MapWriter<W, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWriter")
            .field("inner", &"<writer>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<W, F> Writer for MapWriter<W, F>
where
    W: Writer,
    F: Fn(SharedWarning) -> SharedWarning + Send + Sync,
{
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        self.inner.write_warning((self.f)(warning))
    }
}
