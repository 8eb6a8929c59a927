//! FilterWriter - forward only matching warnings.

use crate::error::Result;
use crate::warning::{SharedWarning, Warning};
use crate::writer::Writer;

/// Forwards a warning only when the predicate holds.
///
/// Rejected warnings are dropped silently; the only possible failure is the
/// inner writer failing on an accepted warning.
pub struct FilterWriter<W, P> {
    pub(crate) inner: W,
    pub(crate) predicate: P,
}

impl<W, P> FilterWriter<W, P>
where
    W: Writer,
    P: Fn(&dyn Warning) -> bool + Send + Sync,
{
    /// Wrap `inner`, forwarding only warnings accepted by `predicate`.
    pub fn new(inner: W, predicate: P) -> Self {
        Self { inner, predicate }
    }
}

impl<W, P> std::fmt::Debug for FilterWriter<W, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterWriter")
            .field("inner", &"<writer>")
            .field("predicate", &"<function>")
            .finish()
    }
}

impl<W, P> Writer for FilterWriter<W, P>
where
    W: Writer,
    P: Fn(&dyn Warning) -> bool + Send + Sync,
{
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        if (self.predicate)(warning.as_ref()) {
            self.inner.write_warning(warning)
        } else {
            Ok(())
        }
    }
}
