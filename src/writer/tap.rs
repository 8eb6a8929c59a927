//! TapWriter - observe warnings without altering delivery.

use crate::error::Result;
use crate::warning::{SharedWarning, Warning};
use crate::writer::Writer;

/// Calls an observer for each warning, then forwards the original.
///
/// Useful for side effects such as logging or counting. The observer runs
/// before the inner writer, even when the inner writer then fails.
pub struct TapWriter<W, F> {
    pub(crate) inner: W,
    pub(crate) observe: F,
}

impl<W, F> TapWriter<W, F>
where
    W: Writer,
    F: Fn(&dyn Warning) + Send + Sync,
{
    /// Wrap `inner`, calling `observe` on every warning.
    pub fn new(inner: W, observe: F) -> Self {
        Self { inner, observe }
    }
}

impl<W, F> std::fmt::Debug for TapWriter<W, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapWriter")
            .field("inner", &"<writer>")
            .field("observe", &"<function>")
            .finish()
    }
}

impl<W, F> Writer for TapWriter<W, F>
where
    W: Writer,
    F: Fn(&dyn Warning) + Send + Sync,
{
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        (self.observe)(warning.as_ref());
        self.inner.write_warning(warning)
    }
}
