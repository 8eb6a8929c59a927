//! Tracing support for warning pipelines.
//!
//! This module provides [`TracingWriter`], a terminal sink that turns each
//! warning into a `tracing` event. Feature-gated behind
//! `#[cfg(feature = "tracing")]`.

use crate::error::Result;
use crate::warning::SharedWarning;
use crate::writer::Writer;

/// Emits every warning as a `WARN`-level `tracing` event.
///
/// The warning text is recorded in the `warning` field and the configured
/// target label in the `source` field. Never fails.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use undercurrent::writer::TracingWriter;
/// use undercurrent::{warn, warning, Context};
///
/// let ctx = Context::new().attach(Arc::new(TracingWriter::new("config_loader")));
/// warn(&ctx, [warning::new("unknown key `colour`")]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TracingWriter {
    source: &'static str,
}

impl TracingWriter {
    /// Create a writer labelling its events with `source`.
    pub fn new(source: &'static str) -> Self {
        Self { source }
    }
}

impl Default for TracingWriter {
    fn default() -> Self {
        Self::new("undercurrent")
    }
}

impl Writer for TracingWriter {
    fn write_warning(&self, warning: SharedWarning) -> Result<()> {
        tracing::warn!(source = self.source, warning = %warning, "warning reported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_emits_warning_event() {
        let writer = TracingWriter::new("loader");

        writer
            .write_warning(warning::new("deprecated flag"))
            .unwrap();

        assert!(logs_contain("deprecated flag"));
        assert!(logs_contain("loader"));
    }

    #[test]
    fn test_never_fails_without_subscriber() {
        let writer = TracingWriter::default();
        assert!(writer.write_warning(warning::new("ignored")).is_ok());
    }
}
