#![allow(unused_imports, unused_macros)]

pub use tracing::Level;

/// Holds an entered span and exits it when dropped, so a whole pass can be scoped with a
/// single `let _span = ...` binding.
pub struct ExitOnDropSpan {
    entered_span: Option<tracing::span::EnteredSpan>,
}

macro_rules! span_auto {
    ($lvl:expr, $name:expr, $($fields:tt)*) => {
        $crate::trace::ExitOnDropSpan::from(tracing::span!($lvl, $name, $($fields)*).entered())
    };
    ($lvl:expr, $name:expr) => {
        $crate::trace::ExitOnDropSpan::from(tracing::span!($lvl, $name).entered())
    };
}
pub(crate) use span_auto;

macro_rules! trace {
    ($name:expr, $($arg:tt)*) => (tracing::trace!($name, $($arg)*));
    ($name:expr) => (tracing::trace!($name))
}
pub(crate) use trace;

macro_rules! debug {
    ($name:expr, $($arg:tt)*) => (tracing::debug!($name, $($arg)*));
    ($name:expr) => (tracing::debug!($name))
}
pub(crate) use debug;

macro_rules! info {
    ($name:expr, $($arg:tt)*) => (tracing::info!($name, $($arg)*));
    ($name:expr) => (tracing::info!($name))
}
pub(crate) use info;

macro_rules! error {
    ($name:expr, $($arg:tt)*) => (tracing::error!($name, $($arg)*));
    ($name:expr) => (tracing::error!($name))
}
pub(crate) use error;

impl From<tracing::span::EnteredSpan> for ExitOnDropSpan {
    fn from(entered_span: tracing::span::EnteredSpan) -> Self {
        Self {
            entered_span: Some(entered_span),
        }
    }
}

impl Drop for ExitOnDropSpan {
    fn drop(&mut self) {
        if let Some(entered_span) = self.entered_span.take() {
            entered_span.exit();
        }
    }
}
