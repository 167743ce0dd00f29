//! Span and event macros over the optional `tracing` feature.
//!
//! Spans: `chain_apply` (one frame through all four categories),
//! `detect_frame` (one detector pass), `reference_extract` (one-time
//! reference features) and `ransac` (one robust fit).
//!
//! Events: `select_next`, `scene_features`, `match_distances`,
//! `tracker_transition`, `reference_features` and `ransac_done`.
//!
//! Without the feature both macros expand to no-ops.

/// Opens an info-level span; `.entered()` guards it for the enclosing scope.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Records an info-level event with named fields.
///
/// The disabled form still evaluates the field expressions.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in for `tracing::Span` when the feature is off.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
