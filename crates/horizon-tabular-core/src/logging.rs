//! Logging facilities for Horizon Tabular.
//!
//! Horizon Tabular uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_tabular_core::selection=debug")
//!     .init();
//! ```

/// Span names used throughout Horizon Tabular for tracing.
pub mod span_names {
    /// Filter + sort recomputation span.
    pub const RECOMPUTE: &str = "horizon_tabular::recompute";
    /// Export span.
    pub const EXPORT: &str = "horizon_tabular::export";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core engine target.
    pub const CORE: &str = "horizon_tabular_core";
    /// Filter engine target.
    pub const FILTER: &str = "horizon_tabular_core::filter";
    /// Sort engine target.
    pub const SORT: &str = "horizon_tabular_core::sort";
    /// Paginator target.
    pub const PAGINATE: &str = "horizon_tabular_core::paginate";
    /// Selection tracker target.
    pub const SELECTION: &str = "horizon_tabular_core::selection";
    /// Table engine target.
    pub const TABLE: &str = "horizon_tabular_core::table";
    /// Signal emission target.
    pub const SIGNAL: &str = "horizon_tabular_core::signal";
    /// Performance spans target.
    pub const PERF: &str = "horizon_tabular::perf";
}

/// Performance tracing span guard.
///
/// Creates a span on construction and exits it when dropped.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("recompute_view");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
