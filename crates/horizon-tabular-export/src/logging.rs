//! Log targets for the export pipeline.
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_tabular_export::image=debug")
//!     .init();
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Pipeline boundary target.
    pub const PIPELINE: &str = "horizon_tabular_export::pipeline";
    /// Projection and value normalization target.
    pub const PROJECTION: &str = "horizon_tabular_export::projection";
    /// Delimited text renderer target.
    pub const DELIMITED: &str = "horizon_tabular_export::delimited";
    /// Report layout and PDF target.
    pub const REPORT: &str = "horizon_tabular_export::report";
    /// Header image loading target.
    pub const IMAGE: &str = "horizon_tabular_export::image";
}
