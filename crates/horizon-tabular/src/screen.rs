//! One list screen: table engine, selection and exports together.

use std::fmt;

use horizon_tabular_core::{Collection, Row, RowId, TableEngine};
use horizon_tabular_export::{ExportArtifact, ExportFormat, ExportPipeline};
use thiserror::Error;

use crate::settings::{ExportSettings, ScreenSettings, SettingsResult};

const TARGET: &str = "horizon_tabular::screen";

/// Result of a bulk action that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Rows the action was applied to, in selection order.
    pub applied: Vec<RowId>,
    /// Selected rows that no longer existed and were skipped.
    pub already_satisfied: Vec<RowId>,
}

/// A bulk action that stopped at a failing row.
///
/// The selection is left untouched so the action can be retried.
#[derive(Error, Debug)]
#[error("bulk action failed on row {id}: {error}")]
pub struct BulkFailure<E> {
    /// The row the action failed on.
    pub id: RowId,
    /// Rows the action succeeded on before the failure.
    pub completed: Vec<RowId>,
    /// The action's error.
    #[source]
    pub error: E,
}

/// A list screen over rows of type `R`.
///
/// # Example
///
/// ```
/// use horizon_tabular::{ExportFormat, ListScreen, Record, ScreenSettings};
///
/// let settings = ScreenSettings::from_toml_str(r#"
///     [table]
///     filter_fields = ["name"]
///     columns = [{ key = "name", label = "Name" }]
///
///     [export]
///     filename = "sites"
/// "#).unwrap();
///
/// let rows = vec![
///     Record::new(1).with_field("name", "North depot"),
///     Record::new(2).with_field("name", "South depot"),
/// ];
/// let mut screen = ListScreen::new(rows, settings).unwrap();
///
/// screen.engine_mut().set_query("north");
/// let artifact = screen.export(ExportFormat::DelimitedText).unwrap();
/// assert_eq!(artifact.filename, "sites.csv");
/// assert_eq!(artifact.bytes, b"Name\nNorth depot\n");
/// ```
pub struct ListScreen<R> {
    engine: TableEngine<R>,
    pipeline: ExportPipeline,
    export: ExportSettings,
}

impl<R: Row> ListScreen<R> {
    /// Creates a screen over `rows`.
    pub fn new(rows: impl Into<Collection<R>>, settings: ScreenSettings) -> SettingsResult<Self> {
        settings.validate()?;
        let pipeline = settings.export.build_pipeline()?;
        let engine = TableEngine::new(rows, settings.table)?;
        Ok(Self {
            engine,
            pipeline,
            export: settings.export,
        })
    }

    /// Returns the table engine.
    pub fn engine(&self) -> &TableEngine<R> {
        &self.engine
    }

    /// Returns the table engine for filtering, sorting, paging and selection.
    pub fn engine_mut(&mut self) -> &mut TableEngine<R> {
        &mut self.engine
    }

    /// Returns the export pipeline.
    pub fn pipeline(&self) -> &ExportPipeline {
        &self.pipeline
    }

    /// Returns the export settings.
    pub fn export_settings(&self) -> &ExportSettings {
        &self.export
    }

    /// Replaces the rows with a fresh fetch.
    ///
    /// Query, sort, page size and columns are kept. Returns the selected
    /// identifiers that were pruned because they no longer exist.
    pub fn refresh(&mut self, rows: impl Into<Collection<R>>) -> Vec<RowId> {
        let pruned = self.engine.replace_collection(rows);
        tracing::debug!(
            target: TARGET,
            rows = self.engine.collection().len(),
            pruned = pruned.len(),
            "screen refreshed"
        );
        pruned
    }

    /// Exports the current filtered and sorted view.
    ///
    /// Returns `None` if the export failed; the failure is reported on the
    /// pipeline's notifications.
    pub fn export(&self, format: ExportFormat) -> Option<ExportArtifact> {
        let snapshot = self.engine.snapshot();
        self.pipeline.run(&snapshot, &self.export.request(format))
    }

    /// Applies `action` to every selected row that still exists.
    ///
    /// Selected rows that disappeared are skipped as already satisfied. When
    /// every call succeeds the selection is cleared. The first failure stops
    /// the batch and leaves the selection as it was.
    pub fn run_bulk<F, E>(&mut self, mut action: F) -> Result<BulkOutcome, BulkFailure<E>>
    where
        F: FnMut(&RowId) -> Result<(), E>,
    {
        let plan = self.engine.bulk_plan();
        let mut applied = Vec::with_capacity(plan.targets.len());

        for id in plan.targets {
            if let Err(error) = action(&id) {
                tracing::warn!(
                    target: TARGET,
                    row = %id,
                    completed = applied.len(),
                    "bulk action failed"
                );
                return Err(BulkFailure {
                    id,
                    completed: applied,
                    error,
                });
            }
            applied.push(id);
        }

        self.engine.clear_selection();
        tracing::debug!(
            target: TARGET,
            applied = applied.len(),
            skipped = plan.already_satisfied.len(),
            "bulk action completed"
        );
        Ok(BulkOutcome {
            applied,
            already_satisfied: plan.already_satisfied,
        })
    }
}

impl<R> fmt::Debug for ListScreen<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListScreen")
            .field("engine", &self.engine)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
