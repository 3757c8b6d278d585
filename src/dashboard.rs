//! Caller-side state: the current snapshot, the active filter and view mode.
//!
//! The core never holds this; the shell owns one `Dashboard` and recomputes
//! the derived views from it on demand.

use crate::config::Catalog;
use crate::error::Result;
use crate::loader::{ingest, LoadReport};
use crate::output::{write_csv, write_json};
use crate::query::{filter_kpis, summarize_departments};
use crate::source::SheetSource;
use crate::types::{DatasetSnapshot, DepartmentSummary, FilterSpec, KpiRecord};
use crate::views::{
    kpi_table_rows, render_cards, render_summary, render_table_view, summary_rows, ViewMode,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EMPTY_DATA_NOTICE: &str = "No data loaded. Load a Google Sheets link to see KPIs.";
pub const NO_MATCH_NOTICE: &str = "No KPIs match the current filters.";

#[derive(Debug, Default)]
pub struct Dashboard {
    pub snapshot: Option<DatasetSnapshot>,
    pub filter: FilterSpec,
    pub view: ViewMode,
    /// Last URL that loaded successfully.
    pub sheet_url: Option<String>,
}

impl Dashboard {
    /// Replace the snapshot with a fresh ingestion of `url`.
    ///
    /// On failure the previous snapshot and URL stay as they were.
    pub fn load<S: SheetSource + ?Sized>(
        &mut self,
        url: &str,
        source: &S,
        catalog: &Catalog,
    ) -> Result<LoadReport> {
        match ingest(url, source, catalog) {
            Ok((snapshot, report)) => {
                self.snapshot = Some(snapshot);
                self.sheet_url = Some(url.trim().to_string());
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, kept_previous = self.snapshot.is_some(), "load failed");
                Err(e)
            }
        }
    }

    pub fn has_data(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| !s.kpis.is_empty())
    }

    pub fn filtered(&self) -> Vec<&KpiRecord> {
        match &self.snapshot {
            Some(s) => filter_kpis(&s.kpis, &self.filter),
            None => Vec::new(),
        }
    }

    pub fn summaries(&self) -> Vec<DepartmentSummary> {
        self.snapshot
            .as_ref()
            .map(summarize_departments)
            .unwrap_or_default()
    }

    /// Narrow the filter to one department, as picking a summary row does.
    pub fn drill_down(&mut self, department: &str) {
        self.filter = self.filter.with_department(department);
        self.view = ViewMode::Cards;
    }

    /// Text of the active view, or the matching empty-state notice.
    pub fn render(&self) -> String {
        if !self.has_data() {
            return EMPTY_DATA_NOTICE.to_string();
        }
        if self.view == ViewMode::Summary {
            return render_summary(&self.summaries());
        }
        let kpis = self.filtered();
        if kpis.is_empty() {
            return NO_MATCH_NOTICE.to_string();
        }
        match self.view {
            ViewMode::Table => render_table_view(&kpis),
            _ => render_cards(&kpis),
        }
    }

    /// Write the active view as CSV and the whole snapshot as JSON into `dir`.
    ///
    /// Returns the written paths; nothing is written without a snapshot.
    pub fn export(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(Vec::new());
        };
        std::fs::create_dir_all(dir)?;

        let view_path = match self.view {
            ViewMode::Summary => {
                let path = dir.join("kpi_department_summary.csv");
                write_csv(&path, &summary_rows(&self.summaries()))?;
                path
            }
            ViewMode::Cards | ViewMode::Table => {
                let path = dir.join("kpi_filtered.csv");
                write_csv(&path, &kpi_table_rows(&self.filtered()))?;
                path
            }
        };
        let snapshot_path = dir.join("kpi_snapshot.json");
        write_json(&snapshot_path, snapshot)?;

        info!(view = ?self.view, dir = %dir.display(), "exported");
        Ok(vec![view_path, snapshot_path])
    }
}
