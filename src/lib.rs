//! KPI dashboard core: load a public spreadsheet's CSV export, normalize it
//! into typed KPI records, and derive filtered and per-department views.
//!
//! ```text
//! url ─▶ source::resolve_sheet_id ─▶ SheetSource::fetch_csv ─▶ loader ─▶ DatasetSnapshot
//!                                                                    │
//!                                   FilterSpec ─▶ query::filter_kpis ◀┤
//!                                                 query::summarize_departments
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod output;
pub mod query;
pub mod source;
pub mod types;
pub mod util;
pub mod views;

pub use config::{Catalog, Config};
pub use dashboard::Dashboard;
pub use error::{KpiError, Result, SourceError};
pub use loader::{ingest, load_from_text, LoadReport};
pub use query::{filter_kpis, summarize_departments};
pub use source::{resolve_sheet_id, HttpSheetSource, SheetSource};
pub use types::{DatasetSnapshot, DepartmentSummary, FilterSpec, KpiRecord, Selection, Status};
pub use views::ViewMode;
