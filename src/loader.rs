use crate::config::Catalog;
use crate::error::{KpiError, Result};
use crate::source::{ensure_csv_body, resolve_sheet_id, SheetSource};
use crate::types::{DatasetSnapshot, KpiRecord, Status};
use crate::util::coerce_number;
use chrono::Utc;
use tracing::{debug, info};

/// Minimum cells a row needs to be considered.
pub const MIN_CELLS: usize = 6;

const COL_SECTION: usize = 0;
const COL_NAME: usize = 1;
const COL_2024: usize = 2;
const COL_2025: usize = 3;
// Column 4 carries nothing we use.
const COL_DEPARTMENT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Data lines after the header, blank ones included.
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
    pub complete_rows: usize,
}

/// Split export text into trimmed cells.
///
/// Deliberately naive: every `,` separates cells and every `"` is removed, so
/// quoted commas and embedded newlines are not supported.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| {
            line.split(',')
                .map(|cell| cell.replace('"', "").trim().to_string())
                .collect()
        })
        .collect()
}

fn is_eligible(row: &[String]) -> bool {
    row.len() >= MIN_CELLS && !row[COL_NAME].is_empty()
}

fn or_label(cell: &str, label: &str) -> String {
    if cell.is_empty() {
        label.to_string()
    } else {
        cell.to_string()
    }
}

/// Improvement in percent; zero unless both readings are non-zero.
pub fn compute_improvement(value_2024: f64, value_2025: f64) -> (f64, bool) {
    if value_2024 != 0.0 && value_2025 != 0.0 {
        (((value_2025 - value_2024) / value_2024) * 100.0, true)
    } else {
        (0.0, false)
    }
}

/// Map one eligible row to a record.
fn to_record(id: usize, row: &[String], catalog: &Catalog) -> KpiRecord {
    let value_2024 = coerce_number(&row[COL_2024]);
    let value_2025 = coerce_number(&row[COL_2025]);
    let (improvement, is_complete) = compute_improvement(value_2024, value_2025);

    let kpi_name = if row[COL_NAME].is_empty() {
        catalog.indicator_name(id)
    } else {
        row[COL_NAME].clone()
    };

    KpiRecord {
        id,
        section: or_label(&row[COL_SECTION], &catalog.unspecified_label),
        kpi_name,
        value_2024,
        value_2025,
        improvement,
        department: or_label(&row[COL_DEPARTMENT], &catalog.unspecified_label),
        is_complete,
        status: Status::for_kpi(improvement),
    }
}

/// Turn parsed rows (header included) into records numbered 1..N.
pub fn normalize_rows(rows: &[Vec<String>], catalog: &Catalog) -> (Vec<KpiRecord>, LoadReport) {
    let data = rows.get(1..).unwrap_or(&[]);
    let mut kpis = Vec::with_capacity(data.len());

    for (line_no, row) in data.iter().enumerate() {
        if !is_eligible(row) {
            debug!(line = line_no + 2, cells = row.len(), "dropping row");
            continue;
        }
        kpis.push(to_record(kpis.len() + 1, row, catalog));
    }

    let report = LoadReport {
        total_rows: data.len(),
        kept_rows: kpis.len(),
        dropped_rows: data.len() - kpis.len(),
        complete_rows: kpis.iter().filter(|k| k.is_complete).count(),
    };
    (kpis, report)
}

/// Build a snapshot from raw export text. Never fails: bad rows are dropped.
pub fn load_from_text(text: &str, catalog: &Catalog) -> (DatasetSnapshot, LoadReport) {
    let rows = parse_rows(text);
    let (kpis, report) = normalize_rows(&rows, catalog);
    let snapshot = DatasetSnapshot {
        kpis,
        departments: catalog.departments.clone(),
        sections: catalog.sections.clone(),
        last_updated: Utc::now(),
    };
    (snapshot, report)
}

/// Resolve `url`, fetch its CSV export and normalize it.
///
/// Errors leave nothing behind; the caller keeps whatever snapshot it had.
pub fn ingest<S: SheetSource + ?Sized>(
    url: &str,
    source: &S,
    catalog: &Catalog,
) -> Result<(DatasetSnapshot, LoadReport)> {
    let sheet_id =
        resolve_sheet_id(url).ok_or_else(|| KpiError::Resolution(url.trim().to_string()))?;
    info!(sheet_id, "loading sheet");

    let text = source.fetch_csv(sheet_id)?;
    ensure_csv_body(&text)?;
    let (snapshot, report) = load_from_text(&text, catalog);
    info!(
        total = report.total_rows,
        kept = report.kept_rows,
        dropped = report.dropped_rows,
        complete = report.complete_rows,
        "sheet normalized"
    );
    Ok((snapshot, report))
}
