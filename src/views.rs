//! The three presentations of a snapshot: department summary, KPI cards and
//! the KPI table. Everything here renders to `String` so the shell decides
//! where it goes.

use crate::output::render_table;
use crate::types::{
    DepartmentSummary, DepartmentSummaryRow, KpiRecord, KpiTableRow, Trend,
    KPI_EXCELLENT_THRESHOLD,
};
use crate::util::{format_percentage, format_value};
use clap::ValueEnum;
use std::fmt::Write;

/// Shown in numeric cells of incomplete records.
pub const MISSING_VALUE: &str = "-";
pub const INCOMPLETE_NOTICE: &str = "⚠ incomplete data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewMode {
    Summary,
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Summary => "Department Summary",
            ViewMode::Cards => "KPI Cards",
            ViewMode::Table => "KPI Table",
        }
    }
}

/// Colour band of an improvement figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Strong,
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn of(improvement: f64) -> Self {
        if improvement > KPI_EXCELLENT_THRESHOLD {
            Tone::Strong
        } else if improvement > 0.0 {
            Tone::Positive
        } else if improvement < 0.0 {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Strong => "strong gain",
            Tone::Positive => "gain",
            Tone::Negative => "decline",
            Tone::Neutral => "no change",
        }
    }
}

fn signed_with_trend(improvement: f64) -> String {
    format!(
        "{} {}",
        Trend::of(improvement).arrow(),
        format_percentage(improvement)
    )
}

pub fn kpi_table_rows(kpis: &[&KpiRecord]) -> Vec<KpiTableRow> {
    kpis.iter()
        .map(|k| {
            let (improvement, v2025, v2024) = if k.is_complete {
                (
                    signed_with_trend(k.improvement),
                    format_value(k.value_2025),
                    format_value(k.value_2024),
                )
            } else {
                (
                    MISSING_VALUE.to_string(),
                    MISSING_VALUE.to_string(),
                    MISSING_VALUE.to_string(),
                )
            };
            KpiTableRow {
                improvement,
                value_2025: v2025,
                value_2024: v2024,
                section: k.section.clone(),
                department: k.department.clone(),
                kpi_name: k.kpi_name.clone(),
            }
        })
        .collect()
}

pub fn summary_rows(summaries: &[DepartmentSummary]) -> Vec<DepartmentSummaryRow> {
    summaries
        .iter()
        .map(|s| DepartmentSummaryRow {
            department: s.department.clone(),
            total_kpis: s.total_kpis,
            complete_kpis: s.complete_kpis,
            avg_improvement: format_percentage(s.avg_improvement),
            trend: Trend::of(s.avg_improvement).arrow().to_string(),
            status: s.status.to_string(),
        })
        .collect()
}

pub fn render_summary(summaries: &[DepartmentSummary]) -> String {
    render_table(&summary_rows(summaries))
}

pub fn render_table_view(kpis: &[&KpiRecord]) -> String {
    render_table(&kpi_table_rows(kpis))
}

/// One text block per KPI. Incomplete records show a notice instead of numbers.
pub fn render_cards(kpis: &[&KpiRecord]) -> String {
    let mut out = String::new();
    for k in kpis {
        let _ = writeln!(out, "┌ #{} {}", k.id, k.kpi_name);
        let _ = writeln!(out, "│ [{}] [{}]", k.department, k.section);
        if k.is_complete {
            let _ = writeln!(
                out,
                "│ 2025: {}   2024: {}",
                format_value(k.value_2025),
                format_value(k.value_2024)
            );
            let _ = writeln!(
                out,
                "│ {}  {} ({})",
                signed_with_trend(k.improvement),
                Tone::of(k.improvement).label(),
                k.status
            );
        } else {
            let _ = writeln!(out, "│ {}", INCOMPLETE_NOTICE);
        }
        out.push_str("└\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn record(is_complete: bool) -> KpiRecord {
        KpiRecord {
            id: 7,
            section: "Outputs".into(),
            kpi_name: "Visitors".into(),
            value_2024: if is_complete { 1000.0 } else { 0.0 },
            value_2025: 1500.0,
            improvement: if is_complete { 50.0 } else { 0.0 },
            department: "Media".into(),
            is_complete,
            status: if is_complete {
                Status::Excellent
            } else {
                Status::NeedsImprovement
            },
        }
    }

    #[test]
    fn test_tone_bands() {
        assert_eq!(Tone::of(10.5), Tone::Strong);
        assert_eq!(Tone::of(10.0), Tone::Positive);
        assert_eq!(Tone::of(-0.1), Tone::Negative);
        assert_eq!(Tone::of(0.0), Tone::Neutral);
    }

    #[test]
    fn test_table_rows_hide_incomplete_numbers() {
        let complete = record(true);
        let incomplete = record(false);
        let rows = kpi_table_rows(&[&complete, &incomplete]);
        assert_eq!(rows[0].improvement, "↑ +50.0%");
        assert_eq!(rows[0].value_2025, "1,500");
        assert_eq!(rows[0].value_2024, "1,000");
        assert_eq!(rows[1].improvement, MISSING_VALUE);
        assert_eq!(rows[1].value_2025, MISSING_VALUE);
        assert_eq!(rows[1].value_2024, MISSING_VALUE);
        assert_eq!(rows[1].kpi_name, "Visitors");
    }

    #[test]
    fn test_cards() {
        let complete = record(true);
        let incomplete = record(false);
        let text = render_cards(&[&complete]);
        assert!(text.contains("#7 Visitors"));
        assert!(text.contains("+50.0%"));
        assert!(text.contains("strong gain (Excellent)"));

        let text = render_cards(&[&incomplete]);
        assert!(text.contains(INCOMPLETE_NOTICE));
        assert!(!text.contains("1,500"));
    }

    #[test]
    fn test_summary_rows() {
        let rows = summary_rows(&[DepartmentSummary {
            department: "Media".into(),
            total_kpis: 0,
            complete_kpis: 0,
            avg_improvement: 0.0,
            status: Status::NeedsImprovement,
        }]);
        assert_eq!(rows[0].avg_improvement, "0.0%");
        assert_eq!(rows[0].trend, "→");
        assert_eq!(rows[0].status, "Needs Improvement");
    }
}
