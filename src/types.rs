use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// Per-KPI improvement above which a record is rated excellent.
pub const KPI_EXCELLENT_THRESHOLD: f64 = 10.0;
/// Department average above which a department is rated excellent.
pub const DEPARTMENT_EXCELLENT_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Status {
    fn classify(value: f64, excellent_above: f64) -> Self {
        if value > excellent_above {
            Status::Excellent
        } else if value > 0.0 {
            Status::Good
        } else {
            Status::NeedsImprovement
        }
    }

    /// Rating of a single KPI. Strict thresholds: exactly 10 is `Good`, exactly 0 is not.
    pub fn for_kpi(improvement: f64) -> Self {
        Self::classify(improvement, KPI_EXCELLENT_THRESHOLD)
    }

    /// Rating of a department average, on a wider scale than single KPIs.
    pub fn for_department(avg_improvement: f64) -> Self {
        Self::classify(avg_improvement, DEPARTMENT_EXCELLENT_THRESHOLD)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Excellent => "Excellent",
            Status::Good => "Good",
            Status::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(label)
    }
}

/// Direction of change, used for the arrow next to a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(improvement: f64) -> Self {
        if improvement > 0.0 {
            Trend::Up
        } else if improvement < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
        }
    }
}

/// One normalized spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRecord {
    pub id: usize,
    pub section: String,
    pub kpi_name: String,
    pub value_2024: f64,
    pub value_2025: f64,
    pub improvement: f64,
    pub department: String,
    pub is_complete: bool,
    pub status: Status,
}

/// One complete ingestion result. Replaced wholesale on every successful reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSnapshot {
    pub kpis: Vec<KpiRecord>,
    pub departments: Vec<String>,
    pub sections: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// A filter dimension that either passes everything or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse user input, treating `all_label` (and an empty string) as the pass-all sentinel.
    pub fn parse(input: &str, all_label: &str) -> Self {
        let s = input.trim();
        if s.is_empty() || s == all_label || s.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("ALL"),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub department: Selection,
    pub section: Selection,
    pub search_term: String,
    pub show_only_complete: bool,
}

impl FilterSpec {
    /// Drill-down from the department summary: keep the other criteria, narrow the department.
    pub fn with_department(&self, department: &str) -> Self {
        Self {
            department: Selection::Only(department.to_string()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department: String,
    #[serde(rename = "totalKPIs")]
    pub total_kpis: usize,
    #[serde(rename = "completeKPIs")]
    pub complete_kpis: usize,
    pub avg_improvement: f64,
    pub status: Status,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiTableRow {
    #[serde(rename = "Improvement")]
    #[tabled(rename = "Improvement")]
    pub improvement: String,
    #[serde(rename = "2025")]
    #[tabled(rename = "2025")]
    pub value_2025: String,
    #[serde(rename = "2024")]
    #[tabled(rename = "2024")]
    pub value_2024: String,
    #[serde(rename = "Section")]
    #[tabled(rename = "Section")]
    pub section: String,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Indicator")]
    #[tabled(rename = "Indicator")]
    pub kpi_name: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentSummaryRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "TotalKPIs")]
    #[tabled(rename = "TotalKPIs")]
    pub total_kpis: usize,
    #[serde(rename = "CompleteKPIs")]
    #[tabled(rename = "CompleteKPIs")]
    pub complete_kpis: usize,
    #[serde(rename = "AvgImprovement")]
    #[tabled(rename = "AvgImprovement")]
    pub avg_improvement: String,
    #[serde(rename = "Trend")]
    #[tabled(rename = "Trend")]
    pub trend: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}
