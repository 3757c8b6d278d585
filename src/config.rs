use crate::error::{KpiError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_EXPORT_HOST: &str = "https://docs.google.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fixed category enumerations and the labels used for blank cells.
///
/// The lists are independent of the ingested data: a department with no rows
/// still gets a summary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub departments: Vec<String>,
    pub sections: Vec<String>,
    /// Label the filter prompt accepts as "no restriction".
    pub all_label: String,
    /// Stand-in for a blank section or department cell.
    pub unspecified_label: String,
    /// Prefix for generated names, rendered as `"{prefix} {id}"`.
    pub indicator_prefix: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            departments: ["الإعلام", "التسويق", "السمعة", "التشريفات", "الاتصال"]
                .map(String::from)
                .to_vec(),
            sections: ["الأنشطة", "المخرجات", "النتائج", "الأثر"]
                .map(String::from)
                .to_vec(),
            all_label: "الكل".to_string(),
            unspecified_label: "غير محدد".to_string(),
            indicator_prefix: "مؤشر".to_string(),
        }
    }
}

impl Catalog {
    pub fn indicator_name(&self, id: usize) -> String {
        format!("{} {}", self.indicator_prefix, id)
    }
}

/// Runtime configuration, read from environment variables.
///
/// Every variable is optional; malformed values are rejected rather than
/// silently replaced by defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sheet offered by the shell when the user just presses enter (`KPI_SHEET_URL`).
    pub sheet_url: Option<String>,
    /// Base of the export endpoint (`KPI_EXPORT_HOST`).
    pub export_host: String,
    /// Timeout handed to the HTTP client (`KPI_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,
    /// Where exported views land (`KPI_EXPORT_DIR`).
    pub export_dir: PathBuf,
    /// Departments and sections, overridable with `KPI_DEPARTMENTS` / `KPI_SECTIONS`.
    pub catalog: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            export_host: DEFAULT_EXPORT_HOST.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            export_dir: PathBuf::from("."),
            catalog: Catalog::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        cfg.sheet_url = get("KPI_SHEET_URL");

        if let Some(host) = get("KPI_EXPORT_HOST") {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return Err(KpiError::Config(format!(
                    "KPI_EXPORT_HOST must start with http:// or https://, got {host}"
                )));
            }
            cfg.export_host = host.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("KPI_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                KpiError::Config(format!("KPI_HTTP_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            if secs == 0 {
                return Err(KpiError::Config(
                    "KPI_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            cfg.http_timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = get("KPI_EXPORT_DIR") {
            cfg.export_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("KPI_DEPARTMENTS") {
            cfg.catalog.departments = parse_list("KPI_DEPARTMENTS", &raw)?;
        }
        if let Some(raw) = lookup("KPI_SECTIONS") {
            cfg.catalog.sections = parse_list("KPI_SECTIONS", &raw)?;
        }

        Ok(cfg)
    }
}

fn parse_list(key: &str, raw: &str) -> Result<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return Err(KpiError::Config(format!("{key} must list at least one entry")));
    }
    Ok(items)
}
