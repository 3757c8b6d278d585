//! Spreadsheet reference resolution and CSV retrieval.
//!
//! The export endpoint is an external collaborator behind [`SheetSource`], so
//! the loader can run against in-memory text in tests.

use crate::config::Config;
use crate::error::SourceError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

static SHEET_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("sheet id pattern is valid")
});

/// Extract the spreadsheet identifier from a sharing URL.
///
/// `None` means the input is not a spreadsheet link; callers report it as a
/// validation problem.
pub fn resolve_sheet_id(url: &str) -> Option<&str> {
    SHEET_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// CSV export address of the first tab of a sheet.
pub fn export_url(host: &str, sheet_id: &str) -> String {
    format!(
        "{}/spreadsheets/d/{}/export?format=csv&gid=0",
        host.trim_end_matches('/'),
        sheet_id
    )
}

/// Reject bodies that are clearly not a CSV export.
///
/// A sheet that is not shared publicly answers 200 with a sign-in page, which
/// would otherwise normalize into an empty dataset.
pub fn ensure_csv_body(text: &str) -> Result<(), SourceError> {
    if text.trim_start().starts_with('<') {
        return Err(SourceError::Body(
            "got an HTML page instead of CSV; is the sheet shared publicly?".to_string(),
        ));
    }
    Ok(())
}

/// Anything that can hand back the raw CSV text of a sheet.
pub trait SheetSource {
    fn fetch_csv(&self, sheet_id: &str) -> Result<String, SourceError>;
}

/// Blocking HTTP retrieval against the public export endpoint.
///
/// One request per call, no retry.
pub struct HttpSheetSource {
    client: reqwest::blocking::Client,
    host: String,
}

impl HttpSheetSource {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;
        Ok(Self {
            client,
            host: host.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(config.export_host.clone(), config.http_timeout)
    }
}

impl SheetSource for HttpSheetSource {
    fn fetch_csv(&self, sheet_id: &str) -> Result<String, SourceError> {
        let url = export_url(&self.host, sheet_id);
        debug!(%url, "requesting CSV export");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status();
        info!(sheet_id, status = status.as_u16(), "export responded");
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"));
        if is_html {
            return Err(SourceError::Body(format!("{url} returned text/html, not CSV")));
        }

        let text = response
            .text()
            .map_err(|e| SourceError::Body(e.to_string()))?;
        ensure_csv_body(&text)?;
        Ok(text)
    }
}
