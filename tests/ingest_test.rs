//! Ingestion end to end against an in-memory sheet source.

use kpi_dashboard::{
    filter_kpis, ingest, summarize_departments, Catalog, FilterSpec, KpiError, SheetSource,
    SourceError, Status,
};
use std::cell::RefCell;

/// Serves fixed text and records which sheet ids were requested.
struct StaticSource {
    body: Result<String, u16>,
    requested: RefCell<Vec<String>>,
}

impl StaticSource {
    fn ok(body: &str) -> Self {
        Self {
            body: Ok(body.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }

    fn status(code: u16) -> Self {
        Self {
            body: Err(code),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl SheetSource for StaticSource {
    fn fetch_csv(&self, sheet_id: &str) -> Result<String, SourceError> {
        self.requested.borrow_mut().push(sheet_id.to_string());
        match &self.body {
            Ok(text) => Ok(text.clone()),
            Err(code) => Err(SourceError::Status {
                status: *code,
                url: format!("memory://{sheet_id}"),
            }),
        }
    }
}

const URL: &str = "https://docs.google.com/spreadsheets/d/1x_Y-z/edit#gid=0";

fn catalog() -> Catalog {
    Catalog {
        departments: vec!["DeptX".into(), "DeptY".into()],
        sections: vec!["Outputs".into()],
        ..Catalog::default()
    }
}

#[test]
fn test_two_row_csv_yields_one_excellent_record() {
    let source = StaticSource::ok("H1,H2,H3,H4,H5,H6\nDeptSec,KPI A,100,150,x,DeptX");
    let (snapshot, report) = ingest(URL, &source, &catalog()).unwrap();

    assert_eq!(source.requested.borrow().as_slice(), ["1x_Y-z"]);
    assert_eq!(report.kept_rows, 1);
    assert_eq!(snapshot.kpis.len(), 1);

    let k = &snapshot.kpis[0];
    assert_eq!(k.id, 1);
    assert_eq!(k.section, "DeptSec");
    assert_eq!(k.kpi_name, "KPI A");
    assert_eq!(k.value_2024, 100.0);
    assert_eq!(k.value_2025, 150.0);
    assert_eq!(k.improvement, 50.0);
    assert!(k.is_complete);
    assert_eq!(k.status, Status::Excellent);
    assert_eq!(k.department, "DeptX");
    assert_eq!(snapshot.departments, vec!["DeptX", "DeptY"]);
    assert_eq!(snapshot.sections, vec!["Outputs"]);
}

#[test]
fn test_ineligible_rows_dropped_and_ids_contiguous() {
    let text = "section,name,2024,2025,note,department\n\
                Outputs,First,10,12,,DeptX\n\
                Outputs,,10,12,,DeptX\n\
                Outputs,Short,10,12\n\
                \n\
                Outputs,Second,abc,12,,DeptY\n\
                Outputs,Third,20,22,,DeptY";
    let (snapshot, report) = ingest(URL, &StaticSource::ok(text), &catalog()).unwrap();

    let names: Vec<&str> = snapshot.kpis.iter().map(|k| k.kpi_name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
    let ids: Vec<usize> = snapshot.kpis.iter().map(|k| k.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(report.total_rows, 6);
    assert_eq!(report.dropped_rows, 3);

    // Non-numeric 2024 coerces to 0, which reads as missing.
    let second = &snapshot.kpis[1];
    assert_eq!(second.value_2024, 0.0);
    assert!(!second.is_complete);
    assert_eq!(second.improvement, 0.0);
    assert_eq!(second.status, Status::NeedsImprovement);
}

#[test]
fn test_zero_baseline_is_incomplete() {
    let text = "h,h,h,h,h,h\nOutputs,Zero base,0,50,,DeptX";
    let (snapshot, _) = ingest(URL, &StaticSource::ok(text), &catalog()).unwrap();
    let k = &snapshot.kpis[0];
    assert!(!k.is_complete);
    assert_eq!(k.improvement, 0.0);
    assert_eq!(k.value_2025, 50.0);
}

#[test]
fn test_exact_ten_percent_is_good() {
    let text = "h,h,h,h,h,h\nOutputs,Ten,100,110,,DeptX";
    let (snapshot, _) = ingest(URL, &StaticSource::ok(text), &catalog()).unwrap();
    assert!((snapshot.kpis[0].improvement - 10.0).abs() < 1e-9);
    assert_eq!(Status::for_kpi(10.0), Status::Good);
    assert_eq!(snapshot.kpis[0].status, Status::Good);
}

#[test]
fn test_unresolvable_url_never_fetches() {
    let source = StaticSource::ok("unused");
    let err = ingest("https://example.com/not-a-sheet", &source, &catalog()).unwrap_err();
    assert!(matches!(err, KpiError::Resolution(_)));
    assert!(source.requested.borrow().is_empty());
}

#[test]
fn test_http_failure_is_source_unavailable() {
    let err = ingest(URL, &StaticSource::status(403), &catalog()).unwrap_err();
    match err {
        KpiError::SourceUnavailable(SourceError::Status { status, .. }) => assert_eq!(status, 403),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_html_body_is_source_unavailable() {
    let source = StaticSource::ok("\n  <!DOCTYPE html><html><title>Sign in</title></html>");
    let err = ingest(URL, &source, &catalog()).unwrap_err();
    assert!(matches!(
        err,
        KpiError::SourceUnavailable(SourceError::Body(_))
    ));
}

#[test]
fn test_filter_and_summaries_over_ingested_sheet() {
    let text = "h,h,h,h,h,h\n\
                Outputs,KPI A Something,100,130,,DeptX\n\
                Outputs,Other,100,90,,DeptX\n\
                Outcomes,Missing,,90,,DeptX";
    let (snapshot, _) = ingest(URL, &StaticSource::ok(text), &catalog()).unwrap();

    let all = filter_kpis(&snapshot.kpis, &FilterSpec::default());
    assert_eq!(all.len(), snapshot.kpis.len());

    let spec = FilterSpec {
        search_term: "kpi a".into(),
        ..FilterSpec::default()
    };
    let found = filter_kpis(&snapshot.kpis, &spec);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kpi_name, "KPI A Something");

    let summaries = summarize_departments(&snapshot);
    assert_eq!(summaries.len(), 2);
    let x = &summaries[0];
    assert_eq!((x.total_kpis, x.complete_kpis), (3, 2));
    assert!((x.avg_improvement - 10.0).abs() < 1e-9);
    assert_eq!(x.status, Status::Good);

    let y = &summaries[1];
    assert_eq!(y.department, "DeptY");
    assert_eq!((y.total_kpis, y.complete_kpis), (0, 0));
    assert_eq!(y.avg_improvement, 0.0);
    assert_eq!(y.status, Status::NeedsImprovement);
}
