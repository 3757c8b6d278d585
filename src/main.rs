// Entry point and interactive CLI flow.
//
// - Option [1] loads a Google Sheets link and prints load diagnostics.
// - Options [2]-[5] adjust filters and the view, then print the dashboard.
// - Option [6] exports the current view.
// - `--once` skips the menu: load, print one view, optionally export, exit.
use anyhow::Context;
use clap::Parser;
use kpi_dashboard::{util, Config, Dashboard, HttpSheetSource, KpiError, Selection, ViewMode};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::info;
use tracing_subscriber::EnvFilter;

// One dashboard per run: a failed reload keeps the previous snapshot.
static APP_STATE: Lazy<Mutex<Dashboard>> = Lazy::new(|| Mutex::new(Dashboard::default()));

fn state() -> MutexGuard<'static, Dashboard> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Parser)]
#[command(name = "kpi_dashboard")]
#[command(about = "KPI dashboard over a public Google Sheets CSV export", long_about = None)]
struct Cli {
    /// Sheet URL to load at startup (overrides KPI_SHEET_URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Initial view
    #[arg(short, long, value_enum, default_value_t = ViewMode::Cards)]
    view: ViewMode,

    /// Directory for exported views (overrides KPI_EXPORT_DIR)
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Load, print the view and exit without the menu
    #[arg(long)]
    once: bool,
}

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

fn prompt_yes_no(label: &str) -> bool {
    loop {
        match prompt(&format!("{label} (Y/N): ")).to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: fetch and normalize a sheet.
///
/// Errors are printed inline; the dashboard keeps whatever it showed before.
fn handle_load(url: &str, config: &Config, source: &HttpSheetSource) {
    if url.is_empty() {
        println!("Error: no sheet URL given.\n");
        return;
    }
    println!("Loading...");
    let mut dash = state();
    match dash.load(url, source, &config.catalog) {
        Ok(report) => {
            println!(
                "Processing sheet... ({} rows read, {} KPIs kept, {} complete)",
                util::format_int(report.total_rows as u64),
                util::format_int(report.kept_rows as u64),
                util::format_int(report.complete_rows as u64)
            );
            if report.dropped_rows > 0 {
                println!(
                    "Note: {} rows skipped (fewer than 6 columns or no KPI name).",
                    util::format_int(report.dropped_rows as u64)
                );
            }
            if let Some(snapshot) = &dash.snapshot {
                println!(
                    "Last updated: {}\n",
                    snapshot.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
        Err(KpiError::Resolution(_)) => {
            println!("Error: that is not a valid Google Sheets link.\n");
        }
        Err(e) => {
            eprintln!("Error: {}\n", e);
        }
    }
}

fn handle_filters(config: &Config) {
    let catalog = &config.catalog;
    let mut dash = state();
    println!("Departments: {}", catalog.departments.join(", "));
    let dept = prompt(&format!("Department [{}]: ", dash.filter.department));
    if !dept.is_empty() {
        dash.filter.department = Selection::parse(&dept, &catalog.all_label);
    }
    println!("Sections: {}", catalog.sections.join(", "));
    let section = prompt(&format!("Section [{}]: ", dash.filter.section));
    if !section.is_empty() {
        dash.filter.section = Selection::parse(&section, &catalog.all_label);
    }
    // A single "-" clears the search term.
    let term = prompt(&format!("Search [{}]: ", dash.filter.search_term));
    if term == "-" {
        dash.filter.search_term.clear();
    } else if !term.is_empty() {
        dash.filter.search_term = term;
    }
    dash.filter.show_only_complete = prompt_yes_no("Only complete data");
    println!("");
}

fn handle_view() {
    println!("[1] Department Summary");
    println!("[2] KPI Cards");
    println!("[3] KPI Table");
    let view = match read_choice().as_str() {
        "1" => ViewMode::Summary,
        "2" => ViewMode::Cards,
        "3" => ViewMode::Table,
        _ => {
            println!("Invalid choice. Please enter 1, 2 or 3.\n");
            return;
        }
    };
    state().view = view;
    println!("");
}

fn handle_drill_down() {
    let summaries = state().summaries();
    if summaries.is_empty() {
        println!("Error: No data loaded. Please load a sheet first (option 1).\n");
        return;
    }
    for (idx, s) in summaries.iter().enumerate() {
        println!("[{}] {} ({} KPIs)", idx + 1, s.department, s.total_kpis);
    }
    let picked = read_choice()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| summaries.get(i));
    match picked {
        Some(s) => {
            state().drill_down(&s.department);
            println!("");
            print_dashboard();
        }
        None => println!("Invalid choice.\n"),
    }
}

fn handle_export(dir: &std::path::Path) {
    match state().export(dir) {
        Ok(paths) if paths.is_empty() => {
            println!("Error: No data loaded. Please load a sheet first (option 1).\n")
        }
        Ok(paths) => {
            for p in paths {
                println!("Exported {}", p.display());
            }
            println!("");
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn print_dashboard() {
    let dash = state();
    let shown = dash.filtered().len();
    println!("{}", dash.view.title());
    if dash.has_data() {
        println!("({} KPIs match the current filters)\n", util::format_int(shown as u64));
    }
    println!("{}\n", dash.render());
}

// RUST_LOG wins when set and valid; otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(url) = cli.url {
        config.sheet_url = Some(url);
    }
    if let Some(dir) = cli.export_dir.clone() {
        config.export_dir = dir;
    }
    info!(host = %config.export_host, timeout = ?config.http_timeout, "configuration loaded");

    let source = HttpSheetSource::from_config(&config).context("failed to build HTTP client")?;
    state().view = cli.view;

    if cli.once {
        let url = config
            .sheet_url
            .clone()
            .context("--once needs --url or KPI_SHEET_URL")?;
        state()
            .load(&url, &source, &config.catalog)
            .with_context(|| format!("failed to load {url}"))?;
        print_dashboard();
        if cli.export_dir.is_some() {
            handle_export(&config.export_dir);
        }
        return Ok(());
    }

    if let Some(url) = config.sheet_url.clone() {
        handle_load(&url, &config, &source);
    }

    loop {
        println!("KPI Dashboard:");
        println!("[1] Load Google Sheet");
        println!("[2] Set filters");
        println!("[3] Choose view");
        println!("[4] Show dashboard");
        println!("[5] Drill into department");
        println!("[6] Export current view");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => {
                let current = state().sheet_url.clone().or_else(|| config.sheet_url.clone());
                let label = match &current {
                    Some(u) => format!("Sheet URL [{u}]: "),
                    None => "Sheet URL: ".to_string(),
                };
                let input = prompt(&label);
                let url = if input.is_empty() {
                    current.unwrap_or_default()
                } else {
                    input
                };
                handle_load(&url, &config, &source);
            }
            "2" => {
                handle_filters(&config);
                print_dashboard();
            }
            "3" => {
                handle_view();
                print_dashboard();
            }
            "4" => print_dashboard(),
            "5" => handle_drill_down(),
            "6" => handle_export(&config.export_dir),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
    Ok(())
}
