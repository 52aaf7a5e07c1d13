//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the curve dataset
//! - dispatches to the CLI reports or the TUI

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, ListArgs, MetaArgs, ShowArgs, UnitsArgs};
use crate::domain::{FilterSet, ViewConfig};
use crate::error::{AppError, FitError, LoadError};
use crate::io::{IngestedData, load_dataset};
use crate::logging::{LOG_FILE_ENV, LogConfig, init_logging};

pub mod pipeline;

/// Entry point for the `critview` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; it only supplies defaults such as CRITVIEW_DATA.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.subcommand();
    setup_logging(&cli, &command)?;

    match command {
        Command::Tui => crate::tui::run(&cli.data),
        Command::List(args) => handle_list(&cli.data, args),
        Command::Units(args) => handle_units(args),
        Command::Show(args) => handle_show(&cli.data, args),
        Command::Meta(args) => handle_meta(&cli.data, args),
    }
}

/// Load `path`, falling back to an empty dataset on failure.
///
/// The error is returned alongside so the caller can show it and carry on.
pub fn load_or_empty(path: &Path) -> (IngestedData, Option<LoadError>) {
    match load_dataset(path) {
        Ok(data) => (data, None),
        Err(err) => (IngestedData::empty(path), Some(err)),
    }
}

pub fn view_config_from_args(data_path: &Path, args: &ShowArgs) -> ViewConfig {
    ViewConfig {
        data_path: data_path.to_path_buf(),
        resample_count: args.count,
        plot: !(args.no_plot || args.json),
        plot_width: args.width,
        plot_height: args.height,
    }
}

fn setup_logging(cli: &Cli, command: &Command) -> Result<(), AppError> {
    let mut config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if matches!(command, Command::Tui) {
        // The TUI owns the terminal: log to a file or not at all.
        let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
            return Ok(());
        };
        config = config.with_log_file(Some(PathBuf::from(path)));
    }
    init_logging(&config).map_err(|e| AppError::new(2, format!("Failed to initialize logging: {e}")))
}

/// Load for a CLI command, reporting problems on stderr.
fn load_for_cli(path: &Path) -> IngestedData {
    let (data, err) = load_or_empty(path);
    if let Some(err) = err {
        eprintln!("error: {err}");
    } else if !data.report.dropped.is_empty() {
        eprint!(
            "{}",
            crate::report::format_ingest_report(&data.source, &data.report, data.repository.len())
        );
    }
    data
}

fn handle_list(data_path: &Path, args: ListArgs) -> Result<(), AppError> {
    let data = load_for_cli(data_path);
    let filters = FilterSet {
        filters: args.filters,
    };
    let titles = data.repository.filter(&filters);
    print!(
        "{}",
        crate::report::format_curve_list(&titles, data.repository.len(), &filters)
    );
    Ok(())
}

fn handle_units(args: UnitsArgs) -> Result<(), AppError> {
    let info = crate::units::units_for(&args.variable);
    print!("{}", crate::report::format_units(&args.variable, &info));
    Ok(())
}

fn handle_show(data_path: &Path, args: ShowArgs) -> Result<(), AppError> {
    let config = view_config_from_args(data_path, &args);
    let data = load_for_cli(&config.data_path);

    let request = pipeline::ViewRequest {
        title: args.title.clone(),
        x_unit: args.x_unit.clone(),
        y_unit: args.y_unit.clone(),
        resample_count: config.resample_count,
    };
    let mut caches = pipeline::Caches::new();
    let view = pipeline::render_view(&data.repository, &mut caches, &request)?;
    debug!(title = %view.title, points = view.fitted.len(), "rendered view");

    if args.json {
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| AppError::new(4, format!("Failed to serialize view: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_view(&view));
    if config.plot {
        let plot = crate::plot::render_ascii_plot(&view, config.plot_width, config.plot_height);
        println!("{plot}");
    }
    Ok(())
}

fn handle_meta(data_path: &Path, args: MetaArgs) -> Result<(), AppError> {
    let data = load_for_cli(data_path);
    let metadata = data
        .repository
        .metadata_for(&args.title)
        .ok_or_else(|| FitError::UnknownCurve {
            title: args.title.clone(),
        })?;
    print!("{}", crate::report::format_metadata(&args.title, &metadata));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn show_flags_resolve_to_view_config() {
        let cli = Cli::try_parse_from(["critview", "show", "A", "--json", "--width", "60"]).unwrap();
        let Command::Show(args) = cli.subcommand() else {
            panic!("expected show");
        };
        let config = view_config_from_args(Path::new("d.csv"), &args);
        assert!(!config.plot);
        assert_eq!(config.plot_width, 60);
        assert_eq!(config.resample_count, crate::fit::DEFAULT_RESAMPLE_COUNT);
        assert_eq!(config.data_path, PathBuf::from("d.csv"));
    }

    #[test]
    fn missing_file_yields_empty_repository_and_error() {
        let dir = tempfile::tempdir().unwrap();
        let (data, err) = load_or_empty(&dir.path().join("absent.csv"));
        assert!(data.repository.is_empty());
        assert!(matches!(err, Some(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn present_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"title,X_Value,Y_Value,X_Variable,Y_Variable\nA,1,2,Diameter in,critmass kg\n")
            .unwrap();
        let (data, err) = load_or_empty(file.path());
        assert!(err.is_none());
        assert_eq!(data.repository.len(), 1);
    }
}
