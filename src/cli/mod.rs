//! Command-line parsing for the critical-mass curve viewer.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! command dispatch and from the fitting/units code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AttributeFilter, DEFAULT_DATA_FILE};
use crate::fit::DEFAULT_RESAMPLE_COUNT;
use crate::logging::LogFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "critview", version, about = "Critical-mass curve viewer")]
pub struct Cli {
    /// Curve dataset (CSV).
    #[arg(long, global = true, env = "CRITVIEW_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Defaults to `tui` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn subcommand(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}

/// CLI subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (default).
    Tui,
    /// List curve titles, optionally narrowed by attribute filters.
    List(ListArgs),
    /// Show the unit category and selectable units of an axis variable.
    Units(UnitsArgs),
    /// Fit one curve and print its points (and an ASCII plot).
    Show(ShowArgs),
    /// Print the metadata attributes of one curve.
    Meta(MetaArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Attribute filter `ATTRIBUTE=VALUE` (repeatable; `All` matches anything).
    #[arg(long = "filter", short = 'f', value_name = "ATTRIBUTE=VALUE", value_parser = AttributeFilter::parse)]
    pub filters: Vec<AttributeFilter>,
}

#[derive(Debug, Args, Clone)]
pub struct UnitsArgs {
    /// Variable name as it appears in `X_Variable` / `Y_Variable` (e.g. "Diameter in").
    pub variable: String,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Curve title.
    pub title: String,

    /// Display unit for the X axis (name or symbol; default: stored unit).
    #[arg(long)]
    pub x_unit: Option<String>,

    /// Display unit for the Y axis (name or symbol; default: stored unit).
    #[arg(long)]
    pub y_unit: Option<String>,

    /// Number of points sampled along the fitted curve.
    #[arg(long, default_value_t = DEFAULT_RESAMPLE_COUNT)]
    pub count: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Print the view as JSON instead of tables.
    #[arg(long, conflicts_with = "no_plot")]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct MetaArgs {
    /// Curve title.
    pub title: String,
}
