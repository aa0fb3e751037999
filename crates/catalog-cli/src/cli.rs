//! CLI argument definitions for the catalog browser.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use catalog_cli::browse::parse_facet_arg;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Browse JSON record catalogs with search, facets and grouping",
    long_about = "Browse a JSON catalog file (an array of records) the way a listing page does.\n\n\
                  Search text is matched against the listing's search fields, facets narrow\n\
                  the results by exact value, and partitioned listings can be grouped."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render one page (or every group) of a catalog.
    Browse(BrowseArgs),

    /// List the values each facet can take.
    Facets(FacetsArgs),

    /// Increment a counter field of one record and persist it.
    Bump(BumpArgs),

    /// List the built-in listing presets.
    Listings,
}

/// Which listing schema to browse with.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SchemaArgs {
    /// Built-in listing preset (see `catalog listings`).
    #[arg(long = "listing", value_name = "PRESET")]
    pub listing: Option<String>,

    /// Listing schema JSON file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Catalog file (JSON array of records).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Search text, committed immediately.
    #[arg(long = "query", short = 'q', value_name = "TEXT")]
    pub query: Option<String>,

    /// Facet constraint; repeat for several facets.
    #[arg(long = "facet", value_name = "FIELD=VALUE", value_parser = parse_facet_arg)]
    pub facets: Vec<(String, String)>,

    /// Group by the partition field (default for partitioned listings).
    #[arg(long = "grouped", conflicts_with = "flat")]
    pub grouped: bool,

    /// Show a flat paginated list even for partitioned listings.
    #[arg(long = "flat")]
    pub flat: bool,

    /// Collapse one partition; repeatable.
    #[arg(long = "collapse", value_name = "KEY")]
    pub collapse: Vec<String>,

    /// Collapse every partition.
    #[arg(long = "collapse-all")]
    pub collapse_all: bool,

    /// Page to show (1-based, flat layout only).
    #[arg(long = "page", value_name = "N")]
    pub page: Option<usize>,

    /// Print the view as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct FacetsArgs {
    /// Catalog file (JSON array of records).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

#[derive(Args)]
pub struct BumpArgs {
    /// Catalog file (JSON array of records).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Record id.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Integer field to increment.
    #[arg(long = "field", default_value = "views")]
    pub field: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
