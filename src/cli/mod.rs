//! Command-line front end: reads an analysis request as JSON and prints the
//! report or a colourised digest of it.

pub mod output;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::ConfigLoader,
    core::ReportService,
    currency::LocaleConfig,
    domain::{AnalysisInput, Dimension, FinancialReport, UnknownDimension},
    errors::EngineError,
    utils::build_info,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to read `{path}`: {source}")]
    Read { path: String, source: io::Error },
    #[error("Invalid request in `{path}`: {source}")]
    Request {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Dimension(#[from] UnknownDimension),
}

/// Income statement, indicators and growth analysis over a transaction export.
#[derive(Debug, Parser)]
#[command(name = "dre_core_cli", author, version, about, long_about = None)]
pub struct Cli {
    /// Print build metadata and exit.
    #[arg(long)]
    pub version_info: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full report as JSON.
    Report(ReportArgs),
    /// Print the income statement and headline indicators.
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Analysis request file, or `-` for stdin.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Configuration file overriding the one embedded in the request.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: InputArgs,

    #[arg(long)]
    pub pretty: bool,

    /// Write the report here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: InputArgs,

    #[arg(long, value_enum, default_value_t = LocaleChoice::EnUs)]
    pub locale: LocaleChoice,

    /// Also print the rentability breakdown for this dimension.
    #[arg(long, short)]
    pub dimension: Option<String>,

    /// Disable ANSI colours.
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocaleChoice {
    #[value(name = "en-US")]
    EnUs,
    #[value(name = "pt-BR")]
    PtBr,
}

impl LocaleChoice {
    fn locale(self) -> LocaleConfig {
        match self {
            LocaleChoice::EnUs => LocaleConfig::default(),
            LocaleChoice::PtBr => LocaleConfig::pt_br(),
        }
    }
}

/// Parses the process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    if cli.version_info {
        for line in build_info::current().lines() {
            println!("{line}");
        }
        return Ok(());
    }

    match cli.command {
        Some(Command::Report(args)) => {
            let report = build_report(&args.source)?;
            let json = report.to_json(args.pretty).map_err(EngineError::from)?;
            match args.output {
                Some(path) => fs::write(&path, json + "\n").map_err(EngineError::from)?,
                None => println!("{json}"),
            }
        }
        Some(Command::Summary(args)) => {
            if args.no_color {
                colored::control::set_override(false);
            }
            let dimension = args
                .dimension
                .as_deref()
                .map(str::parse::<Dimension>)
                .transpose()?;
            let report = build_report(&args.source)?;
            output::print_summary(&report, &args.locale.locale(), dimension);
        }
        None => Cli::command().print_help().map_err(EngineError::from)?,
    }
    Ok(())
}

/// Loads the request and resolves its configuration.
///
/// Precedence: `--config`, then the request's own `config`, then the
/// config file in the application directory, then built-in defaults.
pub fn load_request(source: &InputArgs) -> Result<AnalysisInput, CliError> {
    let label = source.input.display().to_string();
    let data = read_source(&source.input).map_err(|err| CliError::Read {
        path: label.clone(),
        source: err,
    })?;
    let mut input: AnalysisInput =
        serde_json::from_str(&data).map_err(|err| CliError::Request {
            path: label,
            source: err,
        })?;

    if let Some(path) = &source.config {
        if !path.exists() {
            return Err(CliError::Read {
                path: path.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
            });
        }
        input.config = Some(ConfigLoader::load(path)?);
    } else if input.config.is_none() {
        input.config = Some(ConfigLoader::load_default()?);
    }
    debug!(transactions = input.transactions.len(), "loaded request");
    Ok(input)
}

fn build_report(source: &InputArgs) -> Result<FinancialReport, CliError> {
    let input = load_request(source)?;
    Ok(ReportService::build(&input)?)
}

fn read_source(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}
