mod config;
mod pipe;
mod report;

use config::Config;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use chemshelf_core::{
    Clock, FixedClock, GhsPictogram, Inventory, InventoryQuery, RecordStatus, Status, SystemClock,
};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, ValueEnum};
use colored::control::set_override;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::pipe::PipeModeConfig;
use crate::report::{
    render_stats, render_table, render_values, ExpressionReport, InventoryReport,
};

const LONG_ABOUT: &str = r##"
Chemshelf reads the hand-typed expiry dates of a chemical inventory and tells
you which items have expired.

SUPPORTED EXPIRY FORMATS:
  Years:        2026, 2569 (Buddhist Era, converted by subtracting 543)
  Thai months:  พ.ค.-26, ม.ค. 2568, มกราคม 2568, 5 มิถุนายน 2567
  English:      Mar 2025, sep-25, 3 Oct 2025
  Numeric:      15/06/2024, 9-11-2026, 31.12.2567 (always day-first)
  Month/year:   06/2024, 12-25

  Years and month/year forms are good through the end of that period.
  Anything unreadable is never reported as expired.

EXAMPLES:
  chemshelf 15/06/2024             Check one expiry
  chemshelf 'พ.ค.-26' 2567         Check several
  chemshelf -i data.json           Status report for an inventory file
  chemshelf -i data.json -e        Only the expired records
  chemshelf -i data.json -s acetone --ghs flammable
                                   Search and filter like the dashboard
  chemshelf -i data.json --list locations
                                   Distinct storage locations
  chemshelf --today 2025-01-01 -i data.json
                                   Report as of a given day

PIPED INPUT:
  One expression per line:
    cut -d, -f8 inventory.csv | chemshelf

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting      | CLI flag            | Env var                 | Default
  -------------|---------------------|-------------------------|---------
  no_color     | -C, --no-color      | CHEMSHELF_NO_COLOR      | false
  inventory    | -i, --inventory     | CHEMSHELF_INVENTORY     | (none)
  expired_only | -e, --expired-only  | CHEMSHELF_EXPIRED_ONLY  | false

  Config file location: chemshelf --config-path (override with CHEMSHELF_CONFIG)
  Generate default config: chemshelf --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "chemshelf")]
#[command(version)]
#[command(about = "Interpret free-text expiry dates and report expired chemicals")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Expiry expressions to interpret
    ///
    /// Thai or English month names, Buddhist Era or Gregorian years,
    /// day-first numeric dates. Quote expressions containing spaces.
    #[arg(value_name = "EXPIRY")]
    inputs: Vec<String>,

    /// Output results as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// Inventory JSON file to report on
    #[arg(long, short = 'i', value_name = "FILE")]
    inventory: Option<PathBuf>,

    /// Only show expired records/expressions
    #[arg(long, short = 'e')]
    expired_only: bool,

    /// Only records whose name or ID contains TEXT (any case), or whose CAS contains it
    #[arg(long, short = 's', value_name = "TEXT")]
    search: Option<String>,

    /// Only records stored at this location
    #[arg(long, value_name = "LOCATION")]
    location: Option<String>,

    /// Only records showing this status (Ready, "Not Ready", Expired, Dispose, Donate)
    #[arg(long, value_name = "STATUS")]
    status: Option<String>,

    /// Only records carrying this GHS pictogram (flammable, corrosive, toxic, ...)
    #[arg(long, value_name = "PICTOGRAM", value_parser = parse_pictogram)]
    ghs: Option<GhsPictogram>,

    /// Only records with this expiration note
    #[arg(long, value_name = "NOTE")]
    note: Option<String>,

    /// List the distinct values of an inventory field instead of records
    #[arg(long, value_enum, value_name = "FIELD")]
    list: Option<ListField>,

    /// Evaluate as of this day instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding how an expiry was read.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the config file path and exit
    #[arg(long)]
    config_path: bool,

    /// Create a default config file and exit
    #[arg(long)]
    config_init: bool,
}

/// Inventory fields with a distinct-value listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListField {
    Locations,
    Hazards,
    Notes,
}

/// How an inventory report is narrowed and printed.
struct InventoryOptions {
    json: bool,
    expired_only: bool,
    query: InventoryQuery,
    list: Option<ListField>,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_pictogram(value: &str) -> Result<GhsPictogram, String> {
    GhsPictogram::from_key(&value.to_lowercase()).ok_or_else(|| {
        let keys: Vec<_> = GhsPictogram::ALL.iter().map(|p| p.key()).collect();
        format!("expected one of: {}", keys.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("Error: Cannot determine config directory");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if cli.config_init {
        return match config::init_config() {
            Ok(path) => {
                println!("Created config file: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file and merge with CLI args
    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let no_color = cli.no_color || file_config.no_color();
    if no_color {
        tracing::debug!("no_color = true");
        set_override(false);
    }

    let expired_only = cli.expired_only || file_config.expired_only();
    if expired_only {
        tracing::debug!("expired_only = true");
    }

    let clock: Box<dyn Clock> = match cli.today {
        Some(day) => {
            tracing::debug!("evaluating as of {} (from CLI)", day);
            Box::new(FixedClock::on(day))
        }
        None => Box::new(SystemClock),
    };

    // Explicit expressions take priority over a configured inventory
    let inventory = cli.inventory.clone().or_else(|| {
        if cli.inputs.is_empty() {
            file_config.inventory()
        } else {
            None
        }
    });

    if let Some(path) = inventory {
        tracing::debug!("inventory = {}", path.display());
        let options = InventoryOptions {
            json: cli.json,
            expired_only,
            query: InventoryQuery {
                search: cli.search,
                location: cli.location,
                status: cli.status.map(Status::from),
                ghs: cli.ghs,
                expiration_note: cli.note,
            },
            list: cli.list,
        };
        return run_inventory(&path, clock.as_ref(), &options);
    }

    if cli.list.is_some() {
        eprintln!("Error: --list needs an inventory (-i FILE)");
        return ExitCode::FAILURE;
    }

    if !cli.inputs.is_empty() {
        run_expressions(&cli.inputs, clock.as_ref(), cli.json, expired_only);
        return ExitCode::SUCCESS;
    }

    if !std::io::stdin().is_terminal() {
        let config = PipeModeConfig {
            json: cli.json,
            expired_only,
        };
        return match pipe::run_pipe_mode(clock.as_ref(), &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Nothing to do: show help
    let _ = Cli::command().print_help();
    ExitCode::FAILURE
}

fn run_expressions(inputs: &[String], clock: &dyn Clock, json: bool, expired_only: bool) {
    let reports: Vec<_> = inputs
        .iter()
        .map(|input| ExpressionReport::evaluate(input, clock))
        .filter(|report| !expired_only || report.expired)
        .collect();

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", report.render());
    }
}

fn run_inventory(path: &std::path::Path, clock: &dyn Clock, options: &InventoryOptions) -> ExitCode {
    let inventory = match Inventory::load(path) {
        Ok(inventory) => inventory,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(field) = options.list {
        let values = match field {
            ListField::Locations => inventory.locations(),
            ListField::Hazards => inventory.hazards(),
            ListField::Notes => inventory.expiration_notes(),
        };
        if options.json {
            return print_json(&values);
        }
        print!("{}", render_values(&values));
        return ExitCode::SUCCESS;
    }

    if !options.query.is_empty() {
        tracing::debug!("filter = {:?}", options.query);
    }
    let stats = inventory.stats(clock);
    let mut rows: Vec<RecordStatus> = inventory
        .filter(&options.query, clock)
        .into_iter()
        .map(|record| RecordStatus::of(record, clock))
        .collect();
    if options.expired_only {
        rows.retain(|row| row.status == Status::Expired);
    }

    if options.json {
        return print_json(&InventoryReport {
            records: &rows,
            stats,
        });
    }

    if rows.is_empty() {
        println!("No matching records.");
    } else {
        print!("{}", render_table(&rows));
    }
    println!();
    println!("{}", render_stats(&stats));
    if rows.iter().any(|row| row.is_auto_expired()) {
        println!("* marked Expired because the expiry date has passed");
    }

    ExitCode::SUCCESS
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
