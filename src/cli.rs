use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Whether any of the config maintenance flags was given
pub fn is_config_update(args: &Args) -> bool {
    args.new_database_path.is_some()
        || args.new_catalog_path.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Tournament bracket and results manager for martial-arts competitions
///
/// Runs category executions at a competition: elimination brackets with
/// score or win/loss entry, judged categories with five judge scores per
/// athlete, podiums, and the competition medal table with club ranking.
#[derive(Parser, Debug)]
#[command(about, version, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Use this database file instead of the configured one
    #[arg(long = "database", global = true, help_heading = "Storage")]
    pub database: Option<String>,

    /// Use this category catalog instead of the configured one
    #[arg(long = "catalog", global = true, help_heading = "Storage")]
    pub catalog: Option<String>,

    /// Update the database path in config
    #[arg(long = "set-database", help_heading = "Configuration")]
    pub new_database_path: Option<String>,

    /// Update the category catalog path in config
    #[arg(long = "set-catalog", help_heading = "Configuration")]
    pub new_catalog_path: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Only write logs to the log file, keep stdout for command output
    #[arg(long = "quiet", short = 'q', global = true, help_heading = "Debug")]
    pub quiet: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start (or reopen) a category at a competition
    Start {
        category: u64,
        competition: u64,
        /// Extracted letter; drawn at random when omitted
        #[arg(long)]
        letter: Option<String>,
    },
    /// Show an execution: bracket or score sheet, and classification
    Show {
        execution: u64,
        #[arg(long)]
        json: bool,
    },
    /// Put an athlete in a first-round slot
    Assign {
        execution: u64,
        match_id: String,
        slot: usize,
        /// Athlete id; leave out to empty the slot
        athlete: Option<u64>,
    },
    /// Record an athlete's score in a match
    Score {
        execution: u64,
        match_id: String,
        athlete: u64,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Set a match winner directly
    Winner {
        execution: u64,
        match_id: String,
        athlete: u64,
    },
    /// Record one judge's score for an athlete (judges numbered 1 to 5)
    Judge {
        execution: u64,
        athlete: u64,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        judge: u8,
        /// Score as typed, decimal comma accepted; anything else clears the slot
        value: String,
    },
    /// Replace the judging commission (at most 10 names)
    Commission { execution: u64, names: Vec<String> },
    /// Medal table, club ranking and best athlete per bucket
    Results {
        competition: u64,
        #[arg(long)]
        json: bool,
    },
}
