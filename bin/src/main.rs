//! vinstash CLI - Import and query vehicle option data.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "vinstash")]
#[command(about = "Import and query vehicle option data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Database file. Defaults to the platform data directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import vehicles by VIN in the background
    Import {
        /// VINs to import, processed in order
        #[arg(required = true)]
        vins: Vec<String>,

        /// Directory of <VIN>.json fixture files to fetch from
        #[arg(short, long)]
        fixtures: PathBuf,

        /// Checkpoints per VIN
        #[arg(long, default_value = "8")]
        checkpoints: u32,

        /// Delay before each checkpoint, in milliseconds
        #[arg(long, default_value = "250")]
        step_delay_ms: u64,
    },

    /// Import one vehicle from a JSON row file
    ImportRows {
        /// File holding an array of [key, value] pairs
        file: PathBuf,
    },

    /// Search vehicles of a code type by option codes
    Search {
        /// Code type to search (e.g., E90)
        code_type: String,

        /// Option codes every result must have (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Vec<String>,

        /// Option codes no result may have (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Show a stored vehicle
    Show {
        /// VIN to show
        vin: String,
    },

    /// Show the option code names known for a code type
    Options {
        /// Code type (e.g., E90)
        code_type: String,
    },

    /// List stored code types
    CodeTypes,

    /// Show database details
    Info,

    /// Delete vehicles by VIN
    Delete {
        /// VINs to delete
        #[arg(required = true)]
        vins: Vec<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let db = cli.db.as_deref();

    match command {
        Commands::Import {
            vins,
            fixtures,
            checkpoints,
            step_delay_ms,
        } => {
            commands::import::import(db, vins, fixtures, checkpoints, step_delay_ms, cli.quiet)
                .await
        }
        Commands::ImportRows { file } => commands::import_rows::import_rows(db, &file),
        Commands::Search {
            code_type,
            include,
            exclude,
            format,
        } => commands::search::search(db, &code_type, include, exclude, format),
        Commands::Show { vin } => commands::search::show(db, &vin),
        Commands::Options { code_type } => commands::options::show_options(db, &code_type),
        Commands::CodeTypes => commands::options::list_code_types(db),
        Commands::Info => commands::info::show_info(db),
        Commands::Delete { vins, yes } => commands::delete::delete(db, &vins, yes),
    }
}
