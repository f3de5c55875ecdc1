use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::{
    handle_expense_command, handle_export_command, handle_import_command, handle_income_command,
    handle_report_command, ExpenseCommands, ExportCommands, ImportCommands, IncomeCommands,
    ReportCommands,
};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::display::format_audit_log;
use expense_tracker::storage::{Storage, WIPE_CONFIRMATION};

#[derive(Parser)]
#[command(
    name = "expenses",
    author = "Kaylee Beyene",
    version,
    about = "Household expense tracker",
    long_about = "Record household expenses and monthly income, see where the money \
                  went each month, spot spending spikes, and move data in and out \
                  as CSV, JSON or XLSX."
)]
struct Cli {
    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Monthly income commands
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Month and trend reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data as CSV, JSON or XLSX
    #[command(subcommand)]
    Export(ExportCommands),

    /// Import expenses from CSV or restore a JSON backup
    #[command(subcommand)]
    Import(ImportCommands),

    /// Show the audit trail
    Audit {
        /// Number of most recent entries
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Delete all expenses and income months
    Wipe {
        /// Must be exactly "DELETE ALL"
        #[arg(long)]
        confirm: String,
    },
}

/// Initializes the tracing subscriber
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "expense_tracker={},{}={}",
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    debug!(base = %paths.base_dir().display(), "resolved paths");

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, &paths, cmd)?,
        Some(Commands::Import(cmd)) => {
            handle_import_command(&storage, &mut settings, &paths, cmd)?
        }
        Some(Commands::Audit { count }) => {
            let entries = storage.audit().read_recent(count)?;
            print!("{}", format_audit_log(&entries));
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Run 'expenses add 12.50 --category Lunch' to record an expense.");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", settings.resolve_export_dir(&paths).display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:          {}", settings.currency_symbol);
            println!(
                "  Spike thresholds:  {} months, +{}%, +{}",
                settings.anomaly.trailing_months,
                settings.anomaly.min_increase_pct,
                expense_tracker::models::Money::from_cents(settings.anomaly.min_increase_cents)
                    .format_with_symbol(&settings.currency_symbol)
            );
            println!(
                "  Trend:             {} months, {}-month average",
                settings.trend_months, settings.trend_window
            );
            println!(
                "  Share command:     {}",
                settings.share_command.as_deref().unwrap_or("(none, files are saved)")
            );
        }
        Some(Commands::Wipe { confirm }) => {
            let (expenses, incomes) = storage.wipe(&confirm)?;
            println!(
                "Deleted {} expenses and {} income months.",
                expenses, incomes
            );
        }
        None => {
            println!("Expense Tracker - household expenses and monthly income");
            println!();
            println!("Run 'expenses --help' for usage information.");
            println!("Wipe requires --confirm \"{}\".", WIPE_CONFIRMATION);
        }
    }

    Ok(())
}
