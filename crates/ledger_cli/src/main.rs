//! Command-line front end for the ledger.
//!
//! # Responsibility
//! - Parse arguments (with environment fallbacks) and open the database.
//! - Wire repositories into services and print results as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::db::{open_db, Connection};
use ledger_core::{
    default_log_level, init_logging, AppError, DeleteRecordService, ImportRecordsService,
    RecordId, SqliteCategoryRepository, SqliteRecordRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Personal finance ledger
#[derive(Debug, Parser)]
#[command(name = "ledger", version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "LEDGER_DB", default_value = "ledger.sqlite3", global = true)]
    db: PathBuf,

    /// Directory for rotating log files; logging is off when unset
    #[arg(long, env = "LEDGER_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LEDGER_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import records and categories from a CSV file
    Import {
        /// CSV file with a header line and title,type,value,category columns
        file: PathBuf,
    },
    /// Delete one record by id
    Delete {
        /// Record id (UUID)
        id: RecordId,
    },
    /// Print all records
    List,
    /// Print income, outcome and total
    Balance,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app) => eprintln!("{app}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;

    match cli.command {
        Commands::Import { file } => import(&conn, file),
        Commands::Delete { id } => delete(&conn, id),
        Commands::List => {
            let records = SqliteRecordRepository::new(&conn).list_records()?;
            print_json(&records)
        }
        Commands::Balance => {
            let balance = SqliteRecordRepository::new(&conn).get_balance()?;
            print_json(&balance)
        }
    }
}

fn import(conn: &Connection, file: PathBuf) -> Result<()> {
    let service = ImportRecordsService::new(
        SqliteRecordRepository::new(conn),
        SqliteCategoryRepository::new(conn),
    );
    let records = service.execute(&file).map_err(AppError::from)?;
    print_json(&records)
}

fn delete(conn: &Connection, id: RecordId) -> Result<()> {
    let service = DeleteRecordService::new(SqliteRecordRepository::new(conn));
    service.execute(id).map_err(AppError::from)?;
    println!("{}", serde_json::json!({ "deleted": id }));
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
