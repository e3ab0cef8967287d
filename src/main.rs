use clap::Parser;
use microloan::application::engine::LoanEngine;
use microloan::application::registry::LoanRegistry;
use microloan::domain::loan::Party;
use microloan::domain::ports::{LedgerBox, LoanStoreBox};
use microloan::infrastructure::in_memory::{InMemoryLedger, InMemoryLoanStore};
use microloan::interfaces::csv::action_reader::ActionReader;
use microloan::interfaces::csv::loan_writer::LoanWriter;
use microloan::interfaces::event_log::EventLog;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input actions CSV file
    input: PathBuf,

    /// Identity of the privileged lender allowed to approve and decline
    #[arg(long, default_value = "owner")]
    owner: String,

    /// Append emitted events as JSON lines to this file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(cli: &Cli) -> Result<LoanStoreBox> {
    use microloan::infrastructure::rocksdb::RocksDbLoanStore;

    if let Some(db_path) = &cli.db_path {
        let store = RocksDbLoanStore::open(db_path).into_diagnostic()?;
        return Ok(Box::new(store));
    }
    Ok(Box::new(InMemoryLoanStore::new()))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(_cli: &Cli) -> Result<LoanStoreBox> {
    Ok(Box::new(InMemoryLoanStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = open_store(&cli)?;
    let registry = LoanRegistry::open(store).await.into_diagnostic()?;
    let ledger: LedgerBox = Box::new(InMemoryLedger::new());
    let engine = LoanEngine::new(Party::new(cli.owner.clone()), registry, ledger);

    let mut event_log = match &cli.events {
        Some(path) => Some(EventLog::new(File::create(path).into_diagnostic()?)),
        None => None,
    };

    // Process actions
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => match engine.submit(action).await {
                Ok(event) => {
                    if let Some(log) = event_log.as_mut() {
                        log.append(&event).into_diagnostic()?;
                    }
                }
                Err(e) => {
                    eprintln!("Error processing action: {}", e);
                }
            },
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    // Output final state
    let loans = engine.into_loans().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = LoanWriter::new(stdout.lock());
    writer.write_loans(loans).into_diagnostic()?;

    Ok(())
}
