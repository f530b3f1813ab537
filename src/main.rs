use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rehydrate::application::registrar::ReducerRegistrar;
use rehydrate::application::store::ReduxStore;
use rehydrate::domain::ports::{KeyValueStorageBox, PersistedStateStore};
use rehydrate::domain::reducer::ReducerDescriptor;
use rehydrate::infrastructure::in_memory::InMemoryStorage;
use rehydrate::infrastructure::local_storage::{
    DEFAULT_MAX_AGE_DAYS, LocalStorage, LocalStorageConfig, MAX_AGE_DAYS_LIMIT,
};
#[cfg(feature = "storage-rocksdb")]
use rehydrate::infrastructure::rocksdb::RocksDBStorage;
use rehydrate::interfaces::json::seed_reader::SeedReader;
use serde_json::{Value, json};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Namespace persisted state for this user
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Ignore persisted state older than this many days
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_AGE_DAYS,
        value_parser = clap::value_parser!(i64).range(0..=MAX_AGE_DAYS_LIMIT)
    )]
    max_age_days: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Persist every entry of a JSON seed file
    Seed { file: PathBuf },
    /// Print the state persisted under a storage key
    Show { storage_key: String },
    /// Register a pass-through reducer, rehydrate it and print the store state
    Register {
        key: String,
        /// Storage key the reducer is persisted under
        #[arg(long)]
        storage_key: Option<String>,
        /// Seed file persisted before registering
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

fn open_storage(db_path: Option<PathBuf>) -> Result<KeyValueStorageBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBStorage::open(path).into_diagnostic()?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryStorage::new()))
        }
        None => Ok(Box::new(InMemoryStorage::new())),
    }
}

async fn seed_from(persistence: &dyn PersistedStateStore, path: &Path) -> Result<usize> {
    let file = File::open(path).into_diagnostic()?;
    let seeds = SeedReader::new(file).seeds().into_diagnostic()?;
    let count = seeds.len();
    for (storage_key, state) in seeds {
        persistence
            .persist_state(&storage_key, state)
            .await
            .into_diagnostic()?;
    }
    Ok(count)
}

fn print_json(value: &Value) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = LocalStorageConfig {
        user_id: cli.user_id,
        max_age: chrono::Duration::days(cli.max_age_days),
    };
    let persistence = Arc::new(LocalStorage::with_config(open_storage(cli.db_path)?, config));

    match cli.command {
        Command::Seed { file } => {
            let count = seed_from(persistence.as_ref(), &file).await?;
            eprintln!("Persisted {} entries", count);
        }
        Command::Show { storage_key } => {
            let passthrough =
                ReducerDescriptor::new(|state, _action| state.cloned().unwrap_or(Value::Null));
            let state = persistence
                .get_persisted_state(&passthrough, &storage_key)
                .await
                .into_diagnostic()?;
            print_json(&state.unwrap_or(Value::Null))?;
        }
        Command::Register {
            key,
            storage_key,
            seed,
        } => {
            if let Some(seed) = seed {
                seed_from(persistence.as_ref(), &seed).await?;
            }

            let mut reducer = ReducerDescriptor::new(|state, _action| {
                state.cloned().unwrap_or_else(|| json!({}))
            });
            if let Some(storage_key) = storage_key {
                reducer = reducer.with_storage_key(storage_key);
            }

            let store = ReduxStore::new();
            let registrar = ReducerRegistrar::new(Arc::new(store.clone()), persistence);
            let outcome = registrar
                .register_and_wait(&key, reducer)
                .await
                .into_diagnostic()?;

            eprintln!("Rehydration: {:?}", outcome);
            print_json(&store.state())?;
        }
    }

    Ok(())
}
