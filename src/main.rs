use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;

use opsdeck::config::Config;
use opsdeck::error::AppResult;
use opsdeck::nav::{FileBackend, MemoryBackend, PersistenceStore, StorageBackend, default_state_path};

#[derive(Parser, Debug)]
#[command(name = "opsdeck", about = "Terminal operations console")]
struct Cli {
    /// Config file to load instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// State file for the persisted navigation snapshot.
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Forget the persisted navigation snapshot before starting.
    #[arg(long)]
    reset: bool,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let state_path = cli
        .state
        .or_else(|| config.storage.path.clone())
        .or_else(default_state_path);
    let backend: Rc<dyn StorageBackend> = match state_path {
        Some(path) => {
            log::debug!("persisting navigation state to {}", path.display());
            Rc::new(FileBackend::new(path))
        }
        // No resolvable location: the session runs in-memory only.
        None => Rc::new(MemoryBackend::new()),
    };
    let store = PersistenceStore::new(backend);
    if cli.reset {
        store.clear();
    }

    opsdeck::console::run(config, store)
}
