//! Binary entry point: resolve the data directory, start file logging, open
//! the SQLite store, hydrate the gradebook and hand control to the TUI.
use student_records_manager::{logging, run_app, App, Config, Gradebook, SqliteStore};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_path())?;
    info!(data_dir = %config.data_dir().display(), "starting student records manager");

    let store = SqliteStore::open(&config.db_path())?;
    let (gradebook, outcome) = Gradebook::open(Box::new(store));

    let mut app = App::new(gradebook, &outcome);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!("terminal session failed: {err:#}");
    }
    info!("exiting");
    result
}
