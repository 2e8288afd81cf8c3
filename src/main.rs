mod config;
mod db;
mod error;
mod form;
mod ledger;
mod logging;
mod models;
mod run;
mod ui;
mod worker;

use anyhow::Result;

use crate::config::Config;
use crate::db::Database;
use crate::worker::Worker;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::load()?;
    logging::init(&config.log_path())?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting");

    let mut db = Database::open(&config.db_path())?;

    match args.len() {
        1 => {
            let mut worker = Worker::spawn(db)?;
            run::as_tui(&mut worker)
        }
        _ => run::as_cli(&args, &mut db),
    }
}
