use std::sync::Arc;

use log::debug;
use updater::{HttpSource, Outcome, Updater};

use crate::config::UpdateConfig;
use crate::journal::Journal;
use crate::Result;

pub fn build_updater(config: &UpdateConfig) -> Result<Updater> {
    let source = HttpSource::new(&config.url)?;

    Ok(Updater::new(
        Arc::new(source),
        config.url.clone(),
        config.digest_url.clone(),
        &config.target,
        config.mode,
    ))
}

/// Records the result of an update check. A check that finds nothing new
/// stays out of the journal.
pub fn report(journal: &Journal, result: updater::Result<Outcome>) {
    match result {
        Ok(Outcome::UpToDate) => debug!("no update available"),
        Ok(Outcome::Available { size }) => {
            journal.info(format!("update available ({size} bytes)"))
        }
        Ok(Outcome::Applied { backup: Some(backup) }) => journal.info(format!(
            "update applied, previous version kept as {}, restart the program",
            backup.display()
        )),
        Ok(Outcome::Applied { backup: None }) => {
            journal.info("update applied, restart the program")
        }
        Err(err) => journal.error(format!("update check failed: {err}")),
    }
}
