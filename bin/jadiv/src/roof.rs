use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use exec::{Invocation, Output, Runner};
use log::info;

use crate::{Error, Result};

/// The roof motor script. The script owns all motion safety logic; this side
/// only makes sure two runs never overlap.
pub struct Roof {
    dir: PathBuf,
    script: String,
    runner: Arc<dyn Runner>,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Roof {
    pub fn new(dir: impl Into<PathBuf>, script: impl Into<String>, runner: Arc<dyn Runner>) -> Self {
        Self {
            dir: dir.into(),
            script: script.into(),
            runner,
            busy: AtomicBool::new(false),
        }
    }

    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.script).current_dir(&self.dir)
    }

    pub async fn run(&self) -> Result<Output> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(Error::RoofBusy);
        }
        let _guard = BusyGuard(&self.busy);

        let invocation = self.invocation();
        info!("starting roof script: {invocation}");

        let output = self.runner.run(&invocation).await?.check(&invocation)?;

        Ok(output)
    }
}
