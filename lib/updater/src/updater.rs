use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::{fs, time};

use crate::digest::{parse_digest, sha256_hex};
use crate::{Error, Mode, Result, Source};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    Available { size: usize },
    Applied { backup: Option<PathBuf> },
}

/// Keeps a local file in sync with a remote copy.
pub struct Updater {
    source: Arc<dyn Source>,
    url: String,
    digest_url: Option<String>,
    target: PathBuf,
    mode: Mode,
}

impl Updater {
    /// `Mode::Apply` without a digest url falls back to `Mode::Notify`,
    /// an unverified download never replaces the local file.
    pub fn new(
        source: Arc<dyn Source>,
        url: impl Into<String>,
        digest_url: Option<String>,
        target: impl Into<PathBuf>,
        mode: Mode,
    ) -> Self {
        let mode = match (mode, &digest_url) {
            (Mode::Apply, None) => Mode::Notify,
            (mode, _) => mode,
        };

        Self {
            source,
            url: url.into(),
            digest_url,
            target: target.into(),
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Downloads the remote copy and returns it if it differs from the local
    /// file byte for byte. A missing local file always differs.
    pub async fn check(&self) -> Result<Option<Vec<u8>>> {
        let remote = self.source.fetch(&self.url).await?;
        if remote.is_empty() {
            return Err(Error::EmptyDownload(self.url.clone()));
        }

        let local = match fs::read(&self.target).await {
            Ok(local) => Some(local),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(Error::Io(self.target.clone(), err)),
        };

        if local.as_deref() == Some(remote.as_slice()) {
            debug!("{} is up to date", self.target.display());
            Ok(None)
        } else {
            Ok(Some(remote))
        }
    }

    pub async fn run_once(&self) -> Result<Outcome> {
        let remote = match self.check().await? {
            Some(remote) => remote,
            None => return Ok(Outcome::UpToDate),
        };

        match (self.mode, &self.digest_url) {
            (Mode::Apply, Some(digest_url)) => {
                let expected = parse_digest(&self.source.fetch(digest_url).await?)?;
                let backup = self.apply(&remote, &expected).await?;

                Ok(Outcome::Applied { backup })
            }
            _ => Ok(Outcome::Available { size: remote.len() }),
        }
    }

    /// Verifies `content` and swaps it in: the new file is written next to the
    /// target and renamed over it, the previous version is kept as `.old`.
    async fn apply(&self, content: &[u8], expected: &str) -> Result<Option<PathBuf>> {
        let actual = sha256_hex(content);
        if actual != expected {
            return Err(Error::DigestMismatch {
                expected: expected.to_string(),
                actual,
            });
        }

        let staged = sibling(&self.target, "new");
        fs::write(&staged, content)
            .await
            .map_err(|err| Error::Io(staged.clone(), err))?;

        let backup = if fs::try_exists(&self.target).await.unwrap_or(false) {
            let backup = sibling(&self.target, "old");
            fs::copy(&self.target, &backup)
                .await
                .map_err(|err| Error::Io(backup.clone(), err))?;
            Some(backup)
        } else {
            None
        };

        if let Err(err) = fs::rename(&staged, &self.target).await {
            let _ = fs::remove_file(&staged).await;
            return Err(Error::Io(self.target.clone(), err));
        }

        info!("{} updated ({} bytes)", self.target.display(), content.len());

        Ok(backup)
    }

    /// Sleeps `interval`, checks, hands the result to `report`, forever.
    pub async fn watch<F>(&self, interval: Duration, mut report: F)
    where
        F: FnMut(Result<Outcome>),
    {
        loop {
            time::sleep(interval).await;
            report(self.run_once().await);
        }
    }
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}
