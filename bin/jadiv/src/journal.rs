use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use log::{error, info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.message
        )
    }
}

struct Inner {
    entries: Vec<LogEntry>,
    mirror: Option<PathBuf>,
}

/// Operator log shared by the console and the update poller.
///
/// Every entry is also forwarded to the `log` facade and, when configured,
/// appended to a mirror file.
#[derive(Clone)]
pub struct Journal {
    inner: Arc<Mutex<Inner>>,
}

impl Journal {
    pub fn new(mirror: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: vec![],
                mirror,
            })),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.append(message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!("{message}");
        self.append(message);
    }

    fn append(&self, message: String) {
        let entry = LogEntry {
            timestamp: Local::now(),
            message,
        };

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(mirror) = &inner.mirror {
            if let Err(err) = append_to_file(mirror, &format!("{entry}\n")) {
                warn!("unable to write {}: {err}", mirror.display());
            }
        }

        inner.entries.push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.clone()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a `=== Log saved: <time> ===` block with every entry so far.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut block = format!(
            "\n=== Log saved: {} ===\n",
            Local::now().format(TIMESTAMP_FORMAT)
        );

        for entry in self.entries() {
            block.push_str(&entry.to_string());
            block.push('\n');
        }

        append_to_file(path.as_ref(), &block)
    }
}

fn append_to_file(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}
