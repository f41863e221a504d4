//! Crash log shared by every launcher instance.
//!
//! Each entry is a single `player=<username>:crash=<detail>` line written
//! with one append-mode, synchronous write, so concurrent launchers rely on
//! the platform's atomic small appends instead of locking.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Format one crash log line, newline included.
pub fn format_entry(username: &str, detail: impl Display) -> String {
    format!("player={}:crash={}\n", username, detail)
}

pub struct CrashLog {
    path: PathBuf,
}

impl CrashLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a crash entry. The log must already exist.
    pub fn append(&self, username: &str, detail: impl Display) -> Result<()> {
        let line = format_entry(username, detail);
        let mut file = self.open()?;
        file.write_all(line.as_bytes())
            .map_err(|source| Error::CrashLog {
                path: self.path.clone(),
                source,
            })?;
        info!("crash logged to {}: {}", self.path.display(), line.trim_end());
        Ok(())
    }

    fn open(&self) -> Result<File> {
        let mut options = OpenOptions::new();
        options.append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_SYNC);
        }
        options.open(&self.path).map_err(|source| Error::CrashLog {
            path: self.path.clone(),
            source,
        })
    }
}
