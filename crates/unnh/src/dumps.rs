//! Dump relocation.
//!
//! After a game the per-player dump files are moved out of the shared dumps
//! directory into the player's archive for the region:
//!
//! ```text
//! /var/unnethack/dumps/bob.txt
//!   -> /users/bob/dumps/us/bob.1700000000.txt
//!      /users/bob/dumps/us/bob.last.txt -> bob.1700000000.txt
//! ```
//!
//! The number is the dump's modification time in seconds since the epoch.
//! The archive directory must already exist.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::fs_util;
use crate::session::Session;

/// Dump extensions, relocated in this order
pub const DUMP_EXTENSIONS: [&str; 2] = [".txt", ".txt.html"];

/// One dump moved into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocatedDump {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// The `latest` link now pointing at `destination`
    pub link: PathBuf,
    /// Modification time of the dump, seconds since the epoch
    pub modified: i64,
}

pub struct DumpRelocator {
    dumps_dir: PathBuf,
    users_dir: PathBuf,
}

impl DumpRelocator {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            dumps_dir: config.dumps_dir.clone(),
            users_dir: config.users_dir.clone(),
        }
    }

    pub fn source_path(&self, username: &str, ext: &str) -> PathBuf {
        self.dumps_dir.join(format!("{}{}", username, ext))
    }

    pub fn archive_dir(&self, session: &Session) -> PathBuf {
        self.users_dir
            .join(&session.username)
            .join("dumps")
            .join(session.region.as_str())
    }

    pub fn archive_name(username: &str, modified: i64, ext: &str) -> String {
        format!("{}.{}{}", username, modified, ext)
    }

    pub fn link_name(username: &str, ext: &str) -> String {
        format!("{}.last{}", username, ext)
    }

    /// Relocate every dump the game left for this session.
    pub fn relocate(&self, session: &Session) -> Result<Vec<RelocatedDump>> {
        let mut relocated = Vec::new();
        for ext in DUMP_EXTENSIONS {
            if let Some(dump) = self.relocate_one(session, ext)? {
                relocated.push(dump);
            }
        }
        Ok(relocated)
    }

    /// Relocate the dump with extension `ext`; `None` if there is none.
    pub fn relocate_one(&self, session: &Session, ext: &str) -> Result<Option<RelocatedDump>> {
        let source = self.source_path(&session.username, ext);
        debug!("checking: {}", source.display());

        let Some(modified) = modified_secs(&source)? else {
            return Ok(None);
        };

        let archive = self.archive_dir(session);
        let name = Self::archive_name(&session.username, modified, ext);
        let destination = archive.join(&name);
        info!("moving dump '{}' -> '{}'", source.display(), destination.display());
        fs_util::move_file(&source, &destination)?;

        let link = archive.join(Self::link_name(&session.username, ext));
        fs_util::replace_symlink(Path::new(&name), &link)?;

        Ok(Some(RelocatedDump {
            source,
            destination,
            link,
            modified,
        }))
    }
}

/// Modification time of `path` in whole seconds, `None` if it does not exist.
fn modified_secs(path: &Path) -> Result<Option<i64>> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io("stat", path, e)),
    };
    let modified = metadata
        .modified()
        .map_err(|e| Error::io("read mtime of", path, e))?;
    Ok(Some(DateTime::<Utc>::from(modified).timestamp()))
}
