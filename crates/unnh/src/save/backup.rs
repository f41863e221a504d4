use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use tracing::info;

use crate::error::{Error, Result};
use crate::fs_util;

/// Backup destination for `save` taken at `at`: `<save>.<RFC3339>.bak`.
///
/// Second precision, so two backups within the same second share a name.
pub fn backup_path(save: &Path, at: &DateTime<FixedOffset>) -> PathBuf {
    let mut name = OsString::from(save.as_os_str());
    name.push(".");
    name.push(at.to_rfc3339_opts(SecondsFormat::Secs, true));
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy `save` to a timestamped sibling and return the backup path.
pub fn backup_save(save: &Path) -> Result<PathBuf> {
    let dest = backup_path(save, &Local::now().fixed_offset());
    info!("backing up '{}' -> '{}'", save.display(), dest.display());
    fs_util::copy(save, &dest).map_err(|e| Error::Backup {
        path: save.to_path_buf(),
        source: Box::new(e),
    })?;
    Ok(dest)
}
