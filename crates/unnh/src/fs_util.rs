//! Small filesystem helpers that attach the failing path to every error.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Whether anything (file, directory, or live symlink) exists at `path`.
pub fn exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

/// Copy `src` to `dst`, truncating any existing destination.
pub fn copy(src: &Path, dst: &Path) -> Result<u64> {
    fs::copy(src, dst).map_err(|e| {
        // fs::copy does not say which side failed
        if exists(src) {
            Error::io("copy to", dst, e)
        } else {
            Error::io("copy from", src, e)
        }
    })
}

/// Move `src` to `dst` by copying and then removing the source.
///
/// Works across filesystems. The source is only removed once the copy has
/// fully succeeded.
pub fn move_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = copy(src, dst)?;
    fs::remove_file(src).map_err(|e| Error::io("remove", src, e))?;
    Ok(bytes)
}

/// Point `link` at `target`, replacing any existing link.
///
/// `target` is stored verbatim, so a bare file name resolves relative to the
/// link's own directory.
#[cfg(unix)]
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    match fs::remove_file(link) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("remove", link, e)),
    }
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::io("symlink", link, e))
}

#[cfg(not(unix))]
pub fn replace_symlink(_target: &Path, link: &Path) -> Result<()> {
    Err(Error::io(
        "symlink",
        link,
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "symlinks are only supported on Unix",
        ),
    ))
}
