use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::backup::backup_save;
use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::fs_util;

/// Suffixes a save may carry, tried in order: plain, gzip, bzip2.
pub const SAVE_SUFFIXES: [&str; 3] = ["", ".gz", ".bz2"];

/// Outcome of save directory resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Variant directory name the game runs from
    pub gamedir: String,
    /// Existing save that selected the variant
    pub save: Option<PathBuf>,
    /// Backup taken of that save
    pub backup: Option<PathBuf>,
}

/// Finds which installed game variant holds a player's save.
pub struct SaveResolver<'a> {
    config: &'a LauncherConfig,
}

impl<'a> SaveResolver<'a> {
    pub fn new(config: &'a LauncherConfig) -> Self {
        Self { config }
    }

    /// Installed variant directories under the root, sorted by name.
    pub fn variants(&self) -> Result<Vec<String>> {
        let root = &self.config.root;
        let entries = fs::read_dir(root).map_err(|source| Error::GlobFailed {
            root: root.clone(),
            source,
        })?;

        let mut variants = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::GlobFailed {
                root: root.clone(),
                source,
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with(&self.config.variant_prefix) && entry.path().is_dir() {
                variants.push(name);
            }
        }
        variants.sort();
        Ok(variants)
    }

    /// `<root>/<variant>/var/save/<uid><username><suffix>`
    pub fn save_path(&self, variant: &str, username: &str, suffix: &str) -> PathBuf {
        self.config
            .variant_dir(variant)
            .join("var")
            .join("save")
            .join(format!("{}{}{}", self.config.save_uid, username, suffix))
    }

    /// First existing save for `username`, with the variant that holds it.
    pub fn find_save(&self, username: &str) -> Result<Option<(String, PathBuf)>> {
        for variant in self.variants()? {
            for suffix in SAVE_SUFFIXES {
                let path = self.save_path(&variant, username, suffix);
                debug!("checking save: {}", path.display());
                if fs_util::exists(&path) {
                    return Ok(Some((variant, path)));
                }
            }
        }
        Ok(None)
    }

    /// Pick the gamedir for `username`, backing up the save that decided it.
    pub fn resolve(&self, username: &str) -> Result<Resolution> {
        match self.find_save(username)? {
            Some((gamedir, save)) => {
                info!("found save for {} in {}: {}", username, gamedir, save.display());
                let backup = backup_save(&save)?;
                Ok(Resolution {
                    gamedir,
                    save: Some(save),
                    backup: Some(backup),
                })
            }
            None => {
                info!(
                    "no save for {}, using default gamedir {}",
                    username, self.config.default_gamedir
                );
                Ok(Resolution {
                    gamedir: self.config.default_gamedir.clone(),
                    save: None,
                    backup: None,
                })
            }
        }
    }
}
