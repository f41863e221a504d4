//! Launcher configuration.
//!
//! Every filesystem location the launcher touches lives here. The defaults
//! describe the production server layout; a TOML file may override any subset.
//!
//! ```toml
//! root = "/srv/nethack"
//! default_gamedir = "unnethack.50"
//! livelog = "/srv/nethack/var/unnethack/livelog"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Filesystem layout used by a launch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Directory holding the installed game variants
    pub root: PathBuf,
    /// Name prefix shared by every game variant directory
    pub variant_prefix: String,
    /// Variant used when the player has no existing save
    pub default_gamedir: String,
    /// Game binary, relative to the variant directory
    pub game_binary: PathBuf,
    /// Numeric uid prefixed to save file names
    pub save_uid: u32,
    /// Shared crash log
    pub livelog: PathBuf,
    /// Directory where the game writes per-player dumps
    pub dumps_dir: PathBuf,
    /// Root of the per-user home directories
    pub users_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            variant_prefix: "unnethack".to_string(),
            default_gamedir: "unnethack.49".to_string(),
            game_binary: PathBuf::from("./unnethack"),
            save_uid: 3000,
            livelog: PathBuf::from("/var/unnethack/livelog"),
            dumps_dir: PathBuf::from("/var/unnethack/dumps"),
            users_dir: PathBuf::from("/users"),
        }
    }
}

impl LauncherConfig {
    /// Create a new configuration builder
    pub fn builder() -> LauncherConfigBuilder {
        LauncherConfigBuilder::default()
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        let config = Self::parse(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Directory of the given game variant
    pub fn variant_dir(&self, gamedir: &str) -> PathBuf {
        self.root.join(gamedir)
    }
}

/// Builder for LauncherConfig
#[derive(Debug, Clone, Default)]
pub struct LauncherConfigBuilder {
    root: Option<PathBuf>,
    variant_prefix: Option<String>,
    default_gamedir: Option<String>,
    game_binary: Option<PathBuf>,
    save_uid: Option<u32>,
    livelog: Option<PathBuf>,
    dumps_dir: Option<PathBuf>,
    users_dir: Option<PathBuf>,
}

impl LauncherConfigBuilder {
    pub fn root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.root = Some(path.into());
        self
    }

    pub fn variant_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.variant_prefix = Some(prefix.into());
        self
    }

    pub fn default_gamedir<S: Into<String>>(mut self, gamedir: S) -> Self {
        self.default_gamedir = Some(gamedir.into());
        self
    }

    pub fn game_binary<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.game_binary = Some(path.into());
        self
    }

    pub fn save_uid(mut self, uid: u32) -> Self {
        self.save_uid = Some(uid);
        self
    }

    pub fn livelog<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.livelog = Some(path.into());
        self
    }

    pub fn dumps_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dumps_dir = Some(path.into());
        self
    }

    pub fn users_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.users_dir = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> LauncherConfig {
        let default = LauncherConfig::default();
        LauncherConfig {
            root: self.root.unwrap_or(default.root),
            variant_prefix: self.variant_prefix.unwrap_or(default.variant_prefix),
            default_gamedir: self.default_gamedir.unwrap_or(default.default_gamedir),
            game_binary: self.game_binary.unwrap_or(default.game_binary),
            save_uid: self.save_uid.unwrap_or(default.save_uid),
            livelog: self.livelog.unwrap_or(default.livelog),
            dumps_dir: self.dumps_dir.unwrap_or(default.dumps_dir),
            users_dir: self.users_dir.unwrap_or(default.users_dir),
        }
    }
}
