//! # unnh
//!
//! Per-player session launcher for a shared UnNetHack server.
//!
//! This crate provides:
//! - Save directory resolution across installed game variants
//! - Save backups taken before the game runs
//! - Game process supervision with core dumps enabled
//! - Crash logging to the shared livelog
//! - Dump relocation into per-user, per-region archives
//!
//! Every failure is returned as an [`Error`]; deciding whether to terminate is
//! left to the caller. A game that exits abnormally is not an error.

pub mod config;
pub mod crash;
pub mod dumps;
pub mod error;
pub mod fs_util;
pub mod launcher;
pub mod prelude;
pub mod process;
pub mod save;
pub mod session;

#[cfg(all(test, unix))]
mod test_support;

pub use config::{LauncherConfig, LauncherConfigBuilder};
pub use crash::CrashLog;
pub use dumps::{DUMP_EXTENSIONS, DumpRelocator, RelocatedDump};
pub use error::{Error, Result};
pub use launcher::{Launcher, SessionReport};
pub use process::{
    AbnormalExit, CoreLimit, ExitOutcome, GameRunner, GameSupervisor, raise_core_limit,
};
pub use save::{Resolution, SAVE_SUFFIXES, SaveResolver, backup_path, backup_save};
pub use session::{Region, Session};
