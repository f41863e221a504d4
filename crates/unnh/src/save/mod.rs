//! Save file handling.
//!
//! - **Resolver**: picks the game variant that already holds the player's save
//! - **Backup**: snapshots that save before the game can touch it

mod backup;
mod resolver;

pub use backup::{backup_path, backup_save};
pub use resolver::{Resolution, SAVE_SUFFIXES, SaveResolver};
