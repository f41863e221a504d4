//! Prelude module for convenient imports
//!
//! ```ignore
//! use unnh::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Entry points: `Launcher`, `LauncherConfig`, `Session`, `Region`
//! - Outcomes: `SessionReport`, `ExitOutcome`, `AbnormalExit`
//! - Extension point: `GameRunner`
//! - Error handling: `Error`, `Result`

pub use crate::config::LauncherConfig;
pub use crate::error::{Error, Result};
pub use crate::launcher::{Launcher, SessionReport};
pub use crate::process::{AbnormalExit, ExitOutcome, GameRunner};
pub use crate::session::{Region, Session};
