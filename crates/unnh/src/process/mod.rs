//! Game process supervision.
//!
//! - **Limits**: core dump size is raised before launch so crashes leave a core
//! - **Supervisor**: runs the game with the terminal attached and classifies its exit

mod limits;
mod supervisor;

pub use limits::{CoreLimit, raise_core_limit};
pub use supervisor::{AbnormalExit, ExitOutcome, GameRunner, GameSupervisor};
