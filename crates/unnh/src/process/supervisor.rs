//! Runs the game binary and reports how it ended.

use std::fmt;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{info, warn};

use super::limits::raise_core_limit;
use crate::config::LauncherConfig;
use crate::error::{Error, Result};

/// How the game process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit status 0
    Clean,
    /// Anything else; worth a crash log entry
    Abnormal(AbnormalExit),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return ExitOutcome::Clean;
        }
        if let Some(code) = status.code() {
            return ExitOutcome::Abnormal(AbnormalExit::Code(code));
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitOutcome::Abnormal(AbnormalExit::Signal {
                    signal,
                    core_dumped: status.core_dumped(),
                });
            }
        }
        ExitOutcome::Abnormal(AbnormalExit::Wait(format!("unrecognized status: {status}")))
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ExitOutcome::Clean)
    }
}

/// Why a game run counts as a crash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbnormalExit {
    Code(i32),
    Signal { signal: i32, core_dumped: bool },
    /// The child could not be waited on
    Wait(String),
}

impl fmt::Display for AbnormalExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbnormalExit::Code(code) => write!(f, "exit status {code}"),
            AbnormalExit::Signal {
                signal,
                core_dumped: true,
            } => write!(f, "signal {signal} (core dumped)"),
            AbnormalExit::Signal { signal, .. } => write!(f, "signal {signal}"),
            AbnormalExit::Wait(message) => write!(f, "wait failed: {message}"),
        }
    }
}

/// Runs one game session to completion.
pub trait GameRunner {
    /// Run the game for `username` from `gamedir`, blocking until it exits.
    ///
    /// Errors are reserved for failures to get the game started; a game
    /// that starts and then fails is reported as [`ExitOutcome::Abnormal`].
    fn run(&self, gamedir: &str, username: &str) -> Result<ExitOutcome>;
}

/// Launches the installed game binary with the launcher's terminal attached.
#[derive(Debug, Clone)]
pub struct GameSupervisor {
    root: PathBuf,
    binary: PathBuf,
}

impl GameSupervisor {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            root: config.root.clone(),
            binary: config.game_binary.clone(),
        }
    }

    /// Working directory for a variant
    pub fn workdir(&self, gamedir: &str) -> PathBuf {
        self.root.join(gamedir)
    }

    /// Binary path, anchored at the variant directory
    pub fn binary_path(&self, gamedir: &str) -> PathBuf {
        self.workdir(gamedir).join(&self.binary)
    }

    /// `<binary> -u <username>` run from the variant directory.
    pub fn command(&self, gamedir: &str, username: &str) -> Command {
        let mut cmd = Command::new(self.binary_path(gamedir));
        cmd.arg("-u")
            .arg(username)
            .current_dir(self.workdir(gamedir))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    pub fn spawn(&self, gamedir: &str, username: &str) -> Result<Child> {
        let binary = self.binary_path(gamedir);
        info!("starting game: {} -u {}", binary.display(), username);
        self.command(gamedir, username)
            .spawn()
            .map_err(|source| Error::Launch { binary, source })
    }

    /// Block until `child` exits. No timeout.
    pub fn wait(child: &mut Child) -> ExitOutcome {
        info!("waiting for game to finish...");
        match child.wait() {
            Ok(status) => ExitOutcome::from_status(status),
            Err(e) => {
                warn!("failed to wait for game: {}", e);
                ExitOutcome::Abnormal(AbnormalExit::Wait(e.to_string()))
            }
        }
    }
}

impl GameRunner for GameSupervisor {
    fn run(&self, gamedir: &str, username: &str) -> Result<ExitOutcome> {
        raise_core_limit()?;
        let mut child = self.spawn(gamedir, username)?;
        let outcome = Self::wait(&mut child);
        match &outcome {
            ExitOutcome::Clean => info!("game finished normally"),
            ExitOutcome::Abnormal(reason) => {
                warn!("game finished with error: {}", reason)
            }
        }
        Ok(outcome)
    }
}
