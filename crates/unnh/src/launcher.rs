//! Session orchestration.
//!
//! A launch runs these steps in order:
//! 1. Resolve the gamedir from existing saves, backing up the one found
//! 2. Run the game and wait for it
//! 3. On an abnormal exit, append a crash log entry
//! 4. Relocate dump files, whatever the exit
//!
//! Any error stops the sequence. Nothing is rolled back: a backup already
//! taken or a game already played stays as it is.

use std::path::PathBuf;

use tracing::info;

use crate::config::LauncherConfig;
use crate::crash::CrashLog;
use crate::dumps::{DumpRelocator, RelocatedDump};
use crate::error::Result;
use crate::process::{ExitOutcome, GameRunner, GameSupervisor};
use crate::save::SaveResolver;
use crate::session::Session;

/// What a completed launch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub gamedir: String,
    pub backup: Option<PathBuf>,
    pub outcome: ExitOutcome,
    pub relocated: Vec<RelocatedDump>,
}

pub struct Launcher<R = GameSupervisor> {
    config: LauncherConfig,
    runner: R,
}

impl Launcher<GameSupervisor> {
    pub fn new(config: LauncherConfig) -> Self {
        let runner = GameSupervisor::new(&config);
        Self { config, runner }
    }
}

impl<R: GameRunner> Launcher<R> {
    /// Use a custom game runner
    pub fn with_runner(config: LauncherConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn run(&self, session: &Session) -> Result<SessionReport> {
        info!("region: {}", session.region);
        info!("username: {}", session.username);

        let resolution = SaveResolver::new(&self.config).resolve(&session.username)?;
        info!("gamedir: {}", resolution.gamedir);

        let outcome = self.runner.run(&resolution.gamedir, &session.username)?;
        if let ExitOutcome::Abnormal(reason) = &outcome {
            CrashLog::new(&self.config.livelog).append(&session.username, reason)?;
        }

        let relocated = DumpRelocator::new(&self.config).relocate(session)?;
        info!("relocated {} dump file(s)", relocated.len());

        Ok(SessionReport {
            gamedir: resolution.gamedir,
            backup: resolution.backup,
            outcome,
            relocated,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::process::AbnormalExit;
    use crate::session::Region;
    use crate::test_support::{install_game, spawn_lock};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    /// Runner that records its calls and drops a dump like the real game would.
    struct ScriptedRunner {
        outcome: ExitOutcome,
        dump: Option<PathBuf>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedRunner {
        fn new(outcome: ExitOutcome) -> Self {
            Self {
                outcome,
                dump: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn writing_dump(mut self, path: PathBuf) -> Self {
            self.dump = Some(path);
            self
        }
    }

    impl GameRunner for ScriptedRunner {
        fn run(&self, gamedir: &str, username: &str) -> Result<ExitOutcome> {
            self.calls
                .borrow_mut()
                .push((gamedir.to_string(), username.to_string()));
            if let Some(dump) = &self.dump {
                fs::write(dump, b"dump").unwrap();
            }
            Ok(self.outcome.clone())
        }
    }

    fn server(root: &Path) -> LauncherConfig {
        let config = LauncherConfig::builder()
            .root(root)
            .livelog(root.join("var/unnethack/livelog"))
            .dumps_dir(root.join("var/unnethack/dumps"))
            .users_dir(root.join("users"))
            .build();
        fs::create_dir_all(&config.dumps_dir).unwrap();
        fs::write(&config.livelog, b"").unwrap();
        for variant in ["unnethack.49", "unnethack.50"] {
            fs::create_dir_all(root.join(variant).join("var/save")).unwrap();
        }
        for region in ["eu", "us"] {
            fs::create_dir_all(root.join("users/alice/dumps").join(region)).unwrap();
        }
        config
    }

    #[test]
    fn clean_run_with_existing_save() {
        let tmp = tempfile::tempdir().unwrap();
        let config = server(tmp.path());
        let save = tmp.path().join("unnethack.50/var/save/3000alice.gz");
        fs::write(&save, b"save").unwrap();

        let runner = ScriptedRunner::new(ExitOutcome::Clean);
        let launcher = Launcher::with_runner(config.clone(), runner);
        let report = launcher.run(&Session::new(Region::Eu, "alice")).unwrap();

        assert_eq!(report.gamedir, "unnethack.50");
        let backup = report.backup.unwrap();
        assert!(backup.to_str().unwrap().starts_with(save.to_str().unwrap()));
        assert_eq!(fs::read(&backup).unwrap(), b"save");
        assert_eq!(
            launcher.runner.calls.borrow().as_slice(),
            [("unnethack.50".to_string(), "alice".to_string())]
        );
        assert_eq!(fs::read_to_string(&config.livelog).unwrap(), "");
        assert!(report.relocated.is_empty());
    }

    #[test]
    fn abnormal_run_logs_crash_and_relocates() {
        let tmp = tempfile::tempdir().unwrap();
        let config = server(tmp.path());
        let dump = config.dumps_dir.join("alice.txt");

        let runner = ScriptedRunner::new(ExitOutcome::Abnormal(AbnormalExit::Signal {
            signal: 11,
            core_dumped: true,
        }))
        .writing_dump(dump.clone());
        let launcher = Launcher::with_runner(config.clone(), runner);
        let report = launcher.run(&Session::new(Region::Us, "alice")).unwrap();

        assert_eq!(report.gamedir, "unnethack.49");
        assert_eq!(report.backup, None);
        assert_eq!(
            fs::read_to_string(&config.livelog).unwrap(),
            "player=alice:crash=signal 11 (core dumped)\n"
        );
        assert_eq!(report.relocated.len(), 1);
        assert!(!dump.exists());
        assert!(
            report.relocated[0]
                .destination
                .starts_with(tmp.path().join("users/alice/dumps/us"))
        );
    }

    #[test]
    fn missing_crash_log_stops_before_relocation() {
        let tmp = tempfile::tempdir().unwrap();
        let config = server(tmp.path());
        fs::remove_file(&config.livelog).unwrap();
        let dump = config.dumps_dir.join("alice.txt");

        let runner = ScriptedRunner::new(ExitOutcome::Abnormal(AbnormalExit::Code(1)))
            .writing_dump(dump.clone());
        let err = Launcher::with_runner(config, runner)
            .run(&Session::new(Region::Eu, "alice"))
            .unwrap_err();

        assert!(matches!(err, Error::CrashLog { .. }));
        assert!(dump.exists());
    }

    #[test]
    fn missing_root_fails_before_game_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig::builder()
            .root(tmp.path().join("missing"))
            .build();

        let launcher = Launcher::with_runner(config, ScriptedRunner::new(ExitOutcome::Clean));
        let err = launcher
            .run(&Session::new(Region::Eu, "alice"))
            .unwrap_err();

        assert!(matches!(err, Error::GlobFailed { .. }));
        assert!(launcher.runner.calls.borrow().is_empty());
    }

    #[test]
    fn real_game_binary_end_to_end() {
        let _guard = spawn_lock();
        let tmp = tempfile::tempdir().unwrap();
        let config = server(tmp.path());
        let dumps = config.dumps_dir.display().to_string();
        install_game(
            tmp.path(),
            "unnethack.49",
            &format!("echo dumped > {dumps}/$2.txt.html\nexit 2"),
        );

        let report = Launcher::new(config.clone())
            .run(&Session::new(Region::Eu, "alice"))
            .unwrap();

        assert_eq!(report.outcome, ExitOutcome::Abnormal(AbnormalExit::Code(2)));
        assert_eq!(
            fs::read_to_string(&config.livelog).unwrap(),
            "player=alice:crash=exit status 2\n"
        );
        let dump = &report.relocated[0];
        assert!(dump.destination.to_str().unwrap().ends_with(".txt.html"));
        assert_eq!(fs::read_to_string(&dump.destination).unwrap(), "dumped\n");
        assert_eq!(
            fs::read_link(tmp.path().join("users/alice/dumps/eu/alice.last.txt.html")).unwrap(),
            PathBuf::from(dump.destination.file_name().unwrap())
        );
    }
}
