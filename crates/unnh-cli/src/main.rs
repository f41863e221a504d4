use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, info_span, warn};
use tracing_subscriber::EnvFilter;
use unnh::{ExitOutcome, Launcher, LauncherConfig, Session};

#[derive(Parser)]
#[command(name = "unnh-launcher")]
#[command(about = "Launch an UnNetHack session for one player")]
struct Args {
    /// TOML file overriding the server layout
    #[arg(short, long, env = "UNNH_CONFIG")]
    config: Option<PathBuf>,

    /// Diagnostic log file
    #[arg(long, env = "UNNH_LOG_FILE", default_value = "/unnh-launcher.log")]
    log_file: PathBuf,

    /// <REGION> <USERNAME>
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let _span = info_span!("launcher", pid = std::process::id()).entered();
    info!("starting");

    let result = run(&args);
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let config = LauncherConfig::load(path)?;
            info!("Loaded config from {:?}", path);
            config
        }
        None => LauncherConfig::default(),
    };

    let session = Session::from_args(args.args.as_slice())?;
    let report = Launcher::new(config).run(&session)?;

    match report.outcome {
        ExitOutcome::Clean => info!("session finished in {}", report.gamedir),
        ExitOutcome::Abnormal(reason) => {
            warn!("session in {} ended abnormally: {}", report.gamedir, reason)
        }
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file =
        open_log(path).with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("unnh=info".parse()?))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();
    Ok(())
}

/// Append-only, synchronously written, group-writable.
fn open_log(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o660).custom_flags(libc::O_SYNC);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_region_and_username() {
        let args = Args::try_parse_from(["unnh-launcher", "eu", "alice"]).unwrap();
        assert_eq!(args.args, ["eu", "alice"]);
        assert_eq!(args.config, None);
    }

    #[test]
    fn leaves_count_validation_to_session() {
        let args = Args::try_parse_from(["unnh-launcher", "eu"]).unwrap();
        assert!(Session::from_args(args.args.as_slice()).is_err());

        let args = Args::try_parse_from(["unnh-launcher", "eu", "alice", "bob"]).unwrap();
        assert_eq!(args.args.len(), 3);
    }

    #[test]
    fn username_may_start_with_hyphen() {
        let args = Args::try_parse_from(["unnh-launcher", "us", "-bob"]).unwrap();
        assert_eq!(args.args, ["us", "-bob"]);
    }

    #[test]
    fn options_before_positionals() {
        let args = Args::try_parse_from([
            "unnh-launcher",
            "--config",
            "/etc/unnh.toml",
            "--log-file",
            "/tmp/unnh.log",
            "us",
            "bob",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/unnh.toml")));
        assert_eq!(args.log_file, PathBuf::from("/tmp/unnh.log"));
        assert_eq!(args.args, ["us", "bob"]);
    }

    #[test]
    fn open_log_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher.log");

        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[cfg(unix)]
    #[test]
    fn open_log_creates_group_writable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher.log");
        open_log(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o600);
    }
}
