use crate::error::{Error, Result};

/// Core dump size limit in bytes, as reported after raising it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreLimit {
    pub soft: u64,
    pub hard: u64,
}

/// Raise the core dump limit as far as this process is allowed.
///
/// Asks for unlimited soft and hard limits. If the hard limit may not be
/// raised (EPERM for unprivileged users), the soft limit is raised to the
/// current hard limit instead.
#[cfg(unix)]
pub fn raise_core_limit() -> Result<CoreLimit> {
    let current = get_core_limit()?;

    let unlimited = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    if let Err(e) = set_core_limit(&unlimited) {
        if e.raw_os_error() != Some(libc::EPERM) {
            return Err(Error::CoreLimit {
                op: "raise",
                source: e,
            });
        }
        let capped = libc::rlimit {
            rlim_cur: current.rlim_max,
            rlim_max: current.rlim_max,
        };
        set_core_limit(&capped).map_err(|source| Error::CoreLimit { op: "raise", source })?;
    }

    let raised = get_core_limit()?;
    let limit = CoreLimit {
        soft: raised.rlim_cur as u64,
        hard: raised.rlim_max as u64,
    };
    tracing::info!("set core size: soft={} hard={}", limit.soft, limit.hard);
    Ok(limit)
}

#[cfg(not(unix))]
pub fn raise_core_limit() -> Result<CoreLimit> {
    Err(Error::CoreLimit {
        op: "raise",
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "core dump limits are only supported on Unix",
        ),
    })
}

#[cfg(unix)]
fn get_core_limit() -> Result<libc::rlimit> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the struct we pass.
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_CORE, &mut limit) };
    if rc != 0 {
        return Err(Error::CoreLimit {
            op: "query",
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(limit)
}

#[cfg(unix)]
fn set_core_limit(limit: &libc::rlimit) -> std::io::Result<()> {
    // SAFETY: setrlimit only reads the struct we pass.
    let rc = unsafe { libc::setrlimit(libc::RLIMIT_CORE, limit) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
