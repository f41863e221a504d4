//! Fixtures shared by tests that run fake game binaries.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serializes writing and executing fake binaries.
///
/// A fork from another test thread can inherit the write handle of a script
/// being created and make its exec fail with ETXTBSY.
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Install `<root>/<gamedir>/unnethack` as a shell script running `script`.
pub fn install_game(root: &Path, gamedir: &str, script: &str) {
    let dir = root.join(gamedir);
    fs::create_dir_all(&dir).unwrap();
    let binary = dir.join("unnethack");
    fs::write(&binary, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
}
