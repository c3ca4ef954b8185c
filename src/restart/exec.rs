// src/restart/exec.rs

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::errors::{RelaunchError, Result};
use crate::restart::identity::ProcessIdentity;
use crate::restart::Restarter;

/// Production restarter: replaces the running process image.
///
/// On Unix this is `execve`, so the PID is kept and the call only returns
/// on failure. Elsewhere the next generation is spawned as a child with the
/// same argv and environment, and the current process exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecRestarter;

impl Restarter for ExecRestarter {
    fn restart(&mut self, identity: &ProcessIdentity) -> Result<()> {
        let binary = resolve_executable(identity.exe())?;
        info!(exe = ?binary, args = ?identity.args(), "replacing process image");
        replace_process(&binary, identity)
    }
}

/// Locate the executable to run, checking that it exists and is executable.
pub fn resolve_executable(exe: &Path) -> Result<PathBuf> {
    which::which(exe).map_err(|e| RelaunchError::ResolveError {
        path: exe.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Build the command for the next generation: same argv (including argv[0]
/// on Unix) and exactly the captured environment, nothing inherited.
pub fn build_command(binary: &Path, identity: &ProcessIdentity) -> Command {
    let mut cmd = Command::new(binary);

    if let Some((argv0, rest)) = identity.args().split_first() {
        cmd.args(rest);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(argv0);
        }
        #[cfg(not(unix))]
        let _ = argv0;
    }

    cmd.env_clear();
    cmd.envs(identity.env().iter().map(|(k, v)| (k, v)));
    cmd
}

#[cfg(unix)]
fn replace_process(binary: &Path, identity: &ProcessIdentity) -> Result<()> {
    use std::os::unix::process::CommandExt;

    // Only returns if the exec failed.
    let source = build_command(binary, identity).exec();
    Err(RelaunchError::ExecError {
        path: binary.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn replace_process(binary: &Path, identity: &ProcessIdentity) -> Result<()> {
    build_command(binary, identity)
        .spawn()
        .map_err(|source| RelaunchError::ExecError {
            path: binary.to_path_buf(),
            source,
        })?;
    std::process::exit(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn unresolvable_executable_is_recoverable() {
        let identity = ProcessIdentity::new(
            "/definitely/not/a/real/binary",
            vec![OsString::from("binary")],
            Vec::new(),
        );

        let err = ExecRestarter.restart(&identity).unwrap_err();
        assert!(matches!(err, RelaunchError::ResolveError { .. }), "{err:?}");
        assert!(err.is_recoverable());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_does_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("plain.txt");
        std::fs::write(&script, "not a program").unwrap();

        assert!(matches!(
            resolve_executable(&script),
            Err(RelaunchError::ResolveError { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn next_generation_sees_identical_argv_and_env() {
        let sh = resolve_executable(Path::new("/bin/sh")).unwrap();
        let identity = ProcessIdentity::new(
            &sh,
            vec![
                OsString::from("probe-argv0"),
                OsString::from("-c"),
                OsString::from(r#"printf '%s|%s|%s|%s' "$0" "$1" "$RELAUNCH_PROBE" "${HOME-unset}""#),
                OsString::from("zero"),
                OsString::from("one two"),
            ],
            vec![(OsString::from("RELAUNCH_PROBE"), OsString::from("a=b c"))],
        );

        let out = build_command(&sh, &identity).output().unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "zero|one two|a=b c|unset");
    }
}
