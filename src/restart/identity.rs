// src/restart/identity.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::{RelaunchError, Result};

/// How this process was invoked: executable, argv and environment.
///
/// Captured once at startup and never modified; every restart rebuilds the
/// next process image from exactly these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    exe: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl ProcessIdentity {
    pub fn new(
        exe: impl Into<PathBuf>,
        args: Vec<OsString>,
        env: Vec<(OsString, OsString)>,
    ) -> Self {
        Self {
            exe: exe.into(),
            args,
            env,
        }
    }

    /// Snapshot the current process.
    ///
    /// The executable path is made absolute now so that a later change of
    /// working directory cannot make it resolve somewhere else.
    pub fn capture() -> Result<Self> {
        let args: Vec<OsString> = std::env::args_os().collect();
        let env: Vec<(OsString, OsString)> = std::env::vars_os().collect();

        let exe = match std::env::current_exe() {
            Ok(exe) => exe,
            Err(_) => {
                let argv0 = args.first().ok_or_else(|| {
                    RelaunchError::ConfigError("empty argument vector".to_string())
                })?;
                absolutize(Path::new(argv0))?
            }
        };

        Ok(Self::new(exe, args, env))
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Full argument vector including argv[0].
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn env(&self) -> &[(OsString, OsString)] {
        &self.env
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_matches_current_process() {
        let id = ProcessIdentity::capture().unwrap();
        assert!(id.exe().is_absolute());
        assert_eq!(id.args(), std::env::args_os().collect::<Vec<_>>().as_slice());
        assert_eq!(id.env(), std::env::vars_os().collect::<Vec<_>>().as_slice());
    }

    #[cfg(unix)]
    #[test]
    fn relative_paths_are_made_absolute() {
        let abs = absolutize(Path::new("bin/app")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("bin/app"));
        assert_eq!(absolutize(Path::new("/usr/bin/app")).unwrap(), Path::new("/usr/bin/app"));
    }
}
