use log::debug;
use nix::unistd::{access, AccessFlags};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Subprocess capability used by the check and format operations. Injected
/// so exit-code handling can be tested without spawning real binaries.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits, and return its
    /// exit code.
    fn execute(&self, program: &Path, args: &[&OsStr]) -> io::Result<i32>;
}

/// Default runner: spawns the tool with captured stdout/stderr and logs
/// every line it prints.
pub struct LoggedRunner;

impl ProcessRunner for LoggedRunner {
    fn execute(&self, program: &Path, args: &[&OsStr]) -> io::Result<i32> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        let tag = program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("{}: {}", tag, line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!("{}: {}", tag, line);
        }

        match output.status.code() {
            Some(code) => Ok(code),
            // Killed by a signal, no exit code to decode.
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} terminated by signal", tag),
            )),
        }
    }
}

/// Locate an external tool. Paths with a directory component are taken
/// as-is; bare command names are resolved through PATH.
pub fn resolve_tool(path: &Path) -> Option<PathBuf> {
    if path.components().count() > 1 {
        Some(path.to_path_buf())
    } else {
        which::which(path).ok()
    }
}

pub fn is_executable(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_not_searched() {
        let path = Path::new("/no/such/dir/e2fsck");
        assert_eq!(resolve_tool(path), Some(path.to_path_buf()));
    }

    #[test]
    fn unknown_bare_names_resolve_to_none() {
        assert_eq!(resolve_tool(Path::new("definitely-not-a-real-tool")), None);
    }

    #[test]
    fn missing_path_is_not_executable() {
        assert!(!is_executable(Path::new("/no/such/dir/e2fsck")));
    }
}
