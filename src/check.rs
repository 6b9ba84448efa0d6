use log::{error, info, warn};
use std::ffi::OsStr;
use std::path::Path;

use crate::config::Ext4Config;
use crate::error::Ext4Error;
use crate::runner::{is_executable, resolve_tool, ProcessRunner};

/// Decoded e2fsck exit code. The checker reports its result as a bitmask;
/// this mirrors its documented exit-code convention and must stay in sync
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsckReport {
    pub corrected: bool,
    pub reboot_needed: bool,
    pub uncorrected: bool,
    pub operational_error: bool,
    pub usage_error: bool,
    pub canceled: bool,
    pub shared_library_error: bool,
}

impl FsckReport {
    pub fn decode(code: i32) -> Self {
        Self {
            corrected: code & 1 != 0,
            reboot_needed: code & 2 != 0,
            uncorrected: code & 4 != 0,
            operational_error: code & 8 != 0,
            usage_error: code & 16 != 0,
            canceled: code & 32 != 0,
            shared_library_error: code & 128 != 0,
        }
    }

    /// Whether any bit in {4, 8, 16, 32, 128} is set. Corrected errors
    /// (bit 1) and reboot-needed (bit 2) are not fatal on their own.
    pub fn is_fatal(&self) -> bool {
        self.uncorrected
            || self.operational_error
            || self.usage_error
            || self.canceled
            || self.shared_library_error
    }
}

/// Run the checker in preen mode against `fs_path`. Best-effort: a missing
/// or non-executable checker skips the check and succeeds.
pub(crate) fn check(
    config: &Ext4Config,
    runner: &dyn ProcessRunner,
    fs_path: &Path,
) -> Result<(), Ext4Error> {
    let checker = match resolve_tool(&config.e2fsck_path) {
        Some(path) if is_executable(&path) => path,
        _ => {
            warn!(
                "{} not executable, skipping fs checks",
                config.e2fsck_path.display()
            );
            return Ok(());
        }
    };

    let code = runner.execute(&checker, &[OsStr::new("-p"), fs_path.as_os_str()])?;
    info!("e2fsck returned {}", code);

    if code == 0 {
        info!("ext4 filesystem check completed OK");
        return Ok(());
    }

    let report = FsckReport::decode(code);
    if report.corrected {
        info!("ext4 filesystem check completed, errors corrected");
    }
    if report.reboot_needed {
        error!("ext4 filesystem check completed, errors corrected, reboot needed");
    }
    if report.uncorrected {
        error!("ext4 filesystem errors left uncorrected");
    }
    if report.operational_error {
        error!("e2fsck operational error");
    }
    if report.usage_error {
        error!("e2fsck usage or syntax error");
    }
    if report.canceled {
        error!("e2fsck canceled by user request");
    }
    if report.shared_library_error {
        error!("e2fsck shared library error");
    }

    if report.is_fatal() {
        Err(Ext4Error::CheckFailed { code })
    } else {
        Ok(())
    }
}
