use log::{error, info};
use std::ffi::OsStr;
use std::path::Path;

use crate::config::Ext4Config;
use crate::error::Ext4Error;
use crate::runner::{resolve_tool, ProcessRunner};

/// Run the formatter with the journal flag against `fs_path`. Unlike the
/// checker, any nonzero exit code is a uniform failure.
pub(crate) fn format(
    config: &Ext4Config,
    runner: &dyn ProcessRunner,
    fs_path: &Path,
) -> Result<(), Ext4Error> {
    let mkfs = resolve_tool(&config.mkfs_path).unwrap_or_else(|| config.mkfs_path.clone());

    let code = runner.execute(&mkfs, &[OsStr::new("-J"), fs_path.as_os_str()])?;
    if code == 0 {
        info!("filesystem (ext4) formatted OK");
        Ok(())
    } else {
        error!("format (ext4) failed (exit code {})", code);
        Err(Ext4Error::FormatFailed { code })
    }
}
