use std::path::Path;
use std::sync::Arc;

use crate::check;
use crate::config::Ext4Config;
use crate::error::Ext4Error;
use crate::format;
use crate::mount::{self, MountOptions};
use crate::runner::{LoggedRunner, ProcessRunner};

/// Ext4 volume operations for a higher-level volume manager. Stateless;
/// every call goes straight to the kernel or an external tool and blocks
/// until it completes.
pub struct Ext4Volume {
    config: Ext4Config,
    runner: Arc<dyn ProcessRunner>,
}

impl Ext4Volume {
    pub fn new() -> Self {
        Self::with_config(Ext4Config::default())
    }

    pub fn with_config(config: Ext4Config) -> Self {
        Self {
            config,
            runner: Arc::new(LoggedRunner),
        }
    }

    /// Substitute the subprocess runner, for tests or custom log capture.
    pub fn with_runner(config: Ext4Config, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Ext4Config {
        &self.config
    }

    /// Mount `fs_path` on `mount_point` as ext4 with the policy flag set.
    /// A device that turns out to be a read-only filesystem gets one retry
    /// with the read-only flag forced on.
    pub fn mount(
        &self,
        fs_path: &Path,
        mount_point: &Path,
        options: &MountOptions,
    ) -> Result<(), Ext4Error> {
        mount::mount(fs_path, mount_point, options)
    }

    /// Run the external checker in preen mode. Succeeds when the checker is
    /// absent, when the volume is clean, and when errors were corrected;
    /// fails only on a fatal exit-code bit.
    pub fn check(&self, fs_path: &Path) -> Result<(), Ext4Error> {
        check::check(&self.config, self.runner.as_ref(), fs_path)
    }

    /// Format `fs_path` as ext4 with a journal via the external formatter.
    pub fn format(&self, fs_path: &Path) -> Result<(), Ext4Error> {
        format::format(&self.config, self.runner.as_ref(), fs_path)
    }
}

impl Default for Ext4Volume {
    fn default() -> Self {
        Self::new()
    }
}
