use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_E2FSCK_PATH: &str = "/system/bin/e2fsck";
pub const DEFAULT_MKFS_PATH: &str = "/system/bin/make_ext4fs";

/// Paths to the external checker and formatter. Injectable so callers can
/// point at test doubles or non-standard tool locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ext4Config {
    pub e2fsck_path: PathBuf,
    pub mkfs_path: PathBuf,
}

impl Default for Ext4Config {
    fn default() -> Self {
        Self {
            e2fsck_path: PathBuf::from(DEFAULT_E2FSCK_PATH),
            mkfs_path: PathBuf::from(DEFAULT_MKFS_PATH),
        }
    }
}
