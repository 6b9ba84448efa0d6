// Ext4 volume operations: mount with a fixed flag policy, consistency
// check via the external e2fsck, format via the external make_ext4fs.
// Linux-only; consumed as a library by a volume manager.

pub mod check;
pub mod config;
pub mod error;
pub mod format;
pub mod mount;
pub mod runner;
pub mod test_utils;
pub mod volume;

pub use check::FsckReport;
pub use config::Ext4Config;
pub use error::Ext4Error;
pub use mount::{mount_flags, MountOptions};
pub use runner::{LoggedRunner, ProcessRunner};
pub use volume::Ext4Volume;
