use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Ext4Error {
    #[error("mount failed: {0}")]
    Mount(#[from] Errno),

    #[error("filesystem check failed (e2fsck exit code {code})")]
    CheckFailed { code: i32 },

    #[error("format failed (exit code {code})")]
    FormatFailed { code: i32 },

    #[error("failed to run external tool: {0}")]
    Spawn(#[from] std::io::Error),
}

impl Ext4Error {
    /// Errno equivalent of this error. Check and format failures signaled
    /// through tool exit codes map to `EIO`; mount failures carry the errno
    /// the kernel returned.
    pub fn errno(&self) -> Errno {
        match self {
            Ext4Error::Mount(errno) => *errno,
            Ext4Error::CheckFailed { .. } | Ext4Error::FormatFailed { .. } => Errno::EIO,
            Ext4Error::Spawn(err) => err
                .raw_os_error()
                .map(Errno::from_i32)
                .unwrap_or(Errno::EIO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failures_map_to_eio() {
        assert_eq!(Ext4Error::CheckFailed { code: 4 }.errno(), Errno::EIO);
        assert_eq!(Ext4Error::FormatFailed { code: 1 }.errno(), Errno::EIO);
    }

    #[test]
    fn mount_failures_keep_their_errno() {
        assert_eq!(Ext4Error::Mount(Errno::EBUSY).errno(), Errno::EBUSY);
        assert_eq!(Ext4Error::Mount(Errno::EACCES).errno(), Errno::EACCES);
    }
}
