use log::error;
use nix::errno::Errno;
use nix::mount::MsFlags;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Ext4Error;

pub(crate) const EXT4_FSTYPE: &str = "ext4";

/// Caller-controlled mount policy knobs. Everything else in the flag set
/// is fixed, see [`mount_flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountOptions {
    pub read_only: bool,
    pub remount: bool,
    pub executable: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            read_only: true, // Default to read-only for safety
            remount: false,
            executable: false,
        }
    }
}

/// Build the mount flag set: noatime, nodev, nosuid and dirsync are always
/// on; noexec unless `executable`; rdonly and remount per the options.
pub fn mount_flags(options: &MountOptions) -> MsFlags {
    let mut flags =
        MsFlags::MS_NOATIME | MsFlags::MS_NODEV | MsFlags::MS_NOSUID | MsFlags::MS_DIRSYNC;

    if !options.executable {
        flags |= MsFlags::MS_NOEXEC;
    }
    if options.read_only {
        flags |= MsFlags::MS_RDONLY;
    }
    if options.remount {
        flags |= MsFlags::MS_REMOUNT;
    }

    flags
}

/// Mount with the policy flags. If the first attempt fails with EROFS the
/// device itself is a read-only filesystem, so retry exactly once with
/// rdonly forced on. Any other errno propagates unchanged.
pub(crate) fn mount_with_retry<F>(
    mut syscall: F,
    fs_path: &Path,
    options: &MountOptions,
) -> Result<(), Ext4Error>
where
    F: FnMut(MsFlags) -> nix::Result<()>,
{
    let mut flags = mount_flags(options);
    match syscall(flags) {
        Ok(()) => Ok(()),
        Err(Errno::EROFS) => {
            error!(
                "{} appears to be a read-only filesystem - retrying mount RO",
                fs_path.display()
            );
            flags |= MsFlags::MS_RDONLY;
            syscall(flags).map_err(|errno| {
                error!(
                    "read-only retry mount of {} failed: {}",
                    fs_path.display(),
                    errno
                );
                Ext4Error::Mount(errno)
            })
        }
        Err(errno) => {
            error!("mount of {} failed: {}", fs_path.display(), errno);
            Err(Ext4Error::Mount(errno))
        }
    }
}

pub(crate) fn mount(
    fs_path: &Path,
    mount_point: &Path,
    options: &MountOptions,
) -> Result<(), Ext4Error> {
    mount_with_retry(
        |flags| {
            nix::mount::mount(
                Some(fs_path),
                mount_point,
                Some(EXT4_FSTYPE),
                flags,
                None::<&str>,
            )
        },
        fs_path,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn opts(read_only: bool, remount: bool, executable: bool) -> MountOptions {
        MountOptions {
            read_only,
            remount,
            executable,
        }
    }

    fn base_flags() -> MsFlags {
        MsFlags::MS_NOATIME | MsFlags::MS_NODEV | MsFlags::MS_NOSUID | MsFlags::MS_DIRSYNC
    }

    #[test]
    fn base_flags_always_present() {
        for ro in [false, true] {
            for remount in [false, true] {
                for executable in [false, true] {
                    let flags = mount_flags(&opts(ro, remount, executable));
                    assert!(
                        flags.contains(base_flags()),
                        "ro={} remount={} executable={}",
                        ro,
                        remount,
                        executable
                    );
                }
            }
        }
    }

    #[test]
    fn noexec_set_unless_executable() {
        assert!(mount_flags(&opts(false, false, false)).contains(MsFlags::MS_NOEXEC));
        assert!(!mount_flags(&opts(false, false, true)).contains(MsFlags::MS_NOEXEC));
    }

    #[test]
    fn rdonly_tracks_read_only() {
        assert!(mount_flags(&opts(true, false, false)).contains(MsFlags::MS_RDONLY));
        assert!(!mount_flags(&opts(false, false, false)).contains(MsFlags::MS_RDONLY));
    }

    #[test]
    fn remount_tracks_remount() {
        assert!(mount_flags(&opts(false, true, false)).contains(MsFlags::MS_REMOUNT));
        assert!(!mount_flags(&opts(false, false, false)).contains(MsFlags::MS_REMOUNT));
    }

    #[test]
    fn full_flag_table() {
        for ro in [false, true] {
            for remount in [false, true] {
                for executable in [false, true] {
                    let mut expected = base_flags();
                    if !executable {
                        expected |= MsFlags::MS_NOEXEC;
                    }
                    if ro {
                        expected |= MsFlags::MS_RDONLY;
                    }
                    if remount {
                        expected |= MsFlags::MS_REMOUNT;
                    }
                    assert_eq!(mount_flags(&opts(ro, remount, executable)), expected);
                }
            }
        }
    }

    #[test]
    fn erofs_triggers_single_rdonly_retry() {
        let attempts = RefCell::new(Vec::new());
        let result = mount_with_retry(
            |flags| {
                attempts.borrow_mut().push(flags);
                if attempts.borrow().len() == 1 {
                    Err(Errno::EROFS)
                } else {
                    Ok(())
                }
            },
            Path::new("/dev/block/sda1"),
            &opts(false, false, false),
        );

        assert!(result.is_ok());
        let attempts = attempts.into_inner();
        assert_eq!(attempts.len(), 2);
        assert!(!attempts[0].contains(MsFlags::MS_RDONLY));
        assert!(attempts[1].contains(MsFlags::MS_RDONLY));
    }

    #[test]
    fn erofs_on_retry_propagates() {
        let attempts = RefCell::new(0u32);
        let result = mount_with_retry(
            |_| {
                *attempts.borrow_mut() += 1;
                Err(Errno::EROFS)
            },
            Path::new("/dev/block/sda1"),
            &opts(false, false, false),
        );

        assert_eq!(attempts.into_inner(), 2);
        match result {
            Err(Ext4Error::Mount(Errno::EROFS)) => {}
            other => panic!("expected EROFS, got {:?}", other),
        }
    }

    #[test]
    fn other_errnos_do_not_retry() {
        let attempts = RefCell::new(0u32);
        let result = mount_with_retry(
            |_| {
                *attempts.borrow_mut() += 1;
                Err(Errno::EBUSY)
            },
            Path::new("/dev/block/sda1"),
            &opts(false, false, false),
        );

        assert_eq!(attempts.into_inner(), 1);
        match result {
            Err(Ext4Error::Mount(Errno::EBUSY)) => {}
            other => panic!("expected EBUSY, got {:?}", other),
        }
    }

    #[test]
    fn success_does_not_retry() {
        let attempts = RefCell::new(0u32);
        let result = mount_with_retry(
            |_| {
                *attempts.borrow_mut() += 1;
                Ok(())
            },
            Path::new("/dev/block/sda1"),
            &opts(true, false, false),
        );

        assert!(result.is_ok());
        assert_eq!(attempts.into_inner(), 1);
    }
}
