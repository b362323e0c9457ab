use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use mcprims_cmd::{McCommand, McStatus, COMMAND_SIZE};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::McTransport;

/// Default restool device node exposed by the fsl-mc bus driver.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/mc_restool";

const RESTOOL_IOCTL_TYPE: u8 = b'R';
const RESTOOL_SEND_MC_COMMAND_NR: u8 = 0xE0;

/// `_IOWR('R', 0xE0, struct mc_command)`.
const RESTOOL_SEND_MC_COMMAND: u64 =
    iowr(RESTOOL_IOCTL_TYPE, RESTOOL_SEND_MC_COMMAND_NR, COMMAND_SIZE);

const fn iowr(ty: u8, nr: u8, size: usize) -> u64 {
    const IOC_READ_WRITE: u64 = 3;
    (IOC_READ_WRITE << 30) | ((size as u64) << 16) | ((ty as u64) << 8) | nr as u64
}

/// The restool character device.
///
/// Each `send` is one `ioctl` that the kernel forwards to the MC portal and
/// blocks until the response is back.
pub struct McDevice {
    file: File,
    path: PathBuf,
}

impl McDevice {
    /// Open the device at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        info!(?path, "opened mc device");
        Ok(Self { file, path })
    }

    /// Open the default restool device.
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_DEVICE_PATH)
    }

    /// The device path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl McTransport for McDevice {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        let mut buf = *command;

        // SAFETY: `buf` is a live, writable `#[repr(C)]` 64-byte command
        // buffer, which is exactly what the ioctl reads and writes back.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                RESTOOL_SEND_MC_COMMAND as libc::Ioctl,
                (&mut buf as *mut McCommand).cast::<libc::c_void>(),
            )
        };
        if rc == 0 {
            return Ok(buf);
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error().and_then(status_from_errno) {
            // The driver turns a refused command into an errno and does not
            // copy the response back; restore the status it stood for.
            Some(status) => {
                debug!(errno = ?err.raw_os_error(), %status, "mc refused command");
                let mut response = *command;
                response.set_status(status);
                Ok(response)
            }
            None => Err(TransportError::Io(err)),
        }
    }

    fn transport_name(&self) -> &'static str {
        "restool-device"
    }
}

impl std::fmt::Debug for McDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McDevice").field("path", &self.path).finish()
    }
}

/// Kernel-internal "operation not supported"; the fsl-mc driver reports
/// an unsupported command with it rather than `EOPNOTSUPP`.
const ENOTSUPP: i32 = 524;

/// MC status a driver errno stands for. `EIO` is left to the transport: it
/// is also what a failed portal transfer reports.
fn status_from_errno(errno: i32) -> Option<McStatus> {
    match errno {
        libc::EACCES => Some(McStatus::AuthError),
        libc::EPERM => Some(McStatus::NoPrivilege),
        libc::ENXIO => Some(McStatus::ConfigError),
        libc::ETIMEDOUT => Some(McStatus::Timeout),
        libc::ENAVAIL => Some(McStatus::NoResource),
        libc::ENOMEM => Some(McStatus::NoMemory),
        libc::EBUSY => Some(McStatus::Busy),
        ENOTSUPP | libc::EOPNOTSUPP => Some(McStatus::UnsupportedOp),
        libc::ENODEV => Some(McStatus::InvalidState),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ioctl_number_matches_kernel_definition() {
        assert_eq!(RESTOOL_SEND_MC_COMMAND, 0xC040_52E0);
    }

    #[test]
    fn firmware_errnos_become_statuses() {
        assert_eq!(status_from_errno(libc::EACCES), Some(McStatus::AuthError));
        assert_eq!(status_from_errno(libc::EBUSY), Some(McStatus::Busy));
        assert_eq!(status_from_errno(libc::ENODEV), Some(McStatus::InvalidState));
        assert_eq!(status_from_errno(ENOTSUPP), Some(McStatus::UnsupportedOp));
        assert_eq!(status_from_errno(libc::EOPNOTSUPP), Some(McStatus::UnsupportedOp));
    }

    #[test]
    fn channel_errnos_stay_transport_errors() {
        assert_eq!(status_from_errno(libc::EIO), None);
        assert_eq!(status_from_errno(libc::EBADF), None);
        assert_eq!(status_from_errno(libc::EFAULT), None);
    }

    #[test]
    fn open_missing_device_fails() {
        let err = McDevice::open("/nonexistent/mc_restool").unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }
}
