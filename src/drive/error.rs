use crate::cd::{CdError, Msf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    CdError(#[from] CdError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Position is invalid: {0}")]
    InvalidPosition(Msf),

    #[error("{0} is not supported on this device or platform")]
    Unsupported(&'static str),

    #[error("Device control request failed: {message} (errno {errno})")]
    Device { errno: i32, message: String },

    #[error("Cannot instantiate a CD-ROM drive on platform {0}")]
    PlatformUnsupported(String),

    #[error("Drive handle has already been released")]
    Released,
}

#[cfg(target_os = "linux")]
impl From<nix::errno::Errno> for DriveError {
    fn from(errno: nix::errno::Errno) -> Self {
        DriveError::Device {
            errno: errno as i32,
            message: errno.desc().to_string(),
        }
    }
}

pub type DriveResult<T> = Result<T, DriveError>;
