use crate::drive::error::{DriveError, DriveResult};
use log::debug;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

#[derive(Debug)]
enum HandleState {
    Owned(OwnedFd),
    Borrowed(RawFd),
    Released,
}

/// Descriptor of an opened drive.
///
/// An owned descriptor is closed exactly once, either by [`DriveHandle::release`] or on drop.
/// A borrowed descriptor is never closed. Once released, the handle refuses further use.
#[derive(Debug)]
pub struct DriveHandle {
    state: HandleState,
}

impl DriveHandle {
    pub fn owned(fd: OwnedFd) -> Self {
        Self {
            state: HandleState::Owned(fd),
        }
    }

    /// Wraps a descriptor owned by someone else; it stays open when this handle goes away.
    pub fn borrowed(fd: RawFd) -> Self {
        Self {
            state: HandleState::Borrowed(fd),
        }
    }

    pub fn raw_fd(&self) -> DriveResult<RawFd> {
        match &self.state {
            HandleState::Owned(fd) => Ok(fd.as_raw_fd()),
            HandleState::Borrowed(fd) => Ok(*fd),
            HandleState::Released => Err(DriveError::Released),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.state, HandleState::Owned(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.state, HandleState::Released)
    }

    /// Gives up the descriptor, closing it if owned. Releasing twice is a no-op.
    pub fn release(&mut self) {
        match std::mem::replace(&mut self.state, HandleState::Released) {
            HandleState::Owned(fd) => {
                debug!("Closing drive descriptor {}", fd.as_raw_fd());
                drop(fd);
            }
            HandleState::Borrowed(fd) => debug!("Detaching from borrowed descriptor {fd}"),
            HandleState::Released => {}
        }
    }
}
