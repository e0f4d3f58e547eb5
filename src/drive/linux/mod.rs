use crate::cd::{LEADOUT_TRACK, Msf, TRACK_MAX, TocHeader, TrackIndex, TrackInformation};
use crate::drive::error::{DriveError, DriveResult};
use crate::drive::handle::DriveHandle;
use crate::drive::{CdromDrive, DriveStatus};
use ioctl::*;
use log::{debug, info};
use models::{CdromPlayMsf, CdromTi, CdromTocEntry, CdromTocHdr};
use nix::libc::c_int;
use std::fs::OpenOptions;
use std::os::fd::{OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

pub mod ioctl;
pub mod models;

/// A CD-ROM drive driven through the `linux/cdrom.h` ioctl interface.
#[derive(Debug)]
pub struct LinuxCdromDrive {
    handle: DriveHandle,
}

impl LinuxCdromDrive {
    /// Opens `path` read-only. `O_NONBLOCK` lets the open succeed with no disc or an open
    /// tray.
    pub fn from_filename(path: impl AsRef<Path>) -> DriveResult<Self> {
        let path = path.as_ref();
        debug!("Opening CD-ROM drive {path:?}");

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(nix::libc::O_NONBLOCK)
            .open(path)?;

        // From here on the descriptor is owned by the handle, so any failure below closes it.
        Self::new(DriveHandle::owned(OwnedFd::from(file)))
    }

    /// Takes over an already open descriptor; it is closed with the drive.
    pub fn from_owned_fd(fd: OwnedFd) -> DriveResult<Self> {
        Self::new(DriveHandle::owned(fd))
    }

    /// Uses a descriptor that stays open, and owned by the caller, after the drive is gone.
    pub fn from_borrowed_fd(fd: RawFd) -> DriveResult<Self> {
        Self::new(DriveHandle::borrowed(fd))
    }

    fn new(handle: DriveHandle) -> DriveResult<Self> {
        let fd = handle.raw_fd()?;
        if fd < 0 {
            return Err(DriveError::InvalidArgument(format!(
                "invalid descriptor {fd}"
            )));
        }

        Ok(Self { handle })
    }

    /// The raw descriptor used to talk to the drive.
    pub fn handle(&self) -> DriveResult<RawFd> {
        self.handle.raw_fd()
    }

    /// Whether the descriptor is closed when this drive is released or dropped.
    pub fn owned(&self) -> bool {
        self.handle.is_owned()
    }

    /// Gives up the descriptor now rather than on drop. Later commands fail with
    /// [`DriveError::Released`].
    pub fn release(&mut self) {
        self.handle.release();
    }

    /// Whether the disc in the current slot changed since the last call.
    pub fn media_changed(&mut self) -> DriveResult<bool> {
        let changed = ioctl_int(self.handle.raw_fd()?, CDROM_MEDIA_CHANGED, CDSL_CURRENT)?;
        Ok(changed != 0)
    }

    fn command(&mut self, request: u32) -> DriveResult<()> {
        ioctl_none(self.handle.raw_fd()?, request)?;
        Ok(())
    }
}

/// Maps a `CDROM_DRIVE_STATUS` result onto [`DriveStatus`].
pub fn drive_status_from_code(code: c_int) -> DriveStatus {
    match code {
        CDS_NO_DISC => DriveStatus::NoDisc,
        CDS_TRAY_OPEN => DriveStatus::TrayOpen,
        CDS_DRIVE_NOT_READY => DriveStatus::NotReady,
        CDS_DISC_OK => DriveStatus::Ok,
        CDS_NO_INFO => DriveStatus::Unknown,
        other => {
            debug!("Unrecognized drive status code {other}");
            DriveStatus::Unknown
        }
    }
}

impl CdromDrive for LinuxCdromDrive {
    fn play(&mut self) -> DriveResult<()> {
        self.command(CDROMRESUME)
    }

    fn pause(&mut self) -> DriveResult<()> {
        self.command(CDROMPAUSE)
    }

    fn stop(&mut self) -> DriveResult<()> {
        self.command(CDROMSTOP)
    }

    fn play_msf(&mut self, start: Msf, end: Msf) -> DriveResult<()> {
        let record = CdromPlayMsf::new(start, end)?;
        info!("Playing {start} to {end}");
        ioctl_record(self.handle.raw_fd()?, CDROMPLAYMSF, &record)?;
        Ok(())
    }

    fn play_track_index(&mut self, start: TrackIndex, end: TrackIndex) -> DriveResult<()> {
        if end < start {
            return Err(DriveError::InvalidArgument(format!(
                "play range {}.{} to {}.{} is reversed",
                start.track(),
                start.index(),
                end.track(),
                end.index()
            )));
        }

        info!(
            "Playing track {} index {} to track {} index {}",
            start.track(),
            start.index(),
            end.track(),
            end.index()
        );
        ioctl_record(self.handle.raw_fd()?, CDROMPLAYTRKIND, &CdromTi::from((start, end)))?;
        Ok(())
    }

    fn seek(&mut self, position: Msf) -> DriveResult<()> {
        if !position.is_valid() {
            return Err(DriveError::InvalidPosition(position));
        }

        // CDROMSEEK is accepted by the cdrom layer but the SCSI driver answers EINVAL, and a
        // SEEK through SG_IO needs root.
        debug!("Refusing CDROMSEEK ({CDROMSEEK:#06x}) to {position}");
        Err(DriveError::Unsupported("Seeking on Linux"))
    }

    fn eject(&mut self) -> DriveResult<()> {
        self.command(CDROMEJECT)
    }

    fn close_tray(&mut self) -> DriveResult<()> {
        self.command(CDROMCLOSETRAY)
    }

    fn lock(&mut self) -> DriveResult<()> {
        ioctl_int(self.handle.raw_fd()?, CDROM_LOCKDOOR, 1)?;
        Ok(())
    }

    fn unlock(&mut self) -> DriveResult<()> {
        ioctl_int(self.handle.raw_fd()?, CDROM_LOCKDOOR, 0)?;
        Ok(())
    }

    fn reset(&mut self) -> DriveResult<()> {
        self.command(CDROMRESET)
    }

    fn slot_count(&mut self) -> DriveResult<u32> {
        let slots = ioctl_none(self.handle.raw_fd()?, CDROM_CHANGER_NSLOTS)?;
        Ok(slots as u32)
    }

    fn select_slot(&mut self, slot: u32) -> DriveResult<()> {
        let slot = c_int::try_from(slot)
            .ok()
            .filter(|slot| *slot < CDSL_NONE)
            .ok_or_else(|| DriveError::InvalidArgument(format!("slot {slot} is out of range")))?;

        ioctl_int(self.handle.raw_fd()?, CDROM_SELECT_DISC, slot)?;
        Ok(())
    }

    fn get_status(&mut self) -> DriveResult<DriveStatus> {
        let code = ioctl_int(self.handle.raw_fd()?, CDROM_DRIVE_STATUS, CDSL_CURRENT)?;
        Ok(drive_status_from_code(code))
    }

    fn get_toc_header(&mut self) -> DriveResult<TocHeader> {
        let hdr = ioctl_record(
            self.handle.raw_fd()?,
            CDROMREADTOCHDR,
            &CdromTocHdr::default(),
        )?;
        Ok(hdr.into())
    }

    fn get_track_information(&mut self, track: u8) -> DriveResult<TrackInformation> {
        if track > TRACK_MAX && track != LEADOUT_TRACK {
            return Err(DriveError::InvalidArgument(format!(
                "track must be between 0 and {TRACK_MAX} or the leadout: {track}"
            )));
        }

        let entry = ioctl_record(
            self.handle.raw_fd()?,
            CDROMREADTOCENTRY,
            &CdromTocEntry::lba_request(track),
        )?;

        entry.decode(track)
    }
}
