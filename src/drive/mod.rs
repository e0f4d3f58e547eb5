use crate::cd::{DiscInformation, LEADOUT_TRACK, Msf, TocHeader, TrackIndex, TrackInformation};
use log::debug;
use std::path::Path;

pub mod error;
#[cfg(target_os = "linux")]
pub mod handle;
#[cfg(target_os = "linux")]
pub mod linux;

pub use error::{DriveError, DriveResult};

/// Status of a drive, or of the selected slot on a multi-slot drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveStatus {
    Ok,
    Unknown,
    NoDisc,
    TrayOpen,
    NotReady,
}

impl DriveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveStatus::Ok => "ok",
            DriveStatus::Unknown => "unknown",
            DriveStatus::NoDisc => "no disc",
            DriveStatus::TrayOpen => "tray open",
            DriveStatus::NotReady => "not ready",
        }
    }
}

/// Operations a CD-ROM drive backend provides.
///
/// Every call blocks until the device answers. Commands against one drive must not overlap,
/// which `&mut self` enforces; share a drive between threads behind a lock.
///
/// Nothing here is transactional: a disc swapped between [`CdromDrive::get_status`] and
/// [`CdromDrive::get_disc_information`] yields information about the new disc, and a swap in
/// the middle of a TOC read can mix entries of both discs.
pub trait CdromDrive {
    /// Starts or resumes audio playback.
    fn play(&mut self) -> DriveResult<()>;

    /// Plays audio from `start` up to `end`.
    fn play_msf(&mut self, _start: Msf, _end: Msf) -> DriveResult<()> {
        Err(DriveError::Unsupported("Playing a position range"))
    }

    /// Plays audio from `start` up to `end`, both given as track and index.
    fn play_track_index(&mut self, _start: TrackIndex, _end: TrackIndex) -> DriveResult<()> {
        Err(DriveError::Unsupported("Playing a track range"))
    }

    fn pause(&mut self) -> DriveResult<()>;

    /// Stops audio playback and spins down the disc.
    fn stop(&mut self) -> DriveResult<()>;

    /// Seeks to `position`. Invalid positions are rejected before reaching the device.
    fn seek(&mut self, position: Msf) -> DriveResult<()>;

    /// Ejects the disc from the drive or current slot. Some drives close an open tray instead.
    fn eject(&mut self) -> DriveResult<()>;

    fn close_tray(&mut self) -> DriveResult<()>;

    /// Locks the tray so the disc cannot be ejected.
    fn lock(&mut self) -> DriveResult<()>;

    fn unlock(&mut self) -> DriveResult<()>;

    /// Resets the drive. What this does is drive dependent and it may need elevated
    /// privileges.
    fn reset(&mut self) -> DriveResult<()>;

    /// Number of slots in the drive; 1 unless the drive is a changer.
    fn slot_count(&mut self) -> DriveResult<u32> {
        Ok(1)
    }

    fn select_slot(&mut self, _slot: u32) -> DriveResult<()> {
        Err(DriveError::Unsupported("Changing slots"))
    }

    /// Status of the drive or selected slot. Codes the backend does not know map to
    /// [`DriveStatus::Unknown`].
    fn get_status(&mut self) -> DriveResult<DriveStatus>;

    /// Reads the first and last track numbers from the TOC.
    fn get_toc_header(&mut self) -> DriveResult<TocHeader>;

    /// Reads the TOC entry of `track`, or of the leadout for [`LEADOUT_TRACK`].
    fn get_track_information(&mut self, track: u8) -> DriveResult<TrackInformation>;

    /// Reads the whole TOC: every track from first to last, then the leadout.
    fn get_disc_information(&mut self) -> DriveResult<DiscInformation> {
        let header = self.get_toc_header()?;
        debug!(
            "TOC spans tracks {} to {}",
            header.first_track, header.last_track
        );

        let mut tracks = Vec::new();
        if header.first_track <= header.last_track {
            tracks.reserve((header.last_track - header.first_track) as usize + 2);
            for track in header.first_track..=header.last_track {
                tracks.push(self.get_track_information(track)?);
            }
        }
        tracks.push(self.get_track_information(LEADOUT_TRACK)?);

        Ok(DiscInformation::new(
            header.first_track,
            header.last_track,
            tracks,
        )?)
    }
}

/// Opens the drive at `path` with the backend for the running platform.
#[cfg(target_os = "linux")]
pub fn open_drive(path: impl AsRef<Path>) -> DriveResult<Box<dyn CdromDrive + Send>> {
    Ok(Box::new(linux::LinuxCdromDrive::from_filename(path)?))
}

/// Opens the drive at `path` with the backend for the running platform.
#[cfg(not(target_os = "linux"))]
pub fn open_drive(path: impl AsRef<Path>) -> DriveResult<Box<dyn CdromDrive + Send>> {
    debug!("No drive backend for {:?}", path.as_ref());
    Err(DriveError::PlatformUnsupported(std::env::consts::OS.to_string()))
}
