use crate::cd::error::{CdError, CdResult};
use crate::cd::msf::Msf;
use crate::cd::{GAP_FRAMES, LEADOUT_TRACK, TRACK_MAX};
use bitflags::bitflags;

/// The type of a TOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Audio,
    Data,
    /// The virtual end-of-disc entry addressed by [`LEADOUT_TRACK`].
    Leadout,
}

impl TrackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Audio => "audio",
            TrackType::Data => "data",
            TrackType::Leadout => "leadout",
        }
    }
}

bitflags! {
    /// The 4-bit control field of a track. Meaning depends on the [`TrackType`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TrackFlags: u8 {
        /// Audio tracks only
        const QUAD_CHANNEL = 0b1000;
        const DATA_TRACK = 0b0100;
        const COPY_PERMITTED = 0b0010;
        /// Audio tracks: pre-emphasis applied
        const PREEMPHASIS = 0b0001;
        /// Data tracks: recorded incrementally
        const INCREMENTAL = 0b0001;
    }
}

/// Header of the table of contents: the first and last track numbers, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocHeader {
    pub first_track: u8,
    pub last_track: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInformation {
    /// [`LEADOUT_TRACK`] for the leadout entry
    pub track: u8,
    pub track_type: TrackType,
    pub flags: TrackFlags,
    /// Absolute logical block address of the first frame
    pub start_frame: u32,
}

impl TrackInformation {
    pub fn start_msf(&self) -> Msf {
        Msf::from_lba(self.start_frame)
    }

    pub fn is_leadout(&self) -> bool {
        self.track_type == TrackType::Leadout
    }
}

/// Tracks of a disc as read from its table of contents.
///
/// `tracks` holds one entry per track from `first_track` to `last_track` followed by the
/// leadout, whose start frame is the length of the disc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscInformation {
    pub first_track: u8,
    pub last_track: u8,
    pub tracks: Vec<TrackInformation>,
}

impl DiscInformation {
    /// Builds disc information, checking the shape a TOC read always produces.
    pub fn new(first_track: u8, last_track: u8, tracks: Vec<TrackInformation>) -> CdResult<Self> {
        if first_track > last_track || last_track > TRACK_MAX {
            return Err(CdError::InconsistentDisc(format!(
                "track range {first_track}..={last_track}"
            )));
        }

        let expected = (last_track - first_track) as usize + 2;
        if tracks.len() != expected {
            return Err(CdError::InconsistentDisc(format!(
                "expected {expected} TOC entries, got {}",
                tracks.len()
            )));
        }

        let (leadout, regular) = tracks.split_last().ok_or(CdError::MissingLeadout)?;
        if leadout.track != LEADOUT_TRACK || !leadout.is_leadout() {
            return Err(CdError::MissingLeadout);
        }

        for (expected_track, info) in (first_track..=last_track).zip(regular) {
            if info.track != expected_track || info.is_leadout() {
                return Err(CdError::InconsistentDisc(format!(
                    "expected track {expected_track}, got {}",
                    info.track
                )));
            }
        }

        if let Some(info) = tracks
            .iter()
            .find(|info| info.start_frame > u32::MAX - GAP_FRAMES)
        {
            return Err(CdError::InconsistentDisc(format!(
                "track {} starts at frame {}, past the addressable range",
                info.track, info.start_frame
            )));
        }

        Ok(Self {
            first_track,
            last_track,
            tracks,
        })
    }

    /// The trailing leadout entry, if the disc information is well formed.
    pub fn leadout(&self) -> Option<&TrackInformation> {
        self.tracks.last().filter(|track| track.is_leadout())
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &TrackInformation> {
        self.tracks
            .iter()
            .filter(|track| track.track_type == TrackType::Audio)
    }

    /// Number of real tracks, excluding the leadout.
    pub fn track_count(&self) -> usize {
        self.tracks.iter().filter(|track| !track.is_leadout()).count()
    }

    /// Length of the disc in frames, i.e. the leadout start frame.
    pub fn total_frames(&self) -> Option<u32> {
        self.leadout().map(|leadout| leadout.start_frame)
    }

    /// Number of frames from the start of `track` to the start of the next entry.
    pub fn track_length(&self, track: u8) -> Option<u32> {
        let position = self.tracks.iter().position(|info| info.track == track)?;
        let start = self.tracks.get(position)?.start_frame;
        let next = self.tracks.get(position + 1)?.start_frame;
        next.checked_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(track: u8, track_type: TrackType, start_frame: u32) -> TrackInformation {
        TrackInformation {
            track,
            track_type,
            flags: TrackFlags::empty(),
            start_frame,
        }
    }

    #[test]
    fn preemphasis_and_incremental_share_the_low_bit() {
        assert_eq!(TrackFlags::PREEMPHASIS.bits(), TrackFlags::INCREMENTAL.bits());
        assert_eq!(TrackFlags::all().bits(), 0x0F);
    }

    #[test]
    fn new_accepts_well_formed_toc() {
        let disc = DiscInformation::new(
            1,
            2,
            vec![
                track(1, TrackType::Audio, 0),
                track(2, TrackType::Data, 1000),
                track(LEADOUT_TRACK, TrackType::Leadout, 5000),
            ],
        )
        .unwrap();

        assert_eq!(disc.track_count(), 2);
        assert_eq!(disc.total_frames(), Some(5000));
        assert_eq!(disc.audio_tracks().count(), 1);
        assert_eq!(disc.track_length(1), Some(1000));
        assert_eq!(disc.track_length(2), Some(4000));
        assert_eq!(disc.track_length(LEADOUT_TRACK), None);
    }

    #[test]
    fn new_rejects_missing_leadout() {
        let result = DiscInformation::new(
            1,
            2,
            vec![track(1, TrackType::Audio, 0), track(2, TrackType::Audio, 10)],
        );
        assert!(result.is_err());

        let result = DiscInformation::new(
            1,
            1,
            vec![
                track(LEADOUT_TRACK, TrackType::Leadout, 10),
                track(1, TrackType::Audio, 0),
            ],
        );
        assert_eq!(result, Err(CdError::MissingLeadout));
    }

    #[test]
    fn new_rejects_out_of_order_tracks() {
        let result = DiscInformation::new(
            1,
            2,
            vec![
                track(2, TrackType::Audio, 0),
                track(1, TrackType::Audio, 10),
                track(LEADOUT_TRACK, TrackType::Leadout, 20),
            ],
        );
        assert!(matches!(result, Err(CdError::InconsistentDisc(_))));
    }

    #[test]
    fn new_rejects_start_frames_without_room_for_the_lead_in() {
        let result = DiscInformation::new(
            1,
            1,
            vec![
                track(1, TrackType::Audio, 0),
                track(LEADOUT_TRACK, TrackType::Leadout, u32::MAX - 10),
            ],
        );
        assert!(matches!(result, Err(CdError::InconsistentDisc(_))));

        let result = DiscInformation::new(
            1,
            1,
            vec![
                track(1, TrackType::Audio, 0),
                track(LEADOUT_TRACK, TrackType::Leadout, u32::MAX - GAP_FRAMES),
            ],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn start_msf_converts_lba() {
        let info = track(1, TrackType::Audio, 4500 + 75 + 1);
        assert_eq!(info.start_msf(), Msf::new(1, 1, 1));
    }
}
