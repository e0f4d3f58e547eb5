//! MusicBrainz disc ID calculation.
//!
//! Reference: <https://musicbrainz.org/doc/Disc_ID_Calculation>

use crate::cd::GAP_FRAMES;
use crate::cd::error::{CdError, CdResult};
use crate::cd::models::{DiscInformation, TrackInformation};
use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use log::debug;
use sha1::{Digest, Sha1};

/// The hash always covers this many track offsets; missing ones are zero.
const OFFSET_SLOTS: usize = 99;

const MUSICBRAINZ_ALPHABET: Alphabet =
    match Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid base64 alphabet"),
    };

const MUSICBRAINZ_BASE64: GeneralPurpose = GeneralPurpose::new(&MUSICBRAINZ_ALPHABET, PAD);

pub const DISC_ID_LEN: usize = 28;

impl DiscInformation {
    /// Computes the 28 character MusicBrainz disc ID.
    ///
    /// Fails if the last entry is not the leadout.
    pub fn musicbrainz_id(&self) -> CdResult<String> {
        let leadout = self.leadout().ok_or(CdError::MissingLeadout)?;

        let mut hasher = Sha1::new();
        hasher.update(format!(
            "{:02X}{:02X}{:08X}",
            self.first_track,
            self.last_track,
            offset(leadout)?
        ));

        let mut audio_tracks = 0;
        for track in self.audio_tracks() {
            hasher.update(format!("{:08X}", offset(track)?));
            audio_tracks += 1;
        }

        for _ in audio_tracks..OFFSET_SLOTS {
            hasher.update(b"00000000");
        }

        let digest = hasher.finalize();
        let id = MUSICBRAINZ_BASE64.encode(digest).replace('=', "-");
        debug!("Computed disc id {id} from {audio_tracks} audio tracks");

        Ok(id)
    }

    /// Renders the TOC in the `first+last+leadout+offset...` form used for fuzzy
    /// MusicBrainz lookups.
    ///
    /// Offsets include the lead-in gap. Every track from `first` to `last` is listed, data
    /// tracks included, so the lookup sees `last - first + 1` offsets.
    pub fn toc_string(&self) -> CdResult<String> {
        let leadout = self.leadout().ok_or(CdError::MissingLeadout)?;

        let mut parts = vec![
            self.first_track.to_string(),
            self.last_track.to_string(),
            offset(leadout)?.to_string(),
        ];
        for track in self.tracks.iter().filter(|track| !track.is_leadout()) {
            parts.push(offset(track)?.to_string());
        }

        Ok(parts.join("+"))
    }
}

fn offset(track: &TrackInformation) -> CdResult<u32> {
    track.start_frame.checked_add(GAP_FRAMES).ok_or_else(|| {
        CdError::InconsistentDisc(format!(
            "track {} start frame {} overflows with the lead-in",
            track.track, track.start_frame
        ))
    })
}
