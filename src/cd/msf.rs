use crate::cd::error::{CdError, CdResult};
use crate::cd::{FRAMES_PER_MINUTE, FRAMES_PER_SECOND, INDEX_MAX, SECONDS_PER_MINUTE, TRACK_MAX};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Position on a disc specified in minutes, seconds and frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Msf {
    pub minute: u32,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    pub const fn new(minute: u32, second: u8, frame: u8) -> Self {
        Self {
            minute,
            second,
            frame,
        }
    }

    /// Converts this position to a logical block address, i.e. a pure frame count.
    ///
    /// Saturates at `u32::MAX` for positions that fail [`Msf::is_valid`].
    pub fn to_lba(&self) -> u32 {
        self.checked_lba().unwrap_or(u32::MAX)
    }

    fn checked_lba(&self) -> Option<u32> {
        self.minute
            .checked_mul(FRAMES_PER_MINUTE)?
            .checked_add(self.second as u32 * FRAMES_PER_SECOND)?
            .checked_add(self.frame as u32)
    }

    pub fn from_lba(lba: u32) -> Self {
        let minute = lba / FRAMES_PER_MINUTE;
        let remainder = lba % FRAMES_PER_MINUTE;

        Self {
            minute,
            second: (remainder / FRAMES_PER_SECOND) as u8,
            frame: (remainder % FRAMES_PER_SECOND) as u8,
        }
    }

    /// `second < 60`, `frame < 75`, and the position fits in a `u32` frame count.
    pub fn is_valid(&self) -> bool {
        (self.second as u32) < SECONDS_PER_MINUTE
            && (self.frame as u32) < FRAMES_PER_SECOND
            && self.checked_lba().is_some()
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}

impl FromStr for Msf {
    type Err = CdError;

    /// Parses `MM:SS:FF`, rejecting out-of-range seconds and frames.
    fn from_str(s: &str) -> CdResult<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(CdError::InvalidMsf(s.to_string()));
        }

        let invalid = |_: ParseIntError| CdError::InvalidMsf(s.to_string());
        let msf = Msf {
            minute: parts[0].parse().map_err(invalid)?,
            second: parts[1].parse().map_err(invalid)?,
            frame: parts[2].parse().map_err(invalid)?,
        };

        if !msf.is_valid() {
            return Err(CdError::InvalidMsf(s.to_string()));
        }

        Ok(msf)
    }
}

/// Position on a disc specified as a track and an index within that track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackIndex {
    track: u8,
    index: u8,
}

impl TrackIndex {
    pub fn new(track: u8, index: u8) -> CdResult<Self> {
        if track > TRACK_MAX {
            return Err(CdError::InvalidTrack(track));
        }

        if index > INDEX_MAX {
            return Err(CdError::InvalidIndex(index));
        }

        Ok(Self { track, index })
    }

    pub fn track(&self) -> u8 {
        self.track
    }

    pub fn index(&self) -> u8 {
        self.index
    }
}
