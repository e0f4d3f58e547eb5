pub mod disc_id;
pub mod error;
pub mod models;
pub mod msf;

pub use error::{CdError, CdResult};
pub use models::{DiscInformation, TocHeader, TrackFlags, TrackInformation, TrackType};
pub use msf::{Msf, TrackIndex};

pub const SECONDS_PER_MINUTE: u32 = 60;
pub const FRAMES_PER_SECOND: u32 = 75;
pub const FRAMES_PER_MINUTE: u32 = FRAMES_PER_SECOND * SECONDS_PER_MINUTE;

/// Bytes per frame without error correction headers
pub const BYTES_PER_FRAME: usize = 2048;
/// Bytes per frame with sync, header and error correction data
pub const BYTES_PER_FRAME_RAW: usize = 2352;

/// Standard lead-in gap in frames (two seconds).
pub const GAP_FRAMES: u32 = 150;

pub const TRACK_MAX: u8 = 99;
pub const INDEX_MAX: u8 = 99;

/// Track identifier reserved for the virtual end-of-disc entry.
pub const LEADOUT_TRACK: u8 = 0xAA;
