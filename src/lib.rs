//! Query and control CD-ROM and CD audio drives.
//!
//! [`cd`] holds the value types read from a disc (positions, tracks, the table of contents)
//! and the MusicBrainz disc ID calculation. [`drive`] holds the [`drive::CdromDrive`]
//! interface and the platform backends behind [`drive::open_drive`].

pub mod cd;
pub mod drive;

pub use cd::{DiscInformation, Msf, TrackFlags, TrackIndex, TrackInformation, TrackType};
pub use drive::{CdromDrive, DriveError, DriveResult, DriveStatus, open_drive};
