use cdctl::cd::Msf;
use clap::Parser;

/// Starts or resumes playback.
///
/// Without arguments this resumes. With a range it needs the Linux backend.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct PlayCommand {
    /// Start position (MM:SS:FF)
    #[arg(long, value_name = "MSF", requires = "to", conflicts_with_all = ["track", "to_track"])]
    pub from: Option<Msf>,

    /// End position (MM:SS:FF)
    #[arg(long, value_name = "MSF", requires = "from")]
    pub to: Option<Msf>,

    /// First track to play, from index 1
    #[arg(long, value_name = "TRACK")]
    pub track: Option<u8>,

    /// Last track to play, defaults to the first one
    #[arg(long, value_name = "TRACK", requires = "track")]
    pub to_track: Option<u8>,
}

/// Seeks to a position.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct SeekCommand {
    /// Target position (MM:SS:FF)
    #[arg(value_name = "MSF")]
    pub position: Msf,
}

/// Selects a slot on a disc changer.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct SelectSlotCommand {
    /// Slot number, starting at 0
    #[arg(value_name = "SLOT")]
    pub slot: u32,
}
