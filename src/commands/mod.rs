use crate::commands::transport::{PlayCommand, SeekCommand, SelectSlotCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod report;
pub mod transport;

/// CLI for inspecting and controlling CD-ROM drives.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the CD-ROM device
    #[arg(
        long,
        short = 'd',
        value_name = "DEVICE",
        env = "CDROM_DEVICE",
        default_value = "/dev/cdrom",
        global = true
    )]
    pub device: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the drive status
    Status,
    /// List the tracks on the disc
    Toc,
    /// Print the MusicBrainz disc ID and lookup TOC of the disc
    DiscId,
    /// Start or resume playback, optionally of a range
    Play(PlayCommand),
    /// Pause playback
    Pause,
    /// Stop playback and spin down the disc
    Stop,
    /// Seek to a position
    Seek(SeekCommand),
    /// Eject the disc
    Eject,
    /// Close the tray
    Close,
    /// Lock the tray
    Lock,
    /// Unlock the tray
    Unlock,
    /// Reset the drive (may need elevated privileges)
    Reset,
    /// Show the number of slots in the drive
    Slots,
    /// Select a slot on a disc changer
    SelectSlot(SelectSlotCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdctl::cd::Msf;

    #[test]
    fn parses_device_and_subcommand() {
        let cli = Cli::try_parse_from(["cdctl", "--device", "/dev/sr1", "toc"]).unwrap();
        assert_eq!(cli.device, PathBuf::from("/dev/sr1"));
        assert_eq!(cli.command, Commands::Toc);
    }

    #[test]
    fn parses_seek_position() {
        let cli = Cli::try_parse_from(["cdctl", "seek", "01:02:03"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Seek(SeekCommand {
                position: Msf::new(1, 2, 3)
            })
        );

        assert!(Cli::try_parse_from(["cdctl", "seek", "01:60:00"]).is_err());
    }

    #[test]
    fn parses_play_ranges() {
        let cli = Cli::try_parse_from(["cdctl", "play", "--track", "2", "--to-track", "4"]).unwrap();
        let Commands::Play(play) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(play.track, Some(2));
        assert_eq!(play.to_track, Some(4));
        assert!(play.from.is_none());

        assert!(Cli::try_parse_from(["cdctl", "play", "--from", "00:02:00", "--track", "1"]).is_err());
    }
}
