use crate::commands::Commands;
use crate::commands::transport::PlayCommand;
use anyhow::Result;
use cdctl::cd::{DiscInformation, Msf, TrackFlags, TrackIndex, TrackInformation, TrackType};
use cdctl::drive::{CdromDrive, DriveError};
use log::info;

/// Runs one CLI command against an opened drive and returns what should be printed.
pub fn execute(drive: &mut dyn CdromDrive, command: &Commands) -> Result<String> {
    let output = match command {
        Commands::Status => format!("Drive status: {}", drive.get_status()?.as_str()),
        Commands::Toc => format_toc(&drive.get_disc_information()?),
        Commands::DiscId => {
            let disc = drive.get_disc_information()?;
            format!(
                "Disc ID: {}\nTOC: {}",
                disc.musicbrainz_id()?,
                disc.toc_string()?
            )
        }
        Commands::Play(cmd) => {
            play(drive, cmd)?;
            "Playing".to_string()
        }
        Commands::Pause => {
            drive.pause()?;
            "Paused".to_string()
        }
        Commands::Stop => {
            drive.stop()?;
            "Stopped".to_string()
        }
        Commands::Seek(cmd) => {
            drive.seek(cmd.position)?;
            format!("Seeked to {}", cmd.position)
        }
        Commands::Eject => {
            drive.eject()?;
            "Ejected".to_string()
        }
        Commands::Close => {
            drive.close_tray()?;
            "Tray closed".to_string()
        }
        Commands::Lock => {
            drive.lock()?;
            "Tray locked".to_string()
        }
        Commands::Unlock => {
            drive.unlock()?;
            "Tray unlocked".to_string()
        }
        Commands::Reset => {
            drive.reset()?;
            "Drive reset".to_string()
        }
        Commands::Slots => format!("Slots: {}", drive.slot_count()?),
        Commands::SelectSlot(cmd) => {
            drive.select_slot(cmd.slot)?;
            format!("Selected slot {}", cmd.slot)
        }
    };

    Ok(output)
}

fn play(drive: &mut dyn CdromDrive, cmd: &PlayCommand) -> Result<()> {
    match (cmd.from, cmd.to, cmd.track) {
        (Some(from), Some(to), _) => drive.play_msf(from, to)?,
        (_, _, Some(track)) => {
            let start = TrackIndex::new(track, 1)?;
            let end = TrackIndex::new(cmd.to_track.unwrap_or(track), 1)?;
            drive.play_track_index(start, end)?
        }
        _ => {
            info!("Resuming playback");
            drive.play()?
        }
    }

    Ok(())
}

pub fn format_toc(disc: &DiscInformation) -> String {
    let mut lines = vec![format!(
        "Tracks {} to {}, {} total",
        disc.first_track,
        disc.last_track,
        disc.total_frames()
            .map(|frames| Msf::from_lba(frames).to_string())
            .unwrap_or_else(|| "unknown length".to_string())
    )];
    lines.push(format!(
        "{:>5}  {:<7}  {:>8}  {:>8}  {:>8}  {}",
        "Track", "Type", "Start", "LBA", "Length", "Flags"
    ));

    for track in &disc.tracks {
        let number = if track.is_leadout() {
            "lead".to_string()
        } else {
            track.track.to_string()
        };
        let length = disc
            .track_length(track.track)
            .map(|frames| Msf::from_lba(frames).to_string())
            .unwrap_or_default();

        lines.push(format!(
            "{:>5}  {:<7}  {:>8}  {:>8}  {:>8}  {}",
            number,
            track.track_type.as_str(),
            track.start_msf().to_string(),
            track.start_frame,
            length,
            describe_flags(track)
        ));
    }

    lines.join("\n")
}

fn describe_flags(track: &TrackInformation) -> String {
    let mut names = Vec::new();
    match track.track_type {
        TrackType::Audio => {
            if track.flags.contains(TrackFlags::QUAD_CHANNEL) {
                names.push("quad");
            }
            if track.flags.contains(TrackFlags::PREEMPHASIS) {
                names.push("preemphasis");
            }
        }
        TrackType::Data => {
            if track.flags.contains(TrackFlags::INCREMENTAL) {
                names.push("incremental");
            }
        }
        TrackType::Leadout => {}
    }
    if track.flags.contains(TrackFlags::COPY_PERMITTED) {
        names.push("copy");
    }

    names.join(",")
}

/// Whether an error means the drive cannot do what was asked, rather than that it failed.
pub fn is_unsupported(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::Unsupported(_) | DriveError::PlatformUnsupported(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdctl::cd::LEADOUT_TRACK;

    fn disc() -> DiscInformation {
        DiscInformation::new(
            1,
            2,
            vec![
                TrackInformation {
                    track: 1,
                    track_type: TrackType::Audio,
                    flags: TrackFlags::PREEMPHASIS | TrackFlags::COPY_PERMITTED,
                    start_frame: 0,
                },
                TrackInformation {
                    track: 2,
                    track_type: TrackType::Data,
                    flags: TrackFlags::INCREMENTAL,
                    start_frame: 4500,
                },
                TrackInformation {
                    track: LEADOUT_TRACK,
                    track_type: TrackType::Leadout,
                    flags: TrackFlags::empty(),
                    start_frame: 9075,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn toc_lists_every_entry() {
        let toc = format_toc(&disc());
        let lines: Vec<&str> = toc.lines().collect();

        assert_eq!(lines.len(), 2 + 3);
        assert!(lines[0].contains("02:01:00 total"));
        assert!(lines[2].contains("preemphasis,copy"));
        assert!(lines[3].contains("incremental"));
        assert!(lines[3].contains("01:00:00"));
        assert!(lines[4].trim_start().starts_with("lead"));
    }

    #[test]
    fn unsupported_errors_are_recognized() {
        let err = anyhow::Error::from(DriveError::Unsupported("Seeking on Linux"));
        assert!(is_unsupported(&err));

        let err = anyhow::Error::from(DriveError::Released);
        assert!(!is_unsupported(&err));
    }
}
