//! Byte layouts of the `linux/cdrom.h` structures exchanged through ioctl.
//!
//! Every record is read and written little-endian with explicit padding so that the encoded
//! bytes match the C layout on x86 and other little-endian Linux ABIs. The kernel copies
//! exactly `SIZE` bytes in and out of the buffer we hand it.

use crate::cd::{LEADOUT_TRACK, Msf, TocHeader, TrackFlags, TrackIndex, TrackInformation, TrackType};
use crate::drive::error::{DriveError, DriveResult};
use crate::drive::linux::ioctl::{CDROM_DATA_TRACK, CDROM_LBA, CDROM_MSF};
use binrw::{BinRead, BinWrite};

/// A structure that can be passed to the kernel by reference.
pub trait IoctlRecord: for<'a> BinRead<Args<'a> = ()> + for<'a> BinWrite<Args<'a> = ()> {
    /// `sizeof` of the C structure, padding included.
    const SIZE: usize;
}

/// `struct cdrom_tochdr`
///
/// | offset | field       |
/// |--------|-------------|
/// | 0      | `cdth_trk0` |
/// | 1      | `cdth_trk1` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct CdromTocHdr {
    pub first_track: u8,
    pub last_track: u8,
}

impl IoctlRecord for CdromTocHdr {
    const SIZE: usize = 2;
}

impl From<CdromTocHdr> for TocHeader {
    fn from(hdr: CdromTocHdr) -> Self {
        TocHeader {
            first_track: hdr.first_track,
            last_track: hdr.last_track,
        }
    }
}

/// `union cdrom_addr`, 4 bytes, selected by `cdte_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(import(format: u8))]
pub enum CdromAddr {
    /// `struct cdrom_msf0`: three bytes followed by one byte of union padding
    #[br(pre_assert(format == CDROM_MSF))]
    Msf {
        minute: u8,
        second: u8,
        #[brw(pad_after = 1)]
        frame: u8,
    },
    #[br(pre_assert(format == CDROM_LBA))]
    Lba(i32),
}

/// `struct cdrom_tocentry`, used for both the request and the response.
///
/// | offset | field           |
/// |--------|-----------------|
/// | 0      | `cdte_track`    |
/// | 1      | `cdte_adr` (bits 0-3), `cdte_ctrl` (bits 4-7) |
/// | 2      | `cdte_format`   |
/// | 3      | padding         |
/// | 4      | `cdte_addr`     |
/// | 8      | `cdte_datamode` |
/// | 9      | padding to 12   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct CdromTocEntry {
    pub track: u8,
    pub adr_ctrl: u8,
    #[brw(pad_after = 1)]
    pub format: u8,
    #[br(args(format))]
    pub addr: CdromAddr,
    #[brw(pad_after = 3)]
    pub datamode: u8,
}

impl IoctlRecord for CdromTocEntry {
    const SIZE: usize = 12;
}

impl CdromTocEntry {
    /// A request for `track` with the address returned in logical block form.
    pub fn lba_request(track: u8) -> Self {
        Self {
            track,
            adr_ctrl: 0,
            format: CDROM_LBA,
            addr: CdromAddr::Lba(0),
            datamode: 0,
        }
    }

    /// The ADR field, low nibble.
    pub fn adr(&self) -> u8 {
        self.adr_ctrl & 0x0F
    }

    /// The control field, high nibble.
    pub fn ctrl(&self) -> u8 {
        (self.adr_ctrl & 0xF0) >> 4
    }

    pub fn start_frame(&self) -> DriveResult<u32> {
        let lba = match self.addr {
            CdromAddr::Lba(lba) => lba,
            CdromAddr::Msf {
                minute,
                second,
                frame,
            } => Msf::new(minute as u32, second, frame).to_lba() as i32,
        };

        u32::try_from(lba).map_err(|_| {
            DriveError::InvalidArgument(format!("track {} starts at negative LBA {lba}", self.track))
        })
    }

    /// Decodes a returned entry for the queried `track`.
    ///
    /// Flags are dropped for the leadout, reduced to the incremental bit for data tracks, and
    /// kept whole for audio tracks.
    pub fn decode(&self, track: u8) -> DriveResult<TrackInformation> {
        let ctrl = self.ctrl();

        let (track_type, flags) = if track == LEADOUT_TRACK {
            (TrackType::Leadout, TrackFlags::empty())
        } else if ctrl & CDROM_DATA_TRACK != 0 {
            (
                TrackType::Data,
                TrackFlags::from_bits_truncate(ctrl) & TrackFlags::INCREMENTAL,
            )
        } else {
            (TrackType::Audio, TrackFlags::from_bits_truncate(ctrl))
        };

        Ok(TrackInformation {
            track,
            track_type,
            flags,
            start_frame: self.start_frame()?,
        })
    }
}

/// `struct cdrom_msf`, the start and end of a `CDROMPLAYMSF` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct CdromPlayMsf {
    pub start_minute: u8,
    pub start_second: u8,
    pub start_frame: u8,
    pub end_minute: u8,
    pub end_second: u8,
    pub end_frame: u8,
}

impl IoctlRecord for CdromPlayMsf {
    const SIZE: usize = 6;
}

impl CdromPlayMsf {
    pub fn new(start: Msf, end: Msf) -> DriveResult<Self> {
        for position in [start, end] {
            if !position.is_valid() || position.minute > u8::MAX as u32 {
                return Err(DriveError::InvalidPosition(position));
            }
        }

        if end <= start {
            return Err(DriveError::InvalidArgument(format!(
                "play range {start}..{end} is empty"
            )));
        }

        Ok(Self {
            start_minute: start.minute as u8,
            start_second: start.second,
            start_frame: start.frame,
            end_minute: end.minute as u8,
            end_second: end.second,
            end_frame: end.frame,
        })
    }
}

/// `struct cdrom_ti`, the start and end of a `CDROMPLAYTRKIND` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct CdromTi {
    pub start_track: u8,
    pub start_index: u8,
    pub end_track: u8,
    pub end_index: u8,
}

impl IoctlRecord for CdromTi {
    const SIZE: usize = 4;
}

impl From<(TrackIndex, TrackIndex)> for CdromTi {
    fn from((start, end): (TrackIndex, TrackIndex)) -> Self {
        Self {
            start_track: start.track(),
            start_index: start.index(),
            end_track: end.track(),
            end_index: end.index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn entry_bytes(track: u8, adr_ctrl: u8, lba: i32) -> Vec<u8> {
        let mut bytes = vec![track, adr_ctrl, CDROM_LBA, 0];
        bytes.extend_from_slice(&lba.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    fn read_entry(bytes: &[u8]) -> CdromTocEntry {
        CdromTocEntry::read(&mut Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn toc_entry_request_matches_c_layout() {
        let mut buf = Vec::new();
        CdromTocEntry::lba_request(5)
            .write(&mut Cursor::new(&mut buf))
            .unwrap();

        assert_eq!(buf.len(), CdromTocEntry::SIZE);
        assert_eq!(buf, entry_bytes(5, 0, 0));
    }

    #[test]
    fn toc_entry_reads_lba_union() {
        let entry = read_entry(&entry_bytes(3, 0x41, 0x0001_2345));

        assert_eq!(entry.track, 3);
        assert_eq!(entry.adr(), 0x1);
        assert_eq!(entry.ctrl(), 0x4);
        assert_eq!(entry.addr, CdromAddr::Lba(0x0001_2345));
        assert_eq!(entry.start_frame().unwrap(), 0x0001_2345);
    }

    #[test]
    fn toc_entry_reads_msf_union() {
        let bytes = [7, 0x10, CDROM_MSF, 0, 2, 30, 10, 0, 0, 0, 0, 0];
        let entry = read_entry(&bytes);

        assert_eq!(
            entry.addr,
            CdromAddr::Msf {
                minute: 2,
                second: 30,
                frame: 10
            }
        );
        assert_eq!(entry.start_frame().unwrap(), 2 * 4500 + 30 * 75 + 10);
    }

    #[test]
    fn data_bit_always_yields_data_track() {
        for ctrl in 0..16u8 {
            if ctrl & CDROM_DATA_TRACK == 0 {
                continue;
            }

            let entry = read_entry(&entry_bytes(2, (ctrl << 4) | 0x1, 1000));
            let info = entry.decode(2).unwrap();
            assert_eq!(info.track_type, TrackType::Data);
            assert_eq!(info.flags, TrackFlags::from_bits_truncate(ctrl & 0x1));
        }
    }

    #[test]
    fn audio_track_keeps_all_control_bits() {
        let entry = read_entry(&entry_bytes(1, 0xB1, 0));
        let info = entry.decode(1).unwrap();

        assert_eq!(info.track_type, TrackType::Audio);
        assert_eq!(
            info.flags,
            TrackFlags::QUAD_CHANNEL | TrackFlags::COPY_PERMITTED | TrackFlags::PREEMPHASIS
        );
        assert_eq!(info.start_frame, 0);
    }

    #[test]
    fn leadout_never_carries_flags() {
        let entry = read_entry(&entry_bytes(LEADOUT_TRACK, 0xF1, 250_000));
        let info = entry.decode(LEADOUT_TRACK).unwrap();

        assert_eq!(info.track_type, TrackType::Leadout);
        assert_eq!(info.flags, TrackFlags::empty());
        assert_eq!(info.start_frame, 250_000);
    }

    #[test]
    fn negative_lba_is_rejected() {
        let entry = read_entry(&entry_bytes(1, 0x10, -150));
        assert!(matches!(
            entry.decode(1),
            Err(DriveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn toc_header_layout() {
        let hdr = CdromTocHdr::read(&mut Cursor::new([1u8, 12])).unwrap();
        assert_eq!(
            TocHeader::from(hdr),
            TocHeader {
                first_track: 1,
                last_track: 12
            }
        );
    }

    #[test]
    fn play_msf_validates_range() {
        let record = CdromPlayMsf::new(Msf::new(0, 2, 0), Msf::new(3, 0, 74)).unwrap();
        let mut buf = Vec::new();
        record.write(&mut Cursor::new(&mut buf)).unwrap();
        assert_eq!(buf, [0, 2, 0, 3, 0, 74]);

        assert!(matches!(
            CdromPlayMsf::new(Msf::new(0, 60, 0), Msf::new(1, 0, 0)),
            Err(DriveError::InvalidPosition(_))
        ));
        assert!(matches!(
            CdromPlayMsf::new(Msf::new(1, 0, 0), Msf::new(1, 0, 0)),
            Err(DriveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn track_index_range_layout() {
        let start = TrackIndex::new(2, 1).unwrap();
        let end = TrackIndex::new(5, 1).unwrap();
        let mut buf = Vec::new();
        CdromTi::from((start, end))
            .write(&mut Cursor::new(&mut buf))
            .unwrap();
        assert_eq!(buf, [2, 1, 5, 1]);
    }
}
