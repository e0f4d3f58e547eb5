//! Request codes from `linux/cdrom.h` and the single entry point that issues them.

use crate::drive::error::DriveResult;
use crate::drive::linux::models::IoctlRecord;
use binrw::{BinRead, BinWrite};
use log::trace;
use nix::errno::Errno;
use nix::libc::{c_int, c_ulong};
use nix::sys::ioctl::ioctl_num_type;
use std::io::Cursor;
use std::os::fd::RawFd;

pub const CDROMPAUSE: u32 = 0x5301;
pub const CDROMRESUME: u32 = 0x5302;
pub const CDROMPLAYMSF: u32 = 0x5303;
pub const CDROMPLAYTRKIND: u32 = 0x5304;
pub const CDROMREADTOCHDR: u32 = 0x5305;
pub const CDROMREADTOCENTRY: u32 = 0x5306;
pub const CDROMSTOP: u32 = 0x5307;
pub const CDROMEJECT: u32 = 0x5309;
pub const CDROMRESET: u32 = 0x5312;
pub const CDROMSEEK: u32 = 0x5316;
pub const CDROMCLOSETRAY: u32 = 0x5319;
pub const CDROM_SELECT_DISC: u32 = 0x5323;
pub const CDROM_MEDIA_CHANGED: u32 = 0x5325;
pub const CDROM_DRIVE_STATUS: u32 = 0x5326;
pub const CDROM_CHANGER_NSLOTS: u32 = 0x5328;
pub const CDROM_LOCKDOOR: u32 = 0x5329;

/// `cdte_format`: logical block address, first frame is 0
pub const CDROM_LBA: u8 = 0x01;
/// `cdte_format`: minute/second/frame, binary rather than BCD
pub const CDROM_MSF: u8 = 0x02;

/// Data track bit of `cdte_ctrl`
pub const CDROM_DATA_TRACK: u8 = 0x04;

// CDROM_DRIVE_STATUS results
pub const CDS_NO_INFO: c_int = 0;
pub const CDS_NO_DISC: c_int = 1;
pub const CDS_TRAY_OPEN: c_int = 2;
pub const CDS_DRIVE_NOT_READY: c_int = 3;
pub const CDS_DISC_OK: c_int = 4;

/// Slot argument meaning "no slot"
pub const CDSL_NONE: c_int = i32::MAX - 1;
/// Slot argument meaning "the currently selected slot"
pub const CDSL_CURRENT: c_int = i32::MAX;

/// Largest record any request passes by reference, rounded up.
const RECORD_BUFFER_SIZE: usize = 16;

/// Scratch space for a record, aligned like the C structures that contain an `int`.
#[repr(C, align(8))]
struct RecordBuffer([u8; RECORD_BUFFER_SIZE]);

/// Issues a request that takes no argument. A zero is passed in the argument slot.
pub fn ioctl_none(fd: RawFd, request: u32) -> DriveResult<c_int> {
    ioctl_int(fd, request, 0)
}

/// Issues a request that takes a scalar integer argument.
pub fn ioctl_int(fd: RawFd, request: u32, arg: c_int) -> DriveResult<c_int> {
    trace!("ioctl({fd}, {request:#06x}, {arg})");

    // SAFETY: scalar requests never dereference their argument.
    let result = unsafe { nix::libc::ioctl(fd, request as ioctl_num_type, arg as c_ulong) };

    Ok(Errno::result(result)?)
}

/// Issues a request that reads and/or fills `record` through a pointer, returning the
/// record as the kernel left it.
pub fn ioctl_record<T: IoctlRecord>(fd: RawFd, request: u32, record: &T) -> DriveResult<T> {
    let mut buffer = RecordBuffer([0; RECORD_BUFFER_SIZE]);
    let bytes = &mut buffer.0[..T::SIZE];

    record.write_le(&mut Cursor::new(&mut *bytes))?;
    trace!("ioctl({fd}, {request:#06x}) <- {}", hex::encode(&*bytes));

    // SAFETY: the buffer outlives the call and is at least as large as the structure the
    // kernel copies for `request`.
    let result = unsafe {
        nix::libc::ioctl(
            fd,
            request as ioctl_num_type,
            buffer.0.as_mut_ptr() as *mut nix::libc::c_void,
        )
    };
    Errno::result(result)?;

    let bytes = &buffer.0[..T::SIZE];
    trace!("ioctl({fd}, {request:#06x}) -> {}", hex::encode(bytes));

    Ok(T::read_le(&mut Cursor::new(bytes))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::error::DriveError;
    use crate::drive::linux::models::CdromTocHdr;
    use std::os::fd::AsRawFd;

    #[test]
    fn slot_sentinels_match_kernel_abi() {
        assert_eq!(CDSL_NONE, 0x7FFF_FFFE);
        assert_eq!(CDSL_CURRENT, 0x7FFF_FFFF);
    }

    #[test]
    fn failed_requests_carry_errno() {
        let file = tempfile::tempfile().unwrap();

        let err = ioctl_none(file.as_raw_fd(), CDROMSTOP).unwrap_err();
        assert!(matches!(err, DriveError::Device { errno, .. } if errno == Errno::ENOTTY as i32));

        let err = ioctl_record(file.as_raw_fd(), CDROMREADTOCHDR, &CdromTocHdr::default())
            .unwrap_err();
        assert!(matches!(err, DriveError::Device { errno, .. } if errno == Errno::ENOTTY as i32));
    }
}
