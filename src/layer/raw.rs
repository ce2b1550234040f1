//! Terminal layer carrying the message body as raw bytes.

use super::{report_missing, Layer};
use crate::cursor::{ReadCursor, SliceWriter, WriteCursor};
use crate::types::Status;

/// Innermost layer: the message is the whole byte range it is given.
///
/// `RawData` is not self-delimiting, so it only suits transports where every
/// buffer holds exactly one frame, such as datagrams. A truncated buffer is
/// not detected as truncated: a checksum layer above it reads the last bytes
/// present as the checksum and reports a mismatch, or even a match.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawData;

impl Layer for RawData {
    type Message = Vec<u8>;

    fn read(
        &self,
        msg: &mut Option<Vec<u8>>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        match cursor.take(size) {
            Some(bytes) => {
                *msg = Some(bytes.to_vec());
                Status::Success
            }
            None => {
                report_missing(missing, size - cursor.remaining());
                *msg = None;
                Status::NotEnoughData
            }
        }
    }

    fn write<C: WriteCursor>(&self, msg: &Vec<u8>, cursor: &mut C, size: usize) -> Status {
        if msg.len() > size {
            return Status::BufferOverflow;
        }
        cursor.put_slice(msg)
    }

    fn update(&self, cursor: &mut SliceWriter<'_>, size: usize) -> Status {
        cursor.advance(size)
    }

    fn length(&self, msg: &Vec<u8>) -> usize {
        msg.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_consumes_whole_size() {
        let data = [1u8, 2, 3, 4];
        let mut cursor = ReadCursor::new(&data);
        let mut msg = None;

        assert_eq!(RawData.read(&mut msg, &mut cursor, 3, None), Status::Success);
        assert_eq!(msg.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_read_reports_missing() {
        let data = [1u8, 2];
        let mut cursor = ReadCursor::new(&data);
        let mut msg = None;
        let mut missing = 0;

        assert_eq!(
            RawData.read(&mut msg, &mut cursor, 5, Some(&mut missing)),
            Status::NotEnoughData
        );
        assert_eq!(missing, 3);
        assert!(msg.is_none());
    }

    #[test]
    fn test_write_respects_size() {
        let mut buf = [0u8; 8];
        let mut writer = SliceWriter::new(&mut buf);
        assert_eq!(
            RawData.write(&vec![1, 2, 3], &mut writer, 2),
            Status::BufferOverflow
        );
        assert_eq!(RawData.write(&vec![1, 2, 3], &mut writer, 8), Status::Success);
        assert_eq!(writer.position(), 3);
    }
}
