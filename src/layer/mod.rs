//! Protocol layers.
//!
//! Every layer handles one framing concern and delegates the rest of the
//! frame to the layer it wraps. Layers are composed at compile time:
//! `ChecksumLayer<BeU16Field, Crc16, RawData>` is a complete stack.

pub mod checksum;
pub mod raw;

pub use checksum::ChecksumLayer;
pub use raw::RawData;

use bytes::BytesMut;
use tracing::trace;

use crate::cursor::{AppendWriter, ReadCursor, SliceWriter, WriteCursor};
use crate::types::{FrameError, Result, Status};

/// Read, write and update contract shared by all layers.
pub trait Layer {
    /// Message type produced at the bottom of the stack.
    type Message;

    /// Reads at most `size` bytes.
    ///
    /// On success `msg` holds the decoded message and the cursor sits past
    /// the consumed bytes. On any other status `msg` is `None`. `missing`
    /// is written only when [`Status::NotEnoughData`] is returned.
    fn read(
        &self,
        msg: &mut Option<Self::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status;

    /// Writes at most `size` bytes, advancing the cursor by what was written.
    fn write<C: WriteCursor>(&self, msg: &Self::Message, cursor: &mut C, size: usize) -> Status;

    /// Rewrites deferred fields in `size` previously written bytes.
    ///
    /// The frame does not grow or shrink; the cursor ends `size` bytes
    /// further on.
    fn update(&self, cursor: &mut SliceWriter<'_>, size: usize) -> Status;

    /// Encoded length of `msg` including this layer's framing.
    fn length(&self, msg: &Self::Message) -> usize;
}

/// Stores `value` in an optional missing-size output.
pub(crate) fn report_missing(missing: Option<&mut usize>, value: usize) {
    if let Some(out) = missing {
        *out = value;
    }
}

/// Decodes one frame from the start of `bytes`.
///
/// Returns the message and the number of bytes consumed.
pub fn read_frame<L: Layer>(layer: &L, bytes: &[u8]) -> Result<(L::Message, usize)> {
    let mut cursor = ReadCursor::new(bytes);
    let mut msg = None;
    let mut missing = 0;

    layer
        .read(&mut msg, &mut cursor, bytes.len(), Some(&mut missing))
        .into_result(missing)?;

    let msg = msg.ok_or(FrameError::Protocol)?;
    Ok((msg, cursor.position()))
}

/// Encodes `msg` into a fixed buffer, running the update pass if needed.
///
/// Returns the number of bytes written. On error the buffer contents are
/// unspecified.
pub fn write_frame_into<L: Layer>(layer: &L, msg: &L::Message, buf: &mut [u8]) -> Result<usize> {
    let size = buf.len();
    let mut writer = SliceWriter::new(buf);
    let status = layer.write(msg, &mut writer, size);
    let written = writer.position();

    match status {
        Status::UpdateRequired => {
            trace!("running update pass over {} bytes", written);
            let mut updater = SliceWriter::new(&mut buf[..written]);
            layer.update(&mut updater, written).into_result(0)?;
        }
        other => other.into_result(0)?,
    }

    Ok(written)
}

/// Appends the encoding of `msg` to `dst`.
///
/// The frame is produced through a forward-only writer, then completed with
/// an update pass over the appended bytes. On error `dst` is truncated back
/// to its original length.
pub fn write_frame<L: Layer>(layer: &L, msg: &L::Message, dst: &mut BytesMut) -> Result<usize> {
    let start = dst.len();
    let size = layer.length(msg);
    dst.reserve(size);

    let (status, written) = {
        let mut writer = AppendWriter::new(&mut *dst);
        let status = layer.write(msg, &mut writer, size);
        (status, writer.position())
    };

    let result = match status {
        Status::UpdateRequired => {
            trace!("running update pass over {} bytes", written);
            let mut updater = SliceWriter::new(&mut dst[start..start + written]);
            layer.update(&mut updater, written).into_result(0)
        }
        other => other.into_result(0),
    };

    match result {
        Ok(()) => Ok(written),
        Err(e) => {
            dst.truncate(start);
            Err(e)
        }
    }
}
