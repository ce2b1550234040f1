//! Deferred checksum writes.
//!
//! Writes a frame through a forward-only writer, which can only leave a
//! placeholder for the checksum, then completes it with an update pass.

use bytes::BytesMut;
use std::error::Error;
use sumlayer::{
    AppendWriter, BasicSum, ChecksumLayer, Layer, RawData, SliceWriter, Status, U8Field,
};
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let layer = ChecksumLayer::<U8Field, BasicSum, RawData>::new(RawData, BasicSum);
    let message = vec![0x01, 0x02, 0x03];
    let size = layer.length(&message);

    let mut writer = AppendWriter::new(BytesMut::with_capacity(size));
    let status = layer.write(&message, &mut writer, size);
    let mut frame = writer.into_inner();
    info!("Forward-only write returned {:?}: {:02x?}", status, &frame[..]);

    if status == Status::UpdateRequired {
        let mut updater = SliceWriter::new(&mut frame[..]);
        layer.update(&mut updater, size).into_result(0)?;
        info!("After update: {:02x?}", &frame[..]);
    }

    Ok(())
}
