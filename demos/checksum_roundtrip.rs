//! Checksum layer round trip.
//!
//! Encodes a message with a CRC-16 checksum, decodes it with both
//! verification orderings, then shows a corrupted frame being rejected.

use std::error::Error;
use sumlayer::{
    read_frame, write_frame_into, BeU16Field, ChecksumLayer, ChecksumOption, Crc16, RawData,
};
use tracing::{info, warn};

type Crc16Layer = ChecksumLayer<BeU16Field, Crc16, RawData>;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let after = Crc16Layer::new(RawData, Crc16);
    let before = Crc16Layer::with_options(RawData, Crc16, &[ChecksumOption::VerifyBeforeRead]);

    let message = b"Hello, checksum layer!".to_vec();
    let mut buf = vec![0u8; 64];
    let written = write_frame_into(&after, &message, &mut buf)?;
    let frame = &buf[..written];
    info!("Encoded {} payload bytes into a {} byte frame", message.len(), frame.len());

    for (name, layer) in [("verify-after-read", &after), ("verify-before-read", &before)] {
        let (decoded, consumed) = read_frame(layer, frame)?;
        info!(
            "{}: decoded {:?} ({} bytes)",
            name,
            String::from_utf8_lossy(&decoded),
            consumed
        );
    }

    let mut corrupted = frame.to_vec();
    corrupted[3] ^= 0x20;
    match read_frame(&after, &corrupted) {
        Ok(_) => warn!("Corrupted frame was accepted"),
        Err(e) => info!("Corrupted frame rejected: {}", e),
    }

    Ok(())
}
