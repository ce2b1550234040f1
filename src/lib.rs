//! # sumlayer
//!
//! A checksum framing layer for binary protocol stacks.
//!
//! The layer wraps an inner "next layer", appends a checksum over the bytes
//! that layer produces, and verifies it when reading:
//!
//! ```text
//! +--------------------------------+------------------+
//! | next layer bytes               | checksum field   |
//! +--------------------------------+------------------+
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use sumlayer::{read_frame, write_frame_into, BasicSum, ChecksumLayer, RawData, U8Field};
//!
//! let layer = ChecksumLayer::<U8Field, BasicSum, RawData>::new(RawData, BasicSum);
//!
//! let mut buf = [0u8; 4];
//! let written = write_frame_into(&layer, &vec![0x01, 0x02, 0x03], &mut buf)?;
//! assert_eq!(&buf[..written], &[0x01u8, 0x02, 0x03, 0x06]);
//!
//! let (msg, consumed) = read_frame(&layer, &buf)?;
//! assert_eq!(msg, vec![0x01, 0x02, 0x03]);
//! assert_eq!(consumed, 4);
//! # Ok::<(), sumlayer::FrameError>(())
//! ```
//!
//! ## Reading
//!
//! | Ordering              | Behavior                                          |
//! |-----------------------|---------------------------------------------------|
//! | verify after (default)| inner layer decodes, then its bytes are checked   |
//! | verify before         | the whole range is checked before decoding starts |
//!
//! ## Writing
//!
//! | Cursor          | Behavior                                              |
//! |-----------------|-------------------------------------------------------|
//! | `SliceWriter`   | checksum computed and written immediately             |
//! | `AppendWriter`  | placeholder written, `UpdateRequired` returned        |
//!
//! After `UpdateRequired`, run [`Layer::update`] over the written bytes to
//! fill in the checksum.

pub mod checksum;
pub mod codec;
pub mod cursor;
pub mod field;
pub mod layer;
pub mod options;
pub mod types;

// Re-export main types for convenience
pub use checksum::{BasicSum, Checksum, Crc16, Crc32};
pub use codec::{CodecConfig, LayerCodec};
pub use cursor::{AppendWriter, CursorKind, ReadCursor, SliceWriter, WriteCursor};
pub use field::{
    BeU16Field, BeU32Field, BeU64Field, Field, IntField, Integral, LeU16Field, LeU32Field,
    LeU64Field, U8Field,
};
pub use layer::{read_frame, write_frame, write_frame_into, ChecksumLayer, Layer, RawData};
pub use options::{ChecksumLayerConfig, ChecksumLayerOptions, ChecksumOption, Verification};
pub use types::{FrameError, Result, Status};
