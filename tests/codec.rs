//! Stream codec tests.

mod common;

use bytes::BytesMut;
use common::{payloads, LengthPrefixed};
use sumlayer::{BeU16Field, ChecksumLayer, CodecConfig, Crc16, FrameError, LayerCodec};
use tokio_util::codec::{Decoder, Encoder};

type StreamLayer = ChecksumLayer<BeU16Field, Crc16, LengthPrefixed>;

fn codec() -> LayerCodec<StreamLayer> {
    LayerCodec::new(StreamLayer::new(LengthPrefixed::default(), Crc16))
}

#[test]
fn test_stream_decodes_byte_by_byte() {
    let mut codec = codec();
    let messages = payloads(3, 10, 60);

    let mut wire = BytesMut::new();
    for msg in &messages {
        codec.encode(msg.clone(), &mut wire).unwrap();
    }

    let mut input = BytesMut::new();
    let mut decoded = Vec::new();
    for byte in wire.iter() {
        input.extend_from_slice(&[*byte]);
        while let Some(msg) = codec.decode(&mut input).unwrap() {
            decoded.push(msg);
        }
    }

    assert_eq!(decoded, messages);
    assert!(input.is_empty());
}

#[test]
fn test_stream_decodes_batched_frames() {
    let mut codec = codec();
    let mut wire = BytesMut::new();
    codec.encode(b"one".to_vec(), &mut wire).unwrap();
    codec.encode(b"two".to_vec(), &mut wire).unwrap();

    assert_eq!(codec.decode(&mut wire).unwrap(), Some(b"one".to_vec()));
    assert_eq!(codec.decode(&mut wire).unwrap(), Some(b"two".to_vec()));
    assert_eq!(codec.decode(&mut wire).unwrap(), None);
}

#[test]
fn test_stream_rejects_corrupted_frame() {
    let mut codec = codec();
    let mut wire = BytesMut::new();
    codec.encode(b"payload".to_vec(), &mut wire).unwrap();
    let last = wire.len() - 1;
    wire[last] ^= 0xFF;

    assert!(matches!(codec.decode(&mut wire), Err(FrameError::Protocol)));
}

#[test]
fn test_decode_enforces_frame_limit() {
    let config = CodecConfig {
        max_frame_length: 16,
    };
    let mut codec =
        LayerCodec::with_config(StreamLayer::new(LengthPrefixed::default(), Crc16), config);

    // Length prefix announces 200 body bytes.
    let mut input = BytesMut::from(&[200u8, 0, 0, 0][..]);
    assert!(matches!(
        codec.decode(&mut input),
        Err(FrameError::FrameTooLarge { limit: 16, .. })
    ));
}

#[test]
fn test_decode_rejects_complete_oversized_frame() {
    let mut wire = BytesMut::new();
    codec().encode(vec![0x5A; 200], &mut wire).unwrap();
    assert_eq!(wire.len(), 203);

    let config = CodecConfig {
        max_frame_length: 16,
    };
    let mut codec =
        LayerCodec::with_config(StreamLayer::new(LengthPrefixed::default(), Crc16), config);
    assert!(matches!(
        codec.decode(&mut wire),
        Err(FrameError::FrameTooLarge {
            size: 203,
            limit: 16
        })
    ));
}

#[test]
fn test_failed_encode_leaves_buffer_untouched() {
    let mut codec = codec();
    let mut wire = BytesMut::new();
    codec.encode(b"kept".to_vec(), &mut wire).unwrap();
    let before = wire.clone();

    // The length prefix cannot describe more than 255 bytes.
    let result = codec.encode(vec![0u8; 300], &mut wire);
    assert!(matches!(result, Err(FrameError::Protocol)));
    assert_eq!(wire, before);
}
