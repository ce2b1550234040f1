//! `tokio_util` codec driving a layer stack over a byte stream.
//!
//! Decoding hands the whole buffered input to the stack as one candidate
//! frame. On a stream the stack therefore needs a self-delimiting inner
//! layer; for datagram transports, where every buffer holds exactly one
//! frame, any stack works.

use bytes::{Buf, BytesMut};
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace, warn};

use crate::layer::{read_frame, write_frame, Layer};
use crate::types::FrameError;

/// Default upper bound for a single frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 64 * 1024;

/// Codec limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest frame accepted on decode or produced on encode.
    pub max_frame_length: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}

/// Stream codec for any [`Layer`] stack.
#[derive(Debug, Clone)]
pub struct LayerCodec<L> {
    layer: L,
    config: CodecConfig,
}

impl<L: Layer> LayerCodec<L> {
    pub fn new(layer: L) -> Self {
        Self::with_config(layer, CodecConfig::default())
    }

    pub fn with_config(layer: L, config: CodecConfig) -> Self {
        Self { layer, config }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    fn check_length(&self, size: usize) -> Result<(), FrameError> {
        if size > self.config.max_frame_length {
            return Err(FrameError::FrameTooLarge {
                size,
                limit: self.config.max_frame_length,
            });
        }
        Ok(())
    }
}

impl<L: Layer> Decoder for LayerCodec<L> {
    type Item = L::Message;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        match read_frame(&self.layer, &src[..]) {
            Ok((msg, consumed)) => {
                self.check_length(consumed)?;
                trace!("decoded frame of {} bytes", consumed);
                src.advance(consumed);
                Ok(Some(msg))
            }
            Err(FrameError::NotEnoughData { missing }) => {
                self.check_length(src.len() + missing)?;
                debug!("waiting for {} more byte(s)", missing);
                src.reserve(missing);
                Ok(None)
            }
            Err(e) => {
                warn!("failed to decode frame: {}", e);
                Err(e)
            }
        }
    }
}

impl<L: Layer> Encoder<L::Message> for LayerCodec<L> {
    type Error = FrameError;

    fn encode(&mut self, item: L::Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.check_length(self.layer.length(&item))?;
        let written = write_frame(&self.layer, &item, dst)?;
        trace!("encoded frame of {} bytes", written);
        Ok(())
    }
}
