//! Checksum layer.
//!
//! Appends a checksum over everything the wrapped layers wrote and verifies
//! it when reading. Wire layout, relative to the wrapped layer:
//!
//! ```text
//! +----------------------------+-----------------+
//! | inner layers (N bytes)     | checksum (LEN)  |
//! +----------------------------+-----------------+
//! ```
//!
//! The checksum covers exactly the inner bytes, never its own field.
//!
//! Reading checks the checksum either before or after the inner layer
//! decodes (see [`Verification`]). Writing picks a strategy from the cursor
//! capability: a random-access cursor gets the final checksum immediately,
//! an append-only cursor gets a placeholder and the caller finishes the frame
//! with [`Layer::update`] over the materialized bytes.
//!
//! When a random-access write ends in [`Status::BufferOverflow`], the inner
//! layers may already have written part of the frame. Those bytes are not
//! meaningful and callers must restart the whole frame.

use std::marker::PhantomData;

use tracing::{debug, trace};

use super::{report_missing, Layer};
use crate::checksum::Checksum;
use crate::cursor::{CursorKind, ReadCursor, SliceWriter, WriteCursor};
use crate::field::{Field, Integral};
use crate::options::{ChecksumLayerConfig, ChecksumLayerOptions, ChecksumOption, Verification};
use crate::types::Status;

/// Layer adding a checksum field of type `F`, computed by `C`, after the
/// bytes of the next layer `N`.
pub struct ChecksumLayer<F, C, N> {
    next: N,
    calc: C,
    options: ChecksumLayerOptions,
    _field: PhantomData<fn() -> F>,
}

impl<F, C, N> ChecksumLayer<F, C, N>
where
    F: Field,
    C: Checksum,
    N: Layer,
{
    /// Encoded length of the checksum field.
    pub const FIELD_LENGTH: usize = {
        assert!(
            F::MIN_LENGTH == F::MAX_LENGTH,
            "checksum field must have a fixed length"
        );
        F::MAX_LENGTH
    };

    /// Creates a layer that verifies after reading.
    pub fn new(next: N, calc: C) -> Self {
        Self::with_resolved(next, calc, ChecksumLayerOptions::default())
    }

    /// Creates a layer from a list of option markers.
    pub fn with_options(next: N, calc: C, options: &[ChecksumOption]) -> Self {
        Self::with_resolved(next, calc, ChecksumLayerOptions::resolve(options))
    }

    /// Creates a layer from a deserialized configuration.
    pub fn with_config(next: N, calc: C, config: &ChecksumLayerConfig) -> Self {
        Self::with_resolved(next, calc, ChecksumLayerOptions::from(config))
    }

    fn with_resolved(next: N, calc: C, options: ChecksumLayerOptions) -> Self {
        Self {
            next,
            calc,
            options,
            _field: PhantomData,
        }
    }

    pub fn options(&self) -> ChecksumLayerOptions {
        self.options
    }

    pub fn next_layer(&self) -> &N {
        &self.next
    }

    /// Reads a frame using the caller's field instance.
    ///
    /// `msg` is set only when the whole frame, checksum included, was read
    /// and verified. Any other outcome leaves it `None`.
    pub fn read_with_field(
        &self,
        field: &mut F,
        msg: &mut Option<N::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        *msg = None;

        if size < Self::FIELD_LENGTH {
            report_missing(missing, Self::FIELD_LENGTH - size);
            return Status::NotEnoughData;
        }

        let mut pending = None;
        let status = match self.options.verification() {
            Verification::BeforeRead => {
                self.verify_then_read(field, &mut pending, cursor, size, missing)
            }
            Verification::AfterRead => {
                self.read_then_verify(field, &mut pending, cursor, size, missing)
            }
        };

        if status.is_success() {
            *msg = pending;
        }
        status
    }

    /// Writes a frame using the caller's field instance.
    pub fn write_with_field<W: WriteCursor>(
        &self,
        field: &mut F,
        msg: &N::Message,
        cursor: &mut W,
        size: usize,
    ) -> Status {
        match W::KIND {
            CursorKind::RandomAccess => self.write_random_access(field, msg, cursor, size),
            CursorKind::AppendOnly => self.write_append_only(field, msg, cursor, size),
        }
    }

    /// Recomputes the checksum over previously written bytes and overwrites
    /// the placeholder.
    ///
    /// `cursor` must sit at the start of the frame and `size` must be the
    /// full frame length reported by the earlier write.
    pub fn update_with_field(
        &self,
        field: &mut F,
        cursor: &mut SliceWriter<'_>,
        size: usize,
    ) -> Status {
        let Some(payload_len) = size.checked_sub(Self::FIELD_LENGTH) else {
            return Status::NotEnoughData;
        };

        let from = cursor.position();
        let status = self.next.update(cursor, payload_len);
        if !status.is_success() {
            return status;
        }

        let to = cursor.position();
        debug_assert_eq!(to - from, payload_len);
        let computed = self.calc.checksum(&cursor.get_ref()[from..to]);
        field.set_value(F::Value::truncate(computed));
        field.write(cursor, size - (to - from))
    }

    fn verify_then_read(
        &self,
        field: &mut F,
        pending: &mut Option<N::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        let from = cursor.position();
        let payload_len = size - Self::FIELD_LENGTH;

        let mut tail = cursor.offset(payload_len);
        if tail.position() != from + payload_len {
            report_missing(missing, size - cursor.remaining());
            return Status::NotEnoughData;
        }

        let status = field.read(&mut tail, Self::FIELD_LENGTH);
        if !status.is_success() {
            if status == Status::NotEnoughData {
                report_missing(missing, size - cursor.remaining());
            }
            return status;
        }

        let computed = self.calc.checksum(cursor.bytes(from, from + payload_len));
        if !self.checksum_matches(field, computed) {
            return Status::ProtocolError;
        }

        let status = self.next.read(pending, cursor, payload_len, missing);
        if status.is_success() {
            *cursor = tail;
        }
        status
    }

    fn read_then_verify(
        &self,
        field: &mut F,
        pending: &mut Option<N::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        mut missing: Option<&mut usize>,
    ) -> Status {
        let from = cursor.position();
        let inner = self.next.read(
            pending,
            cursor,
            size - Self::FIELD_LENGTH,
            missing.as_deref_mut(),
        );
        if matches!(inner, Status::NotEnoughData | Status::ProtocolError) {
            return inner;
        }

        let len = cursor.position() - from;
        debug_assert!(len <= size);
        let remaining = size.saturating_sub(len);

        let status = field.read(cursor, remaining);
        if status == Status::NotEnoughData {
            let available = remaining.min(cursor.remaining());
            report_missing(
                missing,
                Self::FIELD_LENGTH.saturating_sub(available).max(1),
            );
        }
        if !status.is_success() {
            return status;
        }

        let computed = self.calc.checksum(cursor.bytes(from, from + len));
        if !self.checksum_matches(field, computed) {
            return Status::ProtocolError;
        }

        inner
    }

    fn write_random_access<W: WriteCursor>(
        &self,
        field: &mut F,
        msg: &N::Message,
        cursor: &mut W,
        size: usize,
    ) -> Status {
        let from = cursor.position();
        let inner = self.next.write(msg, cursor, size);
        if !inner.is_written() {
            return inner;
        }

        let len = cursor.position() - from;
        let remaining = size.saturating_sub(len);
        if remaining < Self::FIELD_LENGTH {
            debug!(
                "no room for checksum: {} byte(s) left, {} needed",
                remaining,
                Self::FIELD_LENGTH
            );
            return Status::BufferOverflow;
        }

        let computed = match inner {
            Status::Success => cursor
                .written(from, from + len)
                .map(|bytes| self.calc.checksum(bytes)),
            _ => None,
        };

        match computed {
            Some(computed) => {
                field.set_value(F::Value::truncate(computed));
                field.write(cursor, remaining)
            }
            None => self.write_placeholder(field, cursor, remaining),
        }
    }

    fn write_append_only<W: WriteCursor>(
        &self,
        field: &mut F,
        msg: &N::Message,
        cursor: &mut W,
        size: usize,
    ) -> Status {
        let Some(payload_len) = size.checked_sub(Self::FIELD_LENGTH) else {
            return Status::BufferOverflow;
        };

        let inner = self.next.write(msg, cursor, payload_len);
        if !inner.is_written() {
            return inner;
        }

        self.write_placeholder(field, cursor, Self::FIELD_LENGTH)
    }

    fn write_placeholder<W: WriteCursor>(&self, field: &F, cursor: &mut W, size: usize) -> Status {
        trace!("writing checksum placeholder at offset {}", cursor.position());
        let status = field.write(cursor, size);
        if !status.is_success() {
            return status;
        }
        Status::UpdateRequired
    }

    fn checksum_matches(&self, field: &F, computed: u64) -> bool {
        let expected = field.value();
        let computed = F::Value::truncate(computed);
        if expected != computed {
            debug!(
                "checksum mismatch: received {:#x}, computed {:#x}",
                expected.widen(),
                computed.widen()
            );
            return false;
        }
        true
    }
}

impl<F, C, N> Layer for ChecksumLayer<F, C, N>
where
    F: Field,
    C: Checksum,
    N: Layer,
{
    type Message = N::Message;

    fn read(
        &self,
        msg: &mut Option<N::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        self.read_with_field(&mut F::default(), msg, cursor, size, missing)
    }

    fn write<W: WriteCursor>(&self, msg: &N::Message, cursor: &mut W, size: usize) -> Status {
        self.write_with_field(&mut F::default(), msg, cursor, size)
    }

    fn update(&self, cursor: &mut SliceWriter<'_>, size: usize) -> Status {
        self.update_with_field(&mut F::default(), cursor, size)
    }

    fn length(&self, msg: &N::Message) -> usize {
        Self::FIELD_LENGTH + self.next.length(msg)
    }
}

impl<F, C: Clone, N: Clone> Clone for ChecksumLayer<F, C, N> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            calc: self.calc.clone(),
            options: self.options,
            _field: PhantomData,
        }
    }
}

impl<F, C, N: std::fmt::Debug> std::fmt::Debug for ChecksumLayer<F, C, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecksumLayer")
            .field("next", &self.next)
            .field("options", &self.options)
            .finish()
    }
}
