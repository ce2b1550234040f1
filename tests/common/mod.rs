//! Test-only layers used as the inner side of the checksum layer.

#![allow(dead_code)]

use std::cell::Cell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sumlayer::{CursorKind, Layer, ReadCursor, SliceWriter, Status, WriteCursor};

/// Body preceded by a one-byte length.
///
/// On an append-only cursor the length is written as a placeholder and
/// fixed up by `update`, like a real size layer would. `defer_always`
/// forces that behavior on random-access cursors too.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthPrefixed {
    pub defer_always: bool,
}

impl LengthPrefixed {
    pub fn deferring() -> Self {
        Self { defer_always: true }
    }
}

impl Layer for LengthPrefixed {
    type Message = Vec<u8>;

    fn read(
        &self,
        msg: &mut Option<Vec<u8>>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        let available = size.min(cursor.remaining());
        let report = |missing: Option<&mut usize>, value: usize| {
            if let Some(out) = missing {
                *out = value;
            }
        };

        if available < 1 {
            report(missing, 1);
            return Status::NotEnoughData;
        }

        let len = usize::from(cursor.bytes(cursor.position(), cursor.position() + 1)[0]);
        if available - 1 < len {
            report(missing, len - (available - 1));
            return Status::NotEnoughData;
        }

        let _ = cursor.advance(1);
        match cursor.take(len) {
            Some(body) => {
                *msg = Some(body.to_vec());
                Status::Success
            }
            None => Status::NotEnoughData,
        }
    }

    fn write<C: WriteCursor>(&self, msg: &Vec<u8>, cursor: &mut C, size: usize) -> Status {
        if msg.len() > usize::from(u8::MAX) {
            return Status::ProtocolError;
        }
        if msg.len() + 1 > size {
            return Status::BufferOverflow;
        }

        let defer = self.defer_always || C::KIND == CursorKind::AppendOnly;
        let prefix = if defer { 0 } else { msg.len() as u8 };
        let status = cursor.put_slice(&[prefix]);
        if !status.is_success() {
            return status;
        }
        let status = cursor.put_slice(msg);
        if !status.is_success() {
            return status;
        }

        if defer {
            Status::UpdateRequired
        } else {
            Status::Success
        }
    }

    fn update(&self, cursor: &mut SliceWriter<'_>, size: usize) -> Status {
        if size < 1 {
            return Status::NotEnoughData;
        }
        let status = cursor.put_slice(&[(size - 1) as u8]);
        if !status.is_success() {
            return status;
        }
        cursor.advance(size - 1)
    }

    fn length(&self, msg: &Vec<u8>) -> usize {
        1 + msg.len()
    }
}

/// Wraps a layer and counts how often its `read` runs.
#[derive(Debug, Default)]
pub struct Counting<L> {
    pub inner: L,
    pub reads: Cell<usize>,
}

impl<L> Counting<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            reads: Cell::new(0),
        }
    }
}

impl<L: Layer> Layer for Counting<L> {
    type Message = L::Message;

    fn read(
        &self,
        msg: &mut Option<L::Message>,
        cursor: &mut ReadCursor<'_>,
        size: usize,
        missing: Option<&mut usize>,
    ) -> Status {
        self.reads.set(self.reads.get() + 1);
        self.inner.read(msg, cursor, size, missing)
    }

    fn write<C: WriteCursor>(&self, msg: &L::Message, cursor: &mut C, size: usize) -> Status {
        self.inner.write(msg, cursor, size)
    }

    fn update(&self, cursor: &mut SliceWriter<'_>, size: usize) -> Status {
        self.inner.update(cursor, size)
    }

    fn length(&self, msg: &L::Message) -> usize {
        self.inner.length(msg)
    }
}

/// Deterministic random payloads.
pub fn payloads(seed: u64, count: usize, max_len: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..=max_len);
            (0..len).map(|_| rng.gen::<u8>()).collect()
        })
        .collect()
}
