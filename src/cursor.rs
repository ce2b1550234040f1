//! Cursors over transport buffers.
//!
//! Reading always happens over a [`ReadCursor`], which can be copied and
//! moved freely across the borrowed bytes. Writing happens through any
//! [`WriteCursor`]; its [`CursorKind`] tells layers whether already written
//! bytes can be re-read ([`SliceWriter`]) or not ([`AppendWriter`]).

use bytes::BufMut;

use crate::types::Status;

/// Capability set of a write cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    /// Written bytes can be re-read and overwritten.
    RandomAccess,
    /// Bytes can only be appended.
    AppendOnly,
}

/// Random-access read position over a borrowed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Moves the position forward by `n` bytes.
    ///
    /// Returns [`Status::NotEnoughData`] and leaves the cursor untouched if
    /// fewer than `n` bytes remain.
    pub fn advance(&mut self, n: usize) -> Status {
        if n > self.remaining() {
            return Status::NotEnoughData;
        }
        self.pos += n;
        Status::Success
    }

    /// Returns a copy of this cursor moved forward by `n` bytes, clamped to
    /// the end of the buffer.
    pub fn offset(&self, n: usize) -> Self {
        Self {
            buf: self.buf,
            pos: self.pos.saturating_add(n).min(self.buf.len()),
        }
    }

    /// Takes the next `n` bytes, advancing past them.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(bytes)
    }

    /// Bytes between two absolute positions, `[from, to)`.
    pub fn bytes(&self, from: usize, to: usize) -> &'a [u8] {
        &self.buf[from..to]
    }
}

/// Output cursor contract used by every layer's write path.
pub trait WriteCursor {
    /// Capability tag, fixed per cursor type.
    const KIND: CursorKind;

    /// Number of bytes written through this cursor so far.
    fn position(&self) -> usize;

    /// Appends `src` at the current position.
    fn put_slice(&mut self, src: &[u8]) -> Status;

    /// Previously written bytes `[from, to)`, if the medium can be re-read.
    fn written(&self, from: usize, to: usize) -> Option<&[u8]>;
}

/// Random-access writer over a mutable slice.
///
/// Also used for the update pass, where layers skip over their payload and
/// overwrite the placeholders they left behind.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Space left after the current position.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Skips `n` bytes without modifying them.
    pub fn advance(&mut self, n: usize) -> Status {
        if n > self.remaining() {
            return Status::BufferOverflow;
        }
        self.pos += n;
        Status::Success
    }

    /// Full underlying buffer.
    pub fn get_ref(&self) -> &[u8] {
        &*self.buf
    }
}

impl WriteCursor for SliceWriter<'_> {
    const KIND: CursorKind = CursorKind::RandomAccess;

    fn position(&self) -> usize {
        self.pos
    }

    fn put_slice(&mut self, src: &[u8]) -> Status {
        if src.len() > self.remaining() {
            return Status::BufferOverflow;
        }
        self.buf[self.pos..self.pos + src.len()].copy_from_slice(src);
        self.pos += src.len();
        Status::Success
    }

    fn written(&self, from: usize, to: usize) -> Option<&[u8]> {
        self.buf.get(from..to)
    }
}

/// Forward-only writer over any [`BufMut`] sink.
#[derive(Debug)]
pub struct AppendWriter<B> {
    sink: B,
    written: usize,
}

impl<B: BufMut> AppendWriter<B> {
    pub fn new(sink: B) -> Self {
        Self { sink, written: 0 }
    }

    pub fn into_inner(self) -> B {
        self.sink
    }
}

impl<B: BufMut> WriteCursor for AppendWriter<B> {
    const KIND: CursorKind = CursorKind::AppendOnly;

    fn position(&self) -> usize {
        self.written
    }

    fn put_slice(&mut self, src: &[u8]) -> Status {
        if src.len() > self.sink.remaining_mut() {
            return Status::BufferOverflow;
        }
        self.sink.put_slice(src);
        self.written += src.len();
        Status::Success
    }

    fn written(&self, _from: usize, _to: usize) -> Option<&[u8]> {
        None
    }
}
