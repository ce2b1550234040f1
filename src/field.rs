//! Fixed-width integral fields used to carry checksum values.

use std::fmt;
use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::cursor::{ReadCursor, WriteCursor};
use crate::types::Status;

/// Unsigned integer types a field can carry.
pub trait Integral: Copy + Default + Eq + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Narrows a checksum result, keeping the low-order bits.
    fn truncate(value: u64) -> Self;

    /// Widens the value for comparisons and logging.
    fn widen(self) -> u64;

    fn decode<E: ByteOrder>(src: &[u8]) -> Self;

    fn encode<E: ByteOrder>(self, dst: &mut [u8]);
}

impl Integral for u8 {
    const WIDTH: usize = 1;

    fn truncate(value: u64) -> Self {
        value as u8
    }

    fn widen(self) -> u64 {
        u64::from(self)
    }

    fn decode<E: ByteOrder>(src: &[u8]) -> Self {
        src[0]
    }

    fn encode<E: ByteOrder>(self, dst: &mut [u8]) {
        dst[0] = self;
    }
}

macro_rules! impl_integral {
    ($ty:ty, $width:expr, $read:ident, $write:ident) => {
        impl Integral for $ty {
            const WIDTH: usize = $width;

            fn truncate(value: u64) -> Self {
                value as $ty
            }

            fn widen(self) -> u64 {
                u64::from(self)
            }

            fn decode<E: ByteOrder>(src: &[u8]) -> Self {
                E::$read(src)
            }

            fn encode<E: ByteOrder>(self, dst: &mut [u8]) {
                E::$write(dst, self)
            }
        }
    };
}

impl_integral!(u16, 2, read_u16, write_u16);
impl_integral!(u32, 4, read_u32, write_u32);
impl_integral!(u64, 8, read_u64, write_u64);

/// A typed value with a known encoded length.
///
/// `read` and `write` consume or produce exactly the encoded length, or fail
/// without reporting partial progress as success.
pub trait Field: Default {
    type Value: Integral;

    const MIN_LENGTH: usize;
    const MAX_LENGTH: usize;

    fn value(&self) -> Self::Value;

    fn set_value(&mut self, value: Self::Value);

    /// Decodes the field from at most `size` bytes.
    fn read(&mut self, cursor: &mut ReadCursor<'_>, size: usize) -> Status;

    /// Encodes the field into at most `size` bytes.
    fn write<C: WriteCursor>(&self, cursor: &mut C, size: usize) -> Status;
}

/// Integral field of type `T` encoded with byte order `E`.
pub struct IntField<T, E> {
    value: T,
    _order: PhantomData<fn() -> E>,
}

impl<T: Integral, E> IntField<T, E> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            _order: PhantomData,
        }
    }
}

impl<T: Integral, E> Default for IntField<T, E> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Integral, E> Clone for IntField<T, E> {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl<T: Integral, E> fmt::Debug for IntField<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntField").field("value", &self.value).finish()
    }
}

impl<T: Integral, E: ByteOrder> Field for IntField<T, E> {
    type Value = T;

    const MIN_LENGTH: usize = T::WIDTH;
    const MAX_LENGTH: usize = T::WIDTH;

    fn value(&self) -> T {
        self.value
    }

    fn set_value(&mut self, value: T) {
        self.value = value;
    }

    fn read(&mut self, cursor: &mut ReadCursor<'_>, size: usize) -> Status {
        if size < T::WIDTH {
            return Status::NotEnoughData;
        }
        match cursor.take(T::WIDTH) {
            Some(src) => {
                self.value = T::decode::<E>(src);
                Status::Success
            }
            None => Status::NotEnoughData,
        }
    }

    fn write<C: WriteCursor>(&self, cursor: &mut C, size: usize) -> Status {
        if size < T::WIDTH {
            return Status::BufferOverflow;
        }
        let mut scratch = [0u8; 8];
        self.value.encode::<E>(&mut scratch[..T::WIDTH]);
        cursor.put_slice(&scratch[..T::WIDTH])
    }
}

pub type U8Field = IntField<u8, BigEndian>;
pub type BeU16Field = IntField<u16, BigEndian>;
pub type LeU16Field = IntField<u16, LittleEndian>;
pub type BeU32Field = IntField<u32, BigEndian>;
pub type LeU32Field = IntField<u32, LittleEndian>;
pub type BeU64Field = IntField<u64, BigEndian>;
pub type LeU64Field = IntField<u64, LittleEndian>;
