//! Checksum calculators.
//!
//! A calculator is a pure function over an exact byte range. Results are
//! reported as `u64` and narrowed by the field that stores them.

use crc_any::{CRCu16, CRCu32};

/// Computes a checksum over a byte range.
pub trait Checksum {
    fn checksum(&self, bytes: &[u8]) -> u64;
}

impl<F> Checksum for F
where
    F: Fn(&[u8]) -> u64,
{
    fn checksum(&self, bytes: &[u8]) -> u64 {
        self(bytes)
    }
}

/// Wrapping sum of all bytes. Stored in a one-byte field this is the
/// classic modulo-256 sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSum;

impl Checksum for BasicSum {
    fn checksum(&self, bytes: &[u8]) -> u64 {
        bytes
            .iter()
            .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
    }
}

/// CRC-16/ARC (the IBM polynomial, reflected).
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc16;

impl Checksum for Crc16 {
    fn checksum(&self, bytes: &[u8]) -> u64 {
        let mut crc = CRCu16::crc16();
        crc.digest(bytes);
        u64::from(crc.get_crc())
    }
}

/// CRC-32/ISO-HDLC, as used by Ethernet and zlib.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32;

impl Checksum for Crc32 {
    fn checksum(&self, bytes: &[u8]) -> u64 {
        let mut crc = CRCu32::crc32();
        crc.digest(bytes);
        u64::from(crc.get_crc())
    }
}
