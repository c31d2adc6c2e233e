//! Append-only byte writer, the counterpart of [`crate::reader::ByteReader`].

use alloc::vec::Vec;

use crate::hash::Hash256;
use crate::reader::{VARINT_EIGHT_BYTES, VARINT_FOUR_BYTES, VARINT_TWO_BYTES};

/// Encoded length of a CompactSize integer.
pub fn variable_size(value: u64) -> usize {
    if value < u64::from(VARINT_TWO_BYTES) {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Writer appending to an owned buffer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn write_2_bytes_little_endian(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_4_bytes_little_endian(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_8_bytes_little_endian(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_2_bytes_big_endian(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_4_bytes_big_endian(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_8_bytes_big_endian(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write a CompactSize integer, always in its minimal form.
    pub fn write_variable(&mut self, value: u64) {
        if value < u64::from(VARINT_TWO_BYTES) {
            self.write_byte(value as u8);
        } else if value <= 0xffff {
            self.write_byte(VARINT_TWO_BYTES);
            self.write_2_bytes_little_endian(value as u16);
        } else if value <= 0xffff_ffff {
            self.write_byte(VARINT_FOUR_BYTES);
            self.write_4_bytes_little_endian(value as u32);
        } else {
            self.write_byte(VARINT_EIGHT_BYTES);
            self.write_8_bytes_little_endian(value);
        }
    }

    /// Write a 32-byte hash in wire order.
    pub fn write_hash(&mut self, hash: &Hash256) {
        self.write_bytes(hash.as_bytes());
    }
}
