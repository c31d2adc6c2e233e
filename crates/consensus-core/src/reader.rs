//! Cursor over an immutable byte buffer with a sticky validity flag.
//!
//! Reading past the end invalidates the reader. Once invalid, every read
//! returns a zero value and leaves the position alone, so a composite
//! structure is decoded field by field and checked once at the end with
//! [`ByteReader::check`] or [`ByteReader::finish`].

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::hash::{Hash256, HASH_SIZE};

/// CompactSize marker for a 2-byte value.
pub const VARINT_TWO_BYTES: u8 = 0xfd;
/// CompactSize marker for a 4-byte value.
pub const VARINT_FOUR_BYTES: u8 = 0xfe;
/// CompactSize marker for an 8-byte value.
pub const VARINT_EIGHT_BYTES: u8 = 0xff;

/// Sequential reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    valid: bool,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            position: 0,
            valid: true,
        }
    }

    /// No read has failed so far.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The reader is invalid or has no bytes left.
    pub fn is_exhausted(&self) -> bool {
        !self.valid || self.position >= self.data.len()
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read (zero once invalid).
    pub fn remaining(&self) -> usize {
        if self.valid {
            self.data.len() - self.position
        } else {
            0
        }
    }

    /// Mark the reader invalid.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Convert the sticky flag into a `Result`.
    pub fn check(&self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InsufficientData)
        }
    }

    /// Return `value` if every read so far succeeded.
    pub fn finish<T>(&self, value: T) -> Result<T> {
        self.check().map(|()| value)
    }

    /// Take the next `size` bytes, or invalidate.
    fn take(&mut self, size: usize) -> Option<&'a [u8]> {
        if !self.valid {
            return None;
        }

        match self.position.checked_add(size) {
            Some(end) if end <= self.data.len() => {
                let slice = &self.data[self.position..end];
                self.position = end;
                Some(slice)
            }
            _ => {
                self.valid = false;
                None
            }
        }
    }

    fn take_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(slice) = self.take(N) {
            out.copy_from_slice(slice);
        }
        out
    }

    /// Read the next byte without advancing (invalidates an empty reader).
    pub fn peek_byte(&mut self) -> u8 {
        if !self.valid {
            return 0;
        }

        match self.data.get(self.position) {
            Some(&byte) => byte,
            None => {
                self.valid = false;
                0
            }
        }
    }

    pub fn read_byte(&mut self) -> u8 {
        self.take_array::<1>()[0]
    }

    pub fn read_2_bytes_little_endian(&mut self) -> u16 {
        u16::from_le_bytes(self.take_array())
    }

    pub fn read_4_bytes_little_endian(&mut self) -> u32 {
        u32::from_le_bytes(self.take_array())
    }

    pub fn read_8_bytes_little_endian(&mut self) -> u64 {
        u64::from_le_bytes(self.take_array())
    }

    pub fn read_2_bytes_big_endian(&mut self) -> u16 {
        u16::from_be_bytes(self.take_array())
    }

    pub fn read_4_bytes_big_endian(&mut self) -> u32 {
        u32::from_be_bytes(self.take_array())
    }

    pub fn read_8_bytes_big_endian(&mut self) -> u64 {
        u64::from_be_bytes(self.take_array())
    }

    /// Read a CompactSize integer.
    ///
    /// Non-minimal markers (e.g. `0xfd 0x01 0x00`) are accepted: consensus
    /// code must not reject them even though the writer never emits them.
    pub fn read_variable(&mut self) -> u64 {
        match self.read_byte() {
            VARINT_EIGHT_BYTES => self.read_8_bytes_little_endian(),
            VARINT_FOUR_BYTES => u64::from(self.read_4_bytes_little_endian()),
            VARINT_TWO_BYTES => u64::from(self.read_2_bytes_little_endian()),
            byte => u64::from(byte),
        }
    }

    /// Read a CompactSize as a length, invalidating if it exceeds `limit`.
    pub fn read_size(&mut self, limit: usize) -> usize {
        let size = self.read_variable();
        match usize::try_from(size) {
            Ok(size) if size <= limit => size,
            _ => {
                self.valid = false;
                0
            }
        }
    }

    /// Read a 32-byte hash in wire order.
    pub fn read_hash(&mut self) -> Hash256 {
        Hash256(self.take_array::<HASH_SIZE>())
    }

    /// Read `size` bytes (empty if the reader is or becomes invalid).
    pub fn read_bytes(&mut self, size: usize) -> Vec<u8> {
        match self.take(size) {
            Some(slice) => slice.to_vec(),
            None => vec![],
        }
    }

    /// Read every remaining byte.
    pub fn read_remaining(&mut self) -> Vec<u8> {
        let size = self.remaining();
        self.read_bytes(size)
    }

    pub fn skip_bytes(&mut self, size: usize) {
        let _ = self.take(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed_width_integers() {
        let data = [
            0x01, // byte
            0x34, 0x12, // u16 le
            0x78, 0x56, 0x34, 0x12, // u32 le
            0x12, 0x34, // u16 be
            0x12, 0x34, 0x56, 0x78, // u32 be
            0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // u64 le
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, // u64 be
        ];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_byte(), 0x01);
        assert_eq!(reader.read_2_bytes_little_endian(), 0x1234);
        assert_eq!(reader.read_4_bytes_little_endian(), 0x12345678);
        assert_eq!(reader.read_2_bytes_big_endian(), 0x1234);
        assert_eq!(reader.read_4_bytes_big_endian(), 0x12345678);
        assert_eq!(reader.read_8_bytes_little_endian(), 0x0102030405060708);
        assert_eq!(reader.read_8_bytes_big_endian(), 0x0102030405060708);
        assert!(reader.is_exhausted());
        assert!(reader.check().is_ok());
    }

    #[test]
    fn test_read_variable() {
        let mut reader = ByteReader::new(&[0xfc]);
        assert_eq!(reader.read_variable(), 0xfc);

        let mut reader = ByteReader::new(&[0xfd, 0x34, 0x12]);
        assert_eq!(reader.read_variable(), 0x1234);

        let mut reader = ByteReader::new(&[0xfe, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_variable(), 0x12345678);

        let mut reader = ByteReader::new(&[0xff, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(reader.read_variable(), 0x0102030405060708);
        assert!(reader.check().is_ok());
    }

    #[test]
    fn test_read_variable_accepts_non_minimal_markers() {
        let mut reader = ByteReader::new(&[0xfd, 0x01, 0x00]);
        assert_eq!(reader.read_variable(), 1);

        let mut reader = ByteReader::new(&[0xff, 0x01, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(reader.read_variable(), 1);
        assert!(reader.check().is_ok());
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let mut reader = ByteReader::new(&[0xaa, 0xbb, 0xcc]);

        assert_eq!(reader.read_4_bytes_little_endian(), 0);
        assert!(!reader.is_valid());

        // Enough bytes remain for a u16, but the reader stays invalid.
        assert_eq!(reader.read_2_bytes_little_endian(), 0);
        assert_eq!(reader.read_byte(), 0);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.check(), Err(Error::InsufficientData));
        assert_eq!(reader.finish(42), Err(Error::InsufficientData));
    }

    #[test]
    fn test_truncated_variable_invalidates() {
        let mut reader = ByteReader::new(&[0xfe, 0x01, 0x02]);
        assert_eq!(reader.read_variable(), 0);
        assert!(reader.is_exhausted());
        assert!(reader.check().is_err());
    }

    #[test]
    fn test_read_size_limit() {
        let mut reader = ByteReader::new(&[0x05]);
        assert_eq!(reader.read_size(5), 5);
        assert!(reader.is_valid());

        let mut reader = ByteReader::new(&[0x06]);
        assert_eq!(reader.read_size(5), 0);
        assert!(!reader.is_valid());
    }

    #[test]
    fn test_read_hash_keeps_wire_order() {
        let mut data = [0u8; 32];
        data[0] = 0x6f;
        let mut reader = ByteReader::new(&data);

        let hash = reader.read_hash();
        assert_eq!(hash.0, data);
        assert!(reader.finish(()).is_ok());
    }

    #[test]
    fn test_read_bytes_peek_and_skip() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.peek_byte(), 1);
        assert_eq!(reader.position(), 0);
        reader.skip_bytes(1);
        assert_eq!(reader.read_bytes(2), vec![2, 3]);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_remaining(), vec![4, 5]);
        assert!(reader.is_exhausted());
        assert!(reader.is_valid());

        assert_eq!(reader.peek_byte(), 0);
        assert!(!reader.is_valid());
    }

    #[test]
    fn test_read_bytes_overrun_returns_empty() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert!(reader.read_bytes(3).is_empty());
        assert!(reader.check().is_err());
    }
}
