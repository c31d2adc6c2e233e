//! Fixed-width 256-bit unsigned integer used for proof-of-work targets.

use uint::construct_uint;

construct_uint! {
    /// Unsigned 256-bit integer.
    /// Consists of 4x64-bit words, least significant word first.
    pub struct U256(4);
}

impl U256 {
    /// Build from a 32-byte big-endian array (display order).
    pub fn from_be_array(bytes: &[u8; 32]) -> Self {
        U256::from_big_endian(bytes)
    }

    /// Build from a 32-byte little-endian array (wire order).
    pub fn from_le_array(bytes: &[u8; 32]) -> Self {
        U256::from_little_endian(bytes)
    }

    /// The value as a 32-byte big-endian array.
    pub fn to_be_array(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self.byte(31 - i);
        }
        out
    }

    /// Number of significant bytes (zero for zero).
    pub fn byte_len(&self) -> usize {
        (self.bits() + 7) / 8
    }
}
