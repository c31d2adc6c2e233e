//! SHA256 double-hashing and the 32-byte hash type.

use alloc::string::String;
use core::fmt;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::uint256::U256;

/// Size of a hash digest in bytes.
pub const HASH_SIZE: usize = 32;

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// This is used for block header hashing, transaction IDs, and merkle trees.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut result = [0u8; 32];
    result.copy_from_slice(&second);
    result
}

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// Reverse the byte order of a 32-byte array.
#[inline]
pub fn reverse_bytes(bytes: &[u8; 32]) -> [u8; 32] {
    let mut reversed = *bytes;
    reversed.reverse();
    reversed
}

/// A 32-byte hash held in wire (internal) byte order.
///
/// Bitcoin displays hashes big-endian, so the bytes are reversed exactly
/// once when converting to or from display hex and never elsewhere.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash256(pub [u8; HASH_SIZE]);

impl Hash256 {
    /// The all-zero hash (e.g. the genesis block's previous hash).
    pub const fn zero() -> Self {
        Hash256([0u8; HASH_SIZE])
    }

    /// Hash `data` with double SHA256.
    pub fn digest(data: &[u8]) -> Self {
        Hash256(double_sha256(data))
    }

    /// Wire-order bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Parse a display-order (big-endian) hex string.
    pub fn from_display_hex(text: &str) -> Result<Self> {
        let mut display = [0u8; HASH_SIZE];
        hex::decode_to_slice(text.trim(), &mut display).map_err(|_| Error::InvalidHash)?;
        Ok(Hash256(reverse_bytes(&display)))
    }

    /// Display-order (big-endian) hex string.
    pub fn to_display_hex(&self) -> String {
        hex::encode(reverse_bytes(&self.0))
    }

    /// The hash as a 256-bit number, for comparison against a target.
    ///
    /// Wire order is little-endian, so no reversal is applied here.
    pub fn to_u256(&self) -> U256 {
        U256::from_le_array(&self.0)
    }
}

impl From<[u8; HASH_SIZE]> for Hash256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash256(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_display_hex())
    }
}
