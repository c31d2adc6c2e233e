//! The 80-byte block header and its proof-of-work checks.

use alloc::vec::Vec;

use crate::compact::{check_proof_of_work, proof};
use crate::error::Result;
use crate::hash::Hash256;
use crate::network::BLOCK_HEADER_SIZE;
use crate::reader::ByteReader;
use crate::uint256::U256;
use crate::writer::ByteWriter;

/// A Bitcoin block header (80 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHeader {
    /// Block version with BIP9 versionbits.
    pub version: u32,
    /// Hash of the previous block (wire order).
    pub previous_block_hash: Hash256,
    /// Merkle root of all transactions (wire order).
    pub merkle_root: Hash256,
    /// Block timestamp (Unix time).
    pub timestamp: u32,
    /// Difficulty target in compact "bits" format.
    pub bits: u32,
    /// Nonce for proof of work.
    pub nonce: u32,
}

impl BlockHeader {
    /// Read a header field by field.
    ///
    /// A short stream leaves `reader` invalid; the caller checks it once
    /// the enclosing structure has been read.
    pub fn from_reader(reader: &mut ByteReader<'_>) -> Self {
        BlockHeader {
            version: reader.read_4_bytes_little_endian(),
            previous_block_hash: reader.read_hash(),
            merkle_root: reader.read_hash(),
            timestamp: reader.read_4_bytes_little_endian(),
            bits: reader.read_4_bytes_little_endian(),
            nonce: reader.read_4_bytes_little_endian(),
        }
    }

    /// Decode a header from the front of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let header = Self::from_reader(&mut reader);
        reader.finish(header)
    }

    pub fn to_writer(&self, writer: &mut ByteWriter) {
        writer.write_4_bytes_little_endian(self.version);
        writer.write_hash(&self.previous_block_hash);
        writer.write_hash(&self.merkle_root);
        writer.write_4_bytes_little_endian(self.timestamp);
        writer.write_4_bytes_little_endian(self.bits);
        writer.write_4_bytes_little_endian(self.nonce);
    }

    /// Serialize the block header to 80 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(BLOCK_HEADER_SIZE);
        self.to_writer(&mut writer);
        writer.into_inner()
    }

    /// Compute the block hash (double SHA256).
    pub fn hash(&self) -> Hash256 {
        Hash256::digest(&self.to_bytes())
    }

    /// The header's hash satisfies its own bits and the network ceiling.
    pub fn is_valid_proof_of_work(&self, proof_of_work_limit: u32) -> bool {
        check_proof_of_work(&self.hash(), self.bits, proof_of_work_limit)
    }

    /// Work contributed by this header.
    pub fn proof(&self) -> U256 {
        proof(self.bits)
    }
}
