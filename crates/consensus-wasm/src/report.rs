//! Serializable values exchanged with JavaScript.

use consensus_core::compact::proof;
use consensus_core::retarget::RetargetContext;
use consensus_core::{decode_compact, encode_compact, BlockHeader};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Convert to JS value.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
}

/// Expanded compact bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactInfo {
    /// The bits as given.
    pub bits: u32,
    /// Canonical re-encoding (zero when overflowed).
    pub normalized: u32,
    /// Target as 64 big-endian hex characters.
    pub target: String,
    /// Negative or wider than 256 bits.
    pub overflowed: bool,
}

impl CompactInfo {
    pub fn new(bits: u32) -> Self {
        let compact = decode_compact(bits);
        let normalized = if compact.overflowed {
            0
        } else {
            encode_compact(compact.target)
        };

        CompactInfo {
            bits,
            normalized,
            target: hex::encode(compact.target.to_be_array()),
            overflowed: compact.overflowed,
        }
    }
}

/// Summary of a decoded block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    /// Block hash (display format).
    pub hash: String,
    /// Previous block hash (display format).
    pub previous_block_hash: String,
    /// Merkle root (display format).
    pub merkle_root: String,
    pub version: u32,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    /// The hash meets its bits and the network ceiling.
    pub valid_proof_of_work: bool,
    /// Expected hashes behind this header, as hex.
    pub work: String,
}

impl HeaderReport {
    pub fn new(header: &BlockHeader, proof_of_work_limit: u32) -> Self {
        HeaderReport {
            hash: header.hash().to_display_hex(),
            previous_block_hash: header.previous_block_hash.to_display_hex(),
            merkle_root: header.merkle_root.to_display_hex(),
            version: header.version,
            timestamp: header.timestamp,
            bits: header.bits,
            nonce: header.nonce,
            valid_proof_of_work: header.is_valid_proof_of_work(proof_of_work_limit),
            work: format!("{:x}", proof(header.bits)),
        }
    }
}

/// History window supplied by the caller for retargeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetWindow {
    /// Height of the candidate header.
    pub height: usize,
    /// Bits of preceding headers, oldest first.
    pub bits: Vec<u32>,
    /// Timestamps of preceding headers, oldest first.
    pub timestamps: Vec<u32>,
    pub retarget_timestamp: u32,
    /// Timestamp of the candidate header.
    pub timestamp: u32,
}

impl RetargetWindow {
    pub fn context(&self) -> RetargetContext<'_> {
        RetargetContext {
            height: self.height,
            bits: &self.bits,
            timestamps: &self.timestamps,
            retarget_timestamp: self.retarget_timestamp,
            timestamp: self.timestamp,
        }
    }
}

/// How much history the window for a given height must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRequirements {
    pub bits_count: usize,
    pub timestamp_count: usize,
    /// Height whose timestamp opens the interval, if retargeting applies.
    pub retarget_height: Option<usize>,
}
