//! Consensus-critical numeric and binary codecs for Bitcoin validation.
//!
//! This crate provides pure Rust implementations of:
//! - Byte stream primitives with a sticky validity flag
//! - Compact "bits" target encoding and proof-of-work checks
//! - Difficulty retargeting, including the fork-gated legacy overflow
//! - Script number encoding under legacy and minimal policies
//! - Block header serialization and hashing

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compact;
pub mod error;
pub mod hash;
pub mod header;
pub mod network;
pub mod number;
pub mod reader;
pub mod retarget;
pub mod uint256;
pub mod writer;

pub use compact::{check_proof_of_work, decode_compact, encode_compact, normalize, CompactTarget};
pub use error::{Error, Result};
pub use hash::{double_sha256, Hash256};
pub use header::BlockHeader;
pub use network::{Forks, Network, RetargetArithmetic, Settings};
pub use number::{int_to_number, number_to_bool, number_to_int, NumberPolicy, ScriptNumber};
pub use reader::ByteReader;
pub use retarget::{next_required_bits, RetargetContext};
pub use uint256::U256;
pub use writer::ByteWriter;
