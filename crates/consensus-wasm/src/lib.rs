//! WebAssembly bindings for the Bitcoin consensus numeric core.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Expanding and compressing compact targets
//! - Computing the bits required of the next header
//! - Decoding headers and checking their proof of work
//! - Script number encoding and decoding

use consensus_core::number::{bip34_height_push, NumberPolicy};
use consensus_core::U256;
use wasm_bindgen::prelude::*;

pub mod logger;
pub mod report;
pub mod validator;

// Re-export main types for JS access
pub use validator::HeaderValidator;

use report::{to_js, CompactInfo};

/// Initialize the WASM module with better panic messages and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(log::LevelFilter::Info);
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Set the console log level ("error" through "trace", or "off").
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::init(logger::parse_level(level));
}

/// Expand compact bits into `{ bits, normalized, target, overflowed }`.
#[wasm_bindgen]
pub fn decode_compact(bits: u32) -> Result<JsValue, JsValue> {
    to_js(&CompactInfo::new(bits))
}

/// Compress a 64-character big-endian hex target into compact bits.
#[wasm_bindgen]
pub fn encode_compact(target_hex: &str) -> Result<u32, JsValue> {
    let target = parse_target(target_hex).map_err(|e| JsValue::from_str(&e))?;
    Ok(consensus_core::encode_compact(target))
}

#[wasm_bindgen]
pub fn number_to_bool(data: &[u8], strict: bool) -> Result<bool, JsValue> {
    consensus_core::number_to_bool(data, strict).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a script number of at most `max_width` bytes.
#[wasm_bindgen]
pub fn number_to_int(data: &[u8], max_width: usize, strict: bool) -> Result<i64, JsValue> {
    consensus_core::number::integer_from_chunk(data, max_width, NumberPolicy::from(strict))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn int_to_number(value: i64) -> Vec<u8> {
    consensus_core::int_to_number(value)
}

/// Coinbase script prefix committing to `height`.
#[wasm_bindgen]
pub fn coinbase_height_push(height: u32) -> Vec<u8> {
    bip34_height_push(height)
}

fn parse_target(target_hex: &str) -> Result<U256, String> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(target_hex.trim(), &mut bytes)
        .map_err(|_| "Target must be 64 hex characters".to_string())?;
    Ok(U256::from_be_array(&bytes))
}
