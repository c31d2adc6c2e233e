//! Script number codec: booleans and integers as little-endian
//! sign-magnitude byte chunks.
//!
//! Two decoding policies coexist. [`NumberPolicy::Legacy`] accepts any
//! encoding that fits the width; [`NumberPolicy::Minimal`] also rejects
//! padding bytes and requires canonical booleans. Which one applies depends
//! on the rules active for the block being validated.
//!
//! A lone `0x80` ("negative zero") is read differently by each entry
//! point, and all of them are kept:
//!
//! | entry point                      | `[0x80]`                   |
//! |----------------------------------|----------------------------|
//! | [`boolean_from_chunk`]           | `false`                    |
//! | [`boolean_from_chunk_strict`]    | `Err(InvalidBoolean)`      |
//! | integer, [`NumberPolicy::Legacy`]  | `0`                      |
//! | integer, [`NumberPolicy::Minimal`] | `Err(NonMinimalEncoding)`|

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Widest integer chunk the codec decodes.
pub const MAX_NUMBER_WIDTH: usize = 8;

/// Conventional width of arithmetic operands.
pub const DEFAULT_NUMBER_WIDTH: usize = 4;

const SIGN_MASK: u8 = 0x80;
const OP_0: u8 = 0x00;
const OP_1_BASE: u8 = 0x50;

/// Decoding rules applied to script number chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Any encoding within the width is accepted.
    #[default]
    Legacy,
    /// Only minimal integers and canonical booleans are accepted.
    Minimal,
}

impl From<bool> for NumberPolicy {
    fn from(strict: bool) -> Self {
        if strict {
            NumberPolicy::Minimal
        } else {
            NumberPolicy::Legacy
        }
    }
}

pub fn boolean_from_integer(value: i64) -> bool {
    value != 0
}

/// Legacy boolean: true if any byte is nonzero, except that a final `0x80`
/// preceded only by zeros is false.
pub fn boolean_from_chunk(data: &[u8]) -> bool {
    let last = data.len().saturating_sub(1);

    match data.iter().position(|&byte| byte != 0) {
        Some(index) => !(index == last && data[index] == SIGN_MASK),
        None => false,
    }
}

/// Canonical boolean: exactly empty (false) or exactly `[0x01]` (true).
pub fn boolean_from_chunk_strict(data: &[u8]) -> Result<bool> {
    match data {
        [] => Ok(false),
        [0x01] => Ok(true),
        _ => Err(Error::InvalidBoolean),
    }
}

/// Decode a stack value as a boolean under `policy`.
///
/// `policy` also accepts `bool`, with `true` selecting the strict rules.
pub fn number_to_bool(data: &[u8], policy: impl Into<NumberPolicy>) -> Result<bool> {
    match policy.into() {
        NumberPolicy::Legacy => Ok(boolean_from_chunk(data)),
        NumberPolicy::Minimal => boolean_from_chunk_strict(data),
    }
}

/// The chunk carries no byte beyond what the sign requires.
pub fn is_minimal_encoding(data: &[u8]) -> bool {
    match data {
        [] => true,
        [.., last] if last & !SIGN_MASK != 0 => true,
        // The top byte only holds the sign, which is needed solely when the
        // byte below already uses its high bit.
        [.., previous, _] => previous & SIGN_MASK != 0,
        [_] => false,
    }
}

/// Decode a sign-magnitude chunk of at most `width` bytes.
pub fn integer_from_chunk(data: &[u8], width: usize, policy: NumberPolicy) -> Result<i64> {
    let width = width.min(MAX_NUMBER_WIDTH);
    if data.len() > width {
        return Err(Error::SizeExceeded {
            size: data.len(),
            max: width,
        });
    }

    if policy == NumberPolicy::Minimal && !is_minimal_encoding(data) {
        return Err(Error::NonMinimalEncoding);
    }

    let Some((&last, _)) = data.split_last() else {
        return Ok(0);
    };

    let magnitude = data
        .iter()
        .enumerate()
        .fold(0u64, |acc, (index, &byte)| acc | (u64::from(byte) << (8 * index)));

    let sign = u64::from(SIGN_MASK) << (8 * (data.len() - 1));
    if last & SIGN_MASK == 0 {
        return Ok(magnitude as i64);
    }

    // At most 63 magnitude bits remain once the sign is cleared.
    Ok(-((magnitude & !sign) as i64))
}

/// Decode an integer chunk under the legacy rules.
pub fn number_to_int(data: &[u8], max_width: usize) -> Result<i64> {
    integer_from_chunk(data, max_width, NumberPolicy::Legacy)
}

/// Encode an integer as its minimal chunk.
///
/// Zero is the empty chunk. `i64::MIN` encodes as nine bytes, which no
/// decoder accepts back.
pub fn int_to_number(value: i64) -> Vec<u8> {
    if value == 0 {
        return vec![];
    }

    let mut magnitude = value.unsigned_abs();
    let mut data = Vec::with_capacity(MAX_NUMBER_WIDTH + 1);
    while magnitude != 0 {
        data.push(magnitude as u8);
        magnitude >>= 8;
    }

    let sign = if value < 0 { SIGN_MASK } else { 0 };
    match data.last_mut() {
        Some(top) if *top & SIGN_MASK != 0 => data.push(sign),
        Some(top) => *top |= sign,
        None => {}
    }

    data
}

/// The coinbase script prefix committing to `height`.
///
/// Heights up to 16 use the single-byte small-number opcodes; larger
/// heights push their minimal chunk directly.
pub fn bip34_height_push(height: u32) -> Vec<u8> {
    match height {
        0 => vec![OP_0],
        1..=16 => vec![OP_1_BASE + height as u8],
        _ => {
            let chunk = int_to_number(i64::from(height));
            let mut script = Vec::with_capacity(chunk.len() + 1);
            script.push(chunk.len() as u8);
            script.extend_from_slice(&chunk);
            script
        }
    }
}

/// A script stack integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScriptNumber(i64);

impl ScriptNumber {
    pub const fn new(value: i64) -> Self {
        ScriptNumber(value)
    }

    /// Decode a stack chunk of at most `width` bytes.
    pub fn from_chunk(data: &[u8], width: usize, policy: impl Into<NumberPolicy>) -> Result<Self> {
        integer_from_chunk(data, width, policy.into()).map(ScriptNumber)
    }

    pub fn to_chunk(&self) -> Vec<u8> {
        int_to_number(self.0)
    }

    pub fn to_i64(&self) -> i64 {
        self.0
    }

    /// The value clamped into `i32` range.
    pub fn to_i32(&self) -> i32 {
        self.0.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    pub fn is_true(&self) -> bool {
        boolean_from_integer(self.0)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(ScriptNumber)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(ScriptNumber)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(ScriptNumber)
    }
}

impl From<i64> for ScriptNumber {
    fn from(value: i64) -> Self {
        ScriptNumber(value)
    }
}

impl From<ScriptNumber> for i64 {
    fn from(number: ScriptNumber) -> Self {
        number.0
    }
}
