//! Conversion between compact "bits" and 256-bit proof-of-work targets.
//!
//! The bits format is: [exponent (1 byte)][sign (1 bit)][mantissa (23 bits)]
//! Target = mantissa * 256^(exponent - 3)
//!
//! The encoding is lossy (three significant bytes) and the sign bit must be
//! clear for a usable target. Overflow is carried as a flag rather than an
//! error so the proof-of-work check can treat it as a plain failure.

use crate::error::{Error, Result};
use crate::hash::Hash256;
use crate::uint256::U256;

/// Low 23 bits of the compact form.
pub const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Bit 23, read as a sign flag.
pub const SIGN_BIT: u32 = 0x0080_0000;

/// Significant bytes carried by the mantissa.
const PRECISION: u32 = 3;

/// Result of expanding compact bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactTarget {
    /// The expanded target (zero when overflowed).
    pub target: U256,
    /// The bits were negative or do not fit in 256 bits.
    pub overflowed: bool,
}

impl CompactTarget {
    fn valid(target: U256) -> Self {
        CompactTarget {
            target,
            overflowed: false,
        }
    }

    fn overflow() -> Self {
        CompactTarget {
            target: U256::zero(),
            overflowed: true,
        }
    }

    /// Usable as a proof-of-work ceiling (not overflowed, not zero).
    pub fn is_valid(&self) -> bool {
        !self.overflowed && !self.target.is_zero()
    }

    /// The target, or `Error::Overflow`.
    pub fn into_result(self) -> Result<U256> {
        if self.overflowed {
            Err(Error::Overflow)
        } else {
            Ok(self.target)
        }
    }
}

/// Expand compact bits to a 256-bit target.
///
/// Never fails: a set sign bit or a shift past 256 bits yields a zero
/// target with `overflowed` set.
pub fn decode_compact(bits: u32) -> CompactTarget {
    let exponent = bits >> 24;
    let mantissa = bits & MANTISSA_MASK;

    if bits & SIGN_BIT != 0 {
        return CompactTarget::overflow();
    }

    if exponent <= PRECISION {
        // Precision loss is part of the format here.
        let shift = 8 * (PRECISION - exponent);
        return CompactTarget::valid(U256::from(mantissa >> shift));
    }

    if mantissa == 0 {
        return CompactTarget::valid(U256::zero());
    }

    let shift = 8 * (exponent - PRECISION) as usize;
    let mantissa_bits = (u32::BITS - mantissa.leading_zeros()) as usize;
    if mantissa_bits + shift > 256 {
        return CompactTarget::overflow();
    }

    CompactTarget::valid(U256::from(mantissa) << shift)
}

/// Compress a 256-bit target to its canonical compact bits.
///
/// Zero encodes as zero. A mantissa whose high bit would read as the sign
/// is shifted down a byte and the exponent bumped.
pub fn encode_compact(target: U256) -> u32 {
    let mut size = target.byte_len() as u32;

    let mut mantissa = if size <= PRECISION {
        target.low_u32() << (8 * (PRECISION - size))
    } else {
        (target >> (8 * (size - PRECISION)) as usize).low_u32()
    };

    if mantissa & SIGN_BIT != 0 {
        mantissa >>= 8;
        size += 1;
    }

    (size << 24) | mantissa
}

/// Canonical form of `bits` (zero if it does not decode).
pub fn normalize(bits: u32) -> u32 {
    let compact = decode_compact(bits);
    if compact.overflowed {
        0
    } else {
        encode_compact(compact.target)
    }
}

/// Check a header hash against its bits and the network ceiling.
///
/// Fails for overflowed or zero targets, targets easier than the limit,
/// and hashes above the target. A hash equal to the target passes.
pub fn check_proof_of_work(hash: &Hash256, bits: u32, proof_of_work_limit: u32) -> bool {
    let compact = decode_compact(bits);
    if !compact.is_valid() {
        return false;
    }

    if compact.target > decode_compact(proof_of_work_limit).target {
        return false;
    }

    hash.to_u256() <= compact.target
}

/// Expected number of hashes represented by `bits`.
///
/// Computed as `!target / (target + 1) + 1`, which equals
/// `2^256 / (target + 1)` without needing 257 bits. Invalid targets carry
/// no work.
pub fn proof(bits: u32) -> U256 {
    let compact = decode_compact(bits);
    if !compact.is_valid() {
        return U256::zero();
    }

    match compact.target.checked_add(U256::one()) {
        Some(divisor) => (!compact.target / divisor) + U256::one(),
        None => U256::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn be_target(hex_str: &str) -> U256 {
        let bytes = hex::decode(hex_str).unwrap();
        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes);
        U256::from_be_array(&array)
    }

    #[test]
    fn test_decode_genesis() {
        // Genesis block bits: 0x1d00ffff
        let compact = decode_compact(0x1d00ffff);
        assert!(!compact.overflowed);

        let target = compact.target.to_be_array();
        assert_eq!(&target[..8], &[0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00]);
        assert!(target[8..].iter().all(|&b| b == 0));

        assert_eq!(encode_compact(compact.target), 0x1d00ffff);
    }

    #[test]
    fn test_decode_medium_difficulty() {
        let compact = decode_compact(0x1b0404cb);
        assert!(!compact.overflowed);

        let target = compact.target.to_be_array();
        assert_eq!(&target[..8], &[0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0xcb]);
        assert!(target[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_high_difficulty() {
        // Exponent = 0x17 = 23, so the mantissa starts at byte 32 - 23 = 9
        let target = decode_compact(0x17034219).target.to_be_array();
        assert!(target[..9].iter().all(|&b| b == 0));
        assert_eq!(&target[9..12], &[0x03, 0x42, 0x19]);
        assert!(target[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_sign_bit_overflows() {
        for bits in [0x01800000, 0x04923456, 0x1d80ffff, 0x00800000, 0xff800001] {
            let compact = decode_compact(bits);
            assert!(compact.overflowed, "bits {:08x}", bits);
            assert!(compact.target.is_zero());
            assert_eq!(compact.into_result(), Err(Error::Overflow));
        }
    }

    #[test]
    fn test_decode_shift_overflow() {
        // Exponent 33: two mantissa bytes still fit, three do not.
        assert!(!decode_compact(0x2100ffff).overflowed);
        assert!(decode_compact(0x217fffff).overflowed);
        // Exponent 34: one byte fits.
        assert!(!decode_compact(0x220000ff).overflowed);
        assert!(decode_compact(0x22000100).overflowed);
        assert!(decode_compact(0xff123456).overflowed);
        // A zero mantissa never overflows.
        assert_eq!(decode_compact(0xff000000), CompactTarget { target: U256::zero(), overflowed: false });
    }

    #[test]
    fn test_decode_small_exponents_lose_precision() {
        assert_eq!(decode_compact(0x01123456).target, U256::from(0x12u64));
        assert_eq!(decode_compact(0x02123456).target, U256::from(0x1234u64));
        assert_eq!(decode_compact(0x03123456).target, U256::from(0x123456u64));
        assert_eq!(decode_compact(0x00123456).target, U256::zero());
    }

    #[test]
    fn test_normalize_vectors() {
        // (logical exponent, mantissa) cases with their canonical forms.
        assert_eq!(normalize(0x017fffff), 0x017f0000);
        assert_eq!(normalize(0x0200ffff), 0x0200ff00);
        assert_eq!(normalize(0x027fffff), 0x027fff00);
        assert_eq!(normalize(0x030000ff), 0x0200ff00);
        assert_eq!(normalize(0x0300ffff), 0x0300ffff);
        assert_eq!(normalize(0x037fffff), 0x037fffff);
        assert_eq!(normalize(0x040000ff), 0x0300ff00);
        assert_eq!(normalize(0x0400ffff), 0x0400ffff);
        assert_eq!(normalize(0x200000ff), 0x1f00ff00);
        assert_eq!(normalize(0x2000ffff), 0x2000ffff);
        assert_eq!(normalize(0x207fffff), 0x207fffff);
        assert_eq!(normalize(0x210000ff), 0x2000ff00);
        assert_eq!(normalize(0x2100ffff), 0x2100ffff);
        assert_eq!(normalize(0x217fffff), 0x00000000);
        assert_eq!(normalize(0x1d80ffff), 0x00000000);
    }

    #[test]
    fn test_encode_zero_and_sign_adjustment() {
        assert_eq!(encode_compact(U256::zero()), 0);
        assert_eq!(encode_compact(U256::from(0x80u64)), 0x02008000);
        assert_eq!(encode_compact(U256::from(0x7fu64)), 0x017f0000);
        assert_eq!(encode_compact(U256::from(0x123456u64)), 0x03123456);
        assert_eq!(encode_compact(U256::MAX), 0x2100ffff);
    }

    #[test]
    fn test_bits_roundtrip() {
        let test_cases = [
            0x1d00ffff, // Genesis
            0x17034219, // High difficulty
            0x1b0404cb, // Medium difficulty
            0x207fffff, // Regtest limit
        ];

        for &bits in &test_cases {
            let target = decode_compact(bits).target;
            assert_eq!(encode_compact(target), bits, "Roundtrip failed for bits {:08x}", bits);
        }
    }

    #[test]
    fn test_check_proof_of_work() {
        let limit = 0x1d00ffff;

        // A hash with 4 leading zero bytes (display order) passes genesis difficulty.
        let good = Hash256::from_display_hex(
            "0000000012345678000000000000000000000000000000000000000000000000",
        ).unwrap();
        assert!(check_proof_of_work(&good, 0x1d00ffff, limit));

        // Exactly the target passes.
        let exact = Hash256::from_display_hex(
            "00000000ffff0000000000000000000000000000000000000000000000000000",
        ).unwrap();
        assert!(check_proof_of_work(&exact, 0x1d00ffff, limit));

        let bad = Hash256::from_display_hex(
            "0000000100000000000000000000000000000000000000000000000000000000",
        ).unwrap();
        assert!(!check_proof_of_work(&bad, 0x1d00ffff, limit));
    }

    #[test]
    fn test_check_proof_of_work_rejects_invalid_bits() {
        let zero = Hash256::zero();
        // Negative, zero, and easier-than-limit targets never validate.
        assert!(!check_proof_of_work(&zero, 0x1d80ffff, 0x1d00ffff));
        assert!(!check_proof_of_work(&zero, 0x00000000, 0x1d00ffff));
        assert!(!check_proof_of_work(&zero, 0x1e00ffff, 0x1d00ffff));
        assert!(!check_proof_of_work(&zero, 0xff123456, 0x1d00ffff));
    }

    #[test]
    fn test_proof_of_genesis_bits() {
        assert_eq!(proof(0x1d00ffff), U256::from(0x0001_0001_0001u64));
        assert_eq!(proof(0x1d80ffff), U256::zero());
        assert_eq!(proof(0), U256::zero());
        assert_eq!(proof(0x207fffff), U256::from(2u64));
    }

    #[test]
    fn test_expected_target_vectors() {
        assert_eq!(
            decode_compact(0x1b0404cb).target,
            be_target("00000000000404cb000000000000000000000000000000000000000000000000")
        );
        assert_eq!(
            decode_compact(0x1d00ffff).target,
            be_target("00000000ffff0000000000000000000000000000000000000000000000000000")
        );
    }

    fn any_u256() -> impl Strategy<Value = U256> {
        any::<[u64; 4]>().prop_map(U256)
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(target in any_u256()) {
            let bits = encode_compact(target);
            let compact = decode_compact(bits);
            prop_assert!(!compact.overflowed);
            prop_assert_eq!(encode_compact(compact.target), bits);
        }

        #[test]
        fn prop_three_byte_targets_roundtrip(mantissa in 1u32..=0x7fffff, shift in 0usize..=29) {
            let target = U256::from(mantissa) << (8 * shift);
            prop_assert_eq!(decode_compact(encode_compact(target)).target, target);
        }

        #[test]
        fn prop_sign_bit_always_overflows(bits in any::<u32>()) {
            let compact = decode_compact(bits | SIGN_BIT);
            prop_assert!(compact.overflowed);
            prop_assert!(compact.target.is_zero());
        }
    }
}
