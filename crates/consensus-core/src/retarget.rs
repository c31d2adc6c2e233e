//! Difficulty retargeting: the compact bits a candidate header must carry.
//!
//! The history window is supplied by the caller. Which headers belong in it
//! is described by [`bits_count`], [`timestamp_count`] and
//! [`retarget_height`].

use alloc::vec::Vec;
use log::{debug, trace};

use crate::compact::{decode_compact, encode_compact};
use crate::network::{Forks, RetargetArithmetic, Settings, MEDIAN_TIME_PAST_INTERVAL};
use crate::uint256::U256;

/// History consulted when computing the bits for the header at `height`.
#[derive(Debug, Clone, Copy)]
pub struct RetargetContext<'a> {
    /// Height of the candidate header.
    pub height: usize,
    /// Bits of preceding headers, oldest first. The last entry is the
    /// immediate predecessor.
    pub bits: &'a [u32],
    /// Timestamps of preceding headers, oldest first.
    pub timestamps: &'a [u32],
    /// Timestamp of the first header of the current retarget interval.
    pub retarget_timestamp: u32,
    /// Timestamp of the candidate header itself.
    pub timestamp: u32,
}

impl RetargetContext<'_> {
    /// Bits of the immediate predecessor (zero for an empty window).
    pub fn bits_high(&self) -> u32 {
        self.bits.last().copied().unwrap_or(0)
    }

    /// Timestamp of the immediate predecessor (zero for an empty window).
    pub fn timestamp_high(&self) -> u32 {
        self.timestamps.last().copied().unwrap_or(0)
    }

    /// Median of the supplied timestamps.
    pub fn median_time_past(&self) -> u32 {
        median_time_past(self.timestamps)
    }
}

/// `height` is the first header of a retarget interval.
pub fn is_retarget_height(height: usize, interval: usize) -> bool {
    interval != 0 && height % interval == 0
}

/// Compact bits required of the header described by `context`.
///
/// Returns zero for the genesis height and when the predecessor's bits do
/// not expand to a usable target.
pub fn next_required_bits(context: &RetargetContext<'_>, forks: &Forks, settings: &Settings) -> u32 {
    if context.height == 0 {
        trace!("genesis height requires no work");
        return 0;
    }

    let bits_high = context.bits_high();
    if decode_compact(bits_high).target.is_zero() {
        debug!("predecessor bits {:#010x} expand to no target", bits_high);
        return 0;
    }

    if !forks.retarget {
        trace!("retargeting disabled, keeping {:#010x}", bits_high);
        return bits_high;
    }

    if is_retarget_height(context.height, settings.retargeting_interval()) {
        return work_required_retarget(context, forks.retarget_arithmetic(), settings);
    }

    if !forks.difficult {
        return easy_work_required(context, settings);
    }

    bits_high
}

/// Elapsed time of the closing interval, floored at zero and clamped to
/// the settings' minimum and maximum timespans.
pub fn retarget_timespan(context: &RetargetContext<'_>, settings: &Settings) -> u32 {
    let timespan = context
        .timestamp_high()
        .saturating_sub(context.retarget_timestamp);

    timespan
        .max(settings.minimum_timespan())
        .min(settings.maximum_timespan())
}

/// Scale `old_target` by `timespan / interval_seconds`.
///
/// The legacy variant multiplies in wrapping 256-bit arithmetic. The patched
/// variant halves targets whose bit length reaches that of `limit` before
/// multiplying and doubles the quotient afterwards. The result is not
/// clamped.
pub fn retarget_target(
    old_target: U256,
    timespan: u32,
    interval_seconds: u32,
    limit: U256,
    arithmetic: RetargetArithmetic,
) -> U256 {
    let shift: usize = match arithmetic {
        RetargetArithmetic::Patched if old_target.bits() >= limit.bits() => 1,
        _ => 0,
    };

    let (product, wrapped) = (old_target >> shift).overflowing_mul(U256::from(timespan));
    if wrapped {
        debug!(
            "retarget product wrapped in 256 bits ({:?} arithmetic)",
            arithmetic
        );
    }

    // Degenerate settings clamp to the ceiling.
    let quotient = product
        .checked_div(U256::from(interval_seconds))
        .unwrap_or(U256::MAX);

    if quotient.leading_zeros() < shift as u32 {
        return U256::MAX;
    }
    quotient << shift
}

fn work_required_retarget(
    context: &RetargetContext<'_>,
    arithmetic: RetargetArithmetic,
    settings: &Settings,
) -> u32 {
    let limit = decode_compact(settings.proof_of_work_limit).target;
    let old_target = decode_compact(context.bits_high()).target;
    let timespan = retarget_timespan(context, settings);

    let target = retarget_target(
        old_target,
        timespan,
        settings.retargeting_interval_seconds,
        limit,
        arithmetic,
    );

    if target > limit {
        debug!(
            "retarget at height {} exceeds limit, using {:#010x}",
            context.height, settings.proof_of_work_limit
        );
        return settings.proof_of_work_limit;
    }

    let bits = encode_compact(target);
    debug!(
        "retarget at height {}: timespan {}s, {:#010x} -> {:#010x}",
        context.height,
        timespan,
        context.bits_high(),
        bits
    );
    bits
}

/// Minimum-difficulty exception for networks without the `difficult` fork.
fn easy_work_required(context: &RetargetContext<'_>, settings: &Settings) -> u32 {
    let limit_bits = settings.proof_of_work_limit;
    let easy_spacing = settings.block_spacing_seconds.saturating_mul(2);

    if context.timestamp > context.timestamp_high().saturating_add(easy_spacing) {
        trace!("header at height {} is late, allowing limit bits", context.height);
        return limit_bits;
    }

    // Walk back to the last header not mined under the exception.
    let interval = settings.retargeting_interval();
    let mut height = context.height;
    for &bits in context.bits.iter().rev() {
        height = match height.checked_sub(1) {
            Some(previous) => previous,
            None => break,
        };

        if bits != limit_bits || is_retarget_height(height, interval) {
            return bits;
        }
    }

    limit_bits
}

/// Number of trailing header bits [`next_required_bits`] needs.
pub fn bits_count(height: usize, forks: &Forks, interval: usize) -> usize {
    if forks.difficult || !forks.retarget || is_retarget_height(height, interval) {
        1
    } else {
        height.min(interval)
    }
}

/// Number of trailing header timestamps needed for median time past.
pub fn timestamp_count(height: usize) -> usize {
    height.min(MEDIAN_TIME_PAST_INTERVAL)
}

/// Height of the header whose timestamp opens the interval closing at
/// `height`, or `None` when retargeting is disabled.
pub fn retarget_height(height: usize, forks: &Forks, interval: usize) -> Option<usize> {
    if !forks.retarget || interval == 0 {
        return None;
    }

    let distance = if is_retarget_height(height, interval) {
        interval
    } else {
        height % interval
    };

    height.checked_sub(distance)
}

/// Median of `timestamps` (upper median for even counts, zero if empty).
pub fn median_time_past(timestamps: &[u32]) -> u32 {
    let mut sorted: Vec<u32> = timestamps.to_vec();
    sorted.sort_unstable();
    sorted.get(sorted.len() / 2).copied().unwrap_or(0)
}
