//! Bitcoin network definitions, retargeting parameters and fork flags.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bitcoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Network {
    /// Bitcoin mainnet
    #[default]
    Mainnet,
    /// Bitcoin testnet3 (minimum difficulty blocks allowed)
    Testnet,
    /// Regression test network (no retargeting)
    Regtest,
}

impl Network {
    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    /// Retargeting parameters for this network.
    pub fn settings(&self) -> Settings {
        match self {
            Network::Mainnet | Network::Testnet => Settings::default(),
            Network::Regtest => Settings {
                proof_of_work_limit: REGTEST_PROOF_OF_WORK_LIMIT,
                ..Settings::default()
            },
        }
    }

    /// Fork flags active on this network.
    pub fn forks(&self) -> Forks {
        match self {
            Network::Mainnet => Forks::default(),
            Network::Testnet => Forks {
                difficult: false,
                ..Forks::default()
            },
            Network::Regtest => Forks {
                retarget: false,
                ..Forks::default()
            },
        }
    }
}

/// Error parsing a network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network")]
pub struct UnknownNetwork;

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const MAINNET: &[&str] = &["mainnet", "main", "bitcoin"];
        const TESTNET: &[&str] = &["testnet", "testnet3", "test"];
        const REGTEST: &[&str] = &["regtest"];

        let name = s.trim();
        let is = |candidates: &[&str]| candidates.iter().any(|c| c.eq_ignore_ascii_case(name));

        if is(MAINNET) {
            Ok(Network::Mainnet)
        } else if is(TESTNET) {
            Ok(Network::Testnet)
        } else if is(REGTEST) {
            Ok(Network::Regtest)
        } else {
            Err(UnknownNetwork)
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mainnet and testnet proof-of-work ceiling.
pub const MAINNET_PROOF_OF_WORK_LIMIT: u32 = 0x1d00ffff;

/// Regtest proof-of-work ceiling.
pub const REGTEST_PROOF_OF_WORK_LIMIT: u32 = 0x207fffff;

/// Headers sampled for median time past.
pub const MEDIAN_TIME_PAST_INTERVAL: usize = 11;

/// Size of a block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Network retargeting parameters.
///
/// Read-only once constructed; shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Settings {
    /// Maximum factor a single retarget may move the timespan by.
    pub retargeting_factor: u32,
    /// Intended duration of one retargeting interval.
    pub retargeting_interval_seconds: u32,
    /// Intended time between blocks.
    pub block_spacing_seconds: u32,
    /// Easiest permitted target, in compact form.
    pub proof_of_work_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            retargeting_factor: 4,
            retargeting_interval_seconds: 2 * 7 * 24 * 60 * 60,
            block_spacing_seconds: 10 * 60,
            proof_of_work_limit: MAINNET_PROOF_OF_WORK_LIMIT,
        }
    }
}

impl Settings {
    /// Blocks per retargeting interval (2016 on mainnet).
    pub fn retargeting_interval(&self) -> usize {
        if self.block_spacing_seconds == 0 {
            return 0;
        }
        (self.retargeting_interval_seconds / self.block_spacing_seconds) as usize
    }

    /// Lower clamp on the measured timespan.
    pub fn minimum_timespan(&self) -> u32 {
        self.retargeting_interval_seconds
            .checked_div(self.retargeting_factor)
            .unwrap_or(self.retargeting_interval_seconds)
    }

    /// Upper clamp on the measured timespan.
    pub fn maximum_timespan(&self) -> u32 {
        self.retargeting_interval_seconds
            .saturating_mul(self.retargeting_factor)
    }
}

/// Configuration-selected rule flags consulted by retargeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Forks {
    /// Difficulty is recomputed at all (off for regtest).
    pub retarget: bool,
    /// No minimum-difficulty exception (off for testnet).
    pub difficult: bool,
    /// Use the patched retarget arithmetic instead of the legacy,
    /// overflow-prone multiplication.
    pub retarget_overflow_patch: bool,
}

impl Default for Forks {
    fn default() -> Self {
        Forks {
            retarget: true,
            difficult: true,
            retarget_overflow_patch: false,
        }
    }
}

impl Forks {
    /// Arithmetic variant selected by the overflow patch flag.
    pub fn retarget_arithmetic(&self) -> RetargetArithmetic {
        if self.retarget_overflow_patch {
            RetargetArithmetic::Patched
        } else {
            RetargetArithmetic::LegacyOverflowing
        }
    }
}

/// The two permanently retained retarget arithmetic variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetArithmetic {
    /// Multiply in 256-bit wrapping arithmetic exactly as early nodes did.
    LegacyOverflowing,
    /// Halve targets near the ceiling before multiplying and restore after.
    Patched,
}
