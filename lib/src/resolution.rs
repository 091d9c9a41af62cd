use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 100% = all data.
pub const RESOLUTION_FULL: u32 = 100;

/// A target density expressed as a percentage of the full-resolution series.
///
/// Always at least 1. Values at or above [`RESOLUTION_FULL`] are kept as given
/// (there is no upper clamp) and all select the full-resolution branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resolution(u32);

/// How the fractional ratio `100 / r` becomes a whole chunk length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkRounding {
    /// `ceil(100 / r)`: never produces more points than requested.
    #[default]
    Ceil,
    /// `floor(100 / r)`: matches helpers that truncate the group size.
    Floor,
}

impl Resolution {
    pub const FULL: Resolution = Resolution(RESOLUTION_FULL);

    /// Floors `raw` and clamps it to at least 1. Non-finite input is rejected.
    pub fn normalize(raw: f64) -> Result<Self, Error> {
        if !raw.is_finite() {
            return Err(Error::InvalidResolution(raw.to_string()));
        }
        // Float to int casts saturate, so huge values land on u32::MAX.
        let floored = raw.floor().max(1.0) as u32;
        Ok(Resolution(floored))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_full(self) -> bool {
        self.0 >= RESOLUTION_FULL
    }

    /// Number of consecutive samples reduced to a single peak.
    ///
    /// 50% gives a chunk size of 2, 25% gives 4, and so on. Resolutions that
    /// do not divide 100 are rounded per `rounding`. Full resolution is 1.
    pub fn chunk_size(self, rounding: ChunkRounding) -> usize {
        if self.is_full() {
            return 1;
        }
        let full = RESOLUTION_FULL as usize;
        let r = self.0 as usize;
        match rounding {
            ChunkRounding::Ceil => (full + r - 1) / r,
            ChunkRounding::Floor => full / r,
        }
    }
}

impl TryFrom<f64> for Resolution {
    type Error = Error;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        Resolution::normalize(raw)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: f64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidResolution(s.to_string()))?;
        Resolution::normalize(raw)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
