use std::collections::{BTreeMap, BTreeSet};
use std::time::{Instant, SystemTime};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::RelativeClock;
use crate::error::{Error, Result};
use crate::peaks::peak_indexes;
use crate::resolution::{ChunkRounding, Resolution};

/// Knobs shared by every resolution of a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownsampleOptions {
    pub rounding: ChunkRounding,
}

/// The data for one requested resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolved {
    /// Indexes into the full-resolution series, one per chunk.
    Reduced { indexes: Vec<usize> },
    /// The untouched series with absolute timestamps.
    Full {
        #[serde(with = "timestamps")]
        x: Vec<SystemTime>,
        y: Vec<f64>,
    },
}

impl Resolved {
    /// Number of points this resolution renders: one per chunk when reduced,
    /// every sample at full resolution.
    pub fn len(&self) -> usize {
        match self {
            Resolved::Reduced { indexes } => indexes.len(),
            Resolved::Full { y, .. } => y.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Downsampled {
    pub full_res: Vec<f64>,
    pub downsampled: BTreeMap<Resolution, Resolved>,
}

impl Downsampled {
    /// Maps the result for `resolution` back into (time, value) pairs.
    ///
    /// Returns `None` if `resolution` was not requested. Indexes that fall
    /// outside `relative_times` are skipped.
    pub fn points<C: RelativeClock + ?Sized>(
        &self,
        resolution: Resolution,
        relative_times: &[f64],
        clock: &C,
    ) -> Option<Vec<(SystemTime, f64)>> {
        let points = match self.downsampled.get(&resolution)? {
            Resolved::Reduced { indexes } => indexes
                .iter()
                .filter_map(|&i| {
                    let t = *relative_times.get(i)?;
                    let y = *self.full_res.get(i)?;
                    Some((clock.absolute(t), y))
                })
                .collect(),
            Resolved::Full { x, y } => x.iter().copied().zip(y.iter().copied()).collect(),
        };
        Some(points)
    }
}

/// Computes a single resolution. `relative_times` is only read at full
/// resolution.
pub fn resolve<C: RelativeClock + ?Sized>(
    series: &[f64],
    relative_times: &[f64],
    resolution: Resolution,
    clock: &C,
    options: DownsampleOptions,
) -> Resolved {
    if resolution.is_full() {
        return Resolved::Full {
            x: relative_times.iter().map(|&t| clock.absolute(t)).collect(),
            y: series.to_vec(),
        };
    }
    let chunk_size = resolution.chunk_size(options.rounding);
    Resolved::Reduced {
        indexes: peak_indexes(series, chunk_size),
    }
}

/// Floors and clamps every raw resolution, collapsing duplicates.
///
/// Fails on an empty list or on any non-finite value.
pub fn normalize_resolutions(resolutions: &[f64]) -> Result<BTreeSet<Resolution>> {
    if resolutions.is_empty() {
        return Err(Error::NoResolutions);
    }
    resolutions
        .iter()
        .map(|&raw| Resolution::normalize(raw))
        .collect()
}

/// Downsamples `series` to every resolution in `resolutions`.
///
/// Raw resolutions are floored and clamped to at least 1; duplicates after
/// normalization collapse into one entry.
pub fn downsample<C: RelativeClock + ?Sized>(
    series: &[f64],
    relative_times: &[f64],
    resolutions: &[f64],
    clock: &C,
    options: DownsampleOptions,
) -> Result<Downsampled> {
    let normalized = normalize_resolutions(resolutions)?;
    downsample_normalized(series, relative_times, &normalized, clock, options)
}

/// Like [`downsample`] for resolutions that are already normalized. Each
/// resolution is computed independently on the rayon pool.
pub fn downsample_normalized<C: RelativeClock + ?Sized>(
    series: &[f64],
    relative_times: &[f64],
    resolutions: &BTreeSet<Resolution>,
    clock: &C,
    options: DownsampleOptions,
) -> Result<Downsampled> {
    if resolutions.is_empty() {
        return Err(Error::NoResolutions);
    }
    if series.len() != relative_times.len() {
        return Err(Error::LengthMismatch {
            series: series.len(),
            timestamps: relative_times.len(),
        });
    }

    let span = tracing::debug_span!(
        "downsample",
        samples = series.len(),
        resolutions = ?resolutions
    );
    let _enter = span.enter();
    let began = Instant::now();

    let downsampled: BTreeMap<Resolution, Resolved> = resolutions
        .par_iter()
        .map(|&resolution| {
            let resolved = resolve(series, relative_times, resolution, clock, options);
            (resolution, resolved)
        })
        .collect();

    tracing::debug!(elapsed = ?began.elapsed(), "downsampled");

    Ok(Downsampled {
        full_res: series.to_vec(),
        downsampled,
    })
}

// Vec<SystemTime> as signed milliseconds since the UNIX epoch.
mod timestamps {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::SystemTime;

    use crate::clock::{epoch_millis, from_epoch_millis};

    pub fn serialize<S>(times: &[SystemTime], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(times.iter().map(|&t| epoch_millis(t)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<i64>::deserialize(deserializer)?
            .into_iter()
            .map(|ms| {
                from_epoch_millis(ms)
                    .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}ms", ms)))
            })
            .collect()
    }
}
