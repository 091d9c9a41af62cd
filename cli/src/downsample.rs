use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

use clap::{Args, ValueEnum};
use eyre::Result;
use serde::{Deserialize, Serialize};
use spinevis::{
    epoch_millis, ChunkRounding, DownsampleOptions, Downsampled, Downsampler, MemoryProvider,
    Resolution, SessionClock, SessionContext,
};

use crate::io::{read_source, write_sink};

#[derive(Args, Debug)]
pub struct Opts {
    /// Trace to downsample, repeatable [default: every trace in the dump]
    #[clap(long = "trace")]
    traces: Vec<String>,

    /// Resolution in percent of full density, repeatable (100 = full)
    #[clap(long = "resolution", short = 'r', default_value = "100")]
    resolutions: Vec<f64>,

    /// Rounding of 100/resolution into a chunk length
    #[clap(long, value_enum, default_value_t = Rounding::Ceil)]
    rounding: Rounding,

    /// Emit [time, value] pairs instead of indexes
    #[clap(long, default_value = "false")]
    points: bool,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pretty: bool,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    output: String,

    /// Session dump (JSON) [default: stdin]
    #[clap(default_value = "stdin")]
    input: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Rounding {
    Ceil,
    Floor,
}

impl From<Rounding> for ChunkRounding {
    fn from(r: Rounding) -> Self {
        match r {
            Rounding::Ceil => ChunkRounding::Ceil,
            Rounding::Floor => ChunkRounding::Floor,
        }
    }
}

/// A session as exported by the backend: relative times shared by every
/// trace, plus the full-resolution samples of each trace.
#[derive(Debug, Deserialize)]
pub struct SessionDump {
    pub session_id: String,
    #[serde(default, with = "humantime_serde")]
    pub start_time: Option<SystemTime>,
    pub relative_times: Vec<f64>,
    pub data: HashMap<String, Vec<f64>>,
}

// [epoch milliseconds, value], matching the timestamps of full-resolution output.
type Point = (i64, f64);

pub async fn downsample(opts: &Opts) -> Result<()> {
    let dump: SessionDump = serde_json::from_slice(&read_source(&opts.input).await?)?;

    let mut provider = MemoryProvider::new();
    for (trace, samples) in dump.data {
        provider.insert(dump.session_id.as_str(), trace, samples);
    }

    let traces = if opts.traces.is_empty() {
        provider.traces(&dump.session_id)
    } else {
        opts.traces.clone()
    };
    if traces.is_empty() {
        eyre::bail!("session {} has no traces", dump.session_id);
    }

    let clock = SessionClock::new(dump.start_time.unwrap_or(SystemTime::UNIX_EPOCH));
    let downsampler = Downsampler::new(provider, clock).with_options(DownsampleOptions {
        rounding: opts.rounding.into(),
    });
    let ctx = SessionContext::new(dump.session_id, dump.relative_times);

    let results = downsampler
        .process_traces(&ctx, &traces, &opts.resolutions)
        .await?;
    for (trace, result) in &results {
        for (resolution, resolved) in &result.downsampled {
            tracing::debug!(
                trace = trace.as_str(),
                %resolution,
                points = resolved.len(),
                "downsampled trace"
            );
        }
    }

    let mut buf = if opts.points {
        let points = to_points(&results, &ctx, downsampler.clock());
        encode(&points, opts.pretty)?
    } else {
        let by_trace: BTreeMap<&str, &Downsampled> = results
            .iter()
            .map(|(trace, result)| (trace.as_str(), result.as_ref()))
            .collect();
        encode(&by_trace, opts.pretty)?
    };
    buf.push(b'\n');

    write_sink(&opts.output, &buf).await
}

fn to_points<R: AsRef<Downsampled>>(
    results: &[(String, R)],
    ctx: &SessionContext,
    clock: &SessionClock,
) -> BTreeMap<String, BTreeMap<Resolution, Vec<Point>>> {
    let mut out = BTreeMap::new();
    for (trace, result) in results {
        let result = result.as_ref();
        let per_resolution: BTreeMap<Resolution, Vec<Point>> = result
            .downsampled
            .keys()
            .filter_map(|&resolution| {
                let points = result.points(resolution, &ctx.relative_times, clock)?;
                let points: Vec<Point> = points
                    .into_iter()
                    .map(|(t, y)| (epoch_millis(t), y))
                    .collect();
                Some((resolution, points))
            })
            .collect();
        out.insert(trace.clone(), per_resolution);
    }
    out
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<Vec<u8>> {
    let buf = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    Ok(buf)
}
