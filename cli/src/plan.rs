use std::io::Write;

use clap::Args;
use eyre::Result;
use spinevis::chunk::chunk_count;
use spinevis::{normalize_resolutions, ChunkRounding};
use tabwriter::TabWriter;

use crate::downsample::Rounding;
use crate::io::write_sink;

#[derive(Args, Debug)]
pub struct Opts {
    /// Number of full-resolution samples
    #[clap(long)]
    samples: usize,

    /// Resolution in percent of full density, repeatable
    #[clap(long = "resolution", short = 'r', default_values_t = [1.0, 10.0, 25.0, 50.0, 100.0])]
    resolutions: Vec<f64>,

    /// Rounding of 100/resolution into a chunk length
    #[clap(long, value_enum, default_value_t = Rounding::Ceil)]
    rounding: Rounding,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    output: String,
}

pub async fn plan(opts: &Opts) -> Result<()> {
    let table = render_plan(opts.samples, &opts.resolutions, opts.rounding.into())?;
    write_sink(&opts.output, &table).await
}

/// One row per distinct normalized resolution, in ascending order.
fn render_plan(samples: usize, resolutions: &[f64], rounding: ChunkRounding) -> Result<Vec<u8>> {
    let resolutions = normalize_resolutions(resolutions)?;

    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "Resolution\tChunk\tPoints")?;
    for resolution in resolutions {
        let chunk = resolution.chunk_size(rounding);
        let points = chunk_count(samples, chunk);
        writeln!(tw, "{}%\t{}\t{}", resolution, chunk, points)?;
    }
    tw.flush()?;
    tw.into_inner()
        .map_err(|e| eyre::eyre!("flushing table: {}", e))
}
