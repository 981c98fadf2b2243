//! Convert a matrix between file formats.
//!
//! densela convert --input A.csv --output A.dnla

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

#[derive(Args)]
pub struct ConvertArgs {
    /// Source file (.txt, .tsv, .csv, .dnla, .json)
    #[arg(long)]
    input: PathBuf,

    /// Destination file; the format follows the extension
    #[arg(long)]
    output: PathBuf,
}

pub fn run(args: ConvertArgs, precision: usize) -> Result<()> {
    let m = densela_io::codec_for_path(&args.input, precision)?.read_matrix(&args.input)?;
    densela_io::codec_for_path(&args.output, precision)?.write_matrix(&m, &args.output)?;
    info!(
        "Converted {}x{} matrix: {} -> {}",
        m.rows(),
        m.cols(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
