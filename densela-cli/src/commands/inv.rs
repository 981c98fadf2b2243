//! Inverse of a square matrix.
//!
//! densela inv --matrix A.txt [--output Ainv.tsv]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use densela_linalg::LuDecomp;

#[derive(Args)]
pub struct InvArgs {
    /// Square matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Write the inverse here instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(args: InvArgs, precision: usize) -> Result<()> {
    let a = densela_io::read_matrix(&args.matrix)?;
    let inv = LuDecomp::new(&a)
        .and_then(|lu| lu.invert())
        .context("Matrix inversion failed")?;

    match args.output {
        Some(path) => {
            densela_io::codec_for_path(&path, precision)?.write_matrix(&inv, &path)?;
            info!("Inverse written to {}", path.display());
        }
        None => print!("{:.*}", precision, inv),
    }
    Ok(())
}
