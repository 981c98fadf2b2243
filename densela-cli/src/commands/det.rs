//! Determinant of a square matrix.
//!
//! densela det --matrix A.txt

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use densela_linalg::LuDecomp;

#[derive(Args)]
pub struct DetArgs {
    /// Square matrix file
    #[arg(long)]
    matrix: PathBuf,
}

pub fn run(args: DetArgs, precision: usize) -> Result<()> {
    let a = densela_io::read_matrix(&args.matrix)?;
    info!("Factorizing {}x{} matrix", a.rows(), a.cols());

    let lu = LuDecomp::new(&a).context("LU factorization failed")?;
    println!("{:.*}", precision, lu.determinant());
    Ok(())
}
