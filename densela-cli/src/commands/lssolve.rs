//! Least-squares solve of an over-determined system.
//!
//! densela lssolve --matrix A.txt --rhs b.txt

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use densela_linalg::QrDecomp;

#[derive(Args)]
pub struct LssolveArgs {
    /// Coefficient matrix file with more rows than columns
    #[arg(long)]
    matrix: PathBuf,

    /// Right-hand side vector file
    #[arg(long)]
    rhs: PathBuf,
}

pub fn run(args: LssolveArgs, precision: usize) -> Result<()> {
    let a = densela_io::read_matrix(&args.matrix)?;
    let b = densela_io::read_vector(&args.rhs)?;
    info!("Least-squares fit of {}x{} system", a.rows(), a.cols());

    let mut qr = QrDecomp::new(&a)?;
    let x = qr.lssolve(&b).context("Least-squares solve failed")?;

    println!("# solution");
    print!("{:.*}", precision, x);
    if let Some(residuals) = qr.residuals() {
        let rss: f64 = residuals.iter().map(|r| r * r).sum();
        println!("# residuals");
        print!("{:.*}", precision, residuals);
        println!("# residual sum of squares");
        println!("{:.*}", precision, rss);
    }
    Ok(())
}
