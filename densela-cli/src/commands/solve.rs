//! Solve a square linear system.
//!
//! densela solve --matrix A.txt --rhs b.txt [--method lu|qr]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use densela_linalg::{LuDecomp, QrDecomp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Partial-pivoting LU
    Lu,
    /// Householder QR
    Qr,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Square coefficient matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Right-hand side vector file
    #[arg(long)]
    rhs: PathBuf,

    /// Factorization used for the solve
    #[arg(long, value_enum, default_value_t = Method::Lu)]
    method: Method,
}

pub fn run(args: SolveArgs, precision: usize) -> Result<()> {
    let a = densela_io::read_matrix(&args.matrix)?;
    let b = densela_io::read_vector(&args.rhs)?;
    info!("Solving {}x{} system with {:?}", a.rows(), a.cols(), args.method);

    let x = match args.method {
        Method::Lu => LuDecomp::new(&a).and_then(|lu| lu.solve(&b)),
        Method::Qr => QrDecomp::new(&a).and_then(|mut qr| qr.solve(&b)),
    }
    .context("Linear solve failed")?;

    print!("{:.*}", precision, x);
    Ok(())
}
