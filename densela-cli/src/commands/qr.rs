//! Householder QR factorization of a matrix.
//!
//! densela qr --matrix A.txt

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use densela_linalg::QrDecomp;

#[derive(Args)]
pub struct QrArgs {
    /// Matrix file (any shape)
    #[arg(long)]
    matrix: PathBuf,
}

pub fn run(args: QrArgs, precision: usize) -> Result<()> {
    let a = densela_io::read_matrix(&args.matrix)?;
    let qr = QrDecomp::new(&a)?;
    let (q, r) = qr.unpack()?;

    println!("# packed ({}x{}, minsize {})", qr.rows(), qr.cols(), qr.minsize());
    print!("{:.*}", precision, qr.matrix());
    println!("# tau");
    print!("{:.*}", precision, qr.tau());
    println!("# Q");
    print!("{:.*}", precision, q);
    println!("# R");
    print!("{:.*}", precision, r);
    Ok(())
}
