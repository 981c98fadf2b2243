//! Summary statistics of a vector.
//!
//! densela stats --vector x.txt [--quantile 0.9]

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct StatsArgs {
    /// Vector file
    #[arg(long)]
    vector: PathBuf,

    /// Quantile fraction in [0, 1] (default: median)
    #[arg(long)]
    quantile: Option<f64>,
}

pub fn run(args: StatsArgs, precision: usize) -> Result<()> {
    let v = densela_io::read_vector(&args.vector)?;
    let p = args.quantile.unwrap_or(0.5);
    let q = v.quantile(p)?;

    println!("length\t{}", v.len());
    println!("min\t{:.*}\t(index {})", precision, v.min(), v.min_index());
    println!("max\t{:.*}\t(index {})", precision, v.max(), v.max_index());
    println!("mean\t{:.*}", precision, v.mean());
    println!("variance\t{:.*}", precision, v.variance(None));
    println!("sd\t{:.*}", precision, v.standard_deviation(None));
    println!("absdev\t{:.*}", precision, v.mean_absolute_deviation(None));
    println!("sum\t{:.*}", precision, v.sum());
    println!("norm\t{:.*}", precision, v.norm());
    println!("quantile({})\t{:.*}", p, precision, q);
    Ok(())
}
