//! densela: dense linear solves from the command line.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use densela_linalg::{ErrorKind, KernelDiagnostics, LinalgError};

#[derive(Parser)]
#[command(
    name = "densela",
    version,
    about = "Dense matrix determinants, inverses, and LU/QR solves",
    long_about = "Reads matrices and vectors from text (.txt, .tsv, .csv), binary (.dnla)\n\
                   or JSON files and runs LU and Householder QR factorizations on them."
)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Forward numeric kernel diagnostics to the log
    #[arg(long, global = true)]
    kernel_diagnostics: bool,

    /// Digits after the decimal point in printed output
    #[arg(long, default_value = "6", global = true)]
    precision: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Determinant of a square matrix
    Det(commands::det::DetArgs),

    /// Inverse of a square matrix
    Inv(commands::inv::InvArgs),

    /// Solve a square system A x = b
    Solve(commands::solve::SolveArgs),

    /// Least-squares solve of an over-determined system
    Lssolve(commands::lssolve::LssolveArgs),

    /// Show the Householder QR factorization of a matrix
    Qr(commands::qr::QrArgs),

    /// Summary statistics of a vector
    Stats(commands::stats::StatsArgs),

    /// Convert a matrix between text, binary and JSON formats
    Convert(commands::convert::ConvertArgs),
}

/// Process exit code for a failure, keyed on the numeric error kind
/// anywhere in the error chain.
fn exit_code(kind: Option<ErrorKind>) -> u8 {
    match kind {
        Some(ErrorKind::Argument) => 2,
        Some(ErrorKind::Dimension) => 3,
        Some(ErrorKind::Index) => 4,
        Some(ErrorKind::Shape) => 5,
        Some(ErrorKind::Range) => 6,
        Some(ErrorKind::SingularMatrix) => 7,
        Some(ErrorKind::Computation) => 8,
        Some(ErrorKind::Allocation) => 9,
        None => 1,
    }
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain()
        .find_map(|e| e.downcast_ref::<LinalgError>())
        .map(LinalgError::kind)
}

fn run(cli: Cli) -> Result<()> {
    let precision = cli.precision;
    match cli.command {
        Commands::Det(args) => commands::det::run(args, precision),
        Commands::Inv(args) => commands::inv::run(args, precision),
        Commands::Solve(args) => commands::solve::run(args, precision),
        Commands::Lssolve(args) => commands::lssolve::run(args, precision),
        Commands::Qr(args) => commands::qr::run(args, precision),
        Commands::Stats(args) => commands::stats::run(args, precision),
        Commands::Convert(args) => commands::convert::run(args, precision),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let _diagnostics = cli.kernel_diagnostics.then(KernelDiagnostics::enable);

    tracing::info!("densela v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = error_kind(&err);
            match kind {
                Some(kind) => eprintln!("{}: {:#}", kind.name(), err),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(exit_code(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_kind_found_through_context() {
        let err = Err::<(), _>(LinalgError::SingularMatrix)
            .context("solving system")
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::SingularMatrix));
        assert_eq!(exit_code(error_kind(&err)), 7);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = anyhow::anyhow!("file not found");
        assert_eq!(error_kind(&err), None);
        assert_eq!(exit_code(None), 1);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        let cli = Cli::parse_from(["densela", "-vv", "--precision", "3", "det", "--matrix", "a.txt"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.precision, 3);
        assert!(matches!(cli.command, Commands::Det(_)));
    }
}
