//! Report rows off their weight budget, optionally renormalizing them.

use clap::Args;
use std::path::PathBuf;
use weightbrush_core::{DEFAULT_TOLERANCE, EditSession, MassPolicy, row_drift};

use super::common;
use crate::weight_file::WeightFile;

/// Check row budgets and value ranges.
#[derive(Args)]
pub struct CheckArgs {
    /// Weight file (JSON)
    pub file: PathBuf,

    /// Allowed row drift
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Renormalize drifted rows and write the result
    #[arg(long)]
    pub fix: bool,

    /// Output file for --fix (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the check command.
pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let mut file = WeightFile::load(&args.file)?;
    let mut set = file.driver_set();
    let all_rows: Vec<usize> = (0..file.element_count()).collect();
    let matrix = set.gather(&all_rows)?;
    let locks = file.locks(&set);
    let policy = set.mass_policy();

    println!("Elements:    {}", matrix.rows());
    println!("Drivers:     {}", matrix.cols());

    let out_of_range = matrix
        .as_slice()
        .iter()
        .filter(|v| !(0.0..=1.0).contains(*v))
        .count();
    if out_of_range > 0 {
        println!("Out of range: {out_of_range} value(s) outside [0, 1]");
    }

    if policy == MassPolicy::Independent {
        println!("Budget:      independent values, no row budget");
        anyhow::ensure!(out_of_range == 0, "{out_of_range} value(s) out of range");
        return Ok(());
    }

    let drifted: Vec<(usize, f64)> = all_rows
        .iter()
        .map(|&r| (r, row_drift(&matrix, &locks, r)))
        .filter(|(_, d)| d.abs() > args.tolerance)
        .collect();
    let worst = drifted.iter().map(|(_, d)| d.abs()).fold(0.0, f64::max);
    println!("Max drift:   {worst:.3e}");
    for (row, drift) in drifted.iter().take(10) {
        println!("  row {row:>6}: {drift:+.6}");
    }
    if drifted.len() > 10 {
        println!("  ... {} more", drifted.len() - 10);
    }

    if drifted.is_empty() {
        anyhow::ensure!(out_of_range == 0, "{out_of_range} value(s) out of range");
        println!("OK");
        return Ok(());
    }
    if !args.fix {
        anyhow::bail!("{} row(s) off budget", drifted.len());
    }

    let mut session = EditSession::new(matrix)
        .with_locks(locks)?
        .with_policy(policy);
    let normalized = session.normalize_if_drifted(args.tolerance)?;
    let fixed = session.into_matrix();
    set.commit(&all_rows, &fixed, None)?;
    file.store(&set);
    let out = common::output_path(&args.file, args.output.as_ref());
    file.save(&out)?;

    tracing::info!(rows = drifted.len(), normalized, "renormalized drifted rows");
    println!("Normalized {} row(s)", drifted.len());
    println!("Wrote {}", out.display());
    Ok(())
}
