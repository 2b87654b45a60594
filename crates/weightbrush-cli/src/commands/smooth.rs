//! Smooth or sharpen whole rows over the mesh adjacency.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use weightbrush_core::{EditOperation, RedistributionEngine, SelectionRegion};

use super::common;
use crate::weight_file::WeightFile;

/// Smooth weights across neighboring elements.
#[derive(Args)]
pub struct SmoothArgs {
    /// Weight file (JSON) with an adjacency table
    pub file: PathBuf,

    /// Rows to smooth, e.g. "0-10,12" (default: all)
    #[arg(short, long)]
    pub rows: Option<String>,

    /// Number of rounds (default: from settings)
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Neighbor ring depth (default: from settings)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Fraction of the way toward the neighbor mean (default: from settings)
    #[arg(long)]
    pub strength: Option<f64>,

    /// Push away from the neighbor mean instead
    #[arg(long)]
    pub sharpen: bool,

    /// Output file (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (default: user settings)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

/// Run the smooth command.
pub fn run(args: SmoothArgs) -> anyhow::Result<()> {
    let settings = common::settings(args.settings.as_deref())?;
    let mut file = WeightFile::load(&args.file)?;
    let adjacency = file
        .adjacency()?
        .context("weight file has no adjacency table")?;

    let mut smooth = settings.smooth.clone();
    if let Some(n) = args.iterations {
        smooth.repeat = n;
    }
    if let Some(depth) = args.depth {
        smooth.depth = depth;
    }
    if let Some(strength) = args.strength {
        smooth.strength = strength;
    }
    let operation = EditOperation::Smooth(smooth.params(args.sharpen));
    operation.validate()?;
    let graph = smooth.widen(&adjacency);

    let count = file.element_count();
    let rows = common::parse_rows(args.rows.as_deref(), count)?;
    let mut mask = vec![false; count];
    for &r in &rows {
        mask[r] = true;
    }

    let mut set = file.driver_set();
    let all_rows: Vec<usize> = (0..count).collect();
    let before = set.gather(&all_rows)?;
    let locks = file.locks(&set);
    let selection = SelectionRegion::from_row_mask(&mask, before.cols());

    let after = RedistributionEngine::new()
        .with_adjacency(&graph)
        .with_policy(set.mass_policy())
        .with_auto_prune(settings.auto_prune_threshold())
        .apply(&before, &locks, &selection, operation)?;

    set.commit(&all_rows, &after, None)?;
    file.store(&set);
    let out = common::output_path(&args.file, args.output.as_ref());
    file.save(&out)?;

    tracing::info!(
        operation = operation.name(),
        rounds = smooth.repeat,
        depth = smooth.depth,
        rows = rows.len(),
        "smoothed"
    );
    println!(
        "{} {} row(s), {} round(s), depth {}, max change {:.6}",
        if args.sharpen { "Sharpened" } else { "Smoothed" },
        rows.len(),
        smooth.repeat,
        smooth.depth,
        before.max_abs_diff(&after)
    );
    println!("Wrote {}", out.display());
    Ok(())
}
