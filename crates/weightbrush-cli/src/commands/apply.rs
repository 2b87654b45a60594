//! Apply one edit operation to a weight file.

use clap::Args;
use std::path::PathBuf;
use weightbrush_config::{format_operation, parse_operation};
use weightbrush_core::{DEFAULT_TOLERANCE, EditSession, check_invariants};

use super::common;
use crate::weight_file::WeightFile;

/// Apply an edit operation.
#[derive(Args)]
pub struct ApplyArgs {
    /// Weight file (JSON)
    pub file: PathBuf,

    /// Operation, e.g. "absolute:0.4", "add:0.1", "percent:25%", "average:0.5", "prune:0.05"
    #[arg(short = 'p', long = "op")]
    pub operation: String,

    /// Rows to edit, e.g. "0-10,12" (default: all)
    #[arg(short, long)]
    pub rows: Option<String>,

    /// Driver to edit, by name or column; repeatable (default: all)
    #[arg(short, long = "driver")]
    pub drivers: Vec<String>,

    /// Driver to hide from the edit; repeatable
    #[arg(long = "hide")]
    pub hidden: Vec<String>,

    /// Also edit the mirrored drivers
    #[arg(short, long)]
    pub mirror: bool,

    /// Ignore soft-selection weights in the file
    #[arg(long)]
    pub no_soft: bool,

    /// Output file (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (default: user settings)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

/// Run the apply command.
pub fn run(args: ApplyArgs) -> anyhow::Result<()> {
    let settings = common::settings(args.settings.as_deref())?;
    let mut file = WeightFile::load(&args.file)?;
    let operation = parse_operation(&args.operation, &settings.smooth)?;

    let names = file.names();
    let rows = common::parse_rows(args.rows.as_deref(), file.element_count())?;
    let columns = common::resolve_drivers(&args.drivers, &names)?;
    let hidden = if args.hidden.is_empty() {
        Vec::new()
    } else {
        common::resolve_drivers(&args.hidden, &names)?
    };

    let mut selection = common::selection(&rows, &columns).with_hidden_columns(hidden);
    if settings.soft_selection
        && !args.no_soft
        && let Some(weights) = &file.soft_weights
    {
        selection = selection.with_soft_weights(weights.clone());
    }

    let mut set = file.driver_set();
    let all_rows: Vec<usize> = (0..file.element_count()).collect();
    let before = set.gather(&all_rows)?;
    let locks = file.locks(&set);

    let mut session = settings
        .configure(EditSession::new(before.clone()))
        .with_locks(locks.clone())?
        .with_policy(set.mass_policy());
    if let Some(adjacency) = file.adjacency()? {
        session = session.with_adjacency(settings.smooth.widen(&adjacency))?;
    }
    if let Some(positions) = file.rest_positions() {
        session = session.with_positions(positions)?;
    }
    if let Some(index) = file.index_map()? {
        session = session.with_index_map(index)?;
    }

    let result = if args.mirror {
        let mirror = settings.mirror_resolver()?.resolve(&names);
        tracing::debug!(pairs = mirror.pairs().len(), "mirror table");
        session = session.with_mirror(mirror)?;
        session.apply_mirrored(&selection, operation)
    } else {
        session.apply(&selection, operation)
    };
    match result {
        Err(e) if e.is_no_op() => {
            tracing::warn!("selection has no editable cells");
            println!("No change: nothing editable in the selection.");
            return Ok(());
        }
        other => other?,
    }

    let after = session.into_matrix();
    for violation in check_invariants(&before, &after, &locks, DEFAULT_TOLERANCE) {
        tracing::warn!(%violation, "invariant check failed");
    }

    set.commit(&all_rows, &after, None)?;
    file.store(&set);
    let out = common::output_path(&args.file, args.output.as_ref());
    file.save(&out)?;

    let label = format_operation(&operation);
    tracing::info!(operation = %label, rows = rows.len(), drivers = columns.len(), "applied edit");
    println!(
        "Applied {label} to {} row(s) x {} driver(s), max change {:.6}",
        rows.len(),
        columns.len(),
        before.max_abs_diff(&after)
    );
    println!("Wrote {}", out.display());
    Ok(())
}
