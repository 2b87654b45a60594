//! Show the left/right driver pairing of a weight file.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use weightbrush_mirror::MirrorResolver;

use super::common;
use crate::weight_file::WeightFile;

/// Resolve mirrored driver pairs.
#[derive(Args)]
pub struct MirrorArgs {
    /// Weight file (JSON)
    pub file: PathBuf,

    /// Left-side tokens, whitespace separated (default: from settings)
    #[arg(long)]
    pub left: Option<String>,

    /// Right-side tokens, whitespace separated (default: from settings)
    #[arg(long)]
    pub right: Option<String>,

    /// Print the table by host (sparse) driver index
    #[arg(long)]
    pub sparse: bool,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,

    /// Settings file (default: user settings)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

/// Run the mirror command.
pub fn run(args: MirrorArgs) -> anyhow::Result<()> {
    let settings = common::settings(args.settings.as_deref())?;
    let file = WeightFile::load(&args.file)?;
    let left = args.left.unwrap_or(settings.mirror.left);
    let right = args.right.unwrap_or(settings.mirror.right);
    let resolver = MirrorResolver::new(&left, &right)?;
    let names = file.names();

    if args.sparse {
        let index = file
            .index_map()?
            .context("weight file has no sparse_indices")?;
        let table = resolver.resolve_sparse(&names, &index);
        if args.json {
            println!("{}", serde_json::to_string(&table)?);
        } else {
            for (slot, target) in table.iter().enumerate() {
                match target {
                    Some(t) => println!("{slot:>4} -> {t}"),
                    None => println!("{slot:>4} -> -"),
                }
            }
        }
        return Ok(());
    }

    let map = resolver.resolve(&names);
    if args.json {
        println!("{}", serde_json::to_string(map.targets())?);
        return Ok(());
    }

    let pairs = map.pairs();
    println!("Mirror pairs ({}):", pairs.len());
    for (a, b) in &pairs {
        println!("  {:<24} <-> {}", names[*a], names[*b]);
    }
    let unpaired: Vec<&str> = (0..names.len())
        .filter(|&d| !map.is_paired(d))
        .map(|d| names[d].as_str())
        .collect();
    if !unpaired.is_empty() {
        println!("Unpaired ({}): {}", unpaired.len(), unpaired.join(", "));
    }
    Ok(())
}
