use anyhow::{Context, Result};
use clap::Parser;
use idl_ir::{merge_units, read_idl_file, Definitions, Projection, ReadOptions};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// idl-ir: build Web IDL syntax trees into generator-ready definitions.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input syntax trees (JSON)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output JSON file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Merge all inputs into one set of definitions
    #[arg(long)]
    merge: bool,

    /// Fold parent interfaces into their descendants
    #[arg(long)]
    inherit: bool,

    /// Do not enforce the one-definition-per-file naming rule
    #[arg(long)]
    skip_filename_check: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    idl_ir::logging::init_tracing();
    let cli = Cli::parse();

    let options = ReadOptions {
        check_filename: !cli.skip_filename_check,
    };

    let units = cli
        .inputs
        .par_iter()
        .map(|path| read_idl_file(path, &options))
        .collect::<Result<Vec<Definitions>>>()?;
    info!(units = units.len(), "built translation units");

    let mut groups = if cli.merge {
        vec![merge_units(units).context("failed to merge definitions")?]
    } else {
        units
    };
    if cli.inherit {
        for defs in &mut groups {
            defs.resolve_inheritance().context("failed to resolve inheritance")?;
        }
    }

    let projections: Vec<Projection> = groups.iter().map(Projection::new).collect();
    let json = match (cli.merge, cli.compact) {
        (true, true) => serde_json::to_string(&projections[0])?,
        (true, false) => serde_json::to_string_pretty(&projections[0])?,
        (false, true) => serde_json::to_string(&projections)?,
        (false, false) => serde_json::to_string_pretty(&projections)?,
    };

    if let Some(output_path) = cli.output {
        fs::write(&output_path, json)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        eprintln!("idl-ir: wrote {}", output_path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}
