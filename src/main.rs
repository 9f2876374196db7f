use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use skel_remap::config::RemapConfig;
use skel_remap::core::{init_logging, RemapResult};
use skel_remap::editor::CommandManager;
use skel_remap::scene::{PrimPath, Stage};
use skel_remap::skeleton::{remap_reference, CachedReplacementSkeletons};

/// Remap the skeleton joints of a new reference under a captured SkelRoot
#[derive(Parser, Debug)]
#[command(name = "skel_remap")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON scene description
    scene: PathBuf,

    /// Captured SkelRoot prim path
    skel_root: String,

    /// Newly added reference prim under the SkelRoot
    reference_root: String,

    /// Write the edited layer as JSON to this path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Config file (TOML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> RemapResult<bool> {
    let mut config = match &args.config {
        Some(path) => RemapConfig::from_file(path)?,
        None => RemapConfig::load_or_default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    init_logging(&config.logging);

    let mut stage = Stage::from_json_file(&args.scene)?;
    let skel_root = PrimPath::parse(&args.skel_root)?;
    let reference_root = PrimPath::parse(&args.reference_root)?;
    let mut history = CommandManager::new(config.history.max_history);
    let mut cache = CachedReplacementSkeletons::new();

    let report = remap_reference(
        &mut stage,
        &mut history,
        &mut cache,
        &config.remap,
        &skel_root,
        &reference_root,
    )?;

    for prim in &report.cleared_skel_roots {
        println!("cleared SkelRoot: {}", prim);
    }
    for prim in &report.remapped {
        println!("remapped: {}", prim);
    }
    if let Some(summary) = report.failure_summary() {
        eprintln!("{}", summary);
    }

    if let Some(out) = &args.out {
        fs::write(out, stage.edit_layer().to_json_string()?)?;
        tracing::info!(target: "skeleton", "Wrote edit layer to {:?}", out);
    }
    Ok(report.is_success())
}

fn main() {
    match run(Args::parse()) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("skel_remap failed: {}", e);
            process::exit(1);
        }
    }
}
