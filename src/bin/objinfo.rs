//! Loads OBJ files and reports the buffers they produce.
//!
//! ```bash
//! objinfo assets/cube_uv.obj --log-level debug
//! objinfo --config objinfo.toml --no-flip a.obj b.obj
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::error;

use objseam::config::{Config, LogLevel};
use objseam::{load_obj_files, log, Model};

#[derive(Debug, Parser)]
#[command(name = "objinfo", about = "Load OBJ meshes and report their GPU buffers")]
struct Args {
    /// OBJ files to load. They are loaded in parallel.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write texture coordinates without flipping v.
    #[arg(long)]
    no_flip: bool,

    /// Overrides the configured log level.
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.no_flip {
        config.load.flip_texture_v = false;
    }

    log::init_logger(config.logging.level);

    let results = load_obj_files(&args.files, &config.load);

    let mut failures = 0;
    for (path, result) in args.files.iter().zip(results) {
        match result {
            Ok(model) => print_summary(path, &model),
            Err(err) => {
                failures += 1;
                error!("{}: {}", path.display(), err);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed to load", failures, args.files.len());
    }
    Ok(())
}

fn print_summary(path: &Path, model: &Model) {
    println!("{} ({})", path.display(), model.name);
    println!(
        "  vertices:       {} ({} positions, {} split)",
        model.vertex_count(),
        model.position_count,
        model.split_vertex_count()
    );
    println!("  triangles:      {}", model.triangle_count());
    println!("  furthest point: {}", model.furthest_point);
    println!(
        "  buffers:        {} vertex bytes, {} index bytes",
        model.vertex_bytes().len(),
        model.index_bytes().len()
    );
}
