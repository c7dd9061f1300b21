use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lsmap_cli::convert;
use lsmap_cli::settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lsmap", about = "Landstalker map layout converter")]
struct Args {
    /// Settings file (defaults to config.json next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a map layout into a map document
    Import {
        /// Path to map_NNN.lsmap inside its layout folder
        map: PathBuf,
        /// Output document (defaults to the map path with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a map document back into a layout folder
    Export {
        document: PathBuf,
        map: PathBuf,
    },
    /// Render the blockset atlas used by a map
    Blockset { map: PathBuf },
    /// Decode and re-encode a heightmap, reporting what it contains
    Heightmap { path: PathBuf },
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    match args.command {
        Command::Import { map, output } => {
            let doc = convert::import_map(&map, &settings)
                .with_context(|| format!("Failed to import {}", map.display()))?;
            let output = output.unwrap_or_else(|| map.with_extension("json"));
            convert::write_document(&doc, &output)?;
            println!("{}", output.display());
        }
        Command::Export { document, map } => {
            let doc = convert::read_document(&document)?;
            convert::export_map(&doc, &map)
                .with_context(|| format!("Failed to export to {}", map.display()))?;
        }
        Command::Blockset { map } => {
            let path = convert::rebuild_blockset(&map, &settings)
                .with_context(|| format!("Failed to render blockset for {}", map.display()))?;
            println!("{}", path.display());
        }
        Command::Heightmap { path } => {
            let report = convert::check_heightmap(&path)?;
            println!("{}x{} tiles", report.width, report.height);
            println!("blocked void: {}", report.blocked_void);
            for (flag, count) in &report.flags {
                println!("{:?}: {}", flag, count);
            }
            for (floor, count) in &report.floor_types {
                println!("floor type {}: {}", floor, count);
            }
            if !report.words_preserved {
                anyhow::bail!("{} does not survive a decode/encode pass", path.display());
            }
            if !report.text_identical {
                log::warn!("{} is not in canonical form", path.display());
            }
        }
    }

    Ok(())
}
