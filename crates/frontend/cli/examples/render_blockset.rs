use anyhow::{Context, Result};
use lsmap_cli::blockset;
use lsmap_core::ppu::BlocksetId;
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: render_blockset <data root> <primary> <secondary> <palette>";

/// Arguments after the program name.
fn parse_args(args: &[String]) -> Result<(PathBuf, BlocksetId)> {
    let [root, primary, secondary, palette] = args else {
        anyhow::bail!(USAGE);
    };
    let id = BlocksetId {
        primary: primary.parse().context("primary id")?,
        secondary: secondary.parse().context("secondary id")?,
        palette: palette.parse().context("palette id")?,
    };
    Ok((PathBuf::from(root), id))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (root, id) = parse_args(&args)?;

    let path = blockset::build_and_save(&root, id)?;
    println!("Blockset {} saved to {}", id.render_name(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let (root, id) = parse_args(&strings(&["data", "33", "2", "6"])).expect("args");
        assert_eq!(root, PathBuf::from("data"));
        assert_eq!(
            id,
            BlocksetId {
                primary: 33,
                secondary: 2,
                palette: 6
            }
        );
    }

    #[test]
    fn test_missing_args_report_usage() {
        let err = parse_args(&[]).unwrap_err();
        assert_eq!(err.to_string(), USAGE);
        assert!(parse_args(&strings(&["data", "1", "1"])).is_err());
        assert!(parse_args(&strings(&["data", "x", "1", "0"])).is_err());
    }
}
