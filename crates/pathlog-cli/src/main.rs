//! Pathlog CLI
//!
//! Inspect, render and convert recorded path journals.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pathlog_core::codec::{self, Encoding};
use pathlog_core::{KurboPath, PathPrimitive, RecordedPath, replay};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pathlog", version, about = "Inspect, render and convert recorded path journals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the actions and fill rule of a journal
    Inspect {
        /// Journal file (binary, JSON or base64)
        file: PathBuf,
    },
    /// Replay a journal and print its SVG path data
    Svg {
        /// Journal file (binary, JSON or base64)
        file: PathBuf,
        /// Print a complete `<path>` element including the fill rule
        #[arg(long)]
        element: bool,
    },
    /// Re-encode a journal
    Convert {
        /// Journal file (binary, JSON or base64)
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Target encoding: binary, json or base64
        #[arg(long, default_value = "binary")]
        to: Encoding,
    },
}

fn load(file: &Path) -> Result<RecordedPath> {
    let data = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let encoding = Encoding::detect(&data);
    log::debug!("{} looks like a {} journal", file.display(), encoding);
    codec::decode_any(&data).with_context(|| format!("failed to decode {}", file.display()))
}

fn inspect(file: &Path) -> Result<()> {
    let recorded = load(file)?;
    println!("fill type: {}", recorded.fill_type());
    println!("actions: {}", recorded.len());
    for (index, action) in recorded.iter().enumerate() {
        println!("{index:>5}: {action}");
    }
    Ok(())
}

fn svg(file: &Path, element: bool) -> Result<()> {
    let recorded = load(file)?;
    let mut path = KurboPath::new();
    replay(&recorded, &mut path).with_context(|| format!("failed to replay {}", file.display()))?;

    if element {
        let rule = path.fill_type().svg_rule();
        println!("<path d=\"{}\" fill-rule=\"{}\"/>", path.to_svg(), rule);
    } else {
        println!("{}", path.to_svg());
    }
    Ok(())
}

fn convert(input: &Path, output: &Path, to: Encoding) -> Result<()> {
    let recorded = load(input)?;
    let data = to.encode(&recorded)?;
    std::fs::write(output, &data).with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "converted {} ({} actions) to {} as {}",
        input.display(),
        recorded.len(),
        output.display(),
        to
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect { file } => inspect(&file),
        Command::Svg { file, element } => svg(&file, element),
        Command::Convert { input, output, to } => convert(&input, &output, to),
    }
}
