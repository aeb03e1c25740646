// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Tomesize CLI
//!
//! Command-line access to the volume allocator and the local estimate pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tomesize_core::{
    estimate, ContentList, ContentTotals, CountingMode, GlyphMetricsOracle, HeightOracle,
    PagePosition, SizeEstimate, VolumeDescriptor,
};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "tomesize")]
#[command(about = "Tomesize - printed tome size estimation", long_about = None)]
struct Cli {
    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out counted pages into volumes
    Allocate {
        /// Ceremony pages
        #[arg(long, default_value = "0")]
        ceremony: u32,

        /// Memory pages
        #[arg(long)]
        memory: u32,
    },

    /// Estimate the size of a content list read from a JSON file
    Estimate {
        /// File holding `{"ceremony": [...], "memory": [...]}`
        #[arg(long)]
        list: PathBuf,

        /// Paginate messages instead of counting one page each
        #[arg(long)]
        accurate: bool,
    },

    /// Measure text with the glyph-metrics oracle
    Measure {
        /// Text to measure
        #[arg(long)]
        text: String,

        /// Measure against a continuation page
        #[arg(long)]
        continuation: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Measurement {
    height_px: u32,
    ceiling_px: u32,
    exceeds: bool,
}

async fn measure(
    oracle: &GlyphMetricsOracle,
    text: &str,
    position: PagePosition,
) -> Result<Measurement> {
    Ok(Measurement {
        height_px: oracle.measure(text, position).await?,
        ceiling_px: position.ceiling_px(),
        exceeds: oracle.exceeds(text, position, None).await?,
    })
}

fn read_list(path: &Path) -> Result<ContentList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content list {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid content list {:?}", path))
}

fn print_volumes(volumes: &[VolumeDescriptor]) {
    println!(
        "{:<8} {:>6} {:>9} {:>6} {:>7} {:>6}",
        "Volume", "Front", "Ceremony", "Notes", "Memory", "Total"
    );
    println!("{:-<48}", "");
    for (index, volume) in volumes.iter().enumerate() {
        println!(
            "{:<8} {:>6} {:>9} {:>6} {:>7} {:>6}",
            index + 1,
            volume.front_matter_pages,
            volume.ceremony_pages,
            volume.notes_pages,
            volume.memory_pages,
            volume.total
        );
    }
}

fn print_estimate(estimate: &SizeEstimate) {
    println!("Ceremony pages: {}", estimate.totals.ceremony_pages);
    println!("Memory pages:   {}", estimate.totals.memory_pages);
    println!();
    print_volumes(&estimate.volumes);
    println!();
    println!("Size: {}", estimate.size);
}

fn emit<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Allocate { ceremony, memory } => {
            let totals = ContentTotals::new(ceremony, memory);
            let estimate = SizeEstimate::from_totals(totals)?;
            debug!(volumes = estimate.volumes.len(), "allocated");
            emit(&estimate, cli.json, print_estimate)?;
        }

        Commands::Estimate { list, accurate } => {
            let content = read_list(&list)?;
            let mode = if accurate {
                CountingMode::Accurate
            } else {
                CountingMode::Approximate
            };
            let oracle = GlyphMetricsOracle::default();
            let estimate = estimate(&content, &oracle, mode).await?;
            emit(&estimate, cli.json, print_estimate)?;
        }

        Commands::Measure { text, continuation } => {
            let position = if continuation {
                PagePosition::Continuation
            } else {
                PagePosition::First
            };
            let measurement = measure(&GlyphMetricsOracle::default(), &text, position).await?;
            emit(&measurement, cli.json, |m| {
                println!("Height:  {} px", m.height_px);
                println!("Ceiling: {} px", m.ceiling_px);
                println!("Fits:    {}", if m.exceeds { "no" } else { "yes" });
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli =
            Cli::try_parse_from(["tomesize", "--json", "allocate", "--memory", "40"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Allocate {
                ceremony: 0,
                memory: 40
            }
        ));

        let cli = Cli::try_parse_from(["tomesize", "measure", "--text", "hi", "--continuation"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Measure { continuation: true, .. }));

        assert!(Cli::try_parse_from(["tomesize", "estimate"]).is_err());
    }

    #[tokio::test]
    async fn test_measure_against_ceiling() {
        let oracle = GlyphMetricsOracle::default();
        let short = measure(&oracle, "hello", PagePosition::First).await.unwrap();
        assert_eq!(short.height_px, 24);
        assert_eq!(short.ceiling_px, 493);
        assert!(!short.exceeds);

        // 21 lines of 24px overflow the first page but fit a continuation page
        let lines = vec!["word"; 21].join("\n");
        let first = measure(&oracle, &lines, PagePosition::First).await.unwrap();
        assert!(first.exceeds);
        let continuation = measure(&oracle, &lines, PagePosition::Continuation)
            .await
            .unwrap();
        assert!(!continuation.exceeds);
    }

    #[test]
    fn test_read_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let list = json!({
            "ceremony": [{"message": "welcome"}],
            "memory": [{"message": "so kind", "images": ["a.jpg"]}],
        });
        write!(file, "{}", list).unwrap();

        let list = read_list(file.path()).unwrap();
        assert_eq!(list.ceremony.len(), 1);
        assert_eq!(list.memory[0].image_pages(), 1);

        assert!(read_list(Path::new("/nonexistent/list.json")).is_err());
    }
}
