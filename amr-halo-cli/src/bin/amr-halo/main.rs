//! Command-line tool that reads a hierarchy description and prints the geometry of its halo
//! exchange as JSON.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};

use amr_halo::description::{HierarchyDescription, report_ghost_areas, report_overlaps};
use amr_halo::ghost::{level_ghost_boxes, particle_ghost_area_boxes};
use amr_halo::overlap::hierarchy_overlaps;

mod logging;
use logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(name = "amr-halo", author, about, version)]
struct AmrHaloArgs {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Which geometry to compute.
    #[arg(value_enum)]
    pass: Pass,

    /// Path to a JSON hierarchy description.
    #[arg(value_name = "DESCRIPTION")]
    description: PathBuf,
}

/// A geometry pass over a whole hierarchy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Pass {
    /// Overlaps between the ghost boxes of neighboring patches, per level.
    Overlaps,
    /// The particle halo of every patch.
    GhostArea,
    /// The parts of particle halos not covered by other patches of the same level.
    LevelGhosts,
}

fn main() -> Result<(), anyhow::Error> {
    let AmrHaloArgs {
        logging: logging_args,
        pass,
        description: description_path,
    } = AmrHaloArgs::parse();

    logging::install(&logging_args)?;

    let text = std::fs::read_to_string(&description_path)
        .with_context(|| format!("failed to read {}", description_path.display()))?;
    let description = HierarchyDescription::from_json_str(&text)
        .with_context(|| format!("failed to parse {}", description_path.display()))?;

    let report = match description.dimension() {
        1 => run::<1>(&description, pass)?,
        2 => run::<2>(&description, pass)?,
        3 => run::<3>(&description, pass)?,
        d => bail!("hierarchy descriptions must have 1, 2, or 3 axes, not {d}"),
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).context("failed to write report")?;
    writeln!(stdout).context("failed to write report")?;
    Ok(())
}

fn run<const D: usize>(
    description: &HierarchyDescription,
    pass: Pass,
) -> Result<serde_json::Value, anyhow::Error> {
    let hierarchy = description
        .build::<D>()
        .context("failed to build hierarchy")?;
    log::info!(
        "computing {pass:?} over {levels} levels",
        levels = hierarchy.levels().len()
    );

    let report = match pass {
        Pass::Overlaps => serde_json::to_value(report_overlaps(&hierarchy_overlaps(&hierarchy)?)),
        Pass::GhostArea => serde_json::to_value(report_ghost_areas(&particle_ghost_area_boxes(
            &hierarchy,
        )?)),
        Pass::LevelGhosts => {
            serde_json::to_value(report_ghost_areas(&level_ghost_boxes(&hierarchy)?))
        }
    };
    report.context("failed to serialize report")
}
