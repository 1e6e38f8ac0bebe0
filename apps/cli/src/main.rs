// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geolayer CLI - import geological layers and inspect project files.
//!
//! Usage:
//!   geolayer import <kind> <file>... [options]
//!   geolayer inspect <project>
//!
//! Import options:
//!   --project <out>   Write the pool as a project file
//!   --label <name>    Slot label (defaults to the first file name)
//!   --x/--y/--z <col> Coordinate columns for Lines and Points
//!   --line <col>      Line-ID column for Lines
//!   --value <col>     Colouring column for Lines and Points
//!
//! Configuration comes from `GEOLAYER_*` environment variables, logging
//! from `RUST_LOG`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use geolayer_core::{import_parameters, ImportSource, LayerKind, LayerParameters};
use geolayer_processing::{LayerSlot, SlotPool, ViewerConfig};

#[derive(Debug, Default)]
struct ImportArgs {
    kind: Option<LayerKind>,
    files: Vec<String>,
    project: Option<String>,
    label: Option<String>,
    x: Option<String>,
    y: Option<String>,
    z: Option<String>,
    line: Option<String>,
    value: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,geolayer_processing=debug".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let config = ViewerConfig::from_env();
    tracing::debug!(slots = config.slot_count, no_data = config.no_data, "configuration loaded");

    match args[1].as_str() {
        "import" => run_import(parse_import_args(&args[2..])?, config).await,
        "inspect" => {
            let Some(path) = args.get(2) else {
                bail!("inspect needs a project file");
            };
            run_inspect(path, config).await
        }
        other => {
            print_usage();
            bail!("unknown command '{}'", other)
        }
    }
}

fn print_usage() {
    println!("geolayer - geological layer importer");
    println!();
    println!("Usage:");
    println!("  geolayer import <kind> <file>... [--project <out>] [--label <name>]");
    println!("                  [--x <col> --y <col> --z <col>] [--line <col>] [--value <col>]");
    println!("  geolayer inspect <project>");
    println!();
    let kinds: Vec<&str> = LayerKind::ALL.iter().map(LayerKind::as_str).collect();
    println!("Kinds: {}", kinds.join(", "));
}

fn parse_import_args(args: &[String]) -> Result<ImportArgs> {
    let mut parsed = ImportArgs::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if let Some(flag) = arg.strip_prefix("--") {
            let value = args
                .get(i + 1)
                .cloned()
                .with_context(|| format!("--{} needs a value", flag))?;
            let slot = match flag {
                "project" => &mut parsed.project,
                "label" => &mut parsed.label,
                "x" => &mut parsed.x,
                "y" => &mut parsed.y,
                "z" => &mut parsed.z,
                "line" => &mut parsed.line,
                "value" => &mut parsed.value,
                other => bail!("unknown option --{}", other),
            };
            *slot = Some(value);
            i += 2;
            continue;
        }
        if parsed.kind.is_none() {
            parsed.kind = Some(arg.parse()?);
        } else {
            parsed.files.push(arg.to_string());
        }
        i += 1;
    }
    if parsed.kind.is_none() {
        bail!("import needs a layer kind");
    }
    if parsed.files.is_empty() {
        bail!("import needs at least one file");
    }
    Ok(parsed)
}

/// Apply the column mapping flags to table-backed parameters
fn map_columns(parameters: LayerParameters, args: &ImportArgs) -> Result<LayerParameters> {
    let coords = || -> Result<(String, String, String)> {
        match (&args.x, &args.y, &args.z) {
            (Some(x), Some(y), Some(z)) => Ok((x.clone(), y.clone(), z.clone())),
            _ => bail!("--x, --y and --z are required for table layers"),
        }
    };
    Ok(match parameters {
        LayerParameters::Lines(lines) => {
            let (x, y, z) = coords()?;
            let line = args.line.clone().context("--line is required for Lines")?;
            let mut lines = lines.with_columns(x, y, z, line);
            lines.value_column = args.value.clone();
            LayerParameters::Lines(lines)
        }
        LayerParameters::Points(points) => {
            let (x, y, z) = coords()?;
            let mut points = points.with_columns(x, y, z);
            points.value_column = args.value.clone();
            LayerParameters::Points(points)
        }
        other => other,
    })
}

async fn run_import(args: ImportArgs, config: ViewerConfig) -> Result<()> {
    let kind = args.kind.context("import needs a layer kind")?;

    let mut sources = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("cannot read '{}'", file))?;
        let name = Path::new(file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone());
        sources.push(ImportSource::new(name, bytes));
    }

    let (parameters, default_label) = import_parameters(kind, &sources, config.surface_options())
        .await
        .with_context(|| format!("cannot import {} from {}", kind, args.files.join(", ")))?;
    let parameters = map_columns(parameters, &args)?;
    let label = args.label.clone().unwrap_or(default_label);

    let pool = SlotPool::new(config);
    let index = pool.import(parameters, label).await?;
    let slot = pool.get(index)?;
    print_slot(&slot);

    if let Some(out) = &args.project {
        let text = pool.save_project()?;
        tokio::fs::write(out, text)
            .await
            .with_context(|| format!("cannot write '{}'", out))?;
        println!("Project written to {}", out);
    }
    Ok(())
}

async fn run_inspect(path: &str, config: ViewerConfig) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read '{}'", path))?;
    let pool = SlotPool::new(config);
    let populated = pool.load_project(&text).await?;

    for slot in pool.snapshot()?.iter().filter(|s| s.layer().is_some()) {
        print_slot(slot);
    }
    println!("{} of {} slots populated", populated, pool.len());
    Ok(())
}

fn print_slot(slot: &LayerSlot) {
    let Some(layer) = slot.layer() else {
        return;
    };
    let (meshes, vertices, triangles) = layer
        .scene()
        .map(|s| (s.len(), s.vertex_count(), s.triangle_count()))
        .unwrap_or_default();
    println!(
        "[{}] {:<12} {:<24} meshes={} vertices={} triangles={} visible={} colormap={}",
        slot.id(),
        layer.kind(),
        slot.label,
        meshes,
        vertices,
        triangles,
        slot.visible,
        layer.style().colormap,
    );
}
