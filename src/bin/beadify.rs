use clap::Parser;
use std::fs;
use std::path::PathBuf;
use image_to_bead_pattern_wasm::{Palette, RenderParameters, aggregate, pattern_bytes};
use anyhow::Context;
use anyhow::Result;

/// Turn images into fuse-bead patterns (native wrapper around the WASM library).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pattern width in beads; height follows the aspect ratio
    #[arg(short, long, default_value_t = 50)]
    width: u32,

    /// Size of one bead in output pixels
    #[arg(short = 's', long, default_value_t = 15)]
    cell_size: u32,

    /// Do not draw alignment grid lines
    #[arg(long)]
    no_grid: bool,

    /// Draw a heavy grid line every N beads (0 disables)
    #[arg(short = 'g', long, default_value_t = 10)]
    grid_interval: u32,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "beads_")]
    prefix: String,

    /// Print bead counts per color as JSON
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let palette = Palette::standard().context("loading bead palette")?;
    let params = RenderParameters {
        cell_pixel_size: args.cell_size,
        show_grid: !args.no_grid,
        grid_major_interval: args.grid_interval,
    };

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let (png, grid) = pattern_bytes(&bytes, args.width, &palette, &params)
            .with_context(|| format!("bead pattern for {} failed", input.display()))?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = if let Some(dir) = &args.out_dir {
            dir.join(format!("{stem}.png"))
        } else {
            PathBuf::from(format!("{}{stem}.png", args.prefix))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png).with_context(|| format!("writing {}", out_path.display()))?;
        log::info!(
            "Saved {}x{} bead pattern → {}",
            grid.width(),
            grid.height(),
            out_path.display()
        );

        if args.stats {
            let counts: Vec<serde_json::Value> = aggregate(&grid)
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.entry.id(),
                        "name": s.entry.display_name(),
                        "hex": s.entry.hex(),
                        "count": s.count,
                    })
                })
                .collect();
            let report = serde_json::json!({
                "input": input.display().to_string(),
                "width": grid.width(),
                "height": grid.height(),
                "beads": grid.assigned_count(),
                "colors": counts,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
