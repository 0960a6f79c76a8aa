use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tidewatch_common::HeatmapKind;
use tidewatch_grid::{CellCoord, HeatmapSet, PlayAreaConfig, WorldGrid};
use tidewatch_minimap::{
    BoatTransform, HudEvent, HudEventHandler, KeyItemMarker, Minimap, MinimapConfig,
    MinimapRenderer, TextMinimapRenderer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tidewatch-cli", about = "CLI tool for tidewatch grids and minimap")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Build a grid over a rectangle and print its layout
    Grid {
        /// Requested minimum corner
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        min: Vec<f32>,
        /// Requested maximum corner
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        max: Vec<f32>,
        /// Side length of one cell in world units
        #[arg(long)]
        cell_scale: f32,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find the cell owning a world position
    Locate {
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        min: Vec<f32>,
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        max: Vec<f32>,
        #[arg(long)]
        cell_scale: f32,
        /// World position to look up
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        at: Vec<f32>,
    },
    /// Feed a scripted movement path into every heatmap and print the blips
    Heatmap {
        /// YAML file with a `play_area` section
        #[arg(short, long)]
        config: PathBuf,
        /// Number of samples per heatmap
        #[arg(short, long, default_value = "500")]
        samples: usize,
        /// Normalised heat a cell needs to produce a blip
        #[arg(short, long, default_value = "0.5")]
        threshold: f32,
    },
    /// Drive the minimap through a scripted voyage and print each frame
    Minimap {
        /// YAML file with `play_area` and optional `minimap` sections
        #[arg(short, long)]
        config: PathBuf,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "8")]
        frames: usize,
    },
}

/// Top-level config file layout.
#[derive(Debug, Deserialize)]
struct TidewatchConfig {
    play_area: PlayAreaConfig,
    #[serde(default)]
    minimap: MinimapConfig,
}

impl TidewatchConfig {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.play_area.validate()?;
        Ok(config)
    }
}

fn vec2(values: &[f32]) -> Vec2 {
    Vec2::new(values[0], values[1])
}

fn format_coord(coord: Option<CellCoord>) -> String {
    match coord {
        Some(c) => format!("({}, {})", c.x, c.y),
        None => "outside".to_string(),
    }
}

/// Deterministic movement for each heatmap kind: enemies circle a camp,
/// leviathans trace a wide figure eight, the boat heads north-east.
fn sample_path(kind: HeatmapKind, samples: usize) -> Vec<Vec2> {
    (0..samples)
        .map(|i| {
            let t = i as f32 * 0.05;
            match kind {
                HeatmapKind::EnemyMovement => {
                    Vec2::new(4_000.0, -2_500.0) + Vec2::from_angle(t) * 1_500.0
                }
                HeatmapKind::LeviathanMovement => {
                    Vec2::new((t * 0.5).sin() * 12_000.0, t.sin() * 6_000.0)
                }
                HeatmapKind::BoatMovement => Vec2::splat(-15_000.0) + Vec2::splat(t * 600.0),
            }
        })
        .collect()
}

fn build_heatmaps(play_area: &PlayAreaConfig, samples: usize) -> anyhow::Result<HeatmapSet> {
    let mut heatmaps = HeatmapSet::from_config(play_area)?;
    for kind in HeatmapKind::ALL {
        if let Some(map) = heatmaps.get_mut(kind) {
            let hits = map.record_many(sample_path(kind, samples), 1.0);
            tracing::debug!(%kind, hits, samples, "heatmap fed");
        }
    }
    Ok(heatmaps)
}

fn run_heatmap(config: &TidewatchConfig, samples: usize, threshold: f32) -> anyhow::Result<()> {
    let heatmaps = build_heatmaps(&config.play_area, samples)?;
    for (kind, map) in heatmaps.iter() {
        let dims = map.grid().index_dimensions();
        let blips = map.blips(threshold);
        println!(
            "{kind}: grid={}x{} cell_scale={} total_heat={:.1} max_heat={:.1} blips={}",
            dims.x,
            dims.y,
            map.grid().cell_scale(),
            map.total_heat(),
            map.max_heat(),
            blips.len()
        );
        for blip in blips.iter().take(10) {
            println!(
                "  pos=({:.1}, {:.1}) heat={:.2}",
                blip.position.x, blip.position.y, blip.heat
            );
        }
        if blips.len() > 10 {
            println!("  ... {} more", blips.len() - 10);
        }
    }
    Ok(())
}

fn run_minimap(config: &TidewatchConfig, frames: usize) -> anyhow::Result<()> {
    let heatmaps = build_heatmaps(&config.play_area, 500)?;
    let enemy_blips = heatmaps.blips(HeatmapKind::EnemyMovement, 0.5);
    let leviathan_blips = heatmaps.blips(HeatmapKind::LeviathanMovement, 0.5);
    let survivors = [Vec2::new(3_000.0, 1_000.0), Vec2::new(-6_000.0, 4_500.0)];
    let key_item = Vec2::new(15_000.0, 8_000.0);

    let mut minimap = Minimap::new(config.minimap.clone(), Vec2::new(1920.0, 1080.0))?;
    let renderer = TextMinimapRenderer::new();
    let world_to_map = minimap.config().world_to_map;
    let dt = minimap.config().radar_duration / frames.max(1) as f32;

    minimap.handle(&HudEvent::ShowHud(true));
    minimap.handle(&HudEvent::StartRadarPing);

    for frame in 0..frames {
        let progress = frame as f32 / frames.max(1) as f32;
        let boat = Vec2::new(progress * 9_000.0, progress * 4_000.0);
        minimap.handle(&HudEvent::BoatTransformUpdate(BoatTransform {
            x: boat.x,
            z: boat.y,
            yaw_degrees: 24.0,
            zoom: progress,
        }));

        if minimap.just_updated_camera_dimensions() {
            minimap.update_geometry_render_boat_pos(minimap.last_known_boat_pos());
            minimap.reset_just_updated_camera_dimensions();
        }

        minimap.update(dt);

        let relative = minimap.last_known_boat_pos() - key_item / world_to_map;
        let marker = if relative.length() > minimap.current_radius() {
            KeyItemMarker::Direction(relative.normalize_or_zero())
        } else {
            KeyItemMarker::Position(key_item)
        };
        minimap.refresh_dynamic_sprites(&enemy_blips, &leviathan_blips, &survivors, marker);

        println!("--- frame {frame} radius={:.1} ---", minimap.current_radius());
        if let Some(output) = minimap.frame() {
            print!("{}", renderer.render(&output));
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tidewatch-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tidewatch_common::crate_info());
            println!("grid: {}", tidewatch_grid::crate_info());
            println!("minimap: {}", tidewatch_minimap::crate_info());
        }
        Commands::Grid {
            min,
            max,
            cell_scale,
            json,
        } => {
            let grid = WorldGrid::new(vec2(&min), vec2(&max), cell_scale)?;
            let dims = grid.index_dimensions();
            let world = grid.world_dimensions();
            let origin = grid.origin();
            let center = grid.world_center_point();
            if json {
                let summary = serde_json::json!({
                    "index_dimensions": [dims.x, dims.y],
                    "world_dimensions": [world.x, world.y],
                    "origin": [origin.x, origin.y],
                    "center": [center.x, center.y],
                    "cell_scale": grid.cell_scale(),
                    "cell_count": grid.cell_count(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("index dimensions: {} x {}", dims.x, dims.y);
                println!("world dimensions: {:.2} x {:.2}", world.x, world.y);
                println!("origin: ({:.2}, {:.2})", origin.x, origin.y);
                println!("center: ({:.2}, {:.2})", center.x, center.y);
                println!("cells: {}", grid.cell_count());
            }
        }
        Commands::Locate {
            min,
            max,
            cell_scale,
            at,
        } => {
            let grid = WorldGrid::new(vec2(&min), vec2(&max), cell_scale)?;
            println!("{}", format_coord(grid.indices_at_position(vec2(&at))));
        }
        Commands::Heatmap {
            config,
            samples,
            threshold,
        } => {
            let config = TidewatchConfig::load(&config)?;
            run_heatmap(&config, samples, threshold)?;
        }
        Commands::Minimap { config, frames } => {
            let config = TidewatchConfig::load(&config)?;
            run_minimap(&config, frames)?;
        }
    }

    Ok(())
}
