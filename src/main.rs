use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use escher_map_render::cairo_backend::{default_svg_output_path, write_png_and_svg, DEFAULT_PADDING};
use escher_map_render::{MapCache, PlotConfig};

#[derive(Parser)]
#[command(author, version, about = "Render Escher metabolic maps to PNG and SVG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "draw_escher")]
    DrawEscher {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "escher.png")]
        output: PathBuf,
        /// JSON file with plot options and per-entity overrides.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_PADDING)]
        padding: f64,
        /// Pixels per map unit.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Show metabolite, reaction, and annotation labels.
        #[arg(long, default_value_t = false)]
        show_text: bool,
    },
    /// Print the canvas record of a map.
    #[command(name = "resolution")]
    Resolution {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::DrawEscher {
            input,
            output,
            config,
            padding,
            scale,
            show_text,
        } => {
            let mut plot_config = match config {
                Some(path) => PlotConfig::load(&path)?,
                None => PlotConfig::default(),
            };
            if show_text {
                plot_config = plot_config.show_all_text();
            }
            let cache = MapCache::load(&input)?;
            let primitives = cache.render(&plot_config)?;
            let svg_path = default_svg_output_path(&output);
            write_png_and_svg(&primitives, &output, &svg_path, padding, scale)
        }
        Command::Resolution { input } => {
            let resolution = MapCache::load(&input)?.resolution();
            let show = |value: Option<f64>| value.map_or("unknown".to_string(), |v| v.to_string());
            println!("height: {}", show(resolution.height));
            println!("width: {}", show(resolution.width));
            println!("x: {}", show(resolution.x));
            println!("y: {}", show(resolution.y));
            Ok(())
        }
    }
}
