//! vgrid - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vgrid::config::GridOverrides;
use vgrid::view::ColorConfig;

/// vgrid - browse JSON records as a responsive, virtualized card grid
#[derive(Parser, Debug)]
#[command(name = "vgrid")]
#[command(version)]
#[command(about = "Browse JSON or JSONL records as a responsive card grid")]
pub struct Args {
    /// Path to a JSON array or JSONL file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Minimum card width in cells; drives the column count
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_item_width: Option<u32>,

    /// Upper bound on the column count
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_columns: Option<u32>,

    /// Gap between cards, in cells
    #[arg(long)]
    pub gap: Option<u32>,

    /// Rows rendered beyond each edge of the viewport
    #[arg(long)]
    pub overscan: Option<u32>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn grid_overrides(&self) -> GridOverrides {
        let to_usize = |value: Option<u32>| value.map(|v| v as usize);
        GridOverrides {
            min_item_width: to_usize(self.min_item_width),
            max_columns: to_usize(self.max_columns),
            gap: to_usize(self.gap),
            overscan: to_usize(self.overscan),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = vgrid::config::load_config_with_precedence(args.config.clone())?;
        let merged = vgrid::config::merge_config(config_file);
        let with_env = vgrid::config::apply_env_overrides(merged);
        vgrid::config::apply_cli_overrides(with_env, args.grid_overrides())
    };

    vgrid::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    // Reject a bad layout before touching the terminal.
    config.layout.validate()?;

    let input_source = vgrid::source::detect_input_source(args.file.clone())?;
    let colors = ColorConfig::from_env_and_args(args.no_color);

    vgrid::view::run_with_source(input_source, &config, colors)?;

    Ok(())
}
