//! Loomky CLI
//!
//! Headless tools for the Loomky site: simulate the home page reveal
//! timeline, list routes, and validate configuration files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loomky_animation::{TickScheduler, TICK_INTERVAL_MS};
use loomky_app::{Route, Site, SiteConfig};
use loomky_core::{Rect, Viewport, VisibilityObserver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Simulated browser window
const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 720.0);

/// Where the stats banner sits on the home page
const STATS_BANNER_Y: f32 = 1400.0;
const STAT_WIDTH: f32 = 400.0;
const STAT_HEIGHT: f32 = 120.0;
const STAT_GAP: f32 = 20.0;

/// Time spent on each row of stats before scrolling to the next one
const ROW_DWELL_MS: u64 = 250;

/// Stats that fit side by side in the viewport
fn stats_per_row() -> usize {
    (((VIEWPORT.width() + STAT_GAP) / (STAT_WIDTH + STAT_GAP)) as usize).max(1)
}

/// Grid cell for the `index`-th stat
fn stat_bounds(index: usize) -> Rect {
    let per_row = stats_per_row();
    let (row, col) = (index / per_row, index % per_row);
    Rect::new(
        col as f32 * (STAT_WIDTH + STAT_GAP),
        row_top(row),
        STAT_WIDTH,
        STAT_HEIGHT,
    )
}

fn row_top(row: usize) -> f32 {
    STATS_BANNER_Y + row as f32 * (STAT_HEIGHT + STAT_GAP)
}

/// Scroll offset that centres a row of stats in the viewport
fn row_scroll(row: usize) -> f32 {
    row_top(row) + STAT_HEIGHT / 2.0 - VIEWPORT.height() / 2.0
}

#[derive(Parser)]
#[command(name = "loomky")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Loomky site tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the home page stats banner: scroll it into view and ramp the counters
    Simulate {
        /// Site configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Time at which the banner is scrolled into view (ms)
        #[arg(long, default_value = "500")]
        scroll_at: u64,

        /// Total simulated time (ms)
        #[arg(long, default_value = "4000")]
        until: u64,
    },

    /// List the site's pages
    Routes,

    /// Validate a site configuration file
    CheckConfig {
        /// Configuration file (TOML)
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            scroll_at,
            until,
        } => cmd_simulate(config.as_deref(), scroll_at, until),
        Commands::Routes => cmd_routes(),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn cmd_simulate(config: Option<&Path>, scroll_at: u64, until: u64) -> Result<()> {
    let config = load_config(config)?;
    let labels: Vec<String> = config.stats.iter().map(|s| s.label.clone()).collect();

    let viewport = Viewport::new(VIEWPORT);
    let scheduler = TickScheduler::new();
    let mut site = Site::new(
        config,
        VisibilityObserver::new(viewport.handle()),
        scheduler.handle(),
    )?;

    let regions: Vec<_> = (0..labels.len())
        .map(|i| viewport.add_region(Some(stat_bounds(i))))
        .collect();
    let rows = regions.len().div_ceil(stats_per_row());
    site.mount_stats(&regions)?;
    info!(stats = regions.len(), "stats banner mounted below the fold");

    let frame = u64::from(TICK_INTERVAL_MS);
    let mut next_row = 0;
    let mut shown = displays(&site);

    while scheduler.now_ms() < until {
        let row_due = scroll_at + next_row as u64 * ROW_DWELL_MS;
        if next_row < rows && scheduler.now_ms() >= row_due {
            let y = row_scroll(next_row);
            viewport.scroll_to(y);
            site.header_mut().on_scroll(y);
            info!(t = scheduler.now_ms(), y, row = next_row, "scrolled to stats row");
            next_row += 1;
        }

        viewport.process();
        scheduler.advance(frame);
        site.sync();

        let current = displays(&site);
        if current != shown {
            debug!(t = scheduler.now_ms(), values = ?current, "frame");
            shown = current;
        }
    }

    info!(
        t = scheduler.now_ms(),
        revealed = site.page().revealed_count(),
        pending_timers = scheduler.timer_count(),
        "simulation finished"
    );

    for (value, label) in shown.iter().zip(&labels) {
        println!("{:>8}  {}", value, label);
    }
    Ok(())
}

fn displays(site: &Site) -> Vec<String> {
    site.page()
        .controllers()
        .iter()
        .filter_map(|c| c.display())
        .collect()
}

fn cmd_routes() -> Result<()> {
    for route in Route::ALL {
        println!("{:<10} {}", route.path(), route.label());
    }
    Ok(())
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    info!(
        section_threshold = config.reveal.section_threshold,
        counter_threshold = config.reveal.counter_threshold,
        stats = config.stats.len(),
        "{} is valid",
        path.display()
    );
    Ok(())
}
