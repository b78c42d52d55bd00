//! Steam Stats - Exploratory dashboard for a Steam game catalog
//!
//! Launches the desktop dashboard by default; `setup`, `clean` and `summary`
//! run headless.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eframe::egui;
use std::path::{Path, PathBuf};
use steam_stats::config::{DashboardConfig, CONFIG_FILE};
use steam_stats::data::{Aggregator, Cleaner, DataLoader, Measure};
use steam_stats::gui::DashboardApp;
use steam_stats::setup;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "steam-stats", version, about = "Steam game catalog dashboard")]
struct Cli {
    /// Config file (JSON)
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the interactive dashboard
    Dashboard {
        /// Dataset to open instead of the configured processed file
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Create the config file and check the project layout
    Setup {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Create missing directories instead of failing
        #[arg(long)]
        create_dirs: bool,
    },
    /// Load a raw dataset, clean it and save the result
    Clean {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print top genres and developers of a dataset
    Summary {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        top: Option<usize>,
        /// Also show the first rows of the file
        #[arg(long)]
        preview: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = DashboardConfig::load_or_default(&cli.config)
        .with_context(|| format!("Invalid config {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Dashboard { data: None }) {
        Command::Dashboard { data } => run_dashboard(config, data),
        Command::Setup { root, create_dirs } => run_setup(&root, create_dirs),
        Command::Clean { input, output } => run_clean(&config, input, output),
        Command::Summary { data, top, preview } => run_summary(&config, data, top, preview),
    }
}

fn run_dashboard(config: DashboardConfig, data: Option<PathBuf>) -> Result<()> {
    let data_path = data.unwrap_or_else(|| config.processed_path());
    let title = config.window_title();
    info!("Starting dashboard with {}", data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, data_path)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard failed: {}", e))
}

fn run_setup(root: &Path, create_dirs: bool) -> Result<()> {
    println!("🚀 Setting up Steam Stats Dashboard...");
    println!("{}", "=".repeat(50));

    let report = match setup::run_setup(root, create_dirs) {
        Ok(report) => report,
        Err(e) => {
            error!("Setup failed: {}", e);
            println!("❌ Project structure verification failed: {}", e);
            return Ok(());
        }
    };
    for line in report.summary() {
        println!("✅ {}", line);
    }

    let config = DashboardConfig::load_or_default(&report.config_path)?;
    println!("\n🎉 Setup complete! Next steps:");
    for (i, step) in setup::next_steps(&config).iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
    Ok(())
}

fn run_clean(config: &DashboardConfig, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.raw_path());
    let output = output.unwrap_or_else(|| config.processed_path());

    let outcome = DataLoader::new().load(&input);
    if !outcome.status.is_loaded() {
        bail!("{}", outcome.status.message());
    }

    let cleaned = Cleaner::clean(&outcome.catalog);
    DataLoader::save(&cleaned, &output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    println!(
        "Cleaned {} rows into {} rows: {}",
        outcome.catalog.len(),
        cleaned.len(),
        output.display()
    );
    Ok(())
}

fn run_summary(
    config: &DashboardConfig,
    data: Option<PathBuf>,
    top: Option<usize>,
    preview: bool,
) -> Result<()> {
    let path = data.unwrap_or_else(|| config.processed_path());

    if preview {
        let quick = DataLoader::load_quick(&path);
        if quick.status.is_loaded() {
            println!("First rows of {}:", path.display());
            for record in quick.catalog.records() {
                println!("  {}", record.name.as_deref().unwrap_or("-"));
            }
            println!();
        }
    }

    let outcome = DataLoader::new().load(&path);
    if !outcome.status.is_loaded() {
        bail!("{}", outcome.status.message());
    }
    let catalog = Cleaner::clean(&outcome.catalog);

    println!("{}", outcome.status.message());
    println!("{} games after cleaning\n", catalog.len());

    let genres = Aggregator::genre_summary(
        &catalog,
        Measure::ReviewSum,
        Some(top.unwrap_or(config.plot.top_genres)),
    );
    println!("Top genres by total reviews:");
    for (i, (genre, reviews)) in genres.as_pairs().into_iter().enumerate() {
        println!("{:>3}. {:<30} {:>12}", i + 1, genre, reviews);
    }

    let developers =
        Aggregator::developer_summary(&catalog, Some(top.unwrap_or(config.plot.top_developers)));
    println!("\nTop developers by total reviews:");
    for (i, (developer, reviews)) in developers.as_pairs().into_iter().enumerate() {
        println!("{:>3}. {:<30} {:>12}", i + 1, developer, reviews);
    }
    Ok(())
}
