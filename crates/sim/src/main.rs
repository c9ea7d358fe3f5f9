//! Headless session driver.
//!
//! Runs scripted sessions against the gameplay runtime and prints what
//! happened. Run with: `cargo run -p gameplay-sim -- <command>`
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gameplay_content::{ConfigLoader, ContentFactory, WeaponCatalog};
use gameplay_core::CharacterVariant;
use gameplay_runtime::RuntimeConfig;

use scenario::Duel;

/// Headless driver for the gameplay runtime
#[derive(Parser)]
#[command(name = "gameplay-sim")]
#[command(about = "Run scripted gameplay sessions", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding gameplay.toml and weapons.ron (defaults to built-in content)
    #[arg(short, long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Simulation steps per second
    #[arg(long, value_name = "HZ", global = true)]
    tick_rate: Option<f32>,

    /// Character variant (third_person or top_down)
    #[arg(long, value_name = "VARIANT", global = true)]
    variant: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Two players; the first fires at the second with every weapon it carries
    Duel(Duel),

    /// List the weapons in the catalog
    Weapons,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();
    let (mut config, catalog) = load_content(cli.data_dir.as_deref())?;
    config = config.from_env();
    if let Some(rate) = cli.tick_rate {
        config.tick_rate = rate;
    }
    if let Some(variant) = cli.variant.as_deref() {
        config.gameplay.variant = variant
            .parse::<CharacterVariant>()
            .map_err(|_| anyhow::anyhow!("unknown character variant '{variant}'"))?;
    }

    match cli.command {
        Command::Duel(cmd) => cmd.execute(config, catalog),
        Command::Weapons => {
            print_weapons(&catalog);
            Ok(())
        }
    }
}

/// Logs go to stderr so event output on stdout stays machine readable.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_content(data_dir: Option<&std::path::Path>) -> Result<(RuntimeConfig, WeaponCatalog)> {
    let (gameplay, catalog) = match data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            tracing::info!("Loading content from {}", factory.data_dir().display());
            factory.load_all()?
        }
        None => (
            ConfigLoader::builtin()?,
            WeaponCatalog::builtin().context("Failed to load built-in weapons")?,
        ),
    };
    Ok((RuntimeConfig::new(gameplay), catalog))
}

fn print_weapons(catalog: &WeaponCatalog) {
    for name in catalog.names() {
        let Some(weapon) = catalog.get(name) else {
            continue;
        };
        let mode = if weapon.time_between_shots > 0.0 {
            "auto"
        } else {
            "semi"
        };
        println!(
            "{:<12} clip {:>3}  max {:>4}  {}  reload {:.2}s  equip {:.2}s  damage {:.0} r{:.0}",
            weapon.name,
            weapon.clip_capacity,
            weapon.max_ammo,
            mode,
            weapon.reload_duration(),
            weapon.equip_duration(),
            weapon.projectile.explosion_damage,
            weapon.projectile.explosion_radius,
        );
    }
}
