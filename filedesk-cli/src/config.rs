use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filedesk_core::ClientConfig;

use crate::{config_path, load_config, GlobalArgs};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with every default spelled out
    Init(InitArgs),
    /// Print the effective configuration as TOML
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let path = config_path(global);

    match args.command {
        ConfigCommands::Init(args) => run_init(&path, args),
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(path: &Path, args: InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = ClientConfig::default().to_toml()?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Wrote {}", path.display());
    Ok(())
}

/// File values with `--endpoint`/`--insecure` and their env vars applied
fn run_show(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
