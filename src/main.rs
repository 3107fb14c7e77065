mod app;
mod color;
mod config;
mod input;
mod logging;
mod markdown;
mod render;
mod search;
mod view;

use anyhow::{Context, Result};
use app::Viewer;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use config::{config_path, Config};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

/// View a markdown document in the terminal
#[derive(Debug, Parser)]
#[command(name = "mdrs", version, about)]
struct Cli {
    /// Markdown file to view; read from stdin when omitted and stdin is piped
    file: Option<PathBuf>,

    /// Write the default config file if none exists and print its location
    #[arg(long)]
    init_config: bool,

    /// Print the config file location
    #[arg(long)]
    config_path: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing() {
        eprintln!("warning: {:#}", e);
    }

    if cli.config_path {
        println!("Config file location: {}", config_path().display());
        return Ok(());
    }

    if cli.init_config {
        return init_config();
    }

    let (name, text) = match &cli.file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("error while reading file {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => {
            if io::stdin().is_terminal() {
                missing_input_error().exit();
            }
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("error while reading STDIN")?;
            ("[stdin]".to_string(), text)
        }
    };

    let config = Config::load();
    let mut viewer = Viewer::new(&config, &name, text)?;
    viewer.run()
}

fn missing_input_error() -> clap::Error {
    Cli::command().error(
        ErrorKind::MissingRequiredArgument,
        "no FILE given and stdin is a terminal",
    )
}

fn init_config() -> Result<()> {
    let path = config_path();
    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("To regenerate, please delete the existing file first.");
        return Ok(());
    }

    Config::default()
        .save_to(&path)
        .context("failed to create config file")?;

    println!("Created default config file at: {}", path.display());
    println!("You can now edit this file to customize colors and key bindings.");
    Ok(())
}
