use anyhow::{Context, Result};
use cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;

mod assets;
mod cli;
mod config;
mod error;
mod fonts;
mod layout;
mod render;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    println!("Loading configuration...");
    let config = config::Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    println!("Starting {}", config.name);

    let progress = ProgressBar::new(config.pages.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Rendering pages...");

    let stats = render::render(&config, &progress).with_context(|| "Failed to render book")?;
    progress.finish_and_clear();

    println!("Saved {} ({} page(s))", config.name, stats.page_count);

    Ok(())
}
