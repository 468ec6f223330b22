// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Fracture Match CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use fracture_match::pipeline::{self, ObjectRecord, ObjectStatus};
use fracture_match::{MatchConfig, ObjectOutcome};

#[derive(Parser)]
#[command(name = "fracture-match")]
#[command(about = "Fragment adjacency matching for fractured 3D objects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML); defaults to ./fracture-match.toml if present
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Root data folder ({root}/{name} holds one object's point clouds)
    #[arg(short, long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Proximity distance threshold
    #[arg(long, global = true)]
    epsilon: Option<f64>,

    /// Minimum match count for adjacency
    #[arg(long, global = true)]
    min_matches: Option<usize>,

    /// Worker-pool size for batch processing
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Export a color-coded scatter of each object's fragments
    #[arg(long, global = true)]
    visualize: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the fragments of one object
    Match {
        /// Object name under the data root
        name: String,
    },

    /// Match every object found under the data root
    Batch {
        /// Write a JSON batch report
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn effective_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => MatchConfig::load()?,
        };
        if let Some(root) = &self.root {
            config.data_root = root.clone();
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(min_matches) = self.min_matches {
            config.min_matches = min_matches;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.visualize {
            config.visualize = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Match { name } => {
            let config = cli.effective_config()?;
            match_command(&config, name)?;
        }
        Commands::Batch { report } => {
            let config = cli.effective_config()?;
            batch_command(&config, report.as_deref())?;
        }
        Commands::Version => {
            println!("Fracture Match v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn match_command(config: &MatchConfig, name: &str) -> Result<()> {
    println!("Processing {name}...");

    match pipeline::process_object(config, name)? {
        ObjectOutcome::Skipped => {
            eprintln!(
                "{} No data found for {} under {:?}",
                "Warning:".yellow(),
                name,
                config.data_root
            );
        }
        ObjectOutcome::Completed {
            num_parts,
            adjacent_pairs,
            limit_reached,
        } => {
            if limit_reached {
                eprintln!(
                    "{} part limit reached, only loaded the first {} parts",
                    "Warning:".yellow(),
                    config.max_fragments
                );
            }
            println!("{num_parts} parts loaded.");
            println!(
                "{} {} with {} adjacent pair(s) -> {:?}",
                "Matched".green(),
                name,
                adjacent_pairs,
                fracture_match::storage::matching_dir(&config.data_root, name)
            );
        }
    }

    Ok(())
}

fn batch_command(config: &MatchConfig, report_path: Option<&std::path::Path>) -> Result<()> {
    let names = pipeline::discover_objects(&config.data_root)?;
    if names.is_empty() {
        eprintln!(
            "{} no object folders under {:?}",
            "Warning:".yellow(),
            config.data_root
        );
        return Ok(());
    }

    println!(
        "Matching {} object(s) across {} worker(s)...",
        names.len(),
        config.workers
    );

    let progress = ProgressBar::new(names.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = pipeline::process_batch_with(config, &names, |record: &ObjectRecord| {
        if record.limit_reached {
            progress.println(format!(
                "{} {}: part limit reached, only loaded the first {} parts",
                "Warning:".yellow(),
                record.name,
                config.max_fragments
            ));
        }
        match record.status {
            ObjectStatus::Skipped => {
                progress.println(format!(
                    "{} {}: no fragments found, skipped",
                    "Warning:".yellow(),
                    record.name
                ));
            }
            ObjectStatus::Failed => {
                progress.println(format!(
                    "{} {}: {}",
                    "Error:".red(),
                    record.name,
                    record.error.as_deref().unwrap_or("unknown error")
                ));
            }
            ObjectStatus::Completed => {}
        }
        progress.inc(1);
    })?;
    progress.finish_with_message("Batch complete");

    println!("\n{}", "═".repeat(60).bright_black());
    println!("{}", "Batch Summary".bold());
    println!("{}", "═".repeat(60).bright_black());
    println!("  {} {}", "Objects:".bright_black(), report.records.len());
    println!(
        "  {} {}",
        "Completed:".bright_black(),
        report.completed().to_string().green()
    );
    println!(
        "  {} {}",
        "Skipped:".bright_black(),
        report.skipped().to_string().yellow()
    );
    let failed = report.failed();
    println!(
        "  {} {}",
        "Failed:".bright_black(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().green()
        }
    );

    if let Some(path) = report_path {
        report.write_json(path)?;
        println!("  {} {:?}", "JSON Report:".bright_black(), path);
    }
    println!("{}", "═".repeat(60).bright_black());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
