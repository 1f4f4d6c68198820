//! CLI for the mtdl range downloader.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use mtdl_core::config;
use mtdl_core::url_model;
use std::path::PathBuf;
use std::sync::mpsc;

/// `mtdl [--threads N] [--name FILENAME] URL`
#[derive(Debug, Parser)]
#[command(name = "mtdl", version)]
#[command(about = "Download one URL over parallel HTTP range requests", long_about = None)]
pub struct Cli {
    /// Number of concurrent range workers (default: `default_threads` from config, 2).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Output file (default: last path segment of the URL).
    #[arg(long, value_name = "FILENAME")]
    pub name: Option<PathBuf>,

    /// Direct HTTP/HTTPS URL to download.
    pub url: String,
}

impl Cli {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init().context("load config")?;
        tracing::debug!("loaded config: {:?}", cfg);
        let workers = self
            .threads
            .map(|n| n as usize)
            .unwrap_or(cfg.default_threads);

        let plan = mtdl_core::plan(&self.url, workers, &cfg)?;

        let path = match self.name {
            Some(name) => name,
            None => {
                let name = url_model::derive_filename(&self.url, &cfg.fallback_filename);
                println!("Filename not provided. File will be named: {}", name);
                PathBuf::from(name)
            }
        };

        if plan.is_single() {
            println!("Starting download in single-thread mode");
        } else {
            println!(
                "Starting download in multi-threaded mode with {} threads",
                plan.worker_count
            );
        }

        let (tx, rx) = mpsc::channel();
        let printer = std::thread::Builder::new()
            .name("events".to_string())
            .spawn(move || report::print_events(rx))
            .context("start event printer")?;
        let result = mtdl_core::execute(&plan, &path, &cfg, Some(tx));
        let _ = printer.join();
        let report = result?;

        println!("{} downloaded successfully", path.display());
        println!("SHA256 Hash of downloaded file is: {}", report.sha256);
        Ok(())
    }
}
