use std::path::PathBuf;

use anyhow::Result;
use apogee_browser::driver::GalleryDriver;
use apogee_browser::page::GalleryPage;
use apogee_common::observability::{init_logging, LogConfig};
use apogee_harvest::harvester::Harvester;
use apogee_store::Store;
use clap::Parser;
use tracing::warn;

/// One-shot harvester for the NASA image gallery: walks the landing page,
/// scrapes each detail page, and writes the image plus a sidecar metadata
/// file per item.
#[derive(Parser, Debug)]
#[command(name = "apogee", version, about)]
struct Args {
    /// Path to the chromedriver executable.
    #[arg(long)]
    driver_path: PathBuf,

    /// Landing page to enumerate.
    #[arg(long, default_value = "https://images.nasa.gov")]
    base_url: String,

    /// Directory artifacts are written into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig::default())?;

    let driver = GalleryDriver::launch(&args.driver_path, args.headless).await?;

    let harvester = Harvester::new(
        GalleryPage::new(driver.client.clone()),
        Store::new(args.output_dir.clone())?,
        args.base_url.clone(),
    );

    // The session is released on every path out of here; an index-phase
    // failure still reaches `close` before the error surfaces.
    let run_result = harvester.run().await;

    if let Err(err) = driver.close().await {
        if run_result.is_ok() {
            return Err(err.into());
        }
        warn!(target: "browser.driver", error = %err, "session teardown failed after run error");
    }

    run_result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_path_is_required() {
        assert!(Args::try_parse_from(["apogee"]).is_err());
    }

    #[test]
    fn defaults_match_the_upstream_gallery() {
        let args =
            Args::try_parse_from(["apogee", "--driver-path", "/usr/bin/chromedriver"]).unwrap();
        assert_eq!(args.base_url, "https://images.nasa.gov");
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.headless);
    }
}
