use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use apogee_common::{HarvesterError, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info};
use webdriver::capabilities::Capabilities;

const WEBDRIVER_PORT: u16 = 9515;
const CONNECT_ATTEMPTS: usize = 20;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Owns the chromedriver child process and the WebDriver session built on it.
///
/// The session and the child live for the whole run; [`GalleryDriver::close`]
/// releases both. `kill_on_drop` covers panics and early returns so a failed
/// index phase never leaks a driver process.
pub struct GalleryDriver {
    pub client: Client,
    child: Child,
}

impl GalleryDriver {
    /// Spawn the driver at `driver_path` on the default chromedriver port and
    /// connect a session to it, retrying briefly while the process starts.
    pub async fn launch(driver_path: &Path, headless: bool) -> Result<Self> {
        info!(
            target: "browser.driver",
            path = %driver_path.display(),
            "spawning webdriver process"
        );
        let child = Command::new(driver_path)
            .arg(format!("--port={WEBDRIVER_PORT}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn webdriver at {}", driver_path.display()))?;

        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        let mut args: Vec<String> = Vec::new();
        if headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let url = format!("http://localhost:{WEBDRIVER_PORT}");
        let mut attempt = 0;
        let client = loop {
            attempt += 1;
            match ClientBuilder::native()
                .capabilities(caps.clone())
                .connect(&url)
                .await
            {
                Ok(client) => break client,
                Err(err) if attempt < CONNECT_ATTEMPTS => {
                    debug!(
                        target: "browser.driver",
                        attempt,
                        error = %err,
                        "webdriver not ready; retrying connect"
                    );
                    sleep(CONNECT_RETRY_DELAY).await;
                }
                Err(err) => {
                    return Err(HarvesterError::Session(format!(
                        "could not establish webdriver session at {url}: {err}"
                    )))
                }
            }
        };
        info!(target: "browser.driver", %url, "webdriver session established");

        Ok(Self { client, child })
    }

    /// End the WebDriver session and reap the driver process.
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .client
            .close()
            .await
            .map_err(|e| HarvesterError::Session(format!("session teardown failed: {e}")));
        // Reap the child even when the session refused to close cleanly.
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
        closed
    }
}
