use std::time::Duration;

use apogee_common::{HarvesterError, Result};
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, Locator};
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Time allowed for a page's anchor element to appear after navigation.
const NAV_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound on the post-anchor settle poll. The gallery populates detail fields
/// client-side after the DOM attaches, so the anchor alone is not enough.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(3);
const SETTLE_POLL: Duration = Duration::from_millis(250);

/// Navigation and query wrapper around a single WebDriver session.
///
/// One logical flow navigates at a time; the wrapper holds no state beyond
/// the client handle and is never reset between pages.
pub struct GalleryPage {
    client: Client,
}

impl GalleryPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load `url` and block until it is queryable: wait for `anchor` (bounded
    /// by [`NAV_TIMEOUT`]), then poll `probe` until it carries content.
    ///
    /// The probe is a locator expected to be populated only once client-side
    /// rendering has run. If it never fills, the full settle bound elapses as
    /// a blind delay; that fallback is a known source of flakiness on slow
    /// renders, and the gallery exposes no render-complete signal to wait on
    /// instead.
    pub async fn open(&self, url: &str, anchor: &str, probe: Locator<'_>) -> Result<()> {
        debug!(target: "browser.page", %url, anchor, "navigating");
        self.client.goto(url).await.map_err(classify)?;

        match self
            .client
            .wait()
            .at_most(NAV_TIMEOUT)
            .for_element(Locator::Css(anchor))
            .await
        {
            Ok(_) => {}
            Err(CmdError::WaitTimeout) => {
                return Err(HarvesterError::NavigationTimeout {
                    url: url.to_string(),
                    selector: anchor.to_string(),
                    timeout_secs: NAV_TIMEOUT.as_secs(),
                })
            }
            Err(err) => return Err(classify(err)),
        }

        self.settle(probe).await
    }

    async fn settle(&self, probe: Locator<'_>) -> Result<()> {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        while Instant::now() < deadline {
            if self.probe_ready(probe).await? {
                return Ok(());
            }
            sleep(SETTLE_POLL).await;
        }
        debug!(
            target: "browser.page",
            "probe never populated; proceeding after settle bound"
        );
        Ok(())
    }

    /// A probe is ready once a matching element carries non-empty text or a
    /// non-empty `href`. Covers both text fields and link containers.
    async fn probe_ready(&self, probe: Locator<'_>) -> Result<bool> {
        match self.find_all(probe).await?.into_iter().next() {
            None => Ok(false),
            Some(el) => {
                if !el.text().await?.trim().is_empty() {
                    return Ok(true);
                }
                Ok(el.attr("href").await?.is_some_and(|h| !h.is_empty()))
            }
        }
    }

    /// All elements matching `locator`, empty when nothing matches.
    pub async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<GalleryElement>> {
        let elements = self.client.find_all(locator).await.map_err(classify)?;
        Ok(elements.into_iter().map(GalleryElement::new).collect())
    }
}

/// Typed wrapper for located DOM elements, consistent with [`GalleryPage`].
pub struct GalleryElement {
    element: Element,
}

impl GalleryElement {
    fn new(element: Element) -> Self {
        Self { element }
    }

    /// The element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await.map_err(classify)
    }

    /// Read an attribute value.
    pub async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.element.attr(name).await.map_err(classify)
    }
}

/// Split WebDriver command faults into session-fatal and everything else.
///
/// A lost connection or an invalidated session will not recover between
/// items, so those surface as [`HarvesterError::Session`] and abort the run.
pub(crate) fn classify(err: CmdError) -> HarvesterError {
    match err {
        CmdError::Lost(io) => HarvesterError::Session(format!("webdriver connection lost: {io}")),
        CmdError::Standard(w)
            if matches!(
                w.error,
                ErrorStatus::NoSuchWindow
                    | ErrorStatus::InvalidSessionId
                    | ErrorStatus::SessionNotCreated
            ) =>
        {
            HarvesterError::Session(w.to_string())
        }
        other => HarvesterError::Other(anyhow::Error::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_connection_classifies_as_session_fault() {
        let err = classify(CmdError::Lost(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "peer went away",
        )));
        assert!(err.is_fatal());
    }

    #[test]
    fn wait_timeout_is_not_a_session_fault() {
        let err = classify(CmdError::WaitTimeout);
        assert!(!err.is_fatal());
    }
}
