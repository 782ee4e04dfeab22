//! Top-level run controller: index phase, then the per-item loop.
//!
//! Exactly one failure boundary exists, around the per-item pipeline. Any
//! error inside it short of a session fault is logged with the item URL and
//! the loop moves on; the index phase and session lifecycle sit outside the
//! boundary and propagate.

use apogee_browser::page::GalleryPage;
use apogee_common::Result;
use apogee_store::Store;
use fantoccini::Locator;
use tracing::{info, warn};

use crate::extract::DetailExtractor;
use crate::selectors;

pub struct Harvester {
    page: GalleryPage,
    store: Store,
    base_url: String,
}

impl Harvester {
    pub fn new(page: GalleryPage, store: Store, base_url: impl Into<String>) -> Self {
        Self {
            page,
            store,
            base_url: base_url.into(),
        }
    }

    /// Run the full crawl: enumerate the landing page, then process each
    /// detail page in order. Partial results are the expected steady state;
    /// only an index-phase failure or a dead session ends the run early.
    pub async fn run(&self) -> Result<()> {
        let items = self.list_items().await?;
        info!(
            target: "harvest.index",
            count = items.len(),
            "found detail links on landing page"
        );

        for url in items {
            if let Err(err) = self.process_item(&url).await {
                if err.is_fatal() {
                    return Err(err);
                }
                warn!(target: "harvest.item", %url, error = %err, "item failed; continuing");
            }
        }
        Ok(())
    }

    /// Enumerate detail-page links from the landing container, document
    /// order. One finite pass; no pagination handling.
    async fn list_items(&self) -> Result<Vec<String>> {
        info!(target: "harvest.index", url = %self.base_url, "processing landing page");
        self.page
            .open(
                &self.base_url,
                selectors::INDEX_ANCHOR,
                Locator::Css(selectors::INDEX_LINKS),
            )
            .await?;

        let mut urls = Vec::new();
        for el in self
            .page
            .find_all(Locator::Css(selectors::INDEX_LINKS))
            .await?
        {
            if let Some(href) = el.attr("href").await? {
                urls.push(href);
            }
        }
        Ok(urls)
    }

    /// One item pipeline: open, extract, persist. The record is built and
    /// dropped entirely in here; nothing carries over to the next item.
    async fn process_item(&self, url: &str) -> Result<()> {
        info!(target: "harvest.item", %url, "processing detail page");
        self.page
            .open(
                url,
                selectors::DETAIL_ANCHOR,
                Locator::Css(selectors::NASA_ID),
            )
            .await?;

        let record = DetailExtractor::new(&self.page).record().await?;
        let image = self
            .store
            .save_image(&record.image_url, &record.nasa_id)
            .await?;
        let sidecar = self.store.save_metadata(&record).await?;
        info!(
            target: "harvest.item",
            id = %record.nasa_id,
            image = %image.display(),
            sidecar = %sidecar.display(),
            "item saved"
        );
        Ok(())
    }
}
