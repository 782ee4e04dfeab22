//! Field extraction against a loaded detail page.
//!
//! Two contracts. Required getters (`nasa_id`, `image_url`) fail the item
//! when their query matches nothing, since persistence depends on both.
//! Optional getters share one fallback: matched-nothing degrades to `None`,
//! while a fault in the query mechanism itself still propagates.

use apogee_browser::page::{GalleryElement, GalleryPage};
use apogee_common::{HarvesterError, ItemRecord, Result};
use fantoccini::Locator;

use crate::selectors;

pub struct DetailExtractor<'a> {
    page: &'a GalleryPage,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(page: &'a GalleryPage) -> Self {
        Self { page }
    }

    /// Extract the full record from the currently loaded detail page.
    pub async fn record(&self) -> Result<ItemRecord> {
        let nasa_id = self
            .required_text(Locator::Css(selectors::NASA_ID), "nasa_id")
            .await?;
        let image_url = self
            .required_attr(Locator::Css(selectors::DETAIL_IMG), "src", "image_url")
            .await?;

        Ok(ItemRecord {
            nasa_id,
            image_url,
            keywords: self.keywords().await?,
            center: self.optional_text(Locator::XPath(selectors::CENTER)).await?,
            date_created: self
                .optional_text(Locator::XPath(selectors::DATE_CREATED))
                .await?,
            center_website: self
                .optional_attr(Locator::Css(selectors::CENTER_WEBSITE), "href")
                .await?,
            description: self
                .optional_text(Locator::Css(selectors::DESCRIPTION))
                .await?,
        })
    }

    async fn first(&self, locator: Locator<'_>) -> Result<Option<GalleryElement>> {
        Ok(self.page.find_all(locator).await?.into_iter().next())
    }

    async fn required_text(&self, locator: Locator<'_>, field: &'static str) -> Result<String> {
        match self.first(locator).await? {
            Some(el) => el.text().await,
            None => Err(HarvesterError::RequiredField { field }),
        }
    }

    async fn required_attr(
        &self,
        locator: Locator<'_>,
        attr: &str,
        field: &'static str,
    ) -> Result<String> {
        self.first(locator)
            .await?
            .ok_or(HarvesterError::RequiredField { field })?
            .attr(attr)
            .await?
            .ok_or(HarvesterError::RequiredField { field })
    }

    async fn optional_text(&self, locator: Locator<'_>) -> Result<Option<String>> {
        match self.first(locator).await? {
            Some(el) => Ok(Some(el.text().await?)),
            None => Ok(None),
        }
    }

    async fn optional_attr(&self, locator: Locator<'_>, attr: &str) -> Result<Option<String>> {
        match self.first(locator).await? {
            Some(el) => el.attr(attr).await,
            None => Ok(None),
        }
    }

    /// Keyword values in document order. The selector already filters the
    /// label span, so an absent keyword list simply yields an empty vec.
    async fn keywords(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for el in self
            .page
            .find_all(Locator::Css(selectors::KEYWORDS))
            .await?
        {
            out.push(el.text().await?);
        }
        Ok(out)
    }
}
