//! WebDriver session management for the harvester.
//!
//! [`driver::GalleryDriver`] owns the chromedriver child process and the
//! session built on it; [`page::GalleryPage`] layers navigation with
//! wait/settle semantics and element queries on top of the raw client.

pub mod driver;
pub mod page;
