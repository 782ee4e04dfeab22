//! Harvest core: landing-page enumeration, detail-page field extraction, and
//! the run controller that strings them together one item at a time.

pub mod extract;
pub mod harvester;
pub mod selectors;
