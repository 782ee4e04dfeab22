//! Persistence for harvested items: the binary asset and its sidecar
//! metadata file, both named from the item's id and overwritten in place.
//!
//! There is no atomic-write guarantee here: a crash mid-write leaves a
//! partial file. One-shot runs overwrite on the next pass.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::OnceLock;

use apogee_common::{HarvesterError, ItemRecord, Result};
use regex::Regex;
use tracing::info;

pub mod fetch;

use fetch::FetchClient;

/// Derive the `.ext` suffix of `url`'s last dot-delimited segment.
///
/// Case is preserved and nothing is normalized: `img123.JPG` keeps `.JPG`.
/// A URL whose last path segment carries no dot has no derivable extension.
pub fn extension_of(url: &str) -> Result<&str> {
    static EXT_RE: OnceLock<Regex> = OnceLock::new();
    let re = EXT_RE.get_or_init(|| Regex::new(r"\.[^./]+$").expect("extension pattern"));
    re.find(url)
        .map(|m| m.as_str())
        .ok_or_else(|| HarvesterError::Extension {
            url: url.to_string(),
        })
}

/// Render the sidecar body: one `Label:\tvalue` line per field, fixed order.
///
/// Absent optionals keep their line with a literal `None`; keywords join
/// with `, ` and an empty list renders as an empty value. Lines are never
/// omitted, so the sidecar shape is identical across items.
pub fn sidecar_contents(record: &ItemRecord) -> String {
    fn opt(v: &Option<String>) -> &str {
        v.as_deref().unwrap_or("None")
    }

    let mut out = String::new();
    let _ = writeln!(out, "NASA ID:\t{}", record.nasa_id);
    let _ = writeln!(out, "Image url:\t{}", record.image_url);
    let _ = writeln!(out, "Keywords:\t{}", record.keywords.join(", "));
    let _ = writeln!(out, "Center:\t{}", opt(&record.center));
    let _ = writeln!(out, "Date Created:\t{}", opt(&record.date_created));
    let _ = writeln!(out, "Center Website:\t{}", opt(&record.center_website));
    let _ = writeln!(out, "Description:\t{}", opt(&record.description));
    out
}

/// Writes harvested artifacts into a single output directory.
pub struct Store {
    fetch: FetchClient,
    out_dir: PathBuf,
}

impl Store {
    /// Build a store rooted at `out_dir`, creating the directory if needed.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            fetch: FetchClient::new()?,
            out_dir,
        })
    }

    /// Download the binary at `image_url` into `{id}{ext}`, overwriting any
    /// previous file of that name. The extension is derived before the fetch
    /// so an undecipherable URL writes nothing.
    pub async fn save_image(&self, image_url: &str, id: &str) -> Result<PathBuf> {
        let ext = extension_of(image_url)?;
        let path = self.out_dir.join(format!("{id}{ext}"));
        info!(target: "store", file = %path.display(), "saving image");
        let bytes = self.fetch.get_bytes(image_url).await?;
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    /// Write the sidecar `{id}.txt`, overwriting.
    pub async fn save_metadata(&self, record: &ItemRecord) -> Result<PathBuf> {
        let path = self.out_dir.join(format!("{}.txt", record.nasa_id));
        info!(target: "store", file = %path.display(), "saving metadata");
        tokio::fs::write(&path, sidecar_contents(record)).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> ItemRecord {
        ItemRecord {
            nasa_id: "PIA12345".into(),
            image_url: "https://images-assets.nasa.gov/image/PIA12345/orig.jpg".into(),
            keywords: vec!["A".into(), "B".into(), "C".into()],
            center: Some("JPL".into()),
            date_created: Some("2017-03-07T00:00:00Z".into()),
            center_website: None,
            description: Some("A test image.".into()),
        }
    }

    #[test]
    fn extension_preserves_suffix_case() {
        assert_eq!(extension_of("https://x/y/img123.JPG").unwrap(), ".JPG");
        assert_eq!(extension_of("https://x/y/img123.tif").unwrap(), ".tif");
    }

    #[test]
    fn extension_missing_is_an_error() {
        let err = extension_of("https://images.nasa.gov/asset/noext").unwrap_err();
        assert!(matches!(err, HarvesterError::Extension { .. }));
    }

    #[test]
    fn sidecar_keeps_fixed_field_order() {
        let body = sidecar_contents(&record());
        let labels: Vec<&str> = body
            .lines()
            .map(|l| l.split(":\t").next().unwrap())
            .collect();
        assert_eq!(
            labels,
            [
                "NASA ID",
                "Image url",
                "Keywords",
                "Center",
                "Date Created",
                "Center Website",
                "Description"
            ]
        );
    }

    #[test]
    fn sidecar_renders_absent_fields_as_none_lines() {
        let mut rec = record();
        rec.center = None;
        rec.keywords = vec![];
        let body = sidecar_contents(&rec);
        assert!(body.contains("Center:\tNone\n"));
        assert!(body.contains("Keywords:\t\n"));
        // Absent fields still get their line.
        assert_eq!(body.lines().count(), 7);
    }

    #[test]
    fn sidecar_preserves_keyword_order() {
        let body = sidecar_contents(&record());
        assert!(body.contains("Keywords:\tA, B, C\n"));
    }

    #[tokio::test]
    async fn save_metadata_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path()).unwrap();

        let first = store.save_metadata(&record()).await.unwrap();
        let second = store.save_metadata(&record()).await.unwrap();
        assert_eq!(first, second);

        // No accumulation: a repeat run leaves exactly one sidecar.
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(
            std::fs::read_to_string(&second).unwrap(),
            sidecar_contents(&record())
        );
    }

    #[tokio::test]
    async fn save_image_writes_nothing_for_extensionless_url() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path()).unwrap();

        let err = store
            .save_image("https://images.nasa.gov/asset/noext", "PIA12345")
            .await
            .unwrap_err();
        assert!(matches!(err, HarvesterError::Extension { .. }));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
