/// Feed documents: the manifest, its auxiliary documents and the images
///
/// Documents are resolved relative to either a base URL (the published
/// site) or a local directory (a checkout of it). Only the manifest is
/// allowed to fail loudly; everything else degrades to an empty result.

pub mod thumbnail;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GalleryError, Result};
use crate::state::data::{DetailEntry, ManifestEntry, MonthKey};
use crate::state::library::Library;

pub const MANIFEST: &str = "catlist.json";
pub const LIKES: &str = "likes.json";
pub const COMMENTS: &str = "comment_map.json";

/// Relative path of a month's detail document
pub fn month_document(month: MonthKey) -> String {
    format!("cats/{}.json", month)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Base URL ending in `/`
    Remote(String),
    /// Directory holding catlist.json
    Local(PathBuf),
}

/// Where feed documents come from, plus the HTTP client for images
#[derive(Debug, Clone)]
pub struct Source {
    client: reqwest::Client,
    location: Location,
}

impl Source {
    pub fn new(location: Location, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cat-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let location = match location {
            Location::Remote(mut base) => {
                if !base.ends_with('/') {
                    base.push('/');
                }
                Location::Remote(base)
            }
            Location::Local(path) => Location::Local(local_root(&path)),
        };

        Ok(Self { client, location })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Raw bytes of a document or image.
    /// Absolute http(s) URLs always go over the network.
    pub async fn fetch_bytes(&self, target: &str) -> Result<Vec<u8>> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return self.get(target).await;
        }

        // Relative targets resolve against the site root
        match &self.location {
            Location::Remote(base) => self.get(&format!("{}{}", base, target)).await,
            Location::Local(root) => {
                let path = root.join(target);
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| GalleryError::io(path.display().to_string(), e))
            }
        }
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        // Non-2xx: the document is missing or the server failed
        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, document: &str) -> Result<T> {
        let bytes = self.fetch_bytes(document).await?;
        serde_json::from_slice(&bytes).map_err(|e| GalleryError::json(document, e))
    }
}

/// A local path may name catlist.json itself or its directory
fn local_root(path: &Path) -> PathBuf {
    if path.extension().map(|ext| ext == "json").unwrap_or(false) {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        path.to_path_buf()
    }
}

/// Fetch the manifest and the auxiliary documents and build the library.
///
/// Manifest failures are returned; likes and comment links fall back to
/// empty maps.
pub async fn load_library(source: Source) -> Result<Library> {
    log::info!("🔍 Fetching manifest from {:?}", source.location());

    // All three documents in parallel; only the manifest may fail the load
    let (manifest, likes, comments) = tokio::join!(
        source.fetch_json::<Vec<serde_json::Value>>(MANIFEST),
        fetch_ordinal_map::<u64>(&source, LIKES),
        fetch_ordinal_map::<String>(&source, COMMENTS),
    );

    let entries = parse_entries::<ManifestEntry>(manifest?, MANIFEST);
    log::info!(
        "✅ Manifest: {} entries, {} like counts, {} comment links",
        entries.len(),
        likes.len(),
        comments.len()
    );

    Ok(Library::from_manifest(entries, likes, comments))
}

/// Keep every entry that deserializes; a single bad entry does not sink the document
fn parse_entries<T: DeserializeOwned>(values: Vec<serde_json::Value>, document: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("⚠️  Skipping entry {} of {}: {}", i, document, e);
                None
            }
        })
        .collect()
}

/// Optional `{"<number>": value}` document; any failure means empty
async fn fetch_ordinal_map<V: DeserializeOwned>(source: &Source, document: &str) -> HashMap<u32, V> {
    match source.fetch_json::<HashMap<String, V>>(document).await {
        // Keys are ordinals as text; anything else is ignored
        Ok(map) => map
            .into_iter()
            .filter_map(|(key, value)| key.trim().parse().ok().map(|number| (number, value)))
            .collect(),
        Err(e) => {
            log::warn!("⚠️  {} unavailable, continuing without it: {}", document, e);
            HashMap::new()
        }
    }
}

/// Fetch one month's detail document; any failure means no detail
pub async fn fetch_month_detail(source: Source, month: MonthKey) -> Vec<DetailEntry> {
    let document = month_document(month);
    match source.fetch_json::<Vec<serde_json::Value>>(&document).await {
        Ok(values) => parse_entries::<DetailEntry>(values, &document),
        Err(e) => {
            log::warn!("⚠️  Detail for {} unavailable: {}", month, e);
            Vec::new()
        }
    }
}
