/// Configuration: optional JSON file plus command line overrides
///
/// The config file lives in the user's config directory:
/// - Linux: ~/.config/cat-gallery/config.json
/// - macOS: ~/Library/Application Support/cat-gallery/config.json
/// - Windows: %APPDATA%\cat-gallery\config.json
/// It is only ever read; a missing file means defaults.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GalleryError, Result};
use crate::source::thumbnail::THUMBNAIL_SIZE;
use crate::state::app::Settings;
use crate::state::filter::PAGE_SIZE;

pub const DEFAULT_REPO: &str = "yazelin/catime";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "cat-gallery", version, about = "Browse AI-generated hourly cat images")]
pub struct Cli {
    /// Cat number (42), date (2026-01-30), date+hour (2026-01-30T05), 'today', 'yesterday' or 'latest'
    pub query: Option<String>,

    /// GitHub repo (owner/name) publishing catlist.json
    #[arg(long)]
    pub repo: Option<String>,

    /// Base URL the feed documents are resolved against
    #[arg(long, conflicts_with = "repo")]
    pub base_url: Option<String>,

    /// Read catlist.json (or the directory holding it) from disk
    #[arg(long)]
    pub local: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Directory URL holding catlist.json, likes.json, comment_map.json and cats/
    pub base_url: String,
    /// Local catlist.json or its directory; wins over `base_url`
    pub local_path: Option<PathBuf>,
    pub page_size: usize,
    pub copy_confirm_ms: u64,
    pub timeout_secs: u64,
    pub thumbnail_size: u32,
    pub narrow_width: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: repo_base_url(DEFAULT_REPO),
            local_path: None,
            page_size: PAGE_SIZE,
            copy_confirm_ms: 2000,
            timeout_secs: 30,
            thumbnail_size: THUMBNAIL_SIZE,
            narrow_width: 768.0,
        }
    }
}

impl GalleryConfig {
    /// Load the config file; a missing file yields the defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| GalleryError::io(path.display().to_string(), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| GalleryError::json(path.display().to_string(), e))?;
        config.validate()?;

        log::info!("⚙️  Loaded config from {}", path.display());
        Ok(config)
    }

    /// Command line flags win over the file
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(repo) = &cli.repo {
            let valid = repo
                .split_once('/')
                .map(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
                .unwrap_or(false);
            if !valid {
                return Err(GalleryError::Config(format!(
                    "--repo expects owner/name, got '{}'",
                    repo
                )));
            }
            self.base_url = repo_base_url(repo);
        }
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(local) = &cli.local {
            self.local_path = Some(local.clone());
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GalleryError::Config("page_size must be at least 1".to_string()));
        }
        if self.thumbnail_size == 0 {
            return Err(GalleryError::Config("thumbnail_size must be at least 1".to_string()));
        }
        if self.local_path.is_none()
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(GalleryError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            page_size: self.page_size,
            copy_confirm: Duration::from_millis(self.copy_confirm_ms),
            narrow_width: self.narrow_width,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn repo_base_url(repo: &str) -> String {
    format!("https://raw.githubusercontent.com/{}/main/", repo)
}

fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
    path.push("cat-gallery");
    path.push("config.json");
    Some(path)
}
