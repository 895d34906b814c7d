/// Grid thumbnails
///
/// Images are downloaded once per session, decoded and downscaled off the
/// UI thread, and handed to the view as raw RGBA pixels.

use image::imageops::FilterType;

use super::Source;
use crate::error::Result;

/// Default edge length of generated thumbnails
pub const THUMBNAIL_SIZE: u32 = 256;

/// Decoded RGBA thumbnail ready for `image::Handle::from_rgba`
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub number: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Download and downscale the image of one record
pub async fn load_thumbnail(source: Source, number: u32, url: String, size: u32) -> Result<Thumbnail> {
    let bytes = source.fetch_bytes(&url).await?;

    // Spawn blocking because decoding and resizing are CPU-intensive
    let (width, height, pixels) =
        tokio::task::spawn_blocking(move || make_thumbnail(&bytes, size)).await??;

    log::debug!("📸 Thumbnail for #{}: {}x{}", number, width, height);
    Ok(Thumbnail {
        number,
        width,
        height,
        pixels,
    })
}

/// Decode any supported format and fit it into a `size` x `size` box
pub fn make_thumbnail(bytes: &[u8], size: u32) -> Result<(u32, u32, Vec<u8>)> {
    let img = image::load_from_memory(bytes)?;

    let thumbnail = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = thumbnail.to_rgba8();
    Ok((rgba.width(), rgba.height(), rgba.into_raw()))
}

/// Full-size image bytes for the detail overlay
pub async fn load_full_image(source: Source, url: String) -> Result<Vec<u8>> {
    source.fetch_bytes(&url).await
}
