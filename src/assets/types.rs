use std::path::PathBuf;

use image::{RgbImage, RgbaImage};

use crate::error::{ConfigError, Result};

/// Maximum number of photos in one strip.
pub const MAX_PHOTOS: usize = 9;

/// A reference to an encoded image: a file on disk, or bytes the caller has
/// already fetched (an upload, a generated image, a network response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl AssetSource {
    pub fn path<P: Into<PathBuf>>(path: P) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Short description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} inline bytes>", bytes.len()),
        }
    }
}

/// An ordered set of 1-9 photo sources. Order is display order; the set is
/// immutable for the lifetime of a composition request.
#[derive(Debug, Clone)]
pub struct PhotoSet {
    sources: Vec<AssetSource>,
}

impl PhotoSet {
    /// Build a photo set, rejecting empty and oversized inputs.
    pub fn new(sources: Vec<AssetSource>) -> Result<Self> {
        if sources.is_empty() || sources.len() > MAX_PHOTOS {
            return Err(ConfigError::InvalidValue {
                key: "photos".to_string(),
                value: format!("{} (expected 1-{})", sources.len(), MAX_PHOTOS),
            }
            .into());
        }

        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetSource> {
        self.sources.iter()
    }

    pub fn sources(&self) -> &[AssetSource] {
        &self.sources
    }
}

/// A decorative overlay drawn after the photos: a sticker, logo, or stamp
/// centered in the footer band.
#[derive(Debug, Clone)]
pub struct Decoration {
    pub source: AssetSource,
    /// Multiplier on the decoration's natural size.
    pub scale: f32,
}

impl Decoration {
    pub fn new(source: AssetSource, scale: f32) -> Self {
        Self { source, scale }
    }
}

/// The settled result of one loading pass. Indices line up with the request:
/// `photos[i]` is photo `i`'s decoded image, or `None` when its load failed.
#[derive(Debug, Default)]
pub struct LoadedAssets {
    pub photos: Vec<Option<RgbImage>>,
    pub decorations: Vec<Option<RgbaImage>>,
}

impl LoadedAssets {
    /// Indices of photos whose loads failed; their slots stay empty.
    pub fn failed_photos(&self) -> Vec<usize> {
        self.photos
            .iter()
            .enumerate()
            .filter(|(_, photo)| photo.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn loaded_photo_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_some()).count()
    }
}
