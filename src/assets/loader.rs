use std::time::Duration;

use image::{DynamicImage, RgbImage, RgbaImage};
use tokio::task::{self, JoinHandle};
use tokio::time;
use tracing::{debug, info, warn};

use crate::assets::types::{AssetSource, Decoration, LoadedAssets, PhotoSet};
use crate::error::AssetError;

/// Default per-asset load deadline. A decode that exceeds it is abandoned
/// and its slot skipped, so one hung source cannot stall the whole request.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Concurrent, all-settled asset loader.
///
/// Every photo and decoration decode is issued at once; `load_all` returns
/// only after each item has settled as loaded or failed. Results are owned
/// by the request — nothing is reused across requests.
pub struct AssetLoader {
    timeout: Duration,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Use a custom per-asset deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Load every photo and decoration concurrently and wait for all of
    /// them to settle.
    ///
    /// Failures are absorbed here: a failed photo leaves `None` at its index
    /// (the compositor skips the slot), a failed decoration simply draws
    /// nothing. This method itself never fails.
    pub async fn load_all(&self, photos: &PhotoSet, decorations: &[Decoration]) -> LoadedAssets {
        debug!(
            "Loading {} photos and {} decorations concurrently",
            photos.len(),
            decorations.len()
        );

        let photo_handles: Vec<_> = photos
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, source)| {
                self.settle(index, "photo", move || decode_rgb(&source))
            })
            .collect();

        let decoration_handles: Vec<_> = decorations
            .iter()
            .map(|d| d.source.clone())
            .enumerate()
            .map(|(index, source)| {
                self.settle(index, "decoration", move || decode_rgba(&source))
            })
            .collect();

        // All-settled barrier: every handle resolves to Some(image) or None.
        let mut loaded_photos = Vec::with_capacity(photo_handles.len());
        for handle in photo_handles {
            loaded_photos.push(handle.await.ok().flatten());
        }

        let mut loaded_decorations = Vec::with_capacity(decoration_handles.len());
        for handle in decoration_handles {
            loaded_decorations.push(handle.await.ok().flatten());
        }

        let assets = LoadedAssets {
            photos: loaded_photos,
            decorations: loaded_decorations,
        };

        let failed = assets.failed_photos();
        if failed.is_empty() {
            info!("All {} photos settled as loaded", assets.photos.len());
        } else {
            warn!(
                "{}/{} photos failed to load and will be skipped: {:?}",
                failed.len(),
                assets.photos.len(),
                failed
            );
        }

        assets
    }

    /// Spawn one decode with its own deadline. The decode runs on the
    /// blocking pool; the wrapper task turns every outcome into an Option.
    fn settle<T, F>(&self, index: usize, label: &'static str, decode: F) -> JoinHandle<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, AssetError> + Send + 'static,
    {
        let timeout = self.timeout;
        tokio::spawn(async move {
            match time::timeout(timeout, task::spawn_blocking(decode)).await {
                Ok(Ok(Ok(image))) => Some(image),
                Ok(Ok(Err(err))) => {
                    warn!("{} {} failed to load: {}", label, index, err);
                    None
                }
                Ok(Err(join_err)) => {
                    warn!("{} {} decode task failed: {}", label, index, join_err);
                    None
                }
                Err(_) => {
                    warn!(
                        "{} {} load timed out after {:.1}s, skipping",
                        label,
                        index,
                        timeout.as_secs_f64()
                    );
                    None
                }
            }
        })
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(source: &AssetSource) -> Result<DynamicImage, AssetError> {
    match source {
        AssetSource::Path(path) => {
            if !path.exists() {
                return Err(AssetError::LoadFailed {
                    source_ref: source.describe(),
                });
            }
            image::open(path).map_err(|e| AssetError::DecodeFailed {
                source_ref: source.describe(),
                reason: e.to_string(),
            })
        }
        AssetSource::Bytes(bytes) => {
            image::load_from_memory(bytes).map_err(|e| AssetError::DecodeFailed {
                source_ref: source.describe(),
                reason: e.to_string(),
            })
        }
    }
}

fn decode_rgb(source: &AssetSource) -> Result<RgbImage, AssetError> {
    Ok(decode(source)?.to_rgb8())
}

/// Decorations keep their alpha channel so overlays blend onto the strip.
fn decode_rgba(source: &AssetSource) -> Result<RgbaImage, AssetError> {
    Ok(decode(source)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, image::Rgb(color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_loads_inline_bytes() {
        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([10, 20, 30]))]).unwrap();
        let assets = AssetLoader::new().load_all(&photos, &[]).await;

        assert_eq!(assets.photos.len(), 1);
        let photo = assets.photos[0].as_ref().unwrap();
        assert_eq!(photo.get_pixel(0, 0).0, [10, 20, 30]);
        assert!(assets.failed_photos().is_empty());
    }

    #[tokio::test]
    async fn test_bad_photo_settles_as_failed() {
        let photos = PhotoSet::new(vec![
            AssetSource::bytes(png_bytes([1, 2, 3])),
            AssetSource::bytes(vec![0xde, 0xad, 0xbe, 0xef]),
            AssetSource::path("/definitely/not/here.png"),
        ])
        .unwrap();
        let assets = AssetLoader::new().load_all(&photos, &[]).await;

        assert_eq!(assets.photos.len(), 3);
        assert!(assets.photos[0].is_some());
        assert!(assets.photos[1].is_none());
        assert!(assets.photos[2].is_none());
        assert_eq!(assets.failed_photos(), vec![1, 2]);
        assert_eq!(assets.loaded_photo_count(), 1);
    }

    #[tokio::test]
    async fn test_bad_decoration_draws_nothing() {
        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([1, 2, 3]))]).unwrap();
        let decorations = vec![
            Decoration::new(AssetSource::bytes(vec![1, 2, 3]), 1.0),
            Decoration::new(AssetSource::bytes(png_bytes([9, 9, 9])), 0.5),
        ];
        let assets = AssetLoader::new().load_all(&photos, &decorations).await;

        assert_eq!(assets.decorations.len(), 2);
        assert!(assets.decorations[0].is_none());
        assert!(assets.decorations[1].is_some());
        // A bad decoration never poisons the photos.
        assert!(assets.failed_photos().is_empty());
    }
}
