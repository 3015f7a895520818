use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use tracing::{debug, warn};

use crate::config::FontConfig;
use crate::error::AssetError;

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// Common system locations, tried in order when no explicit path is
// configured. The watermark wants a bold sans face, the date a monospace
// one, the caption a regular sans.
const SANS_BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const MONO_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

const SANS_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load and parse a font file, memoizing by path for the process lifetime.
pub fn load_font_cached(path: &Path) -> Result<Arc<Font<'static>>, AssetError> {
    if let Some(font) = FONT_CACHE.lock().get(path) {
        return Ok(Arc::clone(font));
    }

    let bytes = std::fs::read(path).map_err(|_| AssetError::LoadFailed {
        source_ref: path.display().to_string(),
    })?;
    let font = Font::try_from_vec(bytes).ok_or_else(|| AssetError::DecodeFailed {
        source_ref: path.display().to_string(),
        reason: "not a parseable TTF/OTF".to_string(),
    })?;

    let font = Arc::new(font);
    FONT_CACHE
        .lock()
        .insert(path.to_path_buf(), Arc::clone(&font));
    debug!("Loaded font: {}", path.display());
    Ok(font)
}

/// The parsed faces for the three footer text roles. A missing role means
/// that text element is skipped at draw time.
pub struct FontLibrary {
    pub caption: Option<Arc<Font<'static>>>,
    pub date: Option<Arc<Font<'static>>>,
    pub watermark: Option<Arc<Font<'static>>>,
}

impl FontLibrary {
    /// Resolve all three roles from the configured paths, falling back to
    /// system candidates. Never fails: unusable fonts degrade to `None`
    /// with a warning.
    pub fn resolve(config: &FontConfig, caption_font: Option<&Path>) -> Self {
        Self {
            caption: resolve_role("caption", caption_font, SANS_CANDIDATES),
            date: resolve_role("date", config.date.as_deref(), MONO_CANDIDATES),
            watermark: resolve_role("watermark", config.watermark.as_deref(), SANS_BOLD_CANDIDATES),
        }
    }

    /// The caption face, as an asset error when none could be loaded.
    pub fn caption_font(&self) -> Result<&Arc<Font<'static>>, AssetError> {
        self.caption.as_ref().ok_or(AssetError::FontUnavailable {
            role: "caption".to_string(),
        })
    }

    pub fn date_font(&self) -> Result<&Arc<Font<'static>>, AssetError> {
        self.date.as_ref().ok_or(AssetError::FontUnavailable {
            role: "date stamp".to_string(),
        })
    }

    pub fn watermark_font(&self) -> Result<&Arc<Font<'static>>, AssetError> {
        self.watermark.as_ref().ok_or(AssetError::FontUnavailable {
            role: "watermark".to_string(),
        })
    }
}

fn resolve_role(
    role: &str,
    explicit: Option<&Path>,
    candidates: &[&str],
) -> Option<Arc<Font<'static>>> {
    if let Some(path) = explicit {
        match load_font_cached(path) {
            Ok(font) => return Some(font),
            Err(err) => warn!("Configured {} font unusable ({}), trying fallbacks", role, err),
        }
    }

    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            if let Ok(font) = load_font_cached(path) {
                return Some(font);
            }
        }
    }

    warn!("No usable {} font found; {} text will be skipped", role, role);
    None
}
