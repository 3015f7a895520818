use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};

/// Default strip width in pixels.
pub const DEFAULT_STRIP_WIDTH: u32 = 480;

/// Default footer band height in pixels.
pub const DEFAULT_FOOTER_HEIGHT: u32 = 100;

/// Maximum caption length in characters.
pub const MAX_CAPTION_LEN: usize = 40;

/// An opaque sRGB color.
///
/// Serializes as a hex string (`"#rrggbb"`); accepts `#RGB` and `#RRGGBB`
/// forms with an optional leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string: `#RGB` or `#RRGGBB`, `#` optional.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let r = expand_nibble(hex.as_bytes()[0])?;
                let g = expand_nibble(hex.as_bytes()[1])?;
                let b = expand_nibble(hex.as_bytes()[2])?;
                Some(Color::new(r, g, b))
            }
            6 => {
                let r = parse_byte(&hex[0..2])?;
                let g = parse_byte(&hex[2..4])?;
                let b = parse_byte(&hex[4..6])?;
                Some(Color::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance over `[0, 1]`, Rec. 601 weights.
    pub fn luminance(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Expand a single hex nibble: 'f' -> 0xFF, 'a' -> 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn parse_byte(s: &str) -> Option<u8> {
    let hi = hex_val(s.as_bytes()[0])?;
    let lo = hex_val(s.as_bytes()[1])?;
    Some(hi << 4 | lo)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {:?}", s)))
    }
}

/// The named tone filters a photo can be rendered through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Normal,
    Warm,
    Cool,
    Vintage,
    Bw,
    Dramatic,
}

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Normal,
        FilterKind::Warm,
        FilterKind::Cool,
        FilterKind::Vintage,
        FilterKind::Bw,
        FilterKind::Dramatic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Normal => "normal",
            FilterKind::Warm => "warm",
            FilterKind::Cool => "cool",
            FilterKind::Vintage => "vintage",
            FilterKind::Bw => "bw",
            FilterKind::Dramatic => "dramatic",
        }
    }
}

/// Caption rendered in the footer band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    /// Caption text, at most [`MAX_CAPTION_LEN`] characters.
    pub text: String,

    /// Point size of the caption text.
    #[serde(default = "default_caption_size")]
    pub size: f32,

    /// Caption text color.
    #[serde(default = "default_caption_color")]
    pub color: Color,

    /// Path to a TTF/OTF file. Falls back to the watermark font when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

fn default_caption_size() -> f32 {
    20.0
}

fn default_caption_color() -> Color {
    Color::new(0x33, 0x33, 0x33)
}

impl Caption {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            size: default_caption_size(),
            color: default_caption_color(),
            font: None,
        }
    }

    fn validate(&self) -> Result<()> {
        let len = self.text.chars().count();
        if len > MAX_CAPTION_LEN {
            return Err(ConfigError::InvalidValue {
                key: "layout.caption.text".to_string(),
                value: format!("{} chars (max {})", len, MAX_CAPTION_LEN),
            }
            .into());
        }

        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.caption.size".to_string(),
                value: self.size.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Fixed canvas dimensions of the strip.
///
/// The photo grid always spans the full `width`; the footer band occupies the
/// bottom `footer_height` pixels. Grid height is derived from the photo count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasParams {
    #[serde(default = "default_strip_width")]
    pub width: u32,

    #[serde(default = "default_footer_height")]
    pub footer_height: u32,
}

fn default_strip_width() -> u32 {
    DEFAULT_STRIP_WIDTH
}

fn default_footer_height() -> u32 {
    DEFAULT_FOOTER_HEIGHT
}

impl Default for CanvasParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_STRIP_WIDTH,
            footer_height: DEFAULT_FOOTER_HEIGHT,
        }
    }
}

impl CanvasParams {
    fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.canvas.width".to_string(),
                value: self.width.to_string(),
            }
            .into());
        }

        if self.footer_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.canvas.footer_height".to_string(),
                value: self.footer_height.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Font file locations for the date stamp and watermark.
///
/// Unset roles fall back to a candidate list of common system font paths; a
/// role with no usable font is skipped at draw time. The caption brings its
/// own font via [`Caption::font`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<PathBuf>,
}

/// Layout and style parameters for one strip composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between photos and around the grid, in pixels. Zero is valid and
    /// produces edge-to-edge placement with no outer margin.
    #[serde(default = "default_margin")]
    pub margin_px: f32,

    /// Number of grid columns, at least 1.
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Draw a proportional white border around each photo.
    #[serde(default = "default_show_border")]
    pub show_border: bool,

    /// Canvas background fill.
    #[serde(default = "default_background")]
    pub background: Color,

    /// Tone filter applied to every photo.
    #[serde(default)]
    pub filter: FilterKind,

    /// Stamp the render date in the footer.
    #[serde(default = "default_show_date")]
    pub show_date: bool,

    /// Watermark text, always drawn at the bottom of the footer.
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    /// Optional caption drawn at the top of the footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Caption>,

    /// Canvas dimensions.
    #[serde(default)]
    pub canvas: CanvasParams,

    /// Footer font locations.
    #[serde(default)]
    pub fonts: FontConfig,
}

fn default_margin() -> f32 {
    16.0
}

fn default_columns() -> u32 {
    1
}

fn default_show_border() -> bool {
    true
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_show_date() -> bool {
    true
}

fn default_watermark_text() -> String {
    "photostrip".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_px: default_margin(),
            columns: default_columns(),
            show_border: default_show_border(),
            background: default_background(),
            filter: FilterKind::default(),
            show_date: default_show_date(),
            watermark_text: default_watermark_text(),
            caption: None,
            canvas: CanvasParams::default(),
            fonts: FontConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: LayoutConfig = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "layout".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Rejects degenerate values before any geometry runs: a negative or
    /// non-finite margin, zero columns, zero canvas dimensions, or an
    /// over-long caption.
    pub fn validate(&self) -> Result<()> {
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.margin_px".to_string(),
                value: self.margin_px.to_string(),
            }
            .into());
        }

        if self.columns == 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.columns".to_string(),
                value: self.columns.to_string(),
            }
            .into());
        }

        self.canvas.validate()?;

        if let Some(caption) = &self.caption {
            caption.validate()?;
        }

        Ok(())
    }
}
