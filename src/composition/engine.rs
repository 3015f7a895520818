use std::path::Path;

use chrono::{Local, NaiveDate};
use image::imageops::{self, FilterType};
use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::assets::{AssetLoader, Decoration, FontLibrary, LoadedAssets, PhotoSet};
use crate::config::LayoutConfig;
use crate::error::{Result, StripError};
use crate::filters::{FilterRegistry, ToneFilter};
use crate::layout::{compute_layout, fit_region, plan_footer, CanvasPlan, FooterElement};
use crate::render::{draw_text_centered, stamp_color, Canvas};

// Fixed footer text metrics.
const DATE_STAMP_SIZE: f32 = 13.0;
const WATERMARK_SIZE: f32 = 17.0;
const DATE_STAMP_ALPHA: u8 = 153;
const DATE_STAMP_FORMAT: &str = "%B %d, %Y";

// Photo borders scale with the photo's share of the canvas width, but never
// vanish.
const BORDER_MIN: f32 = 2.0;
const BORDER_WIDTH_RATIO: f32 = 5.0;
const BORDER_COLOR: [u8; 3] = [255, 255, 255];

const PLACEHOLDER_HEIGHT: u32 = 320;
const PLACEHOLDER_BG: [u8; 3] = [24, 24, 24];
const PLACEHOLDER_STRIPE: [u8; 3] = [64, 64, 64];
const PLACEHOLDER_TEXT: [u8; 4] = [0xf2, 0xf2, 0xf2, 255];

/// One complete composition request.
///
/// Requests are values: any change to photos, layout, or decorations means a
/// new request, and the engine recomputes everything from scratch. The date
/// is an explicit input so identical requests render identical pixels.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub photos: PhotoSet,
    pub layout: LayoutConfig,
    pub decorations: Vec<Decoration>,
    pub date: NaiveDate,
}

impl RenderRequest {
    /// Build a request dated today, with no decorations.
    pub fn new(photos: PhotoSet, layout: LayoutConfig) -> Self {
        Self {
            photos,
            layout,
            decorations: Vec::new(),
            date: Local::now().date_naive(),
        }
    }

    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// The finalized output of one composition: the flattened raster plus its
/// PNG encoding, ready for display, download, or print.
#[derive(Debug, Clone)]
pub struct RenderedStrip {
    canvas: Canvas,
    png: Vec<u8>,
    generation: u64,
    skipped_photos: Vec<usize>,
    error: Option<String>,
}

impl RenderedStrip {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The strip encoded as PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// The request generation this strip was composed for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Photo indices whose loads failed; their slots were left empty.
    pub fn skipped_photos(&self) -> &[usize] {
        &self.skipped_photos
    }

    /// Set when this strip is a diagnostic placeholder instead of a real
    /// composition.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Write the PNG to a file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

/// A fitted, filtered photo tile ready to blit.
struct Tile {
    image: RgbImage,
    x: i64,
    y: i64,
}

/// Main composition engine that turns one request into one strip
///
/// The engine follows a clear pipeline:
/// 1. Validation & Geometry - reject bad config, plan the photo grid
/// 2. Asset Loading - decode every photo and decoration concurrently
/// 3. Draw Pass - background, photos, decorations, footer, in fixed order
/// 4. Encoding - serialize the finished surface as PNG
pub struct StripEngine {
    filters: FilterRegistry,
    loader: AssetLoader,
}

impl StripEngine {
    pub fn new() -> Self {
        Self {
            filters: FilterRegistry::new(),
            loader: AssetLoader::new(),
        }
    }

    /// Use a custom loader (e.g. a shorter per-asset timeout).
    pub fn with_loader(loader: AssetLoader) -> Self {
        Self {
            filters: FilterRegistry::new(),
            loader,
        }
    }

    /// Compose one strip from one request.
    ///
    /// Invalid configuration is the only error path; asset and surface
    /// failures degrade the output instead (empty slots, or a diagnostic
    /// placeholder carrying [`RenderedStrip::error`]).
    pub async fn compose(&self, request: &RenderRequest) -> Result<RenderedStrip> {
        self.compose_generation(request, 0).await
    }

    pub(crate) async fn compose_generation(
        &self,
        request: &RenderRequest,
        generation: u64,
    ) -> Result<RenderedStrip> {
        let plan = self.plan(request)?;
        let assets = self.load(request).await;
        Ok(self.paint(request, &plan, &assets, generation))
    }

    // ==========================================
    // PIPELINE STEP 1: VALIDATION & GEOMETRY
    // ==========================================

    /// Validate the request and plan the photo grid.
    pub(crate) fn plan(&self, request: &RenderRequest) -> Result<CanvasPlan> {
        request.layout.validate()?;

        let layout = &request.layout;
        info!(
            "📐 Planning strip: {} photos, {} columns, margin {}px, filter '{}'",
            request.photos.len(),
            layout.columns,
            layout.margin_px,
            layout.filter.as_str()
        );

        let plan = compute_layout(
            request.photos.len(),
            layout.canvas.width,
            layout.margin_px,
            layout.columns,
            layout.canvas.footer_height,
        )?;

        debug!(
            "Canvas plan: {}x{}, footer band at y={:.1}",
            plan.width, plan.height, plan.footer_top
        );
        Ok(plan)
    }

    // ==========================================
    // PIPELINE STEP 2: ASSET LOADING
    // ==========================================

    /// Decode every photo and decoration concurrently; always settles.
    pub(crate) async fn load(&self, request: &RenderRequest) -> LoadedAssets {
        info!("📷 Loading assets...");
        self.loader
            .load_all(&request.photos, &request.decorations)
            .await
    }

    // ==========================================
    // PIPELINE STEPS 3+4: DRAW PASS & ENCODING
    // ==========================================

    /// The synchronous paint step. Never fails: a surface or encoding
    /// failure produces a diagnostic placeholder with the error attached.
    pub(crate) fn paint(
        &self,
        request: &RenderRequest,
        plan: &CanvasPlan,
        assets: &LoadedAssets,
        generation: u64,
    ) -> RenderedStrip {
        info!("🎨 Drawing strip...");

        match self.draw(request, plan, assets) {
            Ok(canvas) => match canvas.encode_png() {
                Ok(png) => {
                    info!(
                        "🎉 Strip ready: {}x{}, {} photos placed, {} skipped",
                        canvas.width(),
                        canvas.height(),
                        assets.loaded_photo_count(),
                        assets.failed_photos().len()
                    );
                    RenderedStrip {
                        canvas,
                        png,
                        generation,
                        skipped_photos: assets.failed_photos(),
                        error: None,
                    }
                }
                Err(encode_err) => {
                    let err = StripError::from(encode_err);
                    error!("Strip encoding failed: {}", err);
                    self.placeholder(request, generation, &err)
                }
            },
            Err(err) => {
                error!("Draw pass failed: {}", err);
                self.placeholder(request, generation, &err)
            }
        }
    }

    /// Fixed draw order: background, photos (with optional borders and the
    /// configured filter), decorations, footer text.
    fn draw(
        &self,
        request: &RenderRequest,
        plan: &CanvasPlan,
        assets: &LoadedAssets,
    ) -> Result<Canvas> {
        let layout = &request.layout;

        let mut canvas = Canvas::try_new(plan.width, plan.height, layout.background.channels())?;

        let filter = self.filters.get(layout.filter).ok_or_else(|| {
            StripError::generic(format!("unknown filter: {}", layout.filter.as_str()))
        })?;

        // Tiles are fitted and filtered in parallel; each photo's transform
        // is scoped to its own tile, so nothing leaks between slots.
        let tiles = self.prepare_tiles(plan, assets, filter)?;

        for (index, tile) in tiles.iter().enumerate() {
            let Some(tile) = tile else {
                debug!("Photo slot {} left empty", index);
                continue;
            };

            if layout.show_border {
                let rect = &plan.photo_rects[index];
                let border = border_width(rect.width, plan.width as f32);
                canvas.fill_rect(&rect.expanded(border), BORDER_COLOR);
            }

            canvas.blit_rgb(&tile.image, tile.x, tile.y);
        }

        self.draw_decorations(&mut canvas, plan, request, assets);
        self.draw_footer(&mut canvas, plan, request);

        Ok(canvas)
    }

    fn prepare_tiles(
        &self,
        plan: &CanvasPlan,
        assets: &LoadedAssets,
        filter: &dyn ToneFilter,
    ) -> Result<Vec<Option<Tile>>> {
        plan.photo_rects
            .par_iter()
            .zip(assets.photos.par_iter())
            .map(|(rect, photo)| {
                let Some(photo) = photo else {
                    return Ok(None);
                };

                let placement = fit_region(photo.width() as f32, photo.height() as f32, rect);
                let draw_w = placement.draw_w.round().max(1.0) as u32;
                let draw_h = placement.draw_h.round().max(1.0) as u32;

                let mut image = imageops::resize(photo, draw_w, draw_h, FilterType::Lanczos3);
                filter.apply(&mut image)?;

                Ok(Some(Tile {
                    image,
                    x: (rect.x + placement.offset_x).round() as i64,
                    y: (rect.y + placement.offset_y).round() as i64,
                }))
            })
            .collect()
    }

    /// Decorations sit centered on the canvas width and centered within the
    /// footer band, scaled by their own factor.
    fn draw_decorations(
        &self,
        canvas: &mut Canvas,
        plan: &CanvasPlan,
        request: &RenderRequest,
        assets: &LoadedAssets,
    ) {
        for (index, decoration) in assets.decorations.iter().enumerate() {
            let Some(image) = decoration else {
                debug!("Decoration {} draws nothing", index);
                continue;
            };

            let scale = request
                .decorations
                .get(index)
                .map(|d| d.scale)
                .unwrap_or(1.0);
            if !scale.is_finite() || scale <= 0.0 {
                warn!("Decoration {} has unusable scale {}, skipping", index, scale);
                continue;
            }

            let w = ((image.width() as f32 * scale).round()).max(1.0) as u32;
            let h = ((image.height() as f32 * scale).round()).max(1.0) as u32;
            let resized = imageops::resize(image, w, h, FilterType::Lanczos3);

            let x = (plan.width as f32 - w as f32) / 2.0;
            let y = plan.footer_top + (plan.footer_height as f32 - h as f32) / 2.0;
            canvas.blend_rgba(&resized, x.round() as i64, y.round() as i64);
        }
    }

    fn draw_footer(&self, canvas: &mut Canvas, plan: &CanvasPlan, request: &RenderRequest) {
        let layout = &request.layout;
        let fonts = FontLibrary::resolve(
            &layout.fonts,
            layout.caption.as_ref().and_then(|c| c.font.as_deref()),
        );

        let slots = plan_footer(
            plan.footer_top,
            plan.footer_height as f32,
            layout.caption.is_some(),
            layout.show_date,
        );
        let center_x = plan.width as f32 / 2.0;
        let stamp = stamp_color(layout.background);

        for (element, center_y) in slots {
            match element {
                FooterElement::Caption => {
                    let Some(caption) = &layout.caption else {
                        continue;
                    };
                    match fonts.caption_font() {
                        Ok(font) => draw_text_centered(
                            canvas,
                            font,
                            &caption.text,
                            caption.size,
                            center_x,
                            center_y,
                            [caption.color.r, caption.color.g, caption.color.b, 255],
                        ),
                        Err(err) => warn!("Skipping caption: {}", err),
                    }
                }
                FooterElement::Date => {
                    let text = request.date.format(DATE_STAMP_FORMAT).to_string();
                    match fonts.date_font() {
                        Ok(font) => draw_text_centered(
                            canvas,
                            font,
                            &text,
                            DATE_STAMP_SIZE,
                            center_x,
                            center_y,
                            [stamp.r, stamp.g, stamp.b, DATE_STAMP_ALPHA],
                        ),
                        Err(err) => warn!("Skipping date stamp: {}", err),
                    }
                }
                FooterElement::Watermark => match fonts.watermark_font() {
                    Ok(font) => draw_text_centered(
                        canvas,
                        font,
                        &layout.watermark_text,
                        WATERMARK_SIZE,
                        center_x,
                        center_y,
                        [stamp.r, stamp.g, stamp.b, 255],
                    ),
                    Err(err) => warn!("Skipping watermark: {}", err),
                },
            }
        }
    }

    /// Build the diagnostic strip for a failed attempt: a striped dark
    /// surface with the error message when a font is available. A failed
    /// render is always visible, never a blank or missing region.
    fn placeholder(&self, request: &RenderRequest, generation: u64, err: &StripError) -> RenderedStrip {
        let width = request.layout.canvas.width.clamp(64, 1024);
        let mut canvas = Canvas::filled(width, PLACEHOLDER_HEIGHT, PLACEHOLDER_BG);

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if (x + y) % 20 < 2 {
                    canvas.set_pixel(x, y, PLACEHOLDER_STRIPE);
                }
            }
        }

        let fonts = FontLibrary::resolve(&request.layout.fonts, None);
        if let Ok(font) = fonts.watermark_font() {
            let center_x = width as f32 / 2.0;
            let center_y = PLACEHOLDER_HEIGHT as f32 / 2.0;
            draw_text_centered(
                &mut canvas,
                font,
                "render failed",
                WATERMARK_SIZE,
                center_x,
                center_y - 12.0,
                PLACEHOLDER_TEXT,
            );
            draw_text_centered(
                &mut canvas,
                font,
                &err.user_message(),
                DATE_STAMP_SIZE,
                center_x,
                center_y + 10.0,
                PLACEHOLDER_TEXT,
            );
        }

        let png = canvas.encode_png().unwrap_or_default();
        RenderedStrip {
            canvas,
            png,
            generation,
            skipped_photos: (0..request.photos.len()).collect(),
            error: Some(err.user_message()),
        }
    }
}

impl Default for StripEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn border_width(rect_width: f32, canvas_width: f32) -> f32 {
    (BORDER_WIDTH_RATIO * rect_width / canvas_width).max(BORDER_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetSource;
    use crate::config::{Color, FilterKind};
    use std::io::Cursor;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(64, 48, image::Rgb(color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn base_layout() -> LayoutConfig {
        LayoutConfig {
            margin_px: 20.0,
            columns: 2,
            show_border: false,
            background: Color::BLACK,
            show_date: false,
            caption: None,
            watermark_text: String::new(),
            ..LayoutConfig::default()
        }
    }

    fn rect_center(plan: &CanvasPlan, index: usize) -> (u32, u32) {
        let rect = &plan.photo_rects[index];
        (
            (rect.x + rect.width / 2.0) as u32,
            (rect.y + rect.height / 2.0) as u32,
        )
    }

    #[tokio::test]
    async fn test_identical_requests_are_pixel_identical() {
        init_logging();
        let photos = PhotoSet::new(vec![
            AssetSource::bytes(png_bytes([200, 10, 10])),
            AssetSource::bytes(png_bytes([10, 200, 10])),
        ])
        .unwrap();
        let request = RenderRequest::new(photos, base_layout()).with_date(fixed_date());

        let engine = StripEngine::new();
        let first = engine.compose(&request).await.unwrap();
        let second = engine.compose(&request).await.unwrap();

        assert!(!first.is_degraded());
        assert_eq!(first.png_bytes(), second.png_bytes());
    }

    #[tokio::test]
    async fn test_partial_failure_skips_only_the_bad_slot() {
        init_logging();
        let photos = PhotoSet::new(vec![
            AssetSource::bytes(png_bytes([200, 0, 0])),
            AssetSource::bytes(png_bytes([0, 200, 0])),
            AssetSource::bytes(vec![0xff, 0xfe]), // undecodable
            AssetSource::bytes(png_bytes([0, 0, 200])),
        ])
        .unwrap();
        let request = RenderRequest::new(photos, base_layout()).with_date(fixed_date());

        let engine = StripEngine::new();
        let strip = engine.compose(&request).await.unwrap();

        assert!(!strip.is_degraded());
        assert_eq!(strip.skipped_photos(), &[2]);

        let plan = engine.plan(&request).unwrap();

        // Loaded photos land in their slots (resampling may nudge a solid
        // color by a unit or two).
        for (index, expected) in [(0, [200, 0, 0]), (1, [0, 200, 0]), (3, [0, 0, 200])] {
            let (cx, cy) = rect_center(&plan, index);
            let px = strip.canvas().get_pixel(cx, cy);
            for ch in 0..3 {
                assert!(
                    (px[ch] as i16 - expected[ch] as i16).abs() <= 2,
                    "photo {} misplaced: {:?} vs {:?}",
                    index,
                    px,
                    expected
                );
            }
        }

        // ...and the failed slot shows plain background.
        let (cx, cy) = rect_center(&plan, 2);
        assert_eq!(strip.canvas().get_pixel(cx, cy), [0, 0, 0]);
    }

    #[tokio::test]
    async fn test_border_surrounds_photo() {
        let mut layout = base_layout();
        layout.columns = 1;
        layout.show_border = true;

        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([50, 50, 50]))]).unwrap();
        let request = RenderRequest::new(photos, layout).with_date(fixed_date());

        let engine = StripEngine::new();
        let strip = engine.compose(&request).await.unwrap();
        let plan = engine.plan(&request).unwrap();

        let rect = &plan.photo_rects[0];
        let y = (rect.y + rect.height / 2.0) as u32;

        // Just outside the photo rect: white border on black background.
        assert_eq!(strip.canvas().get_pixel(rect.x as u32 - 1, y), [255, 255, 255]);
    }

    #[tokio::test]
    async fn test_filter_is_applied_per_photo() {
        let mut layout = base_layout();
        layout.columns = 1;
        layout.filter = FilterKind::Bw;

        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([200, 40, 90]))]).unwrap();
        let request = RenderRequest::new(photos, layout).with_date(fixed_date());

        let engine = StripEngine::new();
        let strip = engine.compose(&request).await.unwrap();
        let plan = engine.plan(&request).unwrap();

        let (cx, cy) = rect_center(&plan, 0);
        let px = strip.canvas().get_pixel(cx, cy);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[tokio::test]
    async fn test_decoration_lands_in_footer_band() {
        let rgba = {
            let img = image::RgbaImage::from_pixel(12, 12, image::Rgba([250, 0, 0, 255]));
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
                .unwrap();
            buf
        };

        let mut layout = base_layout();
        layout.columns = 1;
        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([9, 9, 9]))]).unwrap();
        let request = RenderRequest::new(photos, layout)
            .with_date(fixed_date())
            .with_decorations(vec![Decoration::new(AssetSource::bytes(rgba), 1.0)]);

        let engine = StripEngine::new();
        let strip = engine.compose(&request).await.unwrap();
        let plan = engine.plan(&request).unwrap();

        let cx = plan.width / 2;
        let cy = (plan.footer_top + plan.footer_height as f32 / 2.0) as u32;
        assert_eq!(strip.canvas().get_pixel(cx, cy), [250, 0, 0]);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_drawing() {
        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([1, 1, 1]))]).unwrap();
        let mut layout = base_layout();
        layout.columns = 0;
        let request = RenderRequest::new(photos, layout).with_date(fixed_date());

        let result = StripEngine::new().compose(&request).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_surface_failure_yields_visible_placeholder() {
        let photos = PhotoSet::new(vec![AssetSource::bytes(png_bytes([1, 1, 1]))]).unwrap();
        let mut layout = base_layout();
        layout.columns = 1;
        layout.margin_px = 0.0;
        // A kilometer-wide strip blows the surface budget.
        layout.canvas.width = 1_000_000;
        let request = RenderRequest::new(photos, layout).with_date(fixed_date());

        let strip = StripEngine::new().compose(&request).await.unwrap();

        assert!(strip.is_degraded());
        assert!(strip.error().is_some());
        assert!(!strip.png_bytes().is_empty());
        assert_eq!(strip.skipped_photos(), &[0]);
        // The placeholder is visibly patterned, not blank.
        let canvas = strip.canvas();
        let mut distinct = std::collections::HashSet::new();
        for x in 0..canvas.width() {
            distinct.insert(canvas.get_pixel(x, 0));
        }
        assert!(distinct.len() > 1);
    }
}
