//! Page export as PNG data URLs.
//!
//! Exports rasterize the document alone; selection frames, guides and other
//! editing chrome never exist in this path. Shapes are filled by
//! point-in-path testing against the same geometry the scene builder emits,
//! so the export matches the canvas. Text glyphs and remote images need the
//! host's text/image pipeline and are rasterized as their bounding fills.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use kurbo::{Affine, Point, Shape};
use log::warn;
use pagecraft_core::color::Rgba;
use pagecraft_core::document::{Document, PAGE_HEIGHT, PAGE_WIDTH};
use pagecraft_core::element::{Element, ElementKind};
use thiserror::Error;

use crate::scene::shape_path;

/// Largest device dimension (pixels) accepted for a page raster.
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("page index {0} out of range")]
    PageOutOfRange(usize),
    #[error("invalid export scale {0}")]
    InvalidScale(f64),
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// RGBA8 pixel buffer for one page.
pub struct PageRaster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PageRaster {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Rasterize one page at `scale` pixels per page unit.
pub fn render_page(doc: &Document, index: usize, scale: f64) -> Result<PageRaster, ExportError> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(ExportError::InvalidScale(scale));
    }
    let page = doc
        .pages
        .get(index)
        .ok_or(ExportError::PageOutOfRange(index))?;

    let width = (PAGE_WIDTH * scale).round() as u32;
    let height = (PAGE_HEIGHT * scale).round() as u32;
    if width == 0 || height == 0 || width > MAX_EXPORT_DIMENSION || height > MAX_EXPORT_DIMENSION {
        return Err(ExportError::InvalidScale(scale));
    }
    let mut raster = PageRaster {
        width,
        height,
        pixels: vec![255u8; width as usize * height as usize * 4],
    };

    for el in &page.elements {
        rasterize_element(el, scale, &mut raster);
    }
    Ok(raster)
}

fn rasterize_element(el: &Element, scale: f64, raster: &mut PageRaster) {
    let fill = match &el.kind {
        ElementKind::Image { src } => {
            // Image bytes live behind the asset URL; exports stand in a
            // neutral placeholder box.
            warn!("exporting image {src} as placeholder");
            Rgba::new(0xe0, 0xe0, 0xe0, 255)
        }
        _ => el.fill,
    };
    let path = match &el.kind {
        ElementKind::Text(block) => {
            // Glyph outlines need the host text engine; the export fills
            // the measured text box.
            let (w, h) = block.measured().unwrap_or_else(|| block.approximate_size());
            shape_path(&ElementKind::Rect, w, h)
        }
        kind => shape_path(kind, el.width, el.height),
    };

    // Map device pixels back into the element's local frame.
    let transform = Affine::translate((el.x, el.y))
        * Affine::rotate(el.rotation.to_radians())
        * Affine::scale_non_uniform(el.scale_x, el.scale_y);
    let inverse = transform.inverse();

    let bbox = transform.transform_rect_bbox(path.bounding_box());
    let x0 = ((bbox.x0 * scale).floor().max(0.0)) as u32;
    let y0 = ((bbox.y0 * scale).floor().max(0.0)) as u32;
    let x1 = ((bbox.x1 * scale).ceil() as u32).min(raster.width);
    let y1 = ((bbox.y1 * scale).ceil() as u32).min(raster.height);

    let alpha = (el.opacity * fill.a as f64 / 255.0).clamp(0.0, 1.0);
    for py in y0..y1 {
        for px in x0..x1 {
            let page_point = Point::new((px as f64 + 0.5) / scale, (py as f64 + 0.5) / scale);
            let local = inverse * page_point;
            if path.contains(local) {
                blend(raster, px, py, fill, alpha);
            }
        }
    }
}

fn blend(raster: &mut PageRaster, x: u32, y: u32, color: Rgba, alpha: f64) {
    let i = (y as usize * raster.width as usize + x as usize) * 4;
    for (offset, channel) in [color.r, color.g, color.b].into_iter().enumerate() {
        let dst = raster.pixels[i + offset] as f64;
        raster.pixels[i + offset] = (channel as f64 * alpha + dst * (1.0 - alpha)).round() as u8;
    }
    raster.pixels[i + 3] = 255;
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &PageRaster) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, raster.width, raster.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raster.pixels)?;
    }
    Ok(bytes)
}

/// Export one page as a `data:image/png;base64,...` URL.
pub fn export_page_data_url(
    doc: &Document,
    index: usize,
    scale: f64,
) -> Result<String, ExportError> {
    let raster = render_page(doc, index, scale)?;
    let bytes = encode_png(&raster)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

/// Export every visible page, in order. Hidden pages are skipped.
pub fn export_document(doc: &Document, scale: f64) -> Result<Vec<String>, ExportError> {
    doc.pages
        .iter()
        .enumerate()
        .filter(|(_, page)| !page.hidden)
        .map(|(index, _)| export_page_data_url(doc, index, scale))
        .collect()
}
