//! DOM overlay styling for in-place text editing.
//!
//! While a text element is edited, the canvas stops drawing it and an
//! absolutely positioned contenteditable takes its place. The style computed
//! here must line up with the vector rendering to the pixel: same placement
//! math, font metrics scaled by the viewport, and the same effect resolution
//! feeding `text-shadow`/stroke instead of vector paint.

use kurbo::{Point, QuadBez};
use pagecraft_core::document::Document;
use pagecraft_core::effects::{self, DomEffect};
use pagecraft_core::element::{Element, ElementId, TextAlign};
use pagecraft_core::geometry::{curve_baseline, element_size, page_offset_y};

use crate::viewport::Viewport;

/// Everything the host needs to place and style the edit overlay.
/// Lengths are in container pixels; `rotation` is in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Top-left corner in container coordinates.
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation about the top-left corner, matching the canvas transform.
    pub rotation: f64,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub align: TextAlign,
    /// CSS color of the glyphs (effects may override the element fill).
    pub color: String,
    pub opacity: f64,
    pub effect: DomEffect,
    /// Curved-layout baseline in container pixels; the host offsets each
    /// glyph span along it, matching the canvas placement.
    pub curve: Option<QuadBez>,
    /// Backing rectangle, when the text background is enabled.
    pub background: Option<OverlayBackground>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBackground {
    pub color: String,
    pub corner_radius: f64,
    /// Padding around the text box, already scaled.
    pub padding: f64,
    pub opacity: f64,
}

/// Compute the overlay style for the element being edited. Returns `None`
/// when the id is not a text element (or no longer exists).
pub fn overlay_style(doc: &Document, id: ElementId, viewport: &Viewport) -> Option<OverlayStyle> {
    let el = doc.element(id)?;
    let block = el.text()?;
    let index = doc
        .page_of(id)
        .and_then(|p| doc.page_index(p.id))?;
    let page_y = page_offset_y(index);
    let scale = viewport.scale;

    let origin = viewport.to_container(Point::new(el.x, page_y + el.y));
    let (w, h) = element_size(el);

    let effect = effects::resolve_dom(block.effect, &block.effect_params, el.fill);
    let color = effect
        .color_override
        .unwrap_or(el.fill)
        .to_hex();

    let curve = curve_baseline(block.shape, w).map(|q| {
        QuadBez::new(
            Point::new(q.p0.x * scale, q.p0.y * scale),
            Point::new(q.p1.x * scale, q.p1.y * scale),
            Point::new(q.p2.x * scale, q.p2.y * scale),
        )
    });

    let background = block.background.enabled.then(|| OverlayBackground {
        color: block.background.color.to_hex(),
        corner_radius: block.background.roundness * scale,
        padding: block.background.spread * scale,
        opacity: 1.0 - block.background.transparency,
    });

    Some(OverlayStyle {
        left: origin.x,
        top: origin.y,
        width: w * scale,
        height: h * scale,
        rotation: el.rotation,
        font_family: block.font_family.clone(),
        font_size: block.font_size * scale,
        font_weight: block.font_weight.clone(),
        font_style: block.font_style.clone(),
        text_decoration: block.text_decoration.clone(),
        letter_spacing: block.letter_spacing * scale,
        line_height: block.line_height,
        align: block.align,
        color,
        opacity: el.opacity,
        effect: scaled_effect(effect, scale),
        curve,
        background,
    })
}

/// Scale the resolved effect's pixel quantities to container pixels, so
/// shadows track the zoom level exactly like the vector side does.
fn scaled_effect(mut effect: DomEffect, scale: f64) -> DomEffect {
    for shadow in &mut effect.text_shadows {
        shadow.offset_x *= scale;
        shadow.offset_y *= scale;
        shadow.blur *= scale;
    }
    if let Some((width, _)) = &mut effect.stroke {
        *width *= scale;
    }
    effect
}

/// Report the overlay's measured text box back into the document, in page
/// units, so the canvas and selection frame track the live size.
pub fn report_measured(el: &Element, container_w: f64, container_h: f64, viewport: &Viewport) {
    if let Some(block) = el.text() {
        block.set_measured(container_w / viewport.scale, container_h / viewport.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use pagecraft_core::element::{ElementKind, ElementPatch, TextBlock, TextPatch};
    use pagecraft_core::{EffectKind, Rgba};

    fn doc_with_text() -> (Document, ElementId) {
        Document::new().add_element(
            ElementKind::Text(TextBlock::new("Hello")),
            ElementPatch::default(),
            None,
        )
    }

    #[test]
    fn test_position_follows_viewport() {
        let (doc, id) = doc_with_text();
        let mut viewport = Viewport::new();
        viewport.position = Vec2::new(100.0, 20.0);
        viewport.scale = 2.0;
        let style = overlay_style(&doc, id, &viewport).unwrap();
        // Element at (50, 50) on page 0.
        assert!((style.left - 200.0).abs() < f64::EPSILON);
        assert!((style.top - 120.0).abs() < f64::EPSILON);
        assert!((style.font_size - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_second_page_offset() {
        let (doc, _) = doc_with_text();
        let doc = doc.add_page(None);
        let (doc, id) = doc.add_element(
            ElementKind::Text(TextBlock::new("Page two")),
            ElementPatch::position(0.0, 0.0),
            Some(doc.pages[1].id),
        );
        let viewport = Viewport::new();
        let style = overlay_style(&doc, id, &viewport).unwrap();
        assert!((style.top - 902.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_text_has_no_overlay() {
        let (doc, id) = Document::new().add_element(ElementKind::Rect, ElementPatch::default(), None);
        assert!(overlay_style(&doc, id, &Viewport::new()).is_none());
    }

    #[test]
    fn test_shadow_scales_with_zoom() {
        let (doc, id) = doc_with_text();
        let patch = ElementPatch {
            text: Some(TextPatch {
                effect: Some(EffectKind::Shadow),
                ..TextPatch::default()
            }),
            ..ElementPatch::default()
        };
        let doc = doc.update_elements(&[id], &patch);

        let mut viewport = Viewport::new();
        viewport.scale = 2.0;
        let style = overlay_style(&doc, id, &viewport).unwrap();
        let unscaled = overlay_style(&doc, id, &Viewport::new()).unwrap();
        let s2 = &style.effect.text_shadows[0];
        let s1 = &unscaled.effect.text_shadows[0];
        assert!((s2.offset_x - s1.offset_x * 2.0).abs() < 1e-9);
        assert!((s2.blur - s1.blur * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_neon_overrides_color() {
        let (doc, id) = doc_with_text();
        let patch = ElementPatch {
            fill: Some(Rgba::from_hex("#123456")),
            text: Some(TextPatch {
                effect: Some(EffectKind::Neon),
                ..TextPatch::default()
            }),
            ..ElementPatch::default()
        };
        let doc = doc.update_elements(&[id], &patch);
        let style = overlay_style(&doc, id, &Viewport::new()).unwrap();
        assert_eq!(style.color, "#ffffff");
    }

    #[test]
    fn test_curve_baseline_scales_with_zoom() {
        let (doc, id) = doc_with_text();
        let patch = ElementPatch {
            text: Some(TextPatch {
                shape: Some(pagecraft_core::element::TextShape::Curve { factor: 10.0 }),
                ..TextPatch::default()
            }),
            ..ElementPatch::default()
        };
        let doc = doc.update_elements(&[id], &patch);
        doc.element(id).unwrap().text().unwrap().set_measured(200.0, 20.0);

        let mut viewport = Viewport::new();
        viewport.scale = 2.0;
        let curve = overlay_style(&doc, id, &viewport).unwrap().curve.unwrap();
        assert!((curve.p2.x - 400.0).abs() < f64::EPSILON);
        assert!((curve.p1.y - 30.0).abs() < f64::EPSILON);

        let unscaled = overlay_style(&doc, id, &Viewport::new()).unwrap().curve.unwrap();
        assert!((unscaled.p1.y - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plain_text_has_no_curve() {
        let (doc, id) = doc_with_text();
        assert!(overlay_style(&doc, id, &Viewport::new()).unwrap().curve.is_none());
    }

    #[test]
    fn test_background_style() {
        let (doc, id) = doc_with_text();
        let mut background = pagecraft_core::element::TextBackground::default();
        background.enabled = true;
        background.roundness = 6.0;
        background.transparency = 0.25;
        let patch = ElementPatch {
            text: Some(TextPatch {
                background: Some(background),
                ..TextPatch::default()
            }),
            ..ElementPatch::default()
        };
        let doc = doc.update_elements(&[id], &patch);
        let mut viewport = Viewport::new();
        viewport.scale = 2.0;
        let style = overlay_style(&doc, id, &viewport).unwrap();
        let bg = style.background.unwrap();
        assert!((bg.corner_radius - 12.0).abs() < f64::EPSILON);
        assert!((bg.padding - 8.0).abs() < f64::EPSILON);
        assert!((bg.opacity - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_measured_report_converts_to_page_units() {
        let (doc, id) = doc_with_text();
        let mut viewport = Viewport::new();
        viewport.scale = 2.0;
        let el = doc.element(id).unwrap();
        report_measured(el, 300.0, 40.0, &viewport);
        assert_eq!(el.text().unwrap().measured(), Some((150.0, 20.0)));
    }
}
