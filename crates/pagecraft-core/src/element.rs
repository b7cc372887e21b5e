//! Element definitions for the page canvas.

use crate::color::Rgba;
use crate::effects::{EffectKind, EffectParams};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Default geometry for freshly added elements.
pub const DEFAULT_SIZE: f64 = 100.0;
pub const DEFAULT_POSITION: f64 = 50.0;

/// Minimum element dimension after a transform commit.
pub const MIN_DIMENSION: f64 = 5.0;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text case transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

/// List rendering for text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    None,
    Bullet,
}

/// Text layout shape (text-on-curve).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum TextShape {
    #[default]
    Plain,
    /// Text along a quadratic path whose control height is `factor * 1.5`.
    Curve { factor: f64 },
}

/// Backing rectangle behind a text block, sized from the live measured text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBackground {
    pub enabled: bool,
    pub color: Rgba,
    /// Corner radius of the backing rectangle.
    pub roundness: f64,
    /// Margin added on all four sides of the measured text box.
    pub spread: f64,
    /// 0.0 = opaque, 1.0 = fully transparent.
    pub transparency: f64,
}

impl Default for TextBackground {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Rgba::white(),
            roundness: 0.0,
            spread: 4.0,
            transparency: 0.0,
        }
    }
}

/// Text content and typography for a text element.
///
/// Carries a measured-size cache set by the renderer after layout; the
/// background rectangle and the edit overlay derive their size from it rather
/// than from the stored width/height, so resizes do not drift.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextBlock {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub align: TextAlign,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub transform: TextTransform,
    pub list_type: ListType,
    pub effect: EffectKind,
    pub effect_params: EffectParams,
    pub shape: TextShape,
    pub background: TextBackground,
    /// Live measured (width, height) from the last layout pass.
    #[serde(skip)]
    measured: RwLock<Option<(f64, f64)>>,
}

impl TextBlock {
    /// Default font size for new text elements.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: "Inter".to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
            align: TextAlign::default(),
            letter_spacing: 0.0,
            line_height: 1.2,
            transform: TextTransform::default(),
            list_type: ListType::default(),
            effect: EffectKind::default(),
            effect_params: EffectParams::default(),
            shape: TextShape::default(),
            background: TextBackground::default(),
            measured: RwLock::new(None),
        }
    }

    /// Content with the case transform applied, as the renderers display it.
    pub fn display_content(&self) -> String {
        match self.transform {
            TextTransform::None => self.content.clone(),
            TextTransform::Uppercase => self.content.to_uppercase(),
        }
    }

    /// Record the measured layout size (called by the renderer).
    pub fn set_measured(&self, width: f64, height: f64) {
        if let Ok(mut cache) = self.measured.write() {
            *cache = Some((width, height));
        }
    }

    /// Last measured layout size, if a layout pass has run.
    pub fn measured(&self) -> Option<(f64, f64)> {
        self.measured.read().ok().and_then(|guard| *guard)
    }

    /// Drop the measured size (call when content or typography changes).
    pub fn invalidate_measurement(&self) {
        if let Ok(mut cache) = self.measured.write() {
            *cache = None;
        }
    }

    /// Approximate layout size when no measurement is available yet.
    pub fn approximate_size(&self) -> (f64, f64) {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let line_count = self.content.lines().count().max(1);
        let width = max_line_len as f64 * self.font_size * 0.55 + self.letter_spacing * max_line_len as f64;
        let height = line_count as f64 * self.font_size * self.line_height;
        (width.max(self.font_size), height)
    }
}

impl Clone for TextBlock {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight.clone(),
            font_style: self.font_style.clone(),
            text_decoration: self.text_decoration.clone(),
            align: self.align,
            letter_spacing: self.letter_spacing,
            line_height: self.line_height,
            transform: self.transform,
            list_type: self.list_type,
            effect: self.effect,
            effect_params: self.effect_params,
            shape: self.shape,
            background: self.background,
            measured: RwLock::new(self.measured()),
        }
    }
}

impl PartialEq for TextBlock {
    fn eq(&self, other: &Self) -> bool {
        // The measured cache is render state, not document state.
        self.content == other.content
            && self.font_family == other.font_family
            && self.font_size == other.font_size
            && self.font_weight == other.font_weight
            && self.font_style == other.font_style
            && self.text_decoration == other.text_decoration
            && self.align == other.align
            && self.letter_spacing == other.letter_spacing
            && self.line_height == other.line_height
            && self.transform == other.transform
            && self.list_type == other.list_type
            && self.effect == other.effect
            && self.effect_params == other.effect_params
            && self.shape == other.shape
            && self.background == other.background
    }
}

/// The variant payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ElementKind {
    Text(TextBlock),
    Image { src: String },
    Rect,
    Circle,
    Star,
    Arrow,
    Line,
    Triangle,
    Polygon,
}

impl ElementKind {
    /// Short name used for logging and default layer titles.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Star => "star",
            ElementKind::Arrow => "arrow",
            ElementKind::Line => "line",
            ElementKind::Triangle => "triangle",
            ElementKind::Polygon => "polygon",
        }
    }
}

/// One placeable object on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner in page-local coordinates.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the top-left corner.
    pub rotation: f64,
    /// 0.0..=1.0.
    pub opacity: f64,
    pub fill: Rgba,
    pub stroke: Option<Rgba>,
    /// Suppresses dragging, resizing and selection-initiated edits.
    pub locked: bool,
    /// Transient scale factors, folded into width/height on transform end.
    pub scale_x: f64,
    pub scale_y: f64,
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with default geometry at (50, 50).
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            rotation: 0.0,
            opacity: 1.0,
            fill: Rgba::black(),
            stroke: None,
            locked: false,
            scale_x: 1.0,
            scale_y: 1.0,
            kind,
        }
    }

    /// Effective rendered width, accounting for any transient scale.
    pub fn effective_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Effective rendered height, accounting for any transient scale.
    pub fn effective_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// Clone with a fresh id (for duplicate/paste).
    pub fn cloned_with_new_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy
    }

    /// Fold transient scale into width/height, clamped to the minimum size.
    pub fn normalize_scale(&mut self) {
        self.width = (self.width * self.scale_x).max(MIN_DIMENSION);
        self.height = (self.height * self.scale_y).max(MIN_DIMENSION);
        self.scale_x = 1.0;
        self.scale_y = 1.0;
    }

    /// Mutable access to the text block, when this is a text element.
    pub fn text_mut(&mut self) -> Option<&mut TextBlock> {
        match &mut self.kind {
            ElementKind::Text(block) => Some(block),
            _ => None,
        }
    }

    /// The text block, when this is a text element.
    pub fn text(&self) -> Option<&TextBlock> {
        match &self.kind {
            ElementKind::Text(block) => Some(block),
            _ => None,
        }
    }

    /// Apply a patch, returning the merged element.
    pub fn merged(&self, patch: &ElementPatch) -> Self {
        let mut el = self.clone();
        if let Some(x) = patch.x {
            el.x = x;
        }
        if let Some(y) = patch.y {
            el.y = y;
        }
        if let Some(width) = patch.width {
            el.width = width;
        }
        if let Some(height) = patch.height {
            el.height = height;
        }
        if let Some(rotation) = patch.rotation {
            el.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity {
            el.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(fill) = patch.fill {
            el.fill = fill;
        }
        if let Some(stroke) = patch.stroke {
            el.stroke = stroke;
        }
        if let Some(locked) = patch.locked {
            el.locked = locked;
        }
        if let Some(scale_x) = patch.scale_x {
            el.scale_x = scale_x;
        }
        if let Some(scale_y) = patch.scale_y {
            el.scale_y = scale_y;
        }
        if let Some(src) = &patch.src {
            if let ElementKind::Image { src: dst } = &mut el.kind {
                *dst = src.clone();
            }
        }
        if let Some(text_patch) = &patch.text {
            if let Some(block) = el.text_mut() {
                text_patch.apply(block);
            }
        }
        el
    }
}

/// Partial update for an element; `None` fields leave the target untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub fill: Option<Rgba>,
    /// `Some(None)` clears the stroke.
    pub stroke: Option<Option<Rgba>>,
    pub locked: Option<bool>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub src: Option<String>,
    pub text: Option<TextPatch>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
}

/// Partial update for a text block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextPatch {
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_decoration: Option<String>,
    pub align: Option<TextAlign>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub transform: Option<TextTransform>,
    pub list_type: Option<ListType>,
    pub effect: Option<EffectKind>,
    pub effect_params: Option<EffectParams>,
    pub shape: Option<TextShape>,
    pub background: Option<TextBackground>,
}

impl TextPatch {
    fn apply(&self, block: &mut TextBlock) {
        let mut layout_changed = false;
        if let Some(content) = &self.content {
            block.content = content.clone();
            layout_changed = true;
        }
        if let Some(font_family) = &self.font_family {
            block.font_family = font_family.clone();
            layout_changed = true;
        }
        if let Some(font_size) = self.font_size {
            block.font_size = font_size;
            layout_changed = true;
        }
        if let Some(font_weight) = &self.font_weight {
            block.font_weight = font_weight.clone();
            layout_changed = true;
        }
        if let Some(font_style) = &self.font_style {
            block.font_style = font_style.clone();
        }
        if let Some(text_decoration) = &self.text_decoration {
            block.text_decoration = text_decoration.clone();
        }
        if let Some(align) = self.align {
            block.align = align;
        }
        if let Some(letter_spacing) = self.letter_spacing {
            block.letter_spacing = letter_spacing;
            layout_changed = true;
        }
        if let Some(line_height) = self.line_height {
            block.line_height = line_height;
            layout_changed = true;
        }
        if let Some(transform) = self.transform {
            block.transform = transform;
            layout_changed = true;
        }
        if let Some(list_type) = self.list_type {
            block.list_type = list_type;
        }
        if let Some(effect) = self.effect {
            block.effect = effect;
        }
        if let Some(effect_params) = self.effect_params {
            block.effect_params = effect_params;
        }
        if let Some(shape) = self.shape {
            block.shape = shape;
        }
        if let Some(background) = self.background {
            block.background = background;
        }
        if layout_changed {
            block.invalidate_measurement();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element_defaults() {
        let el = Element::new(ElementKind::Rect);
        assert!((el.x - 50.0).abs() < f64::EPSILON);
        assert!((el.width - 100.0).abs() < f64::EPSILON);
        assert!((el.opacity - 1.0).abs() < f64::EPSILON);
        assert!(!el.locked);
    }

    #[test]
    fn test_merge_position_patch() {
        let el = Element::new(ElementKind::Circle);
        let merged = el.merged(&ElementPatch::position(10.0, 20.0));
        assert!((merged.x - 10.0).abs() < f64::EPSILON);
        assert!((merged.y - 20.0).abs() < f64::EPSILON);
        // Untouched fields survive the merge.
        assert!((merged.width - el.width).abs() < f64::EPSILON);
        assert_eq!(merged.id, el.id);
    }

    #[test]
    fn test_merge_clears_stroke() {
        let mut el = Element::new(ElementKind::Rect);
        el.stroke = Some(Rgba::black());
        let patch = ElementPatch {
            stroke: Some(None),
            ..ElementPatch::default()
        };
        assert_eq!(el.merged(&patch).stroke, None);
    }

    #[test]
    fn test_text_patch_invalidates_measurement() {
        let mut el = Element::new(ElementKind::Text(TextBlock::new("Hello")));
        el.text().unwrap().set_measured(80.0, 20.0);
        let patch = ElementPatch {
            text: Some(TextPatch {
                content: Some("Hello world".to_string()),
                ..TextPatch::default()
            }),
            ..ElementPatch::default()
        };
        let merged = el.merged(&patch);
        assert_eq!(merged.text().unwrap().content, "Hello world");
        assert_eq!(merged.text().unwrap().measured(), None);
    }

    #[test]
    fn test_normalize_scale_clamps_minimum() {
        let mut el = Element::new(ElementKind::Rect);
        el.scale_x = 0.01;
        el.scale_y = 2.0;
        el.normalize_scale();
        assert!((el.width - MIN_DIMENSION).abs() < f64::EPSILON);
        assert!((el.height - 200.0).abs() < f64::EPSILON);
        assert!((el.scale_x - 1.0).abs() < f64::EPSILON);
        assert!((el.scale_y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_content_uppercase() {
        let mut block = TextBlock::new("Hire me");
        block.transform = TextTransform::Uppercase;
        assert_eq!(block.display_content(), "HIRE ME");
    }

    #[test]
    fn test_clone_preserves_measured_size() {
        let block = TextBlock::new("abc");
        block.set_measured(42.0, 18.0);
        let copy = block.clone();
        assert_eq!(copy.measured(), Some((42.0, 18.0)));
    }

    #[test]
    fn test_json_roundtrip() {
        let el = Element::new(ElementKind::Text(TextBlock::new("Hi")));
        let json = serde_json::to_string(&el).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }
}
