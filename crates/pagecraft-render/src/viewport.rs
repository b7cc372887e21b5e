//! Viewport pan/zoom transform between stage and container coordinates.

use kurbo::{Affine, Point, Size, Vec2};
use pagecraft_core::document::{PAGE_HEIGHT, PAGE_WIDTH};

/// Zoom bounds for wheel/pinch gestures.
pub const MIN_SCALE: f64 = 0.05;
pub const MAX_SCALE: f64 = 5.0;

/// Narrower bounds exposed by the footer zoom slider.
pub const MIN_SLIDER_SCALE: f64 = 0.1;
pub const MAX_SLIDER_SCALE: f64 = 3.0;

/// Largest scale `fit_to_page` will pick, so small containers don't blow a
/// page up past readable size.
pub const MAX_FIT_SCALE: f64 = 1.5;

/// Top margin above the first page after a fit.
pub const FIT_TOP_MARGIN: f64 = 50.0;

/// Multiplicative step for zoom in/out commands.
pub const ZOOM_STEP: f64 = 1.1;

/// The view transform from stage coordinates to container pixels.
///
/// `position` is where the stage origin lands in the container; `scale` is
/// uniform. All pointer input is mapped through `to_stage` before hit tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub position: Vec2,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage-to-container transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position) * Affine::scale(self.scale)
    }

    /// Convert a container point to stage coordinates.
    pub fn to_stage(&self, container: Point) -> Point {
        Point::new(
            (container.x - self.position.x) / self.scale,
            (container.y - self.position.y) / self.scale,
        )
    }

    /// Convert a stage point to container coordinates.
    pub fn to_container(&self, stage: Point) -> Point {
        Point::new(
            stage.x * self.scale + self.position.x,
            stage.y * self.scale + self.position.y,
        )
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Set the scale directly, clamped to the gesture range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Set the scale from the footer slider, which exposes a narrower range.
    pub fn set_slider_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SLIDER_SCALE, MAX_SLIDER_SCALE);
    }

    /// Zoom by `factor`, keeping the stage point under `pointer` fixed in
    /// the container.
    pub fn zoom_at(&mut self, pointer: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        let ratio = new_scale / self.scale;
        self.position = Vec2::new(
            pointer.x - (pointer.x - self.position.x) * ratio,
            pointer.y - (pointer.y - self.position.y) * ratio,
        );
        self.scale = new_scale;
    }

    pub fn zoom_in(&mut self, pointer: Point) {
        self.zoom_at(pointer, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, pointer: Point) {
        self.zoom_at(pointer, 1.0 / ZOOM_STEP);
    }

    /// Fit one page into the container: scale to the limiting dimension
    /// (capped), center horizontally, fixed top margin.
    pub fn fit_to_page(&mut self, container: Size) {
        let scale = (container.width / PAGE_WIDTH)
            .min(container.height / PAGE_HEIGHT)
            .min(MAX_FIT_SCALE)
            .clamp(MIN_SCALE, MAX_SCALE);
        self.scale = scale;
        self.position = Vec2::new(
            container.width / 2.0 - PAGE_WIDTH * scale / 2.0,
            FIT_TOP_MARGIN,
        );
    }
}
