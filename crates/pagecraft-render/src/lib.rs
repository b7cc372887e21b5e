//! PageCraft Render Library
//!
//! Viewport transform, backend-agnostic scene building, DOM overlay styling
//! and PNG export for PageCraft documents.

pub mod export;
pub mod overlay;
pub mod scene;
pub mod viewport;

pub use export::{ExportError, PageRaster, export_document, export_page_data_url, render_page};
pub use overlay::{OverlayBackground, OverlayStyle, overlay_style};
pub use scene::{DrawCmd, SceneParams, build_scene, shape_path, HANDLE_SIZE};
pub use viewport::{
    Viewport, MAX_SCALE, MAX_SLIDER_SCALE, MIN_SCALE, MIN_SLIDER_SCALE, ZOOM_STEP,
};
