//! Backend-agnostic scene building.
//!
//! Walks the document and emits an ordered list of draw commands in
//! container coordinates. A backend (GPU canvas, CPU rasterizer) replays
//! the list; text commands carry typography and the resolved vector effect
//! so the backend's text engine can honor them.

use kurbo::{Affine, BezPath, Circle, Line, Point, QuadBez, Rect, RoundedRect, Shape as KurboShape, Vec2};
use pagecraft_core::document::{Document, PAGE_HEIGHT, PAGE_WIDTH};
use pagecraft_core::effects::{self, VectorEffect};
use pagecraft_core::element::{Element, ElementKind, TextBlock};
use pagecraft_core::geometry::{curve_baseline, element_size, page_offset_y};
use pagecraft_core::guides::Guide;
use pagecraft_core::interaction::Editor;
use peniko::Color;

use crate::viewport::Viewport;

/// Stroke width of selection frames and guide lines, in container pixels.
const FRAME_STROKE: f64 = 1.5;

/// Side length of the square resize handles, in container pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// One draw command, in container coordinates unless a transform says
/// otherwise.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    /// White page sheet with a drop shadow.
    Page { rect: Rect },
    /// Filled and/or stroked vector path.
    Path {
        path: BezPath,
        transform: Affine,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
        opacity: f64,
    },
    /// Text run for the backend's text engine.
    Text {
        content: String,
        block: TextBlock,
        effect: VectorEffect,
        /// Curved-layout baseline in text-local units, when the shape asks
        /// for one. Glyphs follow the quadratic instead of a straight line.
        baseline: Option<QuadBez>,
        transform: Affine,
        opacity: f64,
        fill: Color,
    },
    /// Image by source URL, fitted to the unit rect under `transform`.
    Image {
        src: String,
        rect: Rect,
        transform: Affine,
        opacity: f64,
    },
    /// Alignment guide line.
    GuideLine { line: Line, color: Color },
    /// Selection or hover frame.
    Frame {
        rect: Rect,
        transform: Affine,
        color: Color,
        width: f64,
    },
    /// Square resize handle centered at a point.
    HandleDot { center: Point },
}

/// Inputs for one frame.
pub struct SceneParams<'a> {
    pub editor: &'a Editor,
    pub viewport: &'a Viewport,
    pub selection_color: Color,
    pub guide_color: Color,
}

impl<'a> SceneParams<'a> {
    pub fn new(editor: &'a Editor, viewport: &'a Viewport) -> Self {
        Self {
            editor,
            viewport,
            selection_color: Color::from_rgba8(0x4f, 0x8f, 0xff, 0xff),
            guide_color: Color::from_rgba8(0xff, 0x3d, 0x7f, 0xff),
        }
    }
}

/// Unit geometry for a shape element, in a `w` x `h` local box.
pub fn shape_path(kind: &ElementKind, w: f64, h: f64) -> BezPath {
    match kind {
        ElementKind::Rect | ElementKind::Text(_) | ElementKind::Image { .. } => {
            Rect::new(0.0, 0.0, w, h).to_path(0.1)
        }
        ElementKind::Circle => {
            // Ellipse via scaled circle so non-square boxes work.
            let circle = Circle::new(Point::new(0.5, 0.5), 0.5);
            Affine::scale_non_uniform(w, h) * circle.to_path(0.001)
        }
        ElementKind::Star => star_path(w, h, 5),
        ElementKind::Triangle => {
            let mut path = BezPath::new();
            path.move_to((w / 2.0, 0.0));
            path.line_to((w, h));
            path.line_to((0.0, h));
            path.close_path();
            path
        }
        ElementKind::Line => {
            let mut path = BezPath::new();
            path.move_to((0.0, h / 2.0));
            path.line_to((w, h / 2.0));
            path
        }
        ElementKind::Arrow => arrow_path(w, h),
        ElementKind::Polygon => regular_polygon_path(w, h, 6),
    }
}

fn star_path(w: f64, h: f64, points: usize) -> BezPath {
    let cx = w / 2.0;
    let cy = h / 2.0;
    let outer = 0.5;
    let inner = 0.2;
    let mut path = BezPath::new();
    for i in 0..(points * 2) {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = std::f64::consts::PI * (i as f64) / points as f64 - std::f64::consts::FRAC_PI_2;
        let x = cx + angle.cos() * radius * w;
        let y = cy + angle.sin() * radius * h;
        if i == 0 {
            path.move_to((x, y));
        } else {
            path.line_to((x, y));
        }
    }
    path.close_path();
    path
}

fn regular_polygon_path(w: f64, h: f64, sides: usize) -> BezPath {
    let cx = w / 2.0;
    let cy = h / 2.0;
    let mut path = BezPath::new();
    for i in 0..sides {
        let angle =
            std::f64::consts::TAU * (i as f64) / sides as f64 - std::f64::consts::FRAC_PI_2;
        let x = cx + angle.cos() * 0.5 * w;
        let y = cy + angle.sin() * 0.5 * h;
        if i == 0 {
            path.move_to((x, y));
        } else {
            path.line_to((x, y));
        }
    }
    path.close_path();
    path
}

fn arrow_path(w: f64, h: f64) -> BezPath {
    let shaft = h * 0.3;
    let head = w * 0.35;
    let mut path = BezPath::new();
    path.move_to((0.0, h / 2.0 - shaft / 2.0));
    path.line_to((w - head, h / 2.0 - shaft / 2.0));
    path.line_to((w - head, 0.0));
    path.line_to((w, h / 2.0));
    path.line_to((w - head, h));
    path.line_to((w - head, h / 2.0 + shaft / 2.0));
    path.line_to((0.0, h / 2.0 + shaft / 2.0));
    path.close_path();
    path
}

/// Local-to-container transform for an element, honoring drag and transform
/// previews. Rotation is about the element's top-left corner.
fn element_transform(el: &Element, editor: &Editor, viewport: &Viewport, page_y: f64) -> Affine {
    let (x, y) = editor.preview_position(el.id).unwrap_or((el.x, el.y));
    let (sx, sy, rotation) = editor
        .preview_transform(el.id)
        .map(|(sx, sy, r)| (el.scale_x * sx, el.scale_y * sy, r))
        .unwrap_or((el.scale_x, el.scale_y, el.rotation));
    viewport.transform()
        * Affine::translate(Vec2::new(x, y + page_y))
        * Affine::rotate(rotation.to_radians())
        * Affine::scale_non_uniform(sx, sy)
}

/// Build the frame's draw list: pages back to front, elements in stacking
/// order, then selection chrome and guides on top. Hidden pages and the
/// element under text edit are skipped.
pub fn build_scene(doc: &Document, params: &SceneParams<'_>) -> Vec<DrawCmd> {
    let mut cmds = Vec::new();
    let editing = params.editor.editing();

    for (index, page) in doc.pages.iter().enumerate() {
        if page.hidden {
            continue;
        }
        let page_y = page_offset_y(index);
        let origin = params.viewport.to_container(Point::new(0.0, page_y));
        let extent = params
            .viewport
            .to_container(Point::new(PAGE_WIDTH, page_y + PAGE_HEIGHT));
        cmds.push(DrawCmd::Page {
            rect: Rect::new(origin.x, origin.y, extent.x, extent.y),
        });

        for el in &page.elements {
            if Some(el.id) == editing {
                continue;
            }
            let transform = element_transform(el, params.editor, params.viewport, page_y);
            push_element(el, transform, &mut cmds);
        }
    }

    push_selection_chrome(doc, params, &mut cmds);
    push_guides(doc, params, &mut cmds);
    cmds
}

fn push_element(el: &Element, transform: Affine, cmds: &mut Vec<DrawCmd>) {
    let cmd = match &el.kind {
        ElementKind::Text(block) => {
            let (w, h) = block.measured().unwrap_or_else(|| block.approximate_size());
            if block.background.enabled {
                let spread = block.background.spread;
                let rect = Rect::new(-spread, -spread, w + spread, h + spread);
                let path = RoundedRect::from_rect(rect, block.background.roundness).to_path(0.1);
                let alpha = (1.0 - block.background.transparency).clamp(0.0, 1.0);
                cmds.push(DrawCmd::Path {
                    path,
                    transform,
                    fill: Some(block.background.color.with_alpha(alpha).into()),
                    stroke: None,
                    opacity: el.opacity,
                });
            }
            let effect = effects::resolve_vector(block.effect, &block.effect_params, el.fill);
            DrawCmd::Text {
                content: block.display_content(),
                block: block.clone(),
                effect,
                baseline: curve_baseline(block.shape, w),
                transform,
                opacity: el.opacity,
                fill: el.fill.into(),
            }
        }
        ElementKind::Image { src } => DrawCmd::Image {
            src: src.clone(),
            rect: Rect::new(0.0, 0.0, el.width, el.height),
            transform,
            opacity: el.opacity,
        },
        kind => {
            let path = shape_path(kind, el.width, el.height);
            // Lines are stroke-only; the fill color stands in when no
            // explicit stroke is set.
            let fill = match kind {
                ElementKind::Line => None,
                _ => Some(el.fill.into()),
            };
            let stroke = match kind {
                ElementKind::Line => {
                    Some((el.stroke.unwrap_or(el.fill).into(), 2.0))
                }
                _ => el.stroke.map(|c| (c.into(), 2.0)),
            };
            DrawCmd::Path {
                path,
                transform,
                fill,
                stroke,
                opacity: el.opacity,
            }
        }
    };
    cmds.push(cmd);
}

fn push_selection_chrome(doc: &Document, params: &SceneParams<'_>, cmds: &mut Vec<DrawCmd>) {
    let editor = params.editor;
    for id in editor.selection() {
        let Some(el) = doc.element(*id) else { continue };
        let Some(page) = doc.page_of(*id) else { continue };
        let Some(index) = doc.page_index(page.id) else { continue };
        if page.hidden || Some(*id) == editor.editing() {
            continue;
        }
        let transform = element_transform(el, editor, params.viewport, page_offset_y(index));
        let (w, h) = element_size(el);
        // The frame rect is in local units; the transform carries the scale,
        // so divide the preview scale back out of the measured size.
        let rect = Rect::new(0.0, 0.0, w / el.scale_x.max(1e-9), h / el.scale_y.max(1e-9));
        cmds.push(DrawCmd::Frame {
            rect,
            transform,
            color: params.selection_color,
            width: FRAME_STROKE,
        });
        if editor.selection().len() == 1 && !el.locked {
            for corner in [
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ] {
                cmds.push(DrawCmd::HandleDot {
                    center: transform * corner,
                });
            }
        }
    }
}

fn push_guides(doc: &Document, params: &SceneParams<'_>, cmds: &mut Vec<DrawCmd>) {
    let guides = params.editor.active_guides();
    if guides.is_empty() {
        return;
    }
    // Guides belong to the page the drag started on.
    let Some(id) = params.editor.selection().first() else {
        return;
    };
    let Some(index) = doc.page_of(*id).and_then(|p| doc.page_index(p.id)) else {
        return;
    };
    let page_y = page_offset_y(index);
    for guide in guides {
        let line = match guide {
            Guide::Vertical(x) => Line::new(
                params.viewport.to_container(Point::new(*x, page_y)),
                params
                    .viewport
                    .to_container(Point::new(*x, page_y + PAGE_HEIGHT)),
            ),
            Guide::Horizontal(y) => Line::new(
                params.viewport.to_container(Point::new(0.0, page_y + y)),
                params
                    .viewport
                    .to_container(Point::new(PAGE_WIDTH, page_y + y)),
            ),
        };
        cmds.push(DrawCmd::GuideLine {
            line,
            color: params.guide_color,
        });
    }
}
