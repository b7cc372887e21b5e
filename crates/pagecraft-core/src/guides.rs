//! Alignment guides and snapping for element drags.
//!
//! While a single unlocked element is dragged, its edges and center are
//! compared against sibling elements on the same page and against the page
//! bounds. The first candidate within the threshold per axis wins; the
//! proposed position is adjusted so the matched anchors coincide exactly and
//! a guide line is reported for the renderer to draw.

use crate::document::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::element::{Element, ElementId};
use crate::geometry::element_size;

/// Snap threshold in page-space pixels.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// A guide line to draw, in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guide {
    /// Vertical line at `x`.
    Vertical(f64),
    /// Horizontal line at `y`.
    Horizontal(f64),
}

/// Result of a snap pass: the adjusted top-left position and the matched
/// guides (at most one per axis).
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub guides: Vec<Guide>,
}

/// Anchor positions of a box along one axis: start, center, end.
fn anchors(start: f64, extent: f64) -> [f64; 3] {
    [start, start + extent / 2.0, start + extent]
}

/// Compute the snapped position for `moving` (dragged to `proposed_x`,
/// `proposed_y`) against its `siblings` and the page bounds.
///
/// Candidate lines per axis are, in priority order, each sibling's start,
/// center and end, then the page's start, center and end. The first line
/// within `SNAP_THRESHOLD` of any of the moving element's three anchors
/// wins for that axis.
pub fn snap_position(
    moving: &Element,
    proposed_x: f64,
    proposed_y: f64,
    siblings: &[Element],
) -> SnapResult {
    let (w, h) = element_size(moving);

    let mut x_lines: Vec<f64> = Vec::new();
    let mut y_lines: Vec<f64> = Vec::new();
    for sib in siblings {
        if sib.id == moving.id {
            continue;
        }
        let (sw, sh) = element_size(sib);
        x_lines.extend(anchors(sib.x, sw));
        y_lines.extend(anchors(sib.y, sh));
    }
    x_lines.extend(anchors(0.0, PAGE_WIDTH));
    y_lines.extend(anchors(0.0, PAGE_HEIGHT));

    let mut result = SnapResult {
        x: proposed_x,
        y: proposed_y,
        guides: Vec::new(),
    };

    if let Some((snapped, line)) = snap_axis(proposed_x, w, &x_lines) {
        result.x = snapped;
        result.guides.push(Guide::Vertical(line));
    }
    if let Some((snapped, line)) = snap_axis(proposed_y, h, &y_lines) {
        result.y = snapped;
        result.guides.push(Guide::Horizontal(line));
    }
    result
}

/// First candidate line within threshold of the box's start, center or end.
/// Returns the adjusted start coordinate and the matched line.
fn snap_axis(start: f64, extent: f64, lines: &[f64]) -> Option<(f64, f64)> {
    for &line in lines {
        for (i, anchor) in anchors(start, extent).into_iter().enumerate() {
            if (anchor - line).abs() <= SNAP_THRESHOLD {
                let offset = match i {
                    0 => 0.0,
                    1 => extent / 2.0,
                    _ => extent,
                };
                return Some((line - offset, line));
            }
        }
    }
    None
}

/// Whether a drag of `ids` is eligible for snapping: exactly one element,
/// and that element unlocked. Multi-element drags move freely.
pub fn snap_eligible(ids: &[ElementId], elements: &[Element]) -> bool {
    match ids {
        [id] => elements
            .iter()
            .find(|el| el.id == *id)
            .is_some_and(|el| !el.locked),
        _ => false,
    }
}
