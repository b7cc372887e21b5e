//! Stage and page coordinate mapping, element bounds, hit testing.
//!
//! The stage is an infinite vertical strip: page `i` occupies the band
//! starting at `i * (PAGE_HEIGHT + PAGE_GAP)`. Elements store page-local
//! coordinates, so pointer positions arriving in stage space are converted
//! through the owning page's offset.

use crate::document::{Document, PAGE_GAP, PAGE_HEIGHT, PAGE_WIDTH};
use crate::element::{Element, ElementId, ElementKind, TextShape};
use kurbo::{Affine, Point, QuadBez, Rect, Size};

/// Vertical stage offset of the page at `index`.
pub fn page_offset_y(index: usize) -> f64 {
    index as f64 * (PAGE_HEIGHT + PAGE_GAP)
}

/// Convert a stage-space point to page-local coordinates for page `index`.
pub fn stage_to_page(point: Point, index: usize) -> Point {
    Point::new(point.x, point.y - page_offset_y(index))
}

/// Convert a page-local point on page `index` to stage space.
pub fn page_to_stage(point: Point, index: usize) -> Point {
    Point::new(point.x, point.y + page_offset_y(index))
}

/// The page index whose band (page plus trailing gap) contains a stage-space
/// y coordinate, clamped to the last page.
pub fn page_index_at(y: f64, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }
    let band = PAGE_HEIGHT + PAGE_GAP;
    let index = (y / band).floor().max(0.0) as usize;
    index.min(page_count - 1)
}

/// Stage-space rectangle of the page at `index`.
pub fn page_rect(index: usize) -> Rect {
    let y = page_offset_y(index);
    Rect::new(0.0, y, PAGE_WIDTH, y + PAGE_HEIGHT)
}

/// Axis-aligned page-local bounds of an element, ignoring rotation.
/// Uses effective (scaled) size so bounds track a live transform.
pub fn element_rect(el: &Element) -> Rect {
    let (w, h) = element_size(el);
    Rect::from_origin_size(Point::new(el.x, el.y), Size::new(w, h))
}

/// Rendered size of an element. Text elements prefer their measured layout
/// size, falling back to the stored box.
pub fn element_size(el: &Element) -> (f64, f64) {
    if let ElementKind::Text(block) = &el.kind {
        if let Some((w, h)) = block.measured() {
            return (w * el.scale_x, h * el.scale_y);
        }
        let (w, h) = block.approximate_size();
        return (w * el.scale_x, h * el.scale_y);
    }
    (el.effective_width(), el.effective_height())
}

/// Baseline for curved text layout, in text-local coordinates. The quadratic
/// spans the text width with its control point `factor * 1.5` below the
/// endpoints; positive factors bow the line downward. Both render targets
/// place glyphs along the same curve.
pub fn curve_baseline(shape: TextShape, width: f64) -> Option<QuadBez> {
    match shape {
        TextShape::Plain => None,
        TextShape::Curve { factor } => Some(QuadBez::new(
            Point::new(0.0, 0.0),
            Point::new(width / 2.0, factor * 1.5),
            Point::new(width, 0.0),
        )),
    }
}

/// Test a page-local point against an element, honoring rotation.
///
/// Rotation is about the element's top-left corner; the point is mapped into
/// the element's unrotated frame and tested against the plain bounds.
pub fn hit_test(el: &Element, point: Point) -> bool {
    let rect = element_rect(el);
    if el.rotation == 0.0 {
        return rect.contains(point);
    }
    let origin = Point::new(el.x, el.y);
    let inverse = Affine::translate(origin.to_vec2())
        * Affine::rotate(-el.rotation.to_radians())
        * Affine::translate(-origin.to_vec2());
    rect.contains(inverse * point)
}

/// Topmost element of a page hit by a page-local point. Later elements in
/// the sequence render on top, so the scan runs back to front. Hidden-page
/// filtering is the caller's concern.
pub fn top_hit(elements: &[Element], point: Point) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|el| hit_test(el, point))
        .map(|el| el.id)
}

/// Combined page-local bounds of a set of elements (for the multi-select
/// frame). Rotation is ignored, matching the selection rectangle.
pub fn combined_bounds(elements: &[&Element]) -> Option<Rect> {
    let mut iter = elements.iter();
    let first = element_rect(iter.next()?);
    Some(iter.fold(first, |acc, el| acc.union(element_rect(el))))
}

/// Total stage height of a document's page stack.
pub fn stage_height(doc: &Document) -> f64 {
    let n = doc.pages.len();
    if n == 0 {
        return 0.0;
    }
    n as f64 * PAGE_HEIGHT + (n - 1) as f64 * PAGE_GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert!((page_offset_y(0) - 0.0).abs() < f64::EPSILON);
        assert!((page_offset_y(1) - 902.0).abs() < f64::EPSILON);
        assert!((page_offset_y(2) - 1804.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stage_page_inverse() {
        let p = Point::new(120.0, 300.0);
        let down = stage_to_page(page_to_stage(p, 3), 3);
        assert!((down.x - p.x).abs() < f64::EPSILON);
        assert!((down.y - p.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_page_index_at_band() {
        assert_eq!(page_index_at(0.0, 3), 0);
        assert_eq!(page_index_at(841.0, 3), 0);
        // The gap below a page still belongs to that page's band.
        assert_eq!(page_index_at(880.0, 3), 0);
        assert_eq!(page_index_at(902.0, 3), 1);
        assert_eq!(page_index_at(10_000.0, 3), 2);
        assert_eq!(page_index_at(-5.0, 3), 0);
    }

    #[test]
    fn test_hit_test_unrotated() {
        let el = Element::new(ElementKind::Rect);
        assert!(hit_test(&el, Point::new(60.0, 60.0)));
        assert!(!hit_test(&el, Point::new(10.0, 10.0)));
        assert!(!hit_test(&el, Point::new(151.0, 60.0)));
    }

    #[test]
    fn test_hit_test_rotated_90() {
        let mut el = Element::new(ElementKind::Rect);
        el.width = 100.0;
        el.height = 10.0;
        el.rotation = 90.0;
        // Rotated a quarter turn about (50, 50), the bar now extends down
        // from the origin instead of to the right.
        assert!(hit_test(&el, Point::new(45.0, 100.0)));
        assert!(!hit_test(&el, Point::new(100.0, 52.0)));
    }

    #[test]
    fn test_curve_baseline_control_height() {
        assert_eq!(curve_baseline(TextShape::Plain, 200.0), None);
        let q = curve_baseline(TextShape::Curve { factor: 10.0 }, 200.0).unwrap();
        assert!((q.p0.x - 0.0).abs() < f64::EPSILON);
        assert!((q.p2.x - 200.0).abs() < f64::EPSILON);
        assert!((q.p1.x - 100.0).abs() < f64::EPSILON);
        assert!((q.p1.y - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_hit_prefers_later_element() {
        let a = Element::new(ElementKind::Rect);
        let b = Element::new(ElementKind::Circle);
        let elements = vec![a.clone(), b.clone()];
        assert_eq!(top_hit(&elements, Point::new(60.0, 60.0)), Some(b.id));
    }

    #[test]
    fn test_combined_bounds_union() {
        let a = Element::new(ElementKind::Rect);
        let mut b = Element::new(ElementKind::Rect);
        b.x = 200.0;
        b.y = 300.0;
        let bounds = combined_bounds(&[&a, &b]).unwrap();
        assert!((bounds.x0 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 300.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stage_height() {
        let doc = Document::new();
        assert!((stage_height(&doc) - 842.0).abs() < f64::EPSILON);
        let doc = doc.add_page(None);
        assert!((stage_height(&doc) - (842.0 * 2.0 + 60.0)).abs() < f64::EPSILON);
    }
}
