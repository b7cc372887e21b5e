//! Editor session state: selection, pointer gestures, clipboard, undo wiring.
//!
//! The editor owns the live document and its history. Pointer gestures keep
//! transient state (preview positions, transform scales) out of the document
//! until the gesture ends; a gesture commits exactly one history entry, and
//! only if the document actually changed.

use std::collections::HashMap;

use kurbo::Point;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::document::{Document, DUPLICATE_OFFSET, PageId};
use crate::element::{Element, ElementId, ElementKind, ElementPatch, MIN_DIMENSION};
use crate::geometry::{self, page_index_at, stage_to_page};
use crate::guides::{self, Guide, SnapResult};
use crate::history::History;
use crate::shortcuts::EditorAction;

/// Resize/rotate handles around the selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Rotate,
}

impl Handle {
    fn scales_x(self) -> bool {
        !matches!(self, Handle::North | Handle::South | Handle::Rotate)
    }

    fn scales_y(self) -> bool {
        !matches!(self, Handle::East | Handle::West | Handle::Rotate)
    }

    /// Whether dragging this handle towards negative x grows the element.
    fn inverts_x(self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    fn inverts_y(self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }
}

/// In-flight drag gesture.
#[derive(Debug, Clone)]
struct DragState {
    page_index: usize,
    start: Point,
    origins: HashMap<ElementId, (f64, f64)>,
    preview: HashMap<ElementId, (f64, f64)>,
    guides: Vec<Guide>,
    moved: bool,
}

/// In-flight resize or rotate gesture on a single element.
#[derive(Debug, Clone)]
struct TransformState {
    id: ElementId,
    handle: Handle,
    start: Point,
    original: Element,
    scale_x: f64,
    scale_y: f64,
    rotation: f64,
}

/// What the editor is currently doing.
#[derive(Debug, Clone)]
enum Mode {
    Idle,
    Dragging(DragState),
    Transforming(TransformState),
    Editing(ElementId),
    Panning,
}

/// Clipboard payload: a JSON-serialized element list.
#[derive(Debug, Serialize, Deserialize)]
struct ClipboardPayload {
    elements: Vec<Element>,
}

/// The interactive editing session over a document.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    history: History,
    selection: Vec<ElementId>,
    mode: Mode,
    hover: Option<ElementId>,
    clipboard: Option<String>,
    dirty: bool,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self {
            history: History::new(document.clone()),
            document,
            selection: Vec::new(),
            mode: Mode::Idle,
            hover: None,
            clipboard: None,
            dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn hover(&self) -> Option<ElementId> {
        self.hover
    }

    /// The element being text-edited, if any. Its canvas rendering is
    /// suppressed while the overlay shows it.
    pub fn editing(&self) -> Option<ElementId> {
        match self.mode {
            Mode::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.mode, Mode::Panning)
    }

    /// Guide lines from the active drag, for the renderer.
    pub fn active_guides(&self) -> &[Guide] {
        match &self.mode {
            Mode::Dragging(drag) => &drag.guides,
            _ => &[],
        }
    }

    /// Live position override for an element mid-drag.
    pub fn preview_position(&self, id: ElementId) -> Option<(f64, f64)> {
        match &self.mode {
            Mode::Dragging(drag) => drag.preview.get(&id).copied(),
            _ => None,
        }
    }

    /// Live scale/rotation override for an element mid-transform.
    pub fn preview_transform(&self, id: ElementId) -> Option<(f64, f64, f64)> {
        match &self.mode {
            Mode::Transforming(t) if t.id == id => Some((t.scale_x, t.scale_y, t.rotation)),
            _ => None,
        }
    }

    /// Whether unsaved changes exist; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the document wholesale (load, version restore). Resets
    /// history and selection.
    pub fn load(&mut self, document: Document) {
        self.history.reset(document.clone());
        self.document = document;
        self.selection.clear();
        self.mode = Mode::Idle;
        self.hover = None;
    }

    /// Commit a new document state: one history entry, only on real change.
    fn commit(&mut self, next: Document) {
        if next == self.document {
            return;
        }
        self.history.push(next.clone());
        self.document = next;
        self.dirty = true;
        self.revalidate_selection();
    }

    /// Drop selected ids that no longer resolve to elements.
    fn revalidate_selection(&mut self) {
        let ids = self.document.element_ids();
        self.selection.retain(|id| ids.contains(id));
        if let Mode::Editing(id) = self.mode {
            if !ids.contains(&id) {
                self.mode = Mode::Idle;
            }
        }
    }

    // ---- selection ----

    /// Click-select at a stage point. Shift toggles membership; clicking
    /// empty space clears the selection.
    pub fn select_at(&mut self, stage: Point, shift: bool) -> Option<ElementId> {
        let page_count = self.document.pages.len();
        let index = page_index_at(stage.y, page_count);
        let hit = self
            .document
            .pages
            .get(index)
            .filter(|p| !p.hidden)
            .and_then(|page| geometry::top_hit(&page.elements, stage_to_page(stage, index)));
        match hit {
            Some(id) if shift => {
                if let Some(pos) = self.selection.iter().position(|s| *s == id) {
                    self.selection.remove(pos);
                } else {
                    self.selection.push(id);
                }
            }
            Some(id) => {
                if self.selection == [id] {
                    // Second click on the lone selected text element opens
                    // the in-place editor.
                    self.start_editing();
                } else {
                    self.selection = vec![id];
                }
            }
            None if !shift => self.selection.clear(),
            None => {}
        }
        hit
    }

    pub fn select(&mut self, ids: Vec<ElementId>) {
        self.selection = ids;
        self.revalidate_selection();
    }

    pub fn set_hover(&mut self, stage: Option<Point>) {
        self.hover = stage.and_then(|point| {
            let index = page_index_at(point.y, self.document.pages.len());
            self.document
                .pages
                .get(index)
                .filter(|p| !p.hidden)
                .and_then(|page| geometry::top_hit(&page.elements, stage_to_page(point, index)))
        });
    }

    // ---- drag gesture ----

    /// Begin dragging the current selection from a stage point. Locked
    /// elements stay put, so a selection of only locked elements won't drag.
    pub fn begin_drag(&mut self, stage: Point) {
        let index = page_index_at(stage.y, self.document.pages.len());
        let origins: HashMap<ElementId, (f64, f64)> = self
            .selection
            .iter()
            .filter_map(|id| self.document.element(*id))
            .filter(|el| !el.locked)
            .map(|el| (el.id, (el.x, el.y)))
            .collect();
        if origins.is_empty() {
            return;
        }
        self.mode = Mode::Dragging(DragState {
            page_index: index,
            start: stage,
            preview: origins.clone(),
            origins,
            guides: Vec::new(),
            moved: false,
        });
    }

    /// Update the drag preview from the current pointer position. Snapping
    /// applies only to single-element drags.
    pub fn update_drag(&mut self, stage: Point) {
        let Mode::Dragging(drag) = &mut self.mode else {
            return;
        };
        let dx = stage.x - drag.start.x;
        let dy = stage.y - drag.start.y;
        drag.moved = drag.moved || dx != 0.0 || dy != 0.0;
        drag.guides.clear();
        for (id, (ox, oy)) in &drag.origins {
            drag.preview.insert(*id, (ox + dx, oy + dy));
        }

        let ids: Vec<ElementId> = drag.origins.keys().copied().collect();
        let Some(page) = self.document.pages.get(drag.page_index) else {
            return;
        };
        if guides::snap_eligible(&ids, &page.elements) {
            let id = ids[0];
            if let Some(el) = page.elements.iter().find(|el| el.id == id) {
                let (px, py) = drag.preview[&id];
                let SnapResult { x, y, guides } = guides::snap_position(el, px, py, &page.elements);
                drag.preview.insert(id, (x, y));
                drag.guides = guides;
            }
        }
    }

    /// Finish the drag, committing final positions as one history entry.
    /// A drag that never moved commits nothing.
    pub fn end_drag(&mut self) {
        let Mode::Dragging(drag) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return;
        };
        if !drag.moved {
            return;
        }
        let mut doc = self.document.clone();
        for (id, (x, y)) in &drag.preview {
            doc = doc.update_elements(&[*id], &ElementPatch::position(*x, *y));
        }
        self.commit(doc);
    }

    // ---- transform gesture ----

    /// Begin a resize/rotate gesture on the single selected element.
    pub fn begin_transform(&mut self, handle: Handle, stage: Point) {
        let &[id] = self.selection.as_slice() else {
            return;
        };
        let Some(el) = self.document.element(id) else {
            return;
        };
        if el.locked {
            return;
        }
        self.mode = Mode::Transforming(TransformState {
            id,
            handle,
            start: stage,
            original: el.clone(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: el.rotation,
        });
    }

    /// Update the transform preview from the current pointer position, in
    /// page-local coordinates of the element's page.
    pub fn update_transform(&mut self, page_point: Point) {
        let Mode::Transforming(t) = &mut self.mode else {
            return;
        };
        let Some(index) = self
            .document
            .page_of(t.id)
            .and_then(|p| self.document.page_index(p.id))
        else {
            return;
        };
        let start = stage_to_page(t.start, index);
        if t.handle == Handle::Rotate {
            let cx = t.original.x + t.original.effective_width() / 2.0;
            let cy = t.original.y + t.original.effective_height() / 2.0;
            let base = (start.y - cy).atan2(start.x - cx);
            let now = (page_point.y - cy).atan2(page_point.x - cx);
            t.rotation = t.original.rotation + (now - base).to_degrees();
            return;
        }
        let dx = page_point.x - start.x;
        let dy = page_point.y - start.y;
        if t.handle.scales_x() {
            let delta = if t.handle.inverts_x() { -dx } else { dx };
            t.scale_x = ((t.original.width + delta) / t.original.width).max(0.0);
        }
        if t.handle.scales_y() {
            let delta = if t.handle.inverts_y() { -dy } else { dy };
            t.scale_y = ((t.original.height + delta) / t.original.height).max(0.0);
        }
    }

    /// Finish the transform: fold scale into width/height (clamped to the
    /// minimum dimension) and commit once.
    pub fn end_transform(&mut self) {
        let Mode::Transforming(t) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return;
        };
        let width = (t.original.width * t.scale_x).max(MIN_DIMENSION);
        let height = (t.original.height * t.scale_y).max(MIN_DIMENSION);
        let patch = ElementPatch {
            width: Some(width),
            height: Some(height),
            rotation: Some(t.rotation),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            ..ElementPatch::default()
        };
        let doc = self.document.update_elements(&[t.id], &patch);
        self.commit(doc);
    }

    // ---- text editing ----

    /// Enter text edit mode on the single selected text element.
    pub fn start_editing(&mut self) {
        let &[id] = self.selection.as_slice() else {
            return;
        };
        let Some(el) = self.document.element(id) else {
            return;
        };
        if el.locked || el.text().is_none() {
            return;
        }
        self.mode = Mode::Editing(id);
    }

    /// Leave text edit mode, committing the final content once.
    pub fn finish_editing(&mut self, content: Option<String>) {
        let Mode::Editing(id) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return;
        };
        if let Some(content) = content {
            let patch = ElementPatch {
                text: Some(crate::element::TextPatch {
                    content: Some(content),
                    ..Default::default()
                }),
                ..ElementPatch::default()
            };
            let doc = self.document.update_elements(&[id], &patch);
            self.commit(doc);
        }
    }

    pub fn start_panning(&mut self) {
        if matches!(self.mode, Mode::Idle) {
            self.mode = Mode::Panning;
        }
    }

    pub fn stop_panning(&mut self) {
        if matches!(self.mode, Mode::Panning) {
            self.mode = Mode::Idle;
        }
    }

    // ---- clipboard ----

    /// Copy the selection into the internal clipboard as JSON.
    pub fn copy(&mut self) {
        let elements: Vec<Element> = self
            .selection
            .iter()
            .filter_map(|id| self.document.element(*id).cloned())
            .collect();
        if elements.is_empty() {
            return;
        }
        match serde_json::to_string(&ClipboardPayload { elements }) {
            Ok(json) => self.clipboard = Some(json),
            Err(err) => warn!("clipboard serialize failed: {err}"),
        }
    }

    pub fn cut(&mut self) {
        self.copy();
        self.delete_selection();
    }

    /// Paste clipboard elements onto the page that owned the first source
    /// element (or the last page), offset and re-selected. Malformed
    /// clipboard content is ignored with a warning.
    pub fn paste(&mut self) {
        let Some(json) = &self.clipboard else {
            return;
        };
        let payload: ClipboardPayload = match serde_json::from_str(json) {
            Ok(p) => p,
            Err(err) => {
                warn!("discarding unreadable clipboard content: {err}");
                return;
            }
        };
        let mut doc = self.document.clone();
        let target: Option<PageId> = payload
            .elements
            .first()
            .and_then(|el| doc.page_of(el.id))
            .map(|p| p.id);
        let index = target
            .and_then(|pid| doc.page_index(pid))
            .unwrap_or(doc.pages.len().saturating_sub(1));
        let mut new_ids = Vec::new();
        for el in &payload.elements {
            let mut copy = el.cloned_with_new_id();
            copy.x += DUPLICATE_OFFSET;
            copy.y += DUPLICATE_OFFSET;
            new_ids.push(copy.id);
            doc.pages[index].elements.push(copy);
        }
        self.commit(doc);
        self.selection = new_ids;
    }

    // ---- document commands ----

    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let doc = self.document.delete_elements(&self.selection);
        self.commit(doc);
    }

    pub fn duplicate_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let (doc, new_ids) = self.document.duplicate_elements(&self.selection);
        self.commit(doc);
        self.selection = new_ids;
    }

    pub fn nudge(&mut self, dx: f64, dy: f64) {
        let unlocked: Vec<ElementId> = self
            .selection
            .iter()
            .filter(|id| {
                self.document
                    .element(**id)
                    .is_some_and(|el| !el.locked)
            })
            .copied()
            .collect();
        let mut doc = self.document.clone();
        for id in &unlocked {
            if let Some(el) = doc.element(*id) {
                let patch = ElementPatch::position(el.x + dx, el.y + dy);
                doc = doc.update_elements(&[*id], &patch);
            }
        }
        self.commit(doc);
    }

    /// Apply a patch to the whole selection (property panel edits).
    pub fn update_selection(&mut self, patch: &ElementPatch) {
        if self.selection.is_empty() {
            return;
        }
        let doc = self.document.update_elements(&self.selection, patch);
        self.commit(doc);
    }

    /// Rename a page without recording an undo step. Title edits arrive one
    /// keystroke at a time; they mark the document dirty for persistence but
    /// amend the current snapshot instead of pushing.
    pub fn rename_page(&mut self, page_id: PageId, title: impl Into<String>) {
        let doc = self.document.rename_page(page_id, title);
        if doc == self.document {
            return;
        }
        self.history.amend(doc.clone());
        self.document = doc;
        self.dirty = true;
    }

    /// Run a pure document operation and commit the result.
    pub fn apply<F>(&mut self, op: F)
    where
        F: FnOnce(&Document) -> Document,
    {
        let doc = op(&self.document);
        self.commit(doc);
    }

    pub fn undo(&mut self) {
        if let Some(doc) = self.history.undo() {
            debug!("undo");
            self.document = doc;
            self.dirty = true;
            self.revalidate_selection();
        }
    }

    pub fn redo(&mut self) {
        if let Some(doc) = self.history.redo() {
            debug!("redo");
            self.document = doc;
            self.dirty = true;
            self.revalidate_selection();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Dispatch a keyboard action. Zoom actions are viewport concerns and
    /// return `false` so the caller can route them.
    pub fn handle_action(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::Nudge { dx, dy } => self.nudge(dx, dy),
            EditorAction::DeleteSelection => self.delete_selection(),
            EditorAction::Copy => self.copy(),
            EditorAction::Cut => self.cut(),
            EditorAction::Paste => self.paste(),
            EditorAction::Duplicate => self.duplicate_selection(),
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::SelectAll => {
                self.selection = self.document.element_ids();
            }
            EditorAction::EnterEditMode => self.start_editing(),
            EditorAction::StartPan => self.start_panning(),
            EditorAction::Escape => {
                match self.mode {
                    Mode::Editing(_) => self.finish_editing(None),
                    Mode::Panning => self.stop_panning(),
                    _ => self.selection.clear(),
                }
            }
            EditorAction::ZoomIn | EditorAction::ZoomOut | EditorAction::ZoomReset => {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextBlock;

    fn editor_with_rect() -> (Editor, ElementId) {
        let doc = Document::new();
        let (doc, id) = doc.add_element(ElementKind::Rect, ElementPatch::default(), None);
        let mut editor = Editor::new(doc);
        editor.select(vec![id]);
        (editor, id)
    }

    #[test]
    fn test_click_selects_topmost() {
        let doc = Document::new();
        let (doc, a) = doc.add_element(ElementKind::Rect, ElementPatch::default(), None);
        let (doc, b) = doc.add_element(ElementKind::Circle, ElementPatch::default(), None);
        let mut editor = Editor::new(doc);
        let hit = editor.select_at(Point::new(60.0, 60.0), false);
        assert_eq!(hit, Some(b));
        assert_eq!(editor.selection(), &[b]);
        // Shift-click adds; shift-click again removes.
        editor.select(vec![a]);
        editor.select_at(Point::new(60.0, 60.0), true);
        assert_eq!(editor.selection(), &[a, b]);
        editor.select_at(Point::new(60.0, 60.0), true);
        assert_eq!(editor.selection(), &[a]);
    }

    #[test]
    fn test_second_click_enters_text_edit() {
        let doc = Document::new();
        let (doc, id) = doc.add_element(
            ElementKind::Text(TextBlock::new("hi")),
            ElementPatch::default(),
            None,
        );
        let mut editor = Editor::new(doc);
        editor.select_at(Point::new(60.0, 60.0), false);
        assert_eq!(editor.selection(), &[id]);
        assert_eq!(editor.editing(), None);
        editor.select_at(Point::new(60.0, 60.0), false);
        assert_eq!(editor.editing(), Some(id));
    }

    #[test]
    fn test_click_empty_clears() {
        let (mut editor, _) = editor_with_rect();
        editor.select_at(Point::new(500.0, 800.0), false);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_drag_commits_once() {
        let (mut editor, id) = editor_with_rect();
        editor.begin_drag(Point::new(60.0, 60.0));
        editor.update_drag(Point::new(90.0, 80.0));
        editor.update_drag(Point::new(110.0, 130.0));
        // The document is untouched until the gesture ends.
        assert!((editor.document().element(id).unwrap().x - 50.0).abs() < f64::EPSILON);
        assert_eq!(editor.preview_position(id), Some((100.0, 120.0)));
        editor.end_drag();
        let el = editor.document().element(id).unwrap();
        assert!((el.x - 100.0).abs() < f64::EPSILON);
        assert!((el.y - 120.0).abs() < f64::EPSILON);
        // Exactly one undo step for the whole gesture.
        editor.undo();
        assert!((editor.document().element(id).unwrap().x - 50.0).abs() < f64::EPSILON);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_motionless_drag_is_not_history() {
        let (mut editor, _) = editor_with_rect();
        editor.begin_drag(Point::new(60.0, 60.0));
        editor.end_drag();
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_locked_element_does_not_drag() {
        let (mut editor, id) = editor_with_rect();
        editor.apply(|doc| doc.toggle_lock(&[id]));
        editor.begin_drag(Point::new(60.0, 60.0));
        editor.update_drag(Point::new(160.0, 60.0));
        editor.end_drag();
        let el = editor.document().element(id).unwrap();
        assert!((el.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_snaps_to_page_center() {
        let (mut editor, id) = editor_with_rect();
        editor.begin_drag(Point::new(60.0, 60.0));
        // Element center at proposed x=244 is 3.5px from page center.
        editor.update_drag(Point::new(254.0, 60.0));
        let (px, _) = editor.preview_position(id).unwrap();
        assert!((px - 247.5).abs() < f64::EPSILON);
        assert!(!editor.active_guides().is_empty());
    }

    #[test]
    fn test_transform_folds_scale() {
        let (mut editor, id) = editor_with_rect();
        editor.begin_transform(Handle::SouthEast, Point::new(150.0, 150.0));
        editor.update_transform(Point::new(200.0, 175.0));
        assert_eq!(editor.preview_transform(id), Some((1.5, 1.25, 0.0)));
        editor.end_transform();
        let el = editor.document().element(id).unwrap();
        assert!((el.width - 150.0).abs() < f64::EPSILON);
        assert!((el.height - 125.0).abs() < f64::EPSILON);
        assert!((el.scale_x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_clamps_minimum() {
        let (mut editor, id) = editor_with_rect();
        editor.begin_transform(Handle::SouthEast, Point::new(150.0, 150.0));
        editor.update_transform(Point::new(20.0, 20.0));
        editor.end_transform();
        let el = editor.document().element(id).unwrap();
        assert!((el.width - MIN_DIMENSION).abs() < f64::EPSILON);
        assert!((el.height - MIN_DIMENSION).abs() < f64::EPSILON);
    }

    #[test]
    fn test_west_handle_inverts() {
        let (mut editor, id) = editor_with_rect();
        editor.begin_transform(Handle::West, Point::new(50.0, 100.0));
        editor.update_transform(Point::new(30.0, 100.0));
        assert_eq!(editor.preview_transform(id), Some((1.2, 1.0, 0.0)));
    }

    #[test]
    fn test_copy_paste_offsets_and_reselects() {
        let (mut editor, id) = editor_with_rect();
        editor.copy();
        editor.paste();
        assert_eq!(editor.selection().len(), 1);
        let new_id = editor.selection()[0];
        assert_ne!(new_id, id);
        let copy = editor.document().element(new_id).unwrap();
        assert!((copy.x - 70.0).abs() < f64::EPSILON);
        assert!((copy.y - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cut_then_paste() {
        let (mut editor, id) = editor_with_rect();
        editor.cut();
        assert!(editor.document().element(id).is_none());
        editor.paste();
        assert_eq!(editor.document().pages[0].elements.len(), 1);
    }

    #[test]
    fn test_undo_prunes_stale_selection() {
        let doc = Document::new();
        let mut editor = Editor::new(doc);
        editor.apply(|doc| {
            doc.add_element(ElementKind::Rect, ElementPatch::default(), None)
                .0
        });
        let id = editor.document().pages[0].elements[0].id;
        editor.select(vec![id]);
        editor.undo();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_editing_mode_only_for_text() {
        let (mut editor, _) = editor_with_rect();
        editor.start_editing();
        assert_eq!(editor.editing(), None);

        let mut editor = {
            let doc = Document::new();
            let (doc, id) =
                doc.add_element(ElementKind::Text(TextBlock::new("hi")), ElementPatch::default(), None);
            let mut editor = Editor::new(doc);
            editor.select(vec![id]);
            editor
        };
        editor.start_editing();
        assert!(editor.editing().is_some());
        editor.finish_editing(Some("bye".to_string()));
        assert_eq!(editor.editing(), None);
        let el = &editor.document().pages[0].elements[0];
        assert_eq!(el.text().unwrap().content, "bye");
    }

    #[test]
    fn test_nudge_skips_locked() {
        let (mut editor, id) = editor_with_rect();
        editor.apply(|doc| doc.toggle_lock(&[id]));
        editor.select(vec![id]);
        editor.nudge(10.0, 0.0);
        assert!((editor.document().element(id).unwrap().x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rename_page_is_not_undoable() {
        let (mut editor, _) = editor_with_rect();
        let page_id = editor.document().pages[0].id;
        editor.rename_page(page_id, "R");
        editor.rename_page(page_id, "Re");
        editor.rename_page(page_id, "Resume");
        assert_eq!(editor.document().pages[0].title, "Resume");
        assert!(!editor.can_undo());
        assert!(editor.take_dirty());
        // A later undo of a real edit keeps the final title in the snapshot
        // it amended.
        editor.nudge(5.0, 0.0);
        editor.undo();
        assert_eq!(editor.document().pages[0].title, "Resume");
    }

    #[test]
    fn test_dirty_flag_tracks_commits() {
        let (mut editor, id) = editor_with_rect();
        assert!(!editor.is_dirty());
        editor.nudge(1.0, 0.0);
        assert!(editor.take_dirty());
        assert!(!editor.is_dirty());
        // A no-op commit does not set the flag.
        editor.select(vec![id]);
        editor.update_selection(&ElementPatch::default());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_zoom_actions_bubble_to_caller() {
        let (mut editor, _) = editor_with_rect();
        assert!(!editor.handle_action(EditorAction::ZoomIn));
        assert!(editor.handle_action(EditorAction::DeleteSelection));
    }
}
