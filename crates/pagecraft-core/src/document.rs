//! Document and page model with pure editing operations.
//!
//! Every operation takes `&self` plus arguments and returns a new `Document`;
//! callers decide whether the result becomes the live document (and gets a
//! history push). Operations are total: invalid input returns the document
//! unchanged rather than an error.

use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed page size (A4 at 72 dpi) and vertical gap between stacked pages.
pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;
pub const PAGE_GAP: f64 = 60.0;

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// One fixed-size sheet within the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub elements: Vec<Element>,
    pub locked: bool,
    pub hidden: bool,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            elements: Vec::new(),
            locked: false,
            hidden: false,
        }
    }

    /// Deep clone with fresh page and element ids.
    fn cloned_with_new_ids(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: format!("{} copy", self.title),
            elements: self
                .elements
                .iter()
                .map(Element::cloned_with_new_id)
                .collect(),
            locked: self.locked,
            hidden: self.hidden,
        }
    }
}

/// Layer reordering actions for `Document::reorder_layer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerAction {
    /// Move the selected subset to the end of the sequence (topmost).
    Front,
    /// Move the selected subset to the start of the sequence (bottommost).
    Back,
    /// Swap one element a single step towards the front.
    Forward,
    /// Swap one element a single step towards the back.
    Backward,
    /// Move one element to an explicit index (layers-panel drag).
    Reorder(usize),
}

/// Page-bounds alignment modes for `Document::align_elements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    Left,
    Right,
    Top,
    Bottom,
    CenterH,
    CenterV,
}

/// An ordered sequence of pages. Always holds at least one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with a single empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new("Page 1")],
        }
    }

    /// Serialize to the lossless JSON persistence form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the JSON persistence form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Page index in stacking order.
    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Look up an element anywhere in the document.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.pages
            .iter()
            .flat_map(|p| p.elements.iter())
            .find(|el| el.id == id)
    }

    /// The page that owns an element.
    pub fn page_of(&self, id: ElementId) -> Option<&Page> {
        self.pages
            .iter()
            .find(|p| p.elements.iter().any(|el| el.id == id))
    }

    /// All element ids, page by page.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.pages
            .iter()
            .flat_map(|p| p.elements.iter().map(|el| el.id))
            .collect()
    }

    // ---- element operations ----

    /// Append a new element to the target page (or the last page) and return
    /// the new document plus the generated id. A document is never left with
    /// zero pages, so a page is created first if none exist.
    pub fn add_element(
        &self,
        kind: ElementKind,
        patch: ElementPatch,
        target_page: Option<PageId>,
    ) -> (Document, ElementId) {
        let mut doc = self.clone();
        if doc.pages.is_empty() {
            doc.pages.push(Page::new("Page 1"));
        }
        let element = Element::new(kind).merged(&patch);
        let id = element.id;
        let index = target_page
            .and_then(|pid| doc.page_index(pid))
            .unwrap_or(doc.pages.len() - 1);
        doc.pages[index].elements.push(element);
        (doc, id)
    }

    /// Merge `patch` into every element whose id is in `ids`, across all
    /// pages. Returns the document unchanged when no id matches.
    pub fn update_elements(&self, ids: &[ElementId], patch: &ElementPatch) -> Document {
        let mut doc = self.clone();
        let mut touched = false;
        for page in &mut doc.pages {
            for el in &mut page.elements {
                if ids.contains(&el.id) {
                    *el = el.merged(patch);
                    touched = true;
                }
            }
        }
        if touched { doc } else { self.clone() }
    }

    /// Remove matching elements from their pages.
    pub fn delete_elements(&self, ids: &[ElementId]) -> Document {
        let mut doc = self.clone();
        for page in &mut doc.pages {
            page.elements.retain(|el| !ids.contains(&el.id));
        }
        doc
    }

    /// Clone each matching element with a new id, offset by (+20, +20).
    /// Lock state is copied verbatim. Returns the new ids for re-selection.
    pub fn duplicate_elements(&self, ids: &[ElementId]) -> (Document, Vec<ElementId>) {
        let mut doc = self.clone();
        let mut new_ids = Vec::new();
        for page in &mut doc.pages {
            let copies: Vec<Element> = page
                .elements
                .iter()
                .filter(|el| ids.contains(&el.id))
                .map(|el| {
                    let mut copy = el.cloned_with_new_id();
                    copy.x += DUPLICATE_OFFSET;
                    copy.y += DUPLICATE_OFFSET;
                    copy
                })
                .collect();
            new_ids.extend(copies.iter().map(|el| el.id));
            page.elements.extend(copies);
        }
        (doc, new_ids)
    }

    /// Reorder elements within a page's stacking sequence.
    ///
    /// `Front`/`Back` are stable partitions: both the moved subset and the
    /// untouched subset keep their relative order. `Forward`/`Backward` are
    /// single-step swaps, valid only for a single-element selection.
    pub fn reorder_layer(&self, page_id: PageId, ids: &[ElementId], action: LayerAction) -> Document {
        let mut doc = self.clone();
        let Some(index) = doc.page_index(page_id) else {
            return self.clone();
        };
        let elements = &mut doc.pages[index].elements;
        match action {
            LayerAction::Front => {
                let (moved, rest): (Vec<Element>, Vec<Element>) = elements
                    .drain(..)
                    .partition(|el| ids.contains(&el.id));
                elements.extend(rest);
                elements.extend(moved);
            }
            LayerAction::Back => {
                let (moved, rest): (Vec<Element>, Vec<Element>) = elements
                    .drain(..)
                    .partition(|el| ids.contains(&el.id));
                elements.extend(moved);
                elements.extend(rest);
            }
            LayerAction::Forward => {
                if let [id] = ids {
                    if let Some(pos) = elements.iter().position(|el| el.id == *id) {
                        if pos + 1 < elements.len() {
                            elements.swap(pos, pos + 1);
                        }
                    }
                }
            }
            LayerAction::Backward => {
                if let [id] = ids {
                    if let Some(pos) = elements.iter().position(|el| el.id == *id) {
                        if pos > 0 {
                            elements.swap(pos, pos - 1);
                        }
                    }
                }
            }
            LayerAction::Reorder(target) => {
                if let [id] = ids {
                    if let Some(pos) = elements.iter().position(|el| el.id == *id) {
                        let el = elements.remove(pos);
                        let target = target.min(elements.len());
                        elements.insert(target, el);
                    }
                }
            }
        }
        doc
    }

    /// Reposition each unlocked matching element against the fixed page
    /// bounds. Effective size (width × scale) is used, so mid-transform
    /// elements align by their rendered box. Locked elements are skipped.
    pub fn align_elements(&self, ids: &[ElementId], mode: AlignMode) -> Document {
        let mut doc = self.clone();
        for page in &mut doc.pages {
            for el in &mut page.elements {
                if !ids.contains(&el.id) || el.locked {
                    continue;
                }
                let w = el.effective_width();
                let h = el.effective_height();
                match mode {
                    AlignMode::Left => el.x = 0.0,
                    AlignMode::Right => el.x = PAGE_WIDTH - w,
                    AlignMode::Top => el.y = 0.0,
                    AlignMode::Bottom => el.y = PAGE_HEIGHT - h,
                    AlignMode::CenterH => el.x = (PAGE_WIDTH - w) / 2.0,
                    AlignMode::CenterV => el.y = (PAGE_HEIGHT - h) / 2.0,
                }
            }
        }
        doc
    }

    /// Flip the lock flag on every matching element.
    pub fn toggle_lock(&self, ids: &[ElementId]) -> Document {
        let mut doc = self.clone();
        for page in &mut doc.pages {
            for el in &mut page.elements {
                if ids.contains(&el.id) {
                    el.locked = !el.locked;
                }
            }
        }
        doc
    }

    // ---- page operations ----

    /// Insert a new empty page after `after` (appended when `after` is absent
    /// or unknown).
    pub fn add_page(&self, after: Option<PageId>) -> Document {
        let mut doc = self.clone();
        let title = format!("Page {}", doc.pages.len() + 1);
        let index = after
            .and_then(|pid| doc.page_index(pid))
            .map(|i| i + 1)
            .unwrap_or(doc.pages.len());
        doc.pages.insert(index, Page::new(title));
        doc
    }

    /// Delete a page. Refused (document returned unchanged) when the page is
    /// locked or is the only page left.
    pub fn delete_page(&self, page_id: PageId) -> Document {
        let Some(index) = self.page_index(page_id) else {
            return self.clone();
        };
        if self.pages.len() <= 1 {
            warn!("refusing to delete the last page");
            return self.clone();
        }
        if self.pages[index].locked {
            warn!("refusing to delete locked page {page_id}");
            return self.clone();
        }
        let mut doc = self.clone();
        doc.pages.remove(index);
        doc
    }

    /// Deep-clone a page (fresh page and element ids), inserted right after
    /// the original.
    pub fn duplicate_page(&self, page_id: PageId) -> Document {
        let Some(index) = self.page_index(page_id) else {
            return self.clone();
        };
        let mut doc = self.clone();
        let copy = doc.pages[index].cloned_with_new_ids();
        doc.pages.insert(index + 1, copy);
        doc
    }

    pub fn toggle_page_lock(&self, page_id: PageId) -> Document {
        let mut doc = self.clone();
        if let Some(page) = doc.pages.iter_mut().find(|p| p.id == page_id) {
            page.locked = !page.locked;
        }
        doc
    }

    pub fn toggle_page_hidden(&self, page_id: PageId) -> Document {
        let mut doc = self.clone();
        if let Some(page) = doc.pages.iter_mut().find(|p| p.id == page_id) {
            page.hidden = !page.hidden;
        }
        doc
    }

    /// Swap a page with its predecessor in the stacking order.
    pub fn move_page_up(&self, page_id: PageId) -> Document {
        let mut doc = self.clone();
        if let Some(index) = doc.page_index(page_id) {
            if index > 0 {
                doc.pages.swap(index, index - 1);
            }
        }
        doc
    }

    /// Swap a page with its successor in the stacking order.
    pub fn move_page_down(&self, page_id: PageId) -> Document {
        let mut doc = self.clone();
        if let Some(index) = doc.page_index(page_id) {
            if index + 1 < doc.pages.len() {
                doc.pages.swap(index, index + 1);
            }
        }
        doc
    }

    /// Rename a page. Title edits are deliberately not history-tracked.
    pub fn rename_page(&self, page_id: PageId, title: impl Into<String>) -> Document {
        let mut doc = self.clone();
        if let Some(page) = doc.pages.iter_mut().find(|p| p.id == page_id) {
            page.title = title.into();
        }
        doc
    }
}
