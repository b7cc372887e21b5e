//! PageCraft Core Library
//!
//! Platform-agnostic document model and editing logic for the PageCraft
//! page designer.

pub mod color;
pub mod document;
pub mod effects;
pub mod element;
pub mod geometry;
pub mod guides;
pub mod history;
pub mod interaction;
pub mod shortcuts;
pub mod storage;

pub use color::Rgba;
pub use document::{AlignMode, Document, LayerAction, Page, PageId, PAGE_GAP, PAGE_HEIGHT, PAGE_WIDTH};
pub use effects::{DomEffect, EffectKind, EffectParams, VectorEffect, resolve_dom, resolve_vector};
pub use element::{Element, ElementId, ElementKind, ElementPatch, TextBlock, TextPatch};
pub use guides::{Guide, SnapResult, SNAP_THRESHOLD, snap_position};
pub use history::History;
pub use interaction::{Editor, Handle};
pub use shortcuts::{EditorAction, Key, Modifiers, map_key};
pub use storage::{DebouncedSaver, DocumentStore, MemoryStore, StorageError, UploadQueue, Uploader};
