//! Debounced persistence of the working document.
//!
//! Each edit restarts a short timer; the document is written only when the
//! timer expires with no further edits, so a burst of changes costs one save.

use super::{DocumentStore, StorageResult};
use crate::document::Document;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MILLIS: u64 = 1000;

/// Tracks pending changes and decides when a save is due. The caller drives
/// it from its tick loop: `mark_changed` on every commit, `due` each tick,
/// `flush` when due (or on shutdown).
pub struct DebouncedSaver<S: DocumentStore> {
    store: Arc<S>,
    delay: Duration,
    document_id: String,
    last_change: Option<Instant>,
    saving: bool,
}

impl<S: DocumentStore> DebouncedSaver<S> {
    pub fn new(store: Arc<S>, document_id: impl Into<String>) -> Self {
        Self {
            store,
            delay: Duration::from_millis(DEFAULT_DEBOUNCE_MILLIS),
            document_id: document_id.into(),
            last_change: None,
            saving: false,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Restart the debounce timer.
    pub fn mark_changed(&mut self) {
        self.last_change = Some(Instant::now());
    }

    pub fn has_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Whether the quiet period has elapsed since the last change.
    pub fn due(&self) -> bool {
        match self.last_change {
            Some(at) => !self.saving && at.elapsed() >= self.delay,
            None => false,
        }
    }

    /// Write the document if a change is pending, regardless of the timer.
    /// A failed save keeps the pending flag so the next tick retries.
    pub async fn flush(&mut self, document: &Document) -> StorageResult<bool> {
        if self.last_change.is_none() {
            return Ok(false);
        }
        self.saving = true;
        let result = self.store.save(&self.document_id, document).await;
        self.saving = false;
        match result {
            Ok(()) => {
                debug!("saved document {}", self.document_id);
                self.last_change = None;
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Save if the debounce window has expired. Returns true if a save ran.
    pub async fn maybe_flush(&mut self, document: &Document) -> StorageResult<bool> {
        if !self.due() {
            return Ok(false);
        }
        self.flush(document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    #[test]
    fn test_not_due_without_changes() {
        let store = Arc::new(MemoryStore::new());
        let saver = DebouncedSaver::new(store, "doc");
        assert!(!saver.due());
        assert!(!saver.has_pending());
    }

    #[test]
    fn test_due_after_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let mut saver = DebouncedSaver::new(store, "doc");
        saver.set_delay(Duration::ZERO);
        saver.mark_changed();
        assert!(saver.due());
    }

    #[test]
    fn test_change_restarts_timer() {
        let store = Arc::new(MemoryStore::new());
        let mut saver = DebouncedSaver::new(store, "doc");
        saver.set_delay(Duration::from_secs(60));
        saver.mark_changed();
        assert!(saver.has_pending());
        assert!(!saver.due());
    }

    #[test]
    fn test_flush_clears_pending_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut saver = DebouncedSaver::new(store.clone(), "doc");
        let doc = Document::new();

        saver.mark_changed();
        let saved = block_on(saver.flush(&doc)).unwrap();
        assert!(saved);
        assert!(!saver.has_pending());

        let loaded = block_on(store.load("doc")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_maybe_flush_respects_window() {
        let store = Arc::new(MemoryStore::new());
        let mut saver = DebouncedSaver::new(store, "doc");
        saver.set_delay(Duration::from_secs(60));
        saver.mark_changed();
        let doc = Document::new();
        let saved = block_on(saver.maybe_flush(&doc)).unwrap();
        assert!(!saved);
        assert!(saver.has_pending());
    }
}
