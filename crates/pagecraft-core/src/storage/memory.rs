//! In-memory storage implementation.

use super::{BoxFuture, DocumentStore, StorageError, StorageResult, VersionInfo};
use crate::document::Document;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// In-memory store for testing and ephemeral use. Documents round-trip
/// through JSON, so persistence bugs surface here too.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
    versions: RwLock<HashMap<String, Vec<(VersionInfo, String)>>>,
    clock: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now(&self) -> u64 {
        // Monotonic fake timestamp so version ordering is deterministic.
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

impl DocumentStore for MemoryStore {
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            let mut docs = self
                .documents
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            docs.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            let json = docs.get(&id).ok_or(StorageError::NotFound(id))?;
            Ok(Document::from_json(json)?)
        })
    }

    fn save_version(
        &self,
        id: &str,
        name: &str,
        document: &Document,
        preview: Option<String>,
    ) -> BoxFuture<'_, StorageResult<VersionInfo>> {
        let id = id.to_string();
        let name = name.to_string();
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            let info = VersionInfo {
                id: Uuid::new_v4().to_string(),
                name,
                created_at: self.now(),
                preview,
            };
            let mut versions = self
                .versions
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            versions
                .entry(id)
                .or_default()
                .insert(0, (info.clone(), json));
            Ok(info)
        })
    }

    fn list_versions(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<VersionInfo>>> {
        let id = id.to_string();
        Box::pin(async move {
            let versions = self
                .versions
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            Ok(versions
                .get(&id)
                .map(|list| list.iter().map(|(info, _)| info.clone()).collect())
                .unwrap_or_default())
        })
    }

    fn restore_version(
        &self,
        id: &str,
        version_id: &str,
    ) -> BoxFuture<'_, StorageResult<Document>> {
        let id = id.to_string();
        let version_id = version_id.to_string();
        Box::pin(async move {
            let versions = self
                .versions
                .read()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            let json = versions
                .get(&id)
                .and_then(|list| list.iter().find(|(info, _)| info.id == version_id))
                .map(|(_, json)| json)
                .ok_or(StorageError::VersionNotFound(version_id))?;
            Ok(Document::from_json(json)?)
        })
    }

    fn delete_version(&self, id: &str, version_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let version_id = version_id.to_string();
        Box::pin(async move {
            let mut versions = self
                .versions
                .write()
                .map_err(|e| StorageError::Other(format!("lock error: {e}")))?;
            if let Some(list) = versions.get_mut(&id) {
                list.retain(|(info, _)| info.id != version_id);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementPatch};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
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
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let (doc, _) =
            Document::new().add_element(ElementKind::Rect, ElementPatch::default(), None);

        block_on(store.save("resume", &doc)).unwrap();
        let loaded = block_on(store.load("resume")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_versions_newest_first() {
        let store = MemoryStore::new();
        let doc = Document::new();

        block_on(store.save_version("resume", "draft", &doc, None)).unwrap();
        block_on(store.save_version("resume", "final", &doc, None)).unwrap();

        let list = block_on(store.list_versions("resume")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "final");
        assert_eq!(list[1].name, "draft");
    }

    #[test]
    fn test_version_restore_roundtrip() {
        let store = MemoryStore::new();
        let original = Document::new();
        let info = block_on(store.save_version("resume", "v1", &original, None)).unwrap();

        let (edited, _) =
            original.add_element(ElementKind::Circle, ElementPatch::default(), None);
        block_on(store.save("resume", &edited)).unwrap();

        let restored = block_on(store.restore_version("resume", &info.id)).unwrap();
        assert_eq!(restored, original);
        assert_ne!(restored, edited);
    }

    #[test]
    fn test_delete_version() {
        let store = MemoryStore::new();
        let doc = Document::new();
        let info = block_on(store.save_version("resume", "v1", &doc, None)).unwrap();
        block_on(store.delete_version("resume", &info.id)).unwrap();
        assert!(block_on(store.list_versions("resume")).unwrap().is_empty());
        let result = block_on(store.restore_version("resume", &info.id));
        assert!(matches!(result, Err(StorageError::VersionNotFound(_))));
    }
}
