//! Asset uploads with a single-in-flight guard.
//!
//! Image uploads go through an `Uploader` backend that turns raw bytes into
//! a served URL. The queue allows one upload at a time; starting a second
//! while one is pending is refused so a slow backend cannot pile up work.

use super::BoxFuture;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("an upload is already in progress")]
    Busy,
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("upload failed: {0}")]
    Backend(String),
}

/// Backend that stores asset bytes and returns their URL.
pub trait Uploader: Send + Sync {
    fn upload(&self, bytes: &[u8], content_type: &str) -> BoxFuture<'_, Result<String, UploadError>>;

    /// Remove a previously uploaded asset.
    fn delete(&self, url: &str) -> BoxFuture<'_, Result<(), UploadError>>;
}

/// Serializes uploads through a backend: at most one in flight.
pub struct UploadQueue<U: Uploader> {
    uploader: U,
    in_flight: bool,
}

impl<U: Uploader> UploadQueue<U> {
    pub fn new(uploader: U) -> Self {
        Self {
            uploader,
            in_flight: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Run one upload. Refused with `UploadError::Busy` while another is
    /// pending; the backend error is passed through otherwise.
    pub async fn upload(&mut self, bytes: &[u8], content_type: &str) -> Result<String, UploadError> {
        if self.in_flight {
            warn!("rejecting upload while another is in flight");
            return Err(UploadError::Busy);
        }
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedType(content_type.to_string()));
        }
        self.in_flight = true;
        let result = self.uploader.upload(bytes, content_type).await;
        self.in_flight = false;
        result
    }

    /// Delete an uploaded asset. Deletions are not serialized against
    /// uploads; removing an old asset never blocks adding a new one.
    pub async fn delete(&self, url: &str) -> Result<(), UploadError> {
        self.uploader.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    #[derive(Default)]
    struct FakeUploader {
        calls: AtomicUsize,
    }

    impl Uploader for FakeUploader {
        fn upload(
            &self,
            bytes: &[u8],
            _content_type: &str,
        ) -> BoxFuture<'_, Result<String, UploadError>> {
            let len = bytes.len();
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("https://assets.test/{len}"))
            })
        }

        fn delete(&self, _url: &str) -> BoxFuture<'_, Result<(), UploadError>> {
            Box::pin(async move { Ok(()) })
        }
    }

    #[test]
    fn test_upload_returns_url() {
        let mut queue = UploadQueue::new(FakeUploader::default());
        let url = block_on(queue.upload(&[0u8; 16], "image/png")).unwrap();
        assert_eq!(url, "https://assets.test/16");
        assert!(!queue.is_busy());
    }

    #[test]
    fn test_rejects_non_image() {
        let mut queue = UploadQueue::new(FakeUploader::default());
        let result = block_on(queue.upload(b"hello", "text/plain"));
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
        assert_eq!(queue.uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_busy_flag_clears_after_completion() {
        let mut queue = UploadQueue::new(FakeUploader::default());
        block_on(queue.upload(&[1, 2, 3], "image/jpeg")).unwrap();
        block_on(queue.upload(&[4, 5], "image/jpeg")).unwrap();
        assert_eq!(queue.uploader.calls.load(Ordering::SeqCst), 2);
    }
}
