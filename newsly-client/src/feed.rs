use crate::api::ApiClient;
use futures::future::{AbortHandle, Abortable, Aborted};
use newsly_core::{CoreError, FeaturedItem};
use std::future::Future;
use tracing::debug;

/// Cancels the featured fetch it was issued with when dropped.
#[derive(Debug)]
pub struct LoadGuard {
    handle: AbortHandle,
}

impl LoadGuard {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if !self.handle.is_aborted() {
            debug!("Feed load guard dropped, aborting fetch");
            self.handle.abort();
        }
    }
}

/// Starts featured fetches that the feed page can abandon.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: ApiClient,
}

impl FeedLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The returned future resolves to `CoreError::Aborted` once the guard
    /// is dropped or cancelled before the response arrives.
    pub fn start(
        &self,
    ) -> (
        LoadGuard,
        impl Future<Output = Result<Vec<FeaturedItem>, CoreError>> + Send + 'static,
    ) {
        let client = self.client.clone();
        guarded(async move { client.featured().await })
    }
}

/// Wraps `fetch` so that dropping the returned guard aborts it.
pub fn guarded<F, T>(fetch: F) -> (LoadGuard, impl Future<Output = Result<T, CoreError>> + Send + 'static)
where
    F: Future<Output = Result<T, CoreError>> + Send + 'static,
    T: Send + 'static,
{
    let (handle, registration) = AbortHandle::new_pair();
    let task = Abortable::new(fetch, registration);
    let future = async move {
        match task.await {
            Ok(result) => result,
            Err(Aborted) => Err(CoreError::Aborted),
        }
    };
    (LoadGuard { handle }, future)
}
