//! Transport wrappers shared by the unit tests.

use async_trait::async_trait;
use shared_store::{
    InMemoryStore, RawCallback, StoreScope, StoreTransport, SubscriptionId, TransportError,
};

/// `InMemoryStore` that yields to the scheduler before every call, so that
/// concurrent callers interleave at each await.
#[derive(Default)]
pub(crate) struct YieldingStore {
    pub(crate) inner: InMemoryStore,
}

#[async_trait]
impl StoreTransport for YieldingStore {
    async fn get(&self, scope: &StoreScope, key: &str) -> Result<Option<String>, TransportError> {
        tokio::task::yield_now().await;
        self.inner.get(scope, key).await
    }

    async fn set(&self, scope: &StoreScope, key: &str, value: &str) -> Result<(), TransportError> {
        tokio::task::yield_now().await;
        self.inner.set(scope, key, value).await
    }

    async fn delete(&self, scope: &StoreScope, key: &str) -> Result<(), TransportError> {
        tokio::task::yield_now().await;
        self.inner.delete(scope, key).await
    }

    async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
        callback: RawCallback,
    ) -> Result<(), TransportError> {
        tokio::task::yield_now().await;
        self.inner.subscribe(scope, key, id, callback).await
    }

    async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
    ) -> Result<bool, TransportError> {
        tokio::task::yield_now().await;
        self.inner.unsubscribe(scope, key, id).await
    }
}
