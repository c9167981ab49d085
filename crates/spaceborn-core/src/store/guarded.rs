//! Timeout and cancellation wrapper around a [`DocumentStore`].

use std::{future::Future, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{Document, DocumentStore, Fields, Precondition, Query, WriteOp};
use crate::error::{DashboardError, Result};

/// Store handle used by every component.
///
/// Each call is raced against the configured timeout and the cancellation
/// token, surfacing [`DashboardError::Timeout`] or
/// [`DashboardError::Cancelled`]. A call cut short this way may still
/// complete on the backend.
#[derive(Clone)]
pub struct GuardedStore {
    inner: Arc<dyn DocumentStore>,
    call_timeout: Duration,
    cancel: CancellationToken,
}

impl GuardedStore {
    pub fn new(
        inner: Arc<dyn DocumentStore>,
        call_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner,
            call_timeout,
            cancel,
        }
    }

    /// Token observed by every call made through this handle.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    async fn guard<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(DashboardError::Cancelled { operation });
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DashboardError::Cancelled { operation }),
            outcome = tokio::time::timeout(self.call_timeout, call) => {
                outcome.map_err(|_| DashboardError::Timeout {
                    operation,
                    after: self.call_timeout,
                })?
            }
        }
    }

    pub async fn insert(&self, collection: &str, fields: Fields) -> Result<String> {
        self.guard("insert", self.inner.insert(collection, fields)).await
    }

    pub async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        self.guard("set", self.inner.set(collection, id, fields)).await
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.guard("get", self.inner.get(collection, id)).await
    }

    pub async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        self.guard("query", self.inner.query(collection, query)).await
    }

    pub async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        self.guard("update", self.inner.update(collection, id, fields))
            .await
    }

    pub async fn update_if(
        &self,
        collection: &str,
        id: &str,
        precondition: &Precondition,
        fields: Fields,
    ) -> Result<()> {
        self.guard(
            "update_if",
            self.inner.update_if(collection, id, precondition, fields),
        )
        .await
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.guard("delete", self.inner.delete(collection, id)).await
    }

    pub async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.guard("batch_write", self.inner.batch_write(ops)).await
    }

    /// Fetches and decodes a document, mapping absence to `NotFound` of the
    /// given kind.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        kind: &'static str,
    ) -> Result<T> {
        self.get(collection, id)
            .await?
            .ok_or_else(|| DashboardError::not_found(kind, id))?
            .decode()
    }

    /// Runs a query and decodes every result.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<T>> {
        self.query(collection, query)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Store whose every call takes far longer than any test timeout.
    struct StalledStore;

    #[async_trait]
    impl DocumentStore for StalledStore {
        async fn insert(&self, _: &str, _: Fields) -> Result<String> {
            stall().await
        }
        async fn set(&self, _: &str, _: &str, _: Fields) -> Result<()> {
            stall().await
        }
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>> {
            stall().await
        }
        async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>> {
            stall().await
        }
        async fn update(&self, _: &str, _: &str, _: Fields) -> Result<()> {
            stall().await
        }
        async fn update_if(&self, _: &str, _: &str, _: &Precondition, _: Fields) -> Result<()> {
            stall().await
        }
        async fn delete(&self, _: &str, _: &str) -> Result<()> {
            stall().await
        }
        async fn batch_write(&self, _: Vec<WriteOp>) -> Result<()> {
            stall().await
        }
    }

    async fn stall<T>() -> Result<T> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(DashboardError::Configuration {
            message: "stalled call finished".to_string(),
        })
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let store = GuardedStore::new(
            Arc::new(StalledStore),
            Duration::from_millis(20),
            CancellationToken::new(),
        );

        let err = store.get("topics", "t1").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Timeout {
                operation: "get",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        let store = GuardedStore::new(
            Arc::new(StalledStore),
            Duration::from_secs(5),
            token.clone(),
        );
        token.cancel();

        let err = store.delete("topics", "t1").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Cancelled {
                operation: "delete"
            }
        ));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_call() {
        let token = CancellationToken::new();
        let store = GuardedStore::new(
            Arc::new(StalledStore),
            Duration::from_secs(5),
            token.clone(),
        );

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = store.query("tasks", &Query::new()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Cancelled { .. }));
        canceller.await.expect("canceller task");
    }
}
