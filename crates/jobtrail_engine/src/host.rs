use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use jobtrail_core::{ExtractionResult, PanelMode, TabId};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::HostError;

/// Durable key-value storage offered by the surrounding runtime.
///
/// Writes are last-write-wins; there is no compare-and-swap.
#[async_trait::async_trait]
pub trait KvHost: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
    async fn remove(&self, key: &str) -> Result<(), HostError>;
}

/// Reaches the extraction context of a tab and asks it for the job on screen.
#[async_trait::async_trait]
pub trait ExtractionHost: Send + Sync {
    async fn scrape(
        &self,
        tab_id: TabId,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult, HostError>;
}

/// The companion panel surface.
pub trait PanelHost: Send + Sync {
    fn show(&self, tab_id: TabId, mode: PanelMode);
    fn open(&self, tab_id: TabId) -> Result<(), HostError>;
}

/// In-process [`KvHost`]; contents are lost with the value.
#[derive(Debug, Default)]
pub struct MemoryHost {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl KvHost for MemoryHost {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), HostError> {
        self.entries().remove(key);
        Ok(())
    }
}
