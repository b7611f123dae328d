use std::sync::Arc;

use jobtrail_core::{JobPatch, JobRecord, JobState, RecordCollection};
use serde_json::Value;
use tokio::sync::Mutex;
use trail_logging::trail_debug;

use crate::{HostError, KvHost, StoreError};

/// Host key holding the serialized [`RecordCollection`].
pub const JOBS_KEY: &str = "jobData";
/// Host key holding the login flag.
pub const LOGIN_KEY: &str = "loginStatus";

/// Job records persisted as one collection under [`JOBS_KEY`].
///
/// Every mutation reads the whole collection, changes it and writes it back.
/// Mutations through one `RecordStore` (and its clones) are serialized, but
/// two independent stores over the same host still race: the later write
/// wins and silently discards the earlier one.
#[derive(Clone)]
pub struct RecordStore {
    host: Arc<dyn KvHost>,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn new(host: Arc<dyn KvHost>) -> Self {
        Self {
            host,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The stored collection, or an empty unchanged one if nothing was saved yet.
    pub async fn get(&self) -> Result<RecordCollection, StoreError> {
        match self.host.get(JOBS_KEY).await? {
            Some(value) => serde_json::from_value(value).map_err(|err| {
                StoreError::HostIo(HostError::new(
                    format!("decode {JOBS_KEY}"),
                    err.to_string(),
                ))
            }),
            None => Ok(RecordCollection::default()),
        }
    }

    /// State of the record stored under `key`, if any.
    pub async fn exists(&self, key: &str) -> Result<Option<JobState>, StoreError> {
        Ok(self.get().await?.find(key).map(|job| job.state))
    }

    pub async fn add(&self, record: JobRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.get().await?;
        if collection.position(&record.id).is_some() {
            return Err(StoreError::DuplicateKey(record.id));
        }
        trail_debug!("Adding job {}", record.id);
        collection.data.push(record);
        collection.is_changed = true;
        self.save(&collection).await
    }

    /// Merges `patch` into the record under `key` and returns the result.
    pub async fn update(&self, key: &str, patch: &JobPatch) -> Result<JobRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.get().await?;
        let index = collection
            .position(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        collection.data[index].apply(patch);
        let updated = collection.data[index].clone();
        collection.is_changed = true;
        self.save(&collection).await?;
        Ok(updated)
    }

    pub async fn delete(&self, key: &str) -> Result<JobRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.get().await?;
        let index = collection
            .position(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let removed = collection.data.remove(index);
        collection.is_changed = true;
        self.save(&collection).await?;
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.host.remove(JOBS_KEY).await?;
        Ok(())
    }

    /// At most `limit` records, most recently saved first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self.get().await?.recent(limit))
    }

    pub async fn mark_changed(&self) -> Result<(), StoreError> {
        self.set_changed(true).await
    }

    /// Clears the change flag once a reader has consumed the collection.
    pub async fn acknowledge_changes(&self) -> Result<(), StoreError> {
        self.set_changed(false).await
    }

    async fn set_changed(&self, changed: bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.get().await?;
        collection.is_changed = changed;
        self.save(&collection).await
    }

    async fn save(&self, collection: &RecordCollection) -> Result<(), StoreError> {
        let value = serde_json::to_value(collection).map_err(|err| {
            HostError::new(format!("encode {JOBS_KEY}"), err.to_string())
        })?;
        self.host.set(JOBS_KEY, value).await?;
        Ok(())
    }
}

/// Login flag kept for the sign-in collaborator. Nothing in job tracking reads it.
#[derive(Clone)]
pub struct SessionFlag {
    host: Arc<dyn KvHost>,
}

impl SessionFlag {
    pub fn new(host: Arc<dyn KvHost>) -> Self {
        Self { host }
    }

    pub async fn set_logged_in(&self, logged_in: bool) -> Result<(), HostError> {
        self.host.set(LOGIN_KEY, Value::Bool(logged_in)).await
    }

    pub async fn is_logged_in(&self) -> Result<bool, HostError> {
        Ok(self
            .host
            .get(LOGIN_KEY)
            .await?
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }
}

