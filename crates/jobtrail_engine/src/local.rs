use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use jobtrail_core::{ExtractionResult, TabId};
use tokio_util::sync::CancellationToken;

use crate::{Document, ExtractionHost, HostError, JobExtractor};

/// Runs the extractor in-process against documents registered per tab.
pub struct LocalExtractionHost {
    extractor: JobExtractor,
    documents: RwLock<HashMap<TabId, Arc<dyn Document>>>,
}

impl LocalExtractionHost {
    pub fn new(extractor: JobExtractor) -> Self {
        Self {
            extractor,
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn attach(&self, tab_id: TabId, document: Arc<dyn Document>) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tab_id, document);
    }

    pub fn detach(&self, tab_id: TabId) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&tab_id);
    }

    fn document(&self, tab_id: TabId) -> Option<Arc<dyn Document>> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tab_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ExtractionHost for LocalExtractionHost {
    async fn scrape(
        &self,
        tab_id: TabId,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult, HostError> {
        let document = self.document(tab_id).ok_or_else(|| {
            HostError::new("scrapeRequest", format!("no document attached to tab {tab_id}"))
        })?;
        Ok(self
            .extractor
            .extract_with_cancel(document.as_ref(), &cancel)
            .await)
    }
}
