use serde::{Deserialize, Serialize};

use crate::{JobKey, JobRecord, JobState};

/// Fields scraped from one job page. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub id: Option<JobKey>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub logo_src: Option<String>,
    pub job_description: Option<String>,
    pub employment_type: Option<String>,
    pub work_type: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Builds a record from the extraction. Returns `None` until a key was derived.
    pub fn to_record(&self, state: JobState, added_on: Option<String>) -> Option<JobRecord> {
        let id = self.id.clone()?;
        Some(JobRecord {
            id,
            job_title: self.job_title.clone(),
            location: self.location.clone(),
            company_name: self.company_name.clone(),
            logo_src: self.logo_src.clone(),
            job_description: self.job_description.clone(),
            employment_type: self.employment_type.clone(),
            work_type: self.work_type.clone(),
            salary_range: self.salary_range.clone(),
            state,
            added_on,
            url: self.url.clone(),
        })
    }
}

/// Extraction merged with the store lookup; this is what the panel asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentJob {
    pub data: Option<ExtractionResult>,
    pub is_exists: bool,
    pub job_state: Option<JobState>,
}

impl CurrentJob {
    pub fn new(data: ExtractionResult, stored: Option<JobState>) -> Self {
        Self {
            data: Some(data),
            is_exists: stored.is_some(),
            job_state: stored,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.id.as_deref())
    }
}
