use serde::{Deserialize, Serialize};

/// Deduplication identity of a tracked job: `"<nativeId>-<source>"`.
pub type JobKey = String;

/// Lifecycle of a tracked application, in pipeline order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    Bookmark,
    Applied,
    Shortlisted,
    Interviewing,
    Negotiation,
}

impl JobState {
    pub const ALL: [JobState; 5] = [
        JobState::Bookmark,
        JobState::Applied,
        JobState::Shortlisted,
        JobState::Interviewing,
        JobState::Negotiation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Bookmark => "bookmark",
            JobState::Applied => "applied",
            JobState::Shortlisted => "shortlisted",
            JobState::Interviewing => "interviewing",
            JobState::Negotiation => "negotiation",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(raw))
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(default)]
    pub id: JobKey,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub logo_src: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub work_type: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub state: JobState,
    #[serde(default)]
    pub added_on: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl JobRecord {
    /// Merges every field present in `patch` into the record. Absent fields are kept.
    pub fn apply(&mut self, patch: &JobPatch) {
        fn merge(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        merge(&mut self.job_title, &patch.job_title);
        merge(&mut self.location, &patch.location);
        merge(&mut self.company_name, &patch.company_name);
        merge(&mut self.logo_src, &patch.logo_src);
        merge(&mut self.job_description, &patch.job_description);
        merge(&mut self.employment_type, &patch.employment_type);
        merge(&mut self.work_type, &patch.work_type);
        merge(&mut self.salary_range, &patch.salary_range);
        merge(&mut self.added_on, &patch.added_on);
        merge(&mut self.url, &patch.url);
        if let Some(state) = patch.state {
            self.state = state;
        }
    }
}

/// Partial update of a [`JobRecord`]. The key itself is not patchable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl JobPatch {
    pub fn state(state: JobState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }
}

/// Persisted collection: insertion order is save order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCollection {
    #[serde(default)]
    pub is_changed: bool,
    #[serde(default)]
    pub data: Vec<JobRecord>,
}

impl RecordCollection {
    pub fn position(&self, key: &str) -> Option<usize> {
        self.data.iter().position(|job| job.id == key)
    }

    pub fn find(&self, key: &str) -> Option<&JobRecord> {
        self.data.iter().find(|job| job.id == key)
    }

    /// Most recently saved first, at most `limit` records.
    pub fn recent(&self, limit: usize) -> Vec<JobRecord> {
        self.data.iter().rev().take(limit).cloned().collect()
    }
}
