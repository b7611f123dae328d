use std::fmt::Display;

use jobtrail_core::{CurrentJob, ExtractionResult, JobKey, JobPatch, JobRecord, TabId};
use serde::{Deserialize, Serialize};

/// A request crossing the messaging boundary, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    OpenPanel,
    ScrapeRequest,
    GetCurrentJob,
    SaveJob {
        job_id: JobKey,
        job: JobRecord,
    },
    DeleteJob {
        job_id: JobKey,
    },
    UpdateJob {
        job_id: JobKey,
        updated_job: JobPatch,
    },
    ListRecentJobs,
    LoginStatusChanged {
        logged_in: bool,
    },
}

/// Answer to a [`Request`]. Serialized without a tag; each shape is what the
/// requesting context expects for its request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Empty {},
    Extraction(ExtractionResult),
    CurrentJob(CurrentJob),
    #[serde(rename_all = "camelCase")]
    JobAck {
        job_id: JobKey,
        success: bool,
        message: String,
    },
    Updated {
        success: bool,
    },
    Recent {
        success: bool,
        data: Vec<JobRecord>,
    },
    Status {
        status: String,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl Response {
    pub fn failure(error: impl Display) -> Self {
        Response::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure { .. })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            serde_json::json!({ "success": false, "error": err.to_string() }).to_string()
        })
    }
}

/// Tab update notification as delivered by the browser host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub tab_id: TabId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NavigationEvent {
    pub fn new(tab_id: TabId, status: &str, url: &str) -> Self {
        Self {
            tab_id,
            status: Some(status.to_string()),
            url: Some(url.to_string()),
        }
    }
}
