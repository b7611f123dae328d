//! Jobtrail core: data model, job page classification and the pure panel state machine.
mod effect;
mod extraction;
mod msg;
mod record;
mod route;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use extraction::{CurrentJob, ExtractionResult};
pub use msg::Msg;
pub use record::{JobKey, JobPatch, JobRecord, JobState, RecordCollection};
pub use route::{
    classify_job_url, is_job_page, job_key, job_key_for_url, native_job_id, JobRoute, SOURCE_TAG,
};
pub use state::{AppState, NavPhase, PanelMode, RequestId, TabId, DEFAULT_TAB_LIMIT};
pub use update::update;
pub use view_model::{AppViewModel, TabRowView};
