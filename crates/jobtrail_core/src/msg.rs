use crate::{CurrentJob, JobKey, JobState, NavPhase, RequestId, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A tab reached a navigation phase at `url`.
    Navigation {
        tab_id: TabId,
        phase: NavPhase,
        url: String,
    },
    /// Extraction for a ticket finished and was merged with the store lookup.
    ExtractionCompleted {
        tab_id: TabId,
        request_id: RequestId,
        job: CurrentJob,
    },
    /// The extraction context could not be reached for a ticket.
    ExtractionFailed {
        tab_id: TabId,
        request_id: RequestId,
    },
    /// The user switched to another tab.
    TabActivated(TabId),
    /// A tab was closed; its slot is evicted.
    TabClosed(TabId),
    /// The store changed for `key`; `state` is `None` once the record is gone.
    RecordChanged {
        key: JobKey,
        state: Option<JobState>,
    },
    /// Trusted login/logout notification.
    LoginStatusChanged { logged_in: bool },
    /// Fallback for placeholder wiring.
    NoOp,
}
