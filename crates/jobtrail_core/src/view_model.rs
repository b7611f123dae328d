use crate::{PanelMode, RequestId, TabId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_tab: Option<TabId>,
    pub tabs: Vec<TabRowView>,
    pub logged_in: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRowView {
    pub tab_id: TabId,
    pub mode: PanelMode,
    pub url: Option<String>,
    pub pending: Option<RequestId>,
    pub has_job: bool,
}
