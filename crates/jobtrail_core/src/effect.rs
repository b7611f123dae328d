use crate::{PanelMode, RequestId, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowPanel {
        tab_id: TabId,
        mode: PanelMode,
    },
    RequestExtraction {
        tab_id: TabId,
        request_id: RequestId,
        url: String,
    },
    CancelExtraction {
        tab_id: TabId,
        request_id: RequestId,
    },
    PersistLoginStatus {
        logged_in: bool,
    },
}
