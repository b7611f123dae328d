use jobtrail_core::{PanelMode, TabId};
use jobtrail_engine::{HostError, PanelHost};
use trail_logging::{trail_debug, trail_info};

/// Stands in for the companion panel when running from a terminal.
pub struct LoggingPanel;

impl PanelHost for LoggingPanel {
    fn show(&self, tab_id: TabId, mode: PanelMode) {
        trail_debug!("Panel for tab {} now shows {:?}", tab_id, mode);
    }

    fn open(&self, tab_id: TabId) -> Result<(), HostError> {
        trail_info!("Opening panel for tab {}", tab_id);
        Ok(())
    }
}
