use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, TabRowView};
use crate::{CurrentJob, JobState};

pub type TabId = u32;
pub type RequestId = u64;

const MIN_TAB_LIMIT: usize = 2;

/// Tabs tracked at once before the least recently touched one is dropped.
pub const DEFAULT_TAB_LIMIT: usize = 64;

/// What the companion panel shows for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelMode {
    #[default]
    Default,
    Loading,
    JobDetail,
}

/// Navigation lifecycle phases that drive transitions. Other phases are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Loading,
    Complete,
}

impl NavPhase {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "loading" => Some(NavPhase::Loading),
            "complete" => Some(NavPhase::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TabEntry {
    mode: PanelMode,
    url: Option<String>,
    pending: Option<RequestId>,
    current: Option<CurrentJob>,
    touched: u64,
}

/// A tab dropped to keep the map bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Evicted {
    pub tab_id: TabId,
    pub pending: Option<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    tabs: BTreeMap<TabId, TabEntry>,
    active_tab: Option<TabId>,
    next_request_id: RequestId,
    clock: u64,
    tab_limit: usize,
    logged_in: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_tab_limit(DEFAULT_TAB_LIMIT)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State keeping at most `tab_limit` tabs. The limit is raised to 2 because
    /// neither the active tab nor the tab being touched is ever evicted.
    pub fn with_tab_limit(tab_limit: usize) -> Self {
        Self {
            tabs: BTreeMap::new(),
            active_tab: None,
            next_request_id: 1,
            clock: 0,
            tab_limit: tab_limit.max(MIN_TAB_LIMIT),
            logged_in: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            active_tab: self.active_tab,
            tabs: self
                .tabs
                .iter()
                .map(|(tab_id, entry)| TabRowView {
                    tab_id: *tab_id,
                    mode: entry.mode,
                    url: entry.url.clone(),
                    pending: entry.pending,
                    has_job: entry.current.is_some(),
                })
                .collect(),
            logged_in: self.logged_in,
            dirty: self.dirty,
        }
    }

    pub fn panel_mode(&self, tab_id: TabId) -> PanelMode {
        self.tabs
            .get(&tab_id)
            .map(|entry| entry.mode)
            .unwrap_or_default()
    }

    /// Cached job for `tab_id`, or for the active tab when no tab is given.
    /// Falls back to the empty payload when nothing has completed yet.
    pub fn current_job(&self, tab_id: Option<TabId>) -> CurrentJob {
        tab_id
            .or(self.active_tab)
            .and_then(|tab_id| self.tabs.get(&tab_id))
            .and_then(|entry| entry.current.clone())
            .unwrap_or_default()
    }

    pub fn pending_request(&self, tab_id: TabId) -> Option<RequestId> {
        self.tabs.get(&tab_id).and_then(|entry| entry.pending)
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.active_tab
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Marks `tab_id` as most recently used, creating it if needed. When the map
    /// overflows, the least recently touched tab other than `tab_id` and the
    /// active tab is evicted and returned.
    pub(crate) fn touch_tab(&mut self, tab_id: TabId) -> Option<Evicted> {
        self.clock += 1;
        let clock = self.clock;
        self.tabs.entry(tab_id).or_default().touched = clock;
        if self.active_tab.is_none() {
            self.active_tab = Some(tab_id);
        }

        if self.tabs.len() <= self.tab_limit {
            return None;
        }
        let victim = self
            .tabs
            .iter()
            .filter(|(id, _)| **id != tab_id && Some(**id) != self.active_tab)
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(id, _)| *id)?;
        let entry = self.tabs.remove(&victim)?;
        Some(Evicted {
            tab_id: victim,
            pending: entry.pending,
        })
    }

    pub(crate) fn remove_tab(&mut self, tab_id: TabId) -> Option<RequestId> {
        let entry = self.tabs.remove(&tab_id)?;
        if self.active_tab == Some(tab_id) {
            self.active_tab = None;
        }
        self.mark_dirty();
        entry.pending
    }

    pub(crate) fn set_active_tab(&mut self, tab_id: TabId) {
        self.active_tab = Some(tab_id);
        self.mark_dirty();
    }

    /// Returns true when the mode actually changed.
    pub(crate) fn set_mode(&mut self, tab_id: TabId, mode: PanelMode) -> bool {
        let Some(entry) = self.tabs.get_mut(&tab_id) else {
            return false;
        };
        if entry.mode == mode {
            return false;
        }
        entry.mode = mode;
        self.dirty = true;
        true
    }

    pub(crate) fn set_url(&mut self, tab_id: TabId, url: String) {
        if let Some(entry) = self.tabs.get_mut(&tab_id) {
            entry.url = Some(url);
        }
    }

    pub(crate) fn clear_current(&mut self, tab_id: TabId) {
        if let Some(entry) = self.tabs.get_mut(&tab_id) {
            if entry.current.take().is_some() {
                self.dirty = true;
            }
        }
    }

    /// Drops the pending ticket of a tab and returns it.
    pub(crate) fn take_pending(&mut self, tab_id: TabId) -> Option<RequestId> {
        let pending = self.tabs.get_mut(&tab_id)?.pending.take();
        if pending.is_some() {
            self.dirty = true;
        }
        pending
    }

    pub(crate) fn begin_extraction(&mut self, tab_id: TabId) -> Option<RequestId> {
        let request_id = self.next_request_id;
        let entry = self.tabs.get_mut(&tab_id)?;
        entry.pending = Some(request_id);
        self.next_request_id += 1;
        self.dirty = true;
        Some(request_id)
    }

    /// Accepts a finished extraction only if its ticket is still the pending one.
    pub(crate) fn settle_extraction(
        &mut self,
        tab_id: TabId,
        request_id: RequestId,
        job: Option<CurrentJob>,
    ) -> bool {
        let Some(entry) = self.tabs.get_mut(&tab_id) else {
            return false;
        };
        if entry.pending != Some(request_id) {
            return false;
        }
        entry.pending = None;
        if job.is_some() {
            entry.current = job;
        }
        self.dirty = true;
        true
    }

    /// Updates every cached slot that shows `key` after the store changed.
    pub(crate) fn refresh_record(&mut self, key: &str, stored: Option<JobState>) {
        for entry in self.tabs.values_mut() {
            let Some(current) = entry.current.as_mut() else {
                continue;
            };
            if current.key() == Some(key) {
                current.is_exists = stored.is_some();
                current.job_state = stored;
                self.dirty = true;
            }
        }
    }

    pub(crate) fn set_logged_in(&mut self, logged_in: bool) {
        if self.logged_in != logged_in {
            self.logged_in = logged_in;
            self.dirty = true;
        }
    }
}
