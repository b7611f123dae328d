use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use jobtrail_core::{
    update, AppState, AppViewModel, CurrentJob, Effect, JobState, Msg, NavPhase, PanelMode,
    RequestId, TabId, DEFAULT_TAB_LIMIT,
};
use tokio_util::sync::CancellationToken;
use trail_logging::{trail_debug, trail_error, trail_info, trail_trace, trail_warn};

use crate::{
    ExtractionHost, HostError, KvHost, NavigationEvent, PanelHost, RecordStore, Request,
    Response, SessionFlag,
};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct OrchestratorSettings {
    /// Upper bound of the `listRecentJobs` view.
    pub recent_limit: usize,
    pub tab_limit: usize,
    /// Timestamp stamped on saved jobs that carry none.
    pub added_on: Arc<dyn Fn() -> String + Send + Sync>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            tab_limit: DEFAULT_TAB_LIMIT,
            added_on: Arc::new(|| Utc::now().to_rfc3339()),
        }
    }
}

/// Background coordinator: turns navigation into panel modes, runs
/// extractions per tab and routes panel requests to the record store.
///
/// Handlers take `&self` and may run concurrently; state is only locked for
/// the duration of a pure `update` call, never across an await.
///
/// The stored state merged into an extraction is read before the result is
/// cached. A save landing in between refreshes the tab before its slot is
/// filled, so the slot keeps reporting the job as untracked until the next
/// store change or navigation.
pub struct Orchestrator {
    state: Mutex<AppState>,
    store: RecordStore,
    session: SessionFlag,
    extraction: Arc<dyn ExtractionHost>,
    panel: Arc<dyn PanelHost>,
    in_flight: Mutex<HashMap<TabId, (RequestId, CancellationToken)>>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        kv: Arc<dyn KvHost>,
        extraction: Arc<dyn ExtractionHost>,
        panel: Arc<dyn PanelHost>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            state: Mutex::new(AppState::with_tab_limit(settings.tab_limit)),
            store: RecordStore::new(kv.clone()),
            session: SessionFlag::new(kv),
            extraction,
            panel,
            in_flight: Mutex::new(HashMap::new()),
            settings,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn panel_mode(&self, tab_id: TabId) -> PanelMode {
        self.lock_state().panel_mode(tab_id)
    }

    pub fn current_job(&self, tab_id: Option<TabId>) -> CurrentJob {
        self.lock_state().current_job(tab_id)
    }

    pub fn view(&self) -> AppViewModel {
        self.lock_state().view()
    }

    pub async fn handle_navigation(&self, event: NavigationEvent) {
        let Some(phase) = event.status.as_deref().and_then(NavPhase::parse) else {
            trail_debug!(
                "Ignoring tab {} update with status {:?}",
                event.tab_id,
                event.status
            );
            return;
        };
        let url = event.url.unwrap_or_default();
        trail_debug!("Tab {} {:?} {}", event.tab_id, phase, url);
        let _ = self
            .process(Msg::Navigation {
                tab_id: event.tab_id,
                phase,
                url,
            })
            .await;
    }

    pub async fn handle_tab_activated(&self, tab_id: TabId) {
        let _ = self.process(Msg::TabActivated(tab_id)).await;
    }

    pub async fn handle_tab_closed(&self, tab_id: TabId) {
        let _ = self.process(Msg::TabClosed(tab_id)).await;
    }

    /// Parses one raw boundary message and answers it. Never fails: malformed
    /// input becomes a failure response.
    pub async fn handle_json(&self, raw: &str, sender: Option<TabId>) -> String {
        let response = match serde_json::from_str::<Request>(raw) {
            Ok(request) => self.handle_request(request, sender).await,
            Err(err) => {
                trail_warn!("Rejecting malformed message: {}", err);
                Response::failure(format!("malformed request: {err}"))
            }
        };
        response.to_json()
    }

    pub async fn handle_request(&self, request: Request, sender: Option<TabId>) -> Response {
        match request {
            Request::OpenPanel => match sender {
                Some(tab_id) => match self.panel.open(tab_id) {
                    Ok(()) => Response::Empty {},
                    Err(err) => Response::failure(err),
                },
                None => Response::failure("openPanel requires a sender tab"),
            },
            Request::ScrapeRequest => self.scrape(sender).await,
            Request::GetCurrentJob => Response::CurrentJob(self.current_job(sender)),
            Request::SaveJob { job_id, mut job } => {
                if job_id.trim().is_empty() {
                    return Response::failure("jobId is required");
                }
                job.id = job_id.clone();
                if job.added_on.is_none() {
                    job.added_on = Some((self.settings.added_on)());
                }
                let state = job.state;
                match self.store.add(job).await {
                    Ok(()) => {
                        trail_info!("Saved job {}", job_id);
                        self.record_changed(&job_id, Some(state)).await;
                        Response::JobAck {
                            job_id,
                            success: true,
                            message: "Job saved successfully".to_string(),
                        }
                    }
                    Err(err) => {
                        trail_warn!("Save of {} failed: {}", job_id, err);
                        Response::failure(err)
                    }
                }
            }
            Request::DeleteJob { job_id } => match self.store.delete(&job_id).await {
                Ok(_) => {
                    trail_info!("Deleted job {}", job_id);
                    self.record_changed(&job_id, None).await;
                    Response::JobAck {
                        job_id,
                        success: true,
                        message: "Job deleted successfully".to_string(),
                    }
                }
                Err(err) => {
                    trail_warn!("Delete of {} failed: {}", job_id, err);
                    Response::failure(err)
                }
            },
            Request::UpdateJob {
                job_id,
                updated_job,
            } => match self.store.update(&job_id, &updated_job).await {
                Ok(record) => {
                    trail_info!("Updated job {} (state {})", job_id, record.state);
                    self.record_changed(&job_id, Some(record.state)).await;
                    Response::Updated { success: true }
                }
                Err(err) => {
                    trail_warn!("Update of {} failed: {}", job_id, err);
                    Response::failure(err)
                }
            },
            Request::ListRecentJobs => {
                match self.store.list_recent(self.settings.recent_limit).await {
                    Ok(data) => Response::Recent {
                        success: true,
                        data,
                    },
                    Err(err) => {
                        trail_error!("Listing jobs failed: {}", err);
                        Response::failure(err)
                    }
                }
            }
            Request::LoginStatusChanged { logged_in } => {
                match self.process(Msg::LoginStatusChanged { logged_in }).await {
                    Ok(()) => Response::Status {
                        status: "success".to_string(),
                    },
                    Err(err) => Response::failure(err),
                }
            }
        }
    }

    async fn scrape(&self, sender: Option<TabId>) -> Response {
        let Some(tab_id) = sender.or_else(|| self.lock_state().active_tab()) else {
            return Response::failure("scrapeRequest requires a tab");
        };
        match self
            .extraction
            .scrape(tab_id, CancellationToken::new())
            .await
        {
            Ok(result) => Response::Extraction(result),
            Err(err) => Response::failure(err),
        }
    }

    async fn record_changed(&self, key: &str, state: Option<JobState>) {
        let _ = self
            .process(Msg::RecordChanged {
                key: key.to_string(),
                state,
            })
            .await;
    }

    /// Applies `msg` and runs the resulting effects until none are left.
    async fn process(&self, msg: Msg) -> Result<(), HostError> {
        let mut outcome = Ok(());
        let mut queue: VecDeque<Effect> = self.dispatch(msg).into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ShowPanel { tab_id, mode } => {
                    trail_debug!("Tab {} panel -> {:?}", tab_id, mode);
                    self.panel.show(tab_id, mode);
                }
                Effect::RequestExtraction {
                    tab_id,
                    request_id,
                    url,
                } => {
                    let msg = self.run_extraction(tab_id, request_id, &url).await;
                    queue.extend(self.dispatch(msg));
                }
                Effect::CancelExtraction { tab_id, request_id } => {
                    self.cancel_in_flight(tab_id, request_id);
                }
                Effect::PersistLoginStatus { logged_in } => {
                    if let Err(err) = self.session.set_logged_in(logged_in).await {
                        trail_error!("Persisting login status failed: {}", err);
                        outcome = Err(err);
                    }
                }
            }
        }
        outcome
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock_state();
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            trail_trace!("View changed: {:?}", state.view());
        }
        *guard = state;
        effects
    }

    async fn run_extraction(&self, tab_id: TabId, request_id: RequestId, url: &str) -> Msg {
        let cancel = CancellationToken::new();
        self.register_in_flight(tab_id, request_id, cancel.clone());
        trail_info!("Extracting tab {} ({})", tab_id, url);
        let outcome = self.extraction.scrape(tab_id, cancel.clone()).await;
        self.finish_in_flight(tab_id, request_id);

        if cancel.is_cancelled() {
            trail_debug!("Extraction {} for tab {} was superseded", request_id, tab_id);
            return Msg::ExtractionFailed { tab_id, request_id };
        }

        match outcome {
            Ok(data) => {
                let stored = match data.id.as_deref() {
                    Some(key) => self.store.exists(key).await.unwrap_or_else(|err| {
                        trail_warn!("Lookup of {} failed: {}", key, err);
                        None
                    }),
                    None => None,
                };
                Msg::ExtractionCompleted {
                    tab_id,
                    request_id,
                    job: CurrentJob::new(data, stored),
                }
            }
            Err(err) => {
                trail_warn!("Extraction for tab {} failed: {}", tab_id, err);
                Msg::ExtractionFailed { tab_id, request_id }
            }
        }
    }

    fn register_in_flight(&self, tab_id: TabId, request_id: RequestId, cancel: CancellationToken) {
        let previous = self
            .lock_in_flight()
            .insert(tab_id, (request_id, cancel));
        if let Some((_, token)) = previous {
            token.cancel();
        }
    }

    fn finish_in_flight(&self, tab_id: TabId, request_id: RequestId) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.get(&tab_id).map(|(id, _)| *id) == Some(request_id) {
            in_flight.remove(&tab_id);
        }
    }

    fn cancel_in_flight(&self, tab_id: TabId, request_id: RequestId) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.get(&tab_id).map(|(id, _)| *id) == Some(request_id) {
            if let Some((_, token)) = in_flight.remove(&tab_id) {
                trail_debug!("Cancelling extraction {} for tab {}", request_id, tab_id);
                token.cancel();
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<TabId, (RequestId, CancellationToken)>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
