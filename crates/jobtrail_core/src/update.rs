use crate::state::Evicted;
use crate::{is_job_page, AppState, Effect, Msg, NavPhase, PanelMode, TabId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigation { tab_id, phase, url } => navigate(&mut state, tab_id, phase, url),
        Msg::ExtractionCompleted {
            tab_id,
            request_id,
            job,
        } => {
            // Stale tickets (tab re-navigated or closed meanwhile) are dropped.
            if state.settle_extraction(tab_id, request_id, Some(job)) {
                show(&mut state, tab_id, PanelMode::JobDetail)
            } else {
                Vec::new()
            }
        }
        Msg::ExtractionFailed { tab_id, request_id } => {
            if state.settle_extraction(tab_id, request_id, None) {
                state.clear_current(tab_id);
                show(&mut state, tab_id, PanelMode::Default)
            } else {
                Vec::new()
            }
        }
        Msg::TabActivated(tab_id) => {
            let mut effects = Vec::new();
            touch(&mut state, tab_id, &mut effects);
            state.set_active_tab(tab_id);
            effects
        }
        Msg::TabClosed(tab_id) => match state.remove_tab(tab_id) {
            Some(request_id) => vec![Effect::CancelExtraction { tab_id, request_id }],
            None => Vec::new(),
        },
        Msg::RecordChanged { key, state: stored } => {
            state.refresh_record(&key, stored);
            Vec::new()
        }
        Msg::LoginStatusChanged { logged_in } => {
            state.set_logged_in(logged_in);
            vec![Effect::PersistLoginStatus { logged_in }]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn navigate(state: &mut AppState, tab_id: TabId, phase: NavPhase, url: String) -> Vec<Effect> {
    let on_job_page = is_job_page(&url);

    let mut effects = Vec::new();
    touch(state, tab_id, &mut effects);
    // Any navigation supersedes an extraction still running for the previous page,
    // including one that leaves the job site.
    if let Some(request_id) = state.take_pending(tab_id) {
        effects.push(Effect::CancelExtraction { tab_id, request_id });
    }
    state.set_url(tab_id, url.clone());

    match (phase, on_job_page) {
        // No panel transition while an unrelated page loads.
        (NavPhase::Loading, false) => {}
        (NavPhase::Loading, true) => {
            state.clear_current(tab_id);
            effects.extend(show(state, tab_id, PanelMode::Loading));
        }
        (NavPhase::Complete, true) => {
            if let Some(request_id) = state.begin_extraction(tab_id) {
                effects.push(Effect::RequestExtraction {
                    tab_id,
                    request_id,
                    url,
                });
            }
        }
        (NavPhase::Complete, false) => {
            state.clear_current(tab_id);
            effects.extend(show(state, tab_id, PanelMode::Default));
        }
    }
    effects
}

fn touch(state: &mut AppState, tab_id: TabId, effects: &mut Vec<Effect>) {
    if let Some(Evicted {
        tab_id: evicted,
        pending: Some(request_id),
    }) = state.touch_tab(tab_id)
    {
        effects.push(Effect::CancelExtraction {
            tab_id: evicted,
            request_id,
        });
    }
}

fn show(state: &mut AppState, tab_id: TabId, mode: PanelMode) -> Vec<Effect> {
    if state.set_mode(tab_id, mode) {
        vec![Effect::ShowPanel { tab_id, mode }]
    } else {
        Vec::new()
    }
}
