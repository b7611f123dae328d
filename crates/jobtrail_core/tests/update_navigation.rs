use std::sync::Once;

use jobtrail_core::{
    update, AppState, CurrentJob, Effect, ExtractionResult, JobState, Msg, NavPhase, PanelMode,
};
use pretty_assertions::assert_eq;

const JOB_URL: &str = "https://www.linkedin.com/jobs/view/3812345678/";
const OTHER_URL: &str = "https://www.example.com/";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(trail_logging::initialize_for_tests);
}

fn navigate(state: AppState, tab_id: u32, phase: NavPhase, url: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Navigation {
            tab_id,
            phase,
            url: url.to_string(),
        },
    )
}

fn extracted(title: &str) -> CurrentJob {
    CurrentJob::new(
        ExtractionResult {
            id: Some("3812345678-linkedin".to_string()),
            job_title: Some(title.to_string()),
            company_name: Some("Acme".to_string()),
            ..ExtractionResult::default()
        },
        None,
    )
}

#[test]
fn job_page_goes_loading_then_requests_extraction() {
    init_logging();
    let (state, effects) = navigate(AppState::new(), 7, NavPhase::Loading, JOB_URL);
    assert_eq!(state.panel_mode(7), PanelMode::Loading);
    assert_eq!(
        effects,
        vec![Effect::ShowPanel {
            tab_id: 7,
            mode: PanelMode::Loading
        }]
    );

    let (state, effects) = navigate(state, 7, NavPhase::Complete, JOB_URL);
    assert_eq!(state.panel_mode(7), PanelMode::Loading);
    assert_eq!(
        effects,
        vec![Effect::RequestExtraction {
            tab_id: 7,
            request_id: 1,
            url: JOB_URL.to_string(),
        }]
    );
    assert_eq!(state.pending_request(7), Some(1));
}

#[test]
fn completed_extraction_moves_tab_to_job_detail() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 7, NavPhase::Loading, JOB_URL);
    let (state, _) = navigate(state, 7, NavPhase::Complete, JOB_URL);

    let (mut state, effects) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 7,
            request_id: 1,
            job: extracted("Rust Engineer"),
        },
    );

    assert_eq!(state.panel_mode(7), PanelMode::JobDetail);
    assert_eq!(
        effects,
        vec![Effect::ShowPanel {
            tab_id: 7,
            mode: PanelMode::JobDetail
        }]
    );
    let current = state.current_job(Some(7));
    assert!(!current.is_exists);
    assert_eq!(
        current.data.unwrap().job_title.as_deref(),
        Some("Rust Engineer")
    );
    assert_eq!(state.pending_request(7), None);
    assert!(state.consume_dirty());
}

#[test]
fn non_job_page_complete_returns_to_default() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 3, NavPhase::Loading, JOB_URL);
    let (state, effects) = navigate(state, 3, NavPhase::Complete, OTHER_URL);

    assert_eq!(state.panel_mode(3), PanelMode::Default);
    assert_eq!(
        effects,
        vec![Effect::ShowPanel {
            tab_id: 3,
            mode: PanelMode::Default
        }]
    );
}

#[test]
fn loading_on_non_job_page_keeps_panel_mode() {
    init_logging();
    let (state, effects) = navigate(AppState::new(), 3, NavPhase::Loading, OTHER_URL);

    assert!(effects.is_empty());
    assert_eq!(state.panel_mode(3), PanelMode::Default);
    assert_eq!(state.current_job(Some(3)), CurrentJob::default());
}

#[test]
fn leaving_for_non_job_page_cancels_running_extraction() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 1, NavPhase::Loading, JOB_URL);
    let (state, _) = navigate(state, 1, NavPhase::Complete, JOB_URL);
    assert_eq!(state.pending_request(1), Some(1));

    let (state, effects) = navigate(state, 1, NavPhase::Loading, OTHER_URL);
    assert_eq!(
        effects,
        vec![Effect::CancelExtraction {
            tab_id: 1,
            request_id: 1
        }]
    );
    assert_eq!(state.pending_request(1), None);
    assert_eq!(state.panel_mode(1), PanelMode::Loading);

    let (state, effects) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 1,
            request_id: 1,
            job: extracted("Left behind"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.panel_mode(1), PanelMode::Loading);
    assert_eq!(state.current_job(Some(1)), CurrentJob::default());
}

#[test]
fn stale_extraction_is_discarded_after_renavigation() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 1, NavPhase::Complete, JOB_URL);
    assert_eq!(state.pending_request(1), Some(1));

    // The user moved to another job before the first extraction answered.
    let (state, effects) = navigate(state, 1, NavPhase::Loading, JOB_URL);
    assert_eq!(
        effects,
        vec![
            Effect::CancelExtraction {
                tab_id: 1,
                request_id: 1
            },
            Effect::ShowPanel {
                tab_id: 1,
                mode: PanelMode::Loading
            },
        ]
    );
    let (state, _) = navigate(state, 1, NavPhase::Complete, JOB_URL);
    assert_eq!(state.pending_request(1), Some(2));

    let (state, effects) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 1,
            request_id: 1,
            job: extracted("Old"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.panel_mode(1), PanelMode::Loading);
    assert_eq!(state.current_job(Some(1)), CurrentJob::default());

    let (state, _) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 1,
            request_id: 2,
            job: extracted("New"),
        },
    );
    assert_eq!(
        state.current_job(Some(1)).data.unwrap().job_title.as_deref(),
        Some("New")
    );
}

#[test]
fn failed_extraction_falls_back_to_default() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 2, NavPhase::Loading, JOB_URL);
    let (state, _) = navigate(state, 2, NavPhase::Complete, JOB_URL);
    let (state, effects) = update(
        state,
        Msg::ExtractionFailed {
            tab_id: 2,
            request_id: 1,
        },
    );

    assert_eq!(state.panel_mode(2), PanelMode::Default);
    assert_eq!(
        effects,
        vec![Effect::ShowPanel {
            tab_id: 2,
            mode: PanelMode::Default
        }]
    );
}

#[test]
fn current_job_is_empty_until_extraction_completes() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.current_job(None), CurrentJob::default());

    let (state, _) = navigate(state, 4, NavPhase::Complete, JOB_URL);
    let payload = state.current_job(None);
    assert_eq!(payload.data, None);
    assert!(!payload.is_exists);
    assert_eq!(payload.job_state, None);
}

#[test]
fn record_changes_refresh_cached_slots() {
    init_logging();
    let (state, _) = navigate(AppState::new(), 5, NavPhase::Complete, JOB_URL);
    let (state, _) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 5,
            request_id: 1,
            job: extracted("Rust Engineer"),
        },
    );

    let (state, effects) = update(
        state,
        Msg::RecordChanged {
            key: "3812345678-linkedin".to_string(),
            state: Some(JobState::Applied),
        },
    );
    assert!(effects.is_empty());
    let current = state.current_job(Some(5));
    assert!(current.is_exists);
    assert_eq!(current.job_state, Some(JobState::Applied));

    let (state, _) = update(
        state,
        Msg::RecordChanged {
            key: "3812345678-linkedin".to_string(),
            state: None,
        },
    );
    let current = state.current_job(Some(5));
    assert!(!current.is_exists);
    assert_eq!(current.job_state, None);
}

#[test]
fn login_status_is_mirrored_and_persisted() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::LoginStatusChanged { logged_in: true });

    assert!(state.is_logged_in());
    assert!(state.view().logged_in);
    assert_eq!(effects, vec![Effect::PersistLoginStatus { logged_in: true }]);
}
