use jobtrail_core::{update, AppState, CurrentJob, Effect, ExtractionResult, Msg, NavPhase};
use pretty_assertions::assert_eq;

const JOB_URL: &str = "https://www.linkedin.com/jobs/search/?currentJobId=1001";

fn complete(state: AppState, tab_id: u32) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Navigation {
            tab_id,
            phase: NavPhase::Complete,
            url: JOB_URL.to_string(),
        },
    )
}

fn job(title: &str) -> CurrentJob {
    CurrentJob::new(
        ExtractionResult {
            id: Some("1001-linkedin".to_string()),
            job_title: Some(title.to_string()),
            ..ExtractionResult::default()
        },
        None,
    )
}

#[test]
fn first_navigated_tab_becomes_active() {
    let (state, _) = complete(AppState::new(), 9);
    assert_eq!(state.active_tab(), Some(9));
}

#[test]
fn current_job_follows_the_active_tab() {
    let (state, _) = complete(AppState::new(), 1);
    let (state, _) = complete(state, 2);
    let (state, _) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 1,
            request_id: 1,
            job: job("First"),
        },
    );
    let (state, _) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 2,
            request_id: 2,
            job: job("Second"),
        },
    );

    let title = |state: &AppState| state.current_job(None).data.and_then(|d| d.job_title);
    assert_eq!(title(&state).as_deref(), Some("First"));

    let (state, _) = update(state, Msg::TabActivated(2));
    assert_eq!(title(&state).as_deref(), Some("Second"));
    assert_eq!(
        state
            .current_job(Some(1))
            .data
            .and_then(|d| d.job_title)
            .as_deref(),
        Some("First")
    );
}

#[test]
fn closing_a_tab_evicts_it_and_cancels_its_extraction() {
    let (state, _) = complete(AppState::new(), 4);
    let (state, effects) = update(state, Msg::TabClosed(4));

    assert_eq!(
        effects,
        vec![Effect::CancelExtraction {
            tab_id: 4,
            request_id: 1
        }]
    );
    assert_eq!(state.tab_count(), 0);
    assert_eq!(state.active_tab(), None);

    // A late answer for the closed tab does not resurrect it.
    let (state, effects) = update(
        state,
        Msg::ExtractionCompleted {
            tab_id: 4,
            request_id: 1,
            job: job("Late"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.tab_count(), 0);
}

#[test]
fn closing_an_unknown_tab_is_a_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::TabClosed(11));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn tab_map_stays_bounded() {
    let state = AppState::with_tab_limit(2);
    let (state, _) = complete(state, 1);
    let (state, _) = complete(state, 2);
    let (state, effects) = complete(state, 3);

    assert_eq!(state.tab_count(), 2);
    // Tab 1 is active, so the least recently touched other tab (2) goes.
    assert_eq!(state.active_tab(), Some(1));
    assert_eq!(state.pending_request(2), None);
    assert_eq!(state.pending_request(1), Some(1));
    assert_eq!(
        effects,
        vec![
            Effect::CancelExtraction {
                tab_id: 2,
                request_id: 2
            },
            Effect::RequestExtraction {
                tab_id: 3,
                request_id: 3,
                url: JOB_URL.to_string(),
            },
        ]
    );
}

#[test]
fn tiny_limit_still_bounds_the_map() {
    let mut state = AppState::with_tab_limit(1);
    for tab_id in 1..=4 {
        state = complete(state, tab_id).0;
        assert!(state.tab_count() <= 2);
    }
    assert_eq!(state.active_tab(), Some(1));
    assert_eq!(state.pending_request(4), Some(4));
}

#[test]
fn view_lists_tabs_in_id_order() {
    let (state, _) = complete(AppState::new(), 8);
    let (state, _) = complete(state, 3);
    let ids: Vec<_> = state.view().tabs.iter().map(|tab| tab.tab_id).collect();
    assert_eq!(ids, vec![3, 8]);
}
