use jobtrail_core::{
    ExtractionResult, JobPatch, JobRecord, JobState, RecordCollection,
};
use pretty_assertions::assert_eq;

fn sample(id: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        job_title: Some("Rust Engineer".to_string()),
        company_name: Some("Acme".to_string()),
        location: Some("Berlin".to_string()),
        ..JobRecord::default()
    }
}

#[test]
fn states_are_ordered_along_the_pipeline() {
    assert!(JobState::Bookmark < JobState::Applied);
    assert!(JobState::Interviewing < JobState::Negotiation);
    assert_eq!(JobState::default(), JobState::Bookmark);
    assert_eq!(JobState::parse(" Applied "), Some(JobState::Applied));
    assert_eq!(JobState::parse("hired"), None);
}

#[test]
fn state_patch_only_touches_state() {
    let mut record = sample("1-linkedin");
    let before = record.clone();

    record.apply(&JobPatch::state(JobState::Applied));

    assert_eq!(record.state, JobState::Applied);
    assert_eq!(
        JobRecord {
            state: JobState::Bookmark,
            ..record
        },
        before
    );
}

#[test]
fn patch_fields_win_over_existing_values() {
    let mut record = sample("1-linkedin");
    let patch = JobPatch {
        location: Some("Remote, EU".to_string()),
        salary_range: Some("€70K - €90K".to_string()),
        ..JobPatch::default()
    };

    record.apply(&patch);

    assert_eq!(record.location.as_deref(), Some("Remote, EU"));
    assert_eq!(record.salary_range.as_deref(), Some("€70K - €90K"));
    assert_eq!(record.job_title.as_deref(), Some("Rust Engineer"));
}

#[test]
fn record_uses_camel_case_wire_names() {
    let record = JobRecord {
        state: JobState::Shortlisted,
        ..sample("9-linkedin")
    };
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["jobTitle"], "Rust Engineer");
    assert_eq!(value["companyName"], "Acme");
    assert_eq!(value["state"], "shortlisted");

    let parsed: JobRecord =
        serde_json::from_str(r#"{"id":"5-linkedin","jobTitle":"Dev"}"#).unwrap();
    assert_eq!(parsed.state, JobState::Bookmark);
    assert_eq!(parsed.job_title.as_deref(), Some("Dev"));
    assert_eq!(parsed.location, None);
}

#[test]
fn patch_deserializes_partial_objects() {
    let patch: JobPatch = serde_json::from_str(r#"{"state":"interviewing"}"#).unwrap();
    assert_eq!(patch, JobPatch::state(JobState::Interviewing));
}

#[test]
fn recent_view_is_newest_first_and_bounded() {
    let collection = RecordCollection {
        is_changed: true,
        data: vec![sample("1-linkedin"), sample("2-linkedin"), sample("3-linkedin")],
    };

    let ids: Vec<_> = collection.recent(2).into_iter().map(|job| job.id).collect();
    assert_eq!(ids, vec!["3-linkedin".to_string(), "2-linkedin".to_string()]);
    assert_eq!(collection.position("2-linkedin"), Some(1));
    assert!(collection.find("4-linkedin").is_none());
}

#[test]
fn extraction_becomes_record_only_with_key() {
    let mut extraction = ExtractionResult {
        job_title: Some("Dev".to_string()),
        ..ExtractionResult::default()
    };
    assert!(extraction.to_record(JobState::Bookmark, None).is_none());

    extraction.id = Some("7-linkedin".to_string());
    let record = extraction
        .to_record(JobState::Applied, Some("2024-01-01T00:00:00Z".to_string()))
        .unwrap();
    assert_eq!(record.id, "7-linkedin");
    assert_eq!(record.state, JobState::Applied);
    assert_eq!(record.job_title.as_deref(), Some("Dev"));
    assert_eq!(record.added_on.as_deref(), Some("2024-01-01T00:00:00Z"));
}
