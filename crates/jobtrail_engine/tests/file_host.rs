use std::fs;
use std::sync::Arc;

use jobtrail_core::{JobRecord, JobState};
use jobtrail_engine::{ensure_data_dir, FileHost, KvHost, RecordStore, JOBS_KEY};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("data");
    ensure_data_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn rejects_a_file_as_data_dir() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain");
    fs::write(&file, "x").unwrap();
    assert!(FileHost::open(&file).is_err());
}

#[tokio::test]
async fn values_round_trip_through_json_files() {
    let temp = TempDir::new().unwrap();
    let host = FileHost::open(temp.path()).unwrap();

    assert_eq!(host.get("loginStatus").await.unwrap(), None);
    host.set("loginStatus", json!(true)).await.unwrap();
    assert_eq!(host.get("loginStatus").await.unwrap(), Some(json!(true)));
    assert!(temp.path().join("loginStatus.json").is_file());

    host.remove("loginStatus").await.unwrap();
    host.remove("loginStatus").await.unwrap();
    assert_eq!(host.get("loginStatus").await.unwrap(), None);
}

#[tokio::test]
async fn keys_that_escape_the_directory_are_rejected() {
    let temp = TempDir::new().unwrap();
    let host = FileHost::open(temp.path()).unwrap();

    let err = host.set("../outside", json!(1)).await.unwrap_err();
    assert!(err.message.contains("invalid storage key"));
    assert!(host.get("").await.is_err());
}

#[tokio::test]
async fn records_survive_reopening_the_directory() {
    trail_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let job = JobRecord {
        id: "3901234567-linkedin".to_string(),
        job_title: Some("Platform Engineer".to_string()),
        state: JobState::Interviewing,
        ..JobRecord::default()
    };

    {
        let store = RecordStore::new(Arc::new(FileHost::open(temp.path()).unwrap()));
        store.add(job.clone()).await.unwrap();
    }

    let store = RecordStore::new(Arc::new(FileHost::open(temp.path()).unwrap()));
    assert_eq!(store.get().await.unwrap().data, vec![job]);
    assert_eq!(
        store.exists("3901234567-linkedin").await.unwrap(),
        Some(JobState::Interviewing)
    );

    let raw = fs::read_to_string(temp.path().join(format!("{JOBS_KEY}.json"))).unwrap();
    assert!(raw.contains("\"isChanged\": true"));
    assert!(raw.contains("\"jobTitle\": \"Platform Engineer\""));
}

#[tokio::test]
async fn corrupt_collection_surfaces_as_host_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(format!("{JOBS_KEY}.json")), "{not json").unwrap();

    let store = RecordStore::new(Arc::new(FileHost::open(temp.path()).unwrap()));
    assert!(store.get().await.is_err());
}
