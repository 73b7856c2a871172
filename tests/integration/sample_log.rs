//! CSV sample log persistence tests
//!
//! These tests verify:
//! - Initialization is idempotent and never truncates
//! - Rows come back in append order with the right columns
//! - Concurrent appends are never interleaved

use std::sync::Arc;

use pretty_assertions::assert_eq;
use system_monitor::storage::{CsvSampleLog, Initialization, SampleLog};

use crate::helpers::*;

#[tokio::test]
async fn test_initialization_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");

    let log = CsvSampleLog::new(&path);
    assert_eq!(log.ensure_initialized().await.unwrap(), Initialization::Created);
    log.append(&create_test_sample(0, 1.0, 2.0, 3.0, 4.0, Some(5.0)))
        .await
        .unwrap();

    assert_eq!(log.ensure_initialized().await.unwrap(), Initialization::Existing);
    log.close().await.unwrap();

    // a later run opens the same file again
    let rerun = CsvSampleLog::new(&path);
    assert_eq!(rerun.ensure_initialized().await.unwrap(), Initialization::Existing);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %\n2026-10-16 12:00:00,1,2,3,4,5\n"
    );
}

#[tokio::test]
async fn test_empty_existing_file_gets_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    std::fs::write(&path, "").unwrap();

    let log = CsvSampleLog::new(&path);
    assert_eq!(log.ensure_initialized().await.unwrap(), Initialization::Created);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %\n");
}

#[tokio::test]
async fn test_rows_in_append_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvSampleLog::new(dir.path().join("log.csv"));
    log.ensure_initialized().await.unwrap();

    let samples: Vec<_> = (0..10)
        .map(|i| {
            let battery = (i % 2 == 0).then_some(50.0 + i as f32);
            create_test_sample(i, i as f32 * 10.0, 40.0, 50.0, 0.5, battery)
        })
        .collect();
    for sample in &samples {
        log.append(sample).await.unwrap();
    }

    let entries = log.read_entries().unwrap();
    assert_eq!(entries.len(), samples.len());

    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.timestamp, format!("2026-10-16 12:00:{i:02}"));
        assert_eq!(entry.cpu, (i as f32 * 10.0).to_string());
        assert_eq!(entry.ram, "40");
        assert_eq!(entry.disk, "50");
        assert_eq!(entry.gpu, "0.5");
        if i % 2 == 0 {
            assert_eq!(entry.battery, (50.0 + i as f32).to_string());
        } else {
            assert_eq!(entry.battery, "N/A");
        }
    }
}

#[tokio::test]
async fn test_concurrent_appends_are_not_interleaved() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(CsvSampleLog::new(dir.path().join("log.csv")));
    log.ensure_initialized().await.unwrap();

    let tasks = (0..50).map(|i| {
        let log = log.clone();
        tokio::spawn(async move {
            log.append(&create_test_sample(i, 12.25, 40.0, 50.0, 0.0, None))
                .await
        })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let content = std::fs::read_to_string(log.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 51);
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), 6, "corrupted row: {line}");
        assert!(line.ends_with(",12.25,40,50,0,N/A"));
    }
}

#[tokio::test]
async fn test_torn_last_row_does_not_corrupt_next_append() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    // a crash cut the last row short
    std::fs::write(
        &path,
        "Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %\n\
         2026-10-16 12:00:00,1,2,3,4,5\n\
         2026-10-16 12:00:05,9",
    )
    .unwrap();

    let log = CsvSampleLog::new(&path);
    assert_eq!(log.ensure_initialized().await.unwrap(), Initialization::Existing);
    log.append(&create_test_sample(10, 11.0, 22.0, 33.0, 0.0, None))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %\n\
         2026-10-16 12:00:00,1,2,3,4,5\n\
         2026-10-16 12:00:05,9\n\
         2026-10-16 12:00:10,11,22,33,0,N/A\n"
    );

    // only the torn row is lost
    let entries = log.read_entries().unwrap();
    let timestamps: Vec<&str> = entries.iter().map(|entry| entry.timestamp.as_str()).collect();
    assert_eq!(timestamps, vec!["2026-10-16 12:00:00", "2026-10-16 12:00:10"]);
}

#[tokio::test]
async fn test_intact_file_is_not_touched_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let content = "Timestamp,CPU %,RAM %,Disk %,GPU %,Battery %\n2026-10-16 12:00:00,1,2,3,4,5\n";
    std::fs::write(&path, content).unwrap();

    let log = CsvSampleLog::new(&path);
    log.ensure_initialized().await.unwrap();
    log.close().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}
