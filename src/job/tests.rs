//! Tests for job module

use super::*;
use crate::config::RetryConfig;
use crate::output::tests::{Fault, FaultyStore};
use crate::output::PublishOutcome;
use crate::types::OutputFormat;
use bytes::Bytes;
use futures::StreamExt;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const RAW_DROP: &str = r#"{"record_type":"customer","customer_id":"c-1","name":"Ada"}
{"record_type":"order","order_id":null,"customer_id":"c-2","quantity":1,"price":10,"order_amount":10}
{"record_type":"order","order_id":"ORD-1","customer_id":"c-2","quantity":0,"price":10,"order_amount":10}
{"record_type":"order","order_id":" ORD-123456 ","customer_id":"c-1","order_date":"2025-01-15 10:20:30","product":"zzz","quantity":2,"price":100,"discount_pct":10,"order_amount":null}
{"record_type":"payment","order_id":"ORD-123456","status":"Pending"}
not json at all
"#;

struct Fixture {
    raw: Arc<InMemory>,
    output: Arc<InMemory>,
    job: TransformJob,
}

fn fixture(format: OutputFormat) -> Fixture {
    let raw = Arc::new(InMemory::new());
    let output = Arc::new(InMemory::new());
    let config = JobConfig {
        output_format: format,
        retry: RetryConfig::immediate(1),
        ..JobConfig::default()
    };
    let policy = RetryPolicy::from(&config.retry);
    let job = TransformJob::new(
        "test-run",
        config,
        Storage::from_store(raw.clone(), policy.clone()),
        Storage::from_store(output.clone(), policy),
    )
    .unwrap();
    Fixture { raw, output, job }
}

async fn put_raw(store: &InMemory, key: &str, body: &str) {
    store
        .put(&ObjectPath::from(key), Bytes::from(body.to_string()).into())
        .await
        .unwrap();
}

async fn read(store: &InMemory, key: &str) -> String {
    let bytes = store
        .get(&ObjectPath::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_job_name_is_required() {
    let store = Arc::new(InMemory::new());
    let storage = Storage::from_store(store, RetryPolicy::immediate(0));
    let result = TransformJob::new("  ", JobConfig::default(), storage.clone(), storage);
    assert!(matches!(
        result,
        Err(Error::MissingConfigField { field }) if field == "job_name"
    ));
}

#[test]
fn test_job_rejects_invalid_config() {
    let store = Arc::new(InMemory::new());
    let storage = Storage::from_store(store, RetryPolicy::immediate(0));
    let config = JobConfig {
        run_timeout_secs: 0,
        ..JobConfig::default()
    };
    let result = TransformJob::new("run", config, storage.clone(), storage);
    assert!(matches!(result, Err(Error::InvalidConfigValue { .. })));
}

#[test]
fn test_from_config_opens_memory_stores() {
    let mut config = JobConfig::default();
    config.raw.url = "memory://".into();
    config.output.url = "memory://".into();
    let job = TransformJob::from_config("run", config).unwrap();
    assert_eq!(job.name(), "run");
    assert_eq!(job.config().output_format, OutputFormat::Csv);
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test]
async fn test_run_without_input_is_a_no_op() {
    let fx = fixture(OutputFormat::Csv);
    put_raw(&fx.raw, "raw/ecommerce/notes.txt", "ignored").await;

    let report = fx.job.run().await.unwrap();
    report.commit();

    assert!(report.is_no_input());
    assert_eq!(report.job_name, "test-run");
    assert_eq!(report.published_key(), None);
    assert_eq!(report.rows_out(), 0);
    assert!(fx.output.list(None).next().await.is_none());
}

#[tokio::test]
async fn test_run_transforms_newest_drop() {
    let fx = fixture(OutputFormat::Csv);
    put_raw(
        &fx.raw,
        "raw/ecommerce/ecommerce_unified_2025-01-01-00-00-00.jsonl",
        r#"{"record_type":"order","order_id":"ORD-OLD","quantity":1,"price":1}"#,
    )
    .await;
    put_raw(
        &fx.raw,
        "raw/ecommerce/ecommerce_unified_2025-01-02-00-00-00.jsonl",
        RAW_DROP,
    )
    .await;

    let report = fx.job.run().await.unwrap();
    report.commit();

    let RunOutcome::Completed {
        source,
        decode,
        transform,
        part_key,
        publish,
    } = &report.outcome
    else {
        panic!("expected a completed run, got {:?}", report.outcome);
    };

    assert_eq!(
        source,
        "memory://raw/ecommerce/ecommerce_unified_2025-01-02-00-00-00.jsonl"
    );
    assert_eq!(decode.malformed_lines, 1);
    assert_eq!(decode.orders, 3);
    assert_eq!(decode.payments, 1);
    assert_eq!(transform.orders_seen, 3);
    assert_eq!(transform.orders_dropped, 2);
    assert_eq!(transform.unmatched_orders, 0);
    assert_eq!(transform.rows_out, 1);

    let key = report.published_key().unwrap().to_string();
    assert!(matches!(publish, PublishOutcome::Published { source_deleted: true, .. }));
    assert!(key.starts_with("cleaned-csv/ecommerce/final_batch_"));
    assert!(key.contains("/ecommerce_clean_"));
    assert!(key.ends_with(".csv"));

    let csv = read(&fx.output, &key).await;
    assert_eq!(
        csv,
        concat!(
            r#""order_id","customer_id","order_date","product","quantity","order_amount","payment_status""#,
            "\n",
            r#""ORD-123456","CUST-251366","2025-01-15","Canon EOS R5","2","180.00","pending""#,
            "\n",
        )
    );

    // part removed, marker and final artifact remain
    let listing: Vec<String> = fx
        .output
        .list(None)
        .map(|meta| meta.unwrap().location.to_string())
        .collect()
        .await;
    assert_eq!(listing.len(), 2);
    assert!(!listing.contains(part_key));
    assert!(listing.iter().any(|k| k.ends_with("/_SUCCESS")));
}

#[tokio::test]
async fn test_run_with_only_corrupt_orders_writes_header() {
    let fx = fixture(OutputFormat::Csv);
    put_raw(
        &fx.raw,
        "raw/ecommerce/a.jsonl",
        r#"{"record_type":"order","order_id":"ORD-1","quantity":0}"#,
    )
    .await;

    let report = fx.job.run().await.unwrap();
    assert_eq!(report.rows_out(), 0);

    let csv = read(&fx.output, report.published_key().unwrap()).await;
    assert_eq!(csv.lines().count(), 1);
}

#[tokio::test]
async fn test_consecutive_runs_never_overwrite() {
    let fx = fixture(OutputFormat::Csv);
    put_raw(&fx.raw, "raw/ecommerce/a.jsonl", RAW_DROP).await;

    let first = fx.job.run().await.unwrap();
    let second = fx.job.run().await.unwrap();

    let first_key = first.published_key().unwrap();
    let second_key = second.published_key().unwrap();
    assert_ne!(first_key, second_key);
    assert_eq!(read(&fx.output, first_key).await, read(&fx.output, second_key).await);
}

#[tokio::test]
async fn test_run_after_raw_deleted_is_a_no_op() {
    let fx = fixture(OutputFormat::Csv);
    put_raw(&fx.raw, "raw/ecommerce/a.jsonl", RAW_DROP).await;
    assert!(!fx.job.run().await.unwrap().is_no_input());

    fx.raw
        .delete(&ObjectPath::from("raw/ecommerce/a.jsonl"))
        .await
        .unwrap();
    assert!(fx.job.run().await.unwrap().is_no_input());
}

#[tokio::test]
async fn test_run_parquet_output() {
    let fx = fixture(OutputFormat::Parquet);
    put_raw(&fx.raw, "raw/ecommerce/a.jsonl", RAW_DROP).await;

    let report = fx.job.run().await.unwrap();
    let key = report.published_key().unwrap();
    assert!(key.ends_with(".parquet"));

    let bytes = fx
        .output
        .get(&ObjectPath::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert!(bytes.starts_with(b"PAR1"));
}

async fn run_against(fault: Fault) -> (RunReport, Arc<FaultyStore>) {
    let raw = Arc::new(InMemory::new());
    let output = Arc::new(FaultyStore::new(fault));
    put_raw(&raw, "raw/ecommerce/a.jsonl", RAW_DROP).await;

    let policy = RetryPolicy::immediate(1);
    let job = TransformJob::new(
        "faulty",
        JobConfig::default(),
        Storage::from_store(raw, policy.clone()),
        Storage::from_store(output.clone(), policy),
    )
    .unwrap();
    (job.run().await.unwrap(), output)
}

#[tokio::test]
async fn test_run_commits_when_part_delete_fails() {
    let (report, output) = run_against(Fault::Delete).await;
    report.commit();

    let RunOutcome::Completed { publish, .. } = &report.outcome else {
        panic!("expected a completed run, got {:?}", report.outcome);
    };
    assert!(matches!(publish, PublishOutcome::Published { source_deleted: false, .. }));
    assert!(output
        .head(&ObjectPath::from(report.published_key().unwrap()))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_run_commits_when_rename_fails() {
    let (report, output) = run_against(Fault::FinalPut).await;
    report.commit();

    let RunOutcome::Completed {
        part_key, publish, ..
    } = &report.outcome
    else {
        panic!("expected a completed run, got {:?}", report.outcome);
    };
    assert!(matches!(publish, PublishOutcome::RenameFailed { .. }));
    assert_eq!(report.published_key(), None);
    assert_eq!(report.rows_out(), 1);
    // the written part survives for a later retry
    assert!(output.head(&ObjectPath::from(part_key.as_str())).await.is_ok());
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_no_input_report() {
    let report = RunReport::no_input("nightly").with_duration(12);
    assert_eq!(report.job_name, "nightly");
    assert_eq!(report.duration_ms, 12);
    assert!(report.is_no_input());
    report.commit();
}
