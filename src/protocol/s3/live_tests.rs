//! Integration tests against a live S3 (or MinIO/LocalStack) bucket
//!
//! These tests are ignored by default. Environment:
//! - `S3_TEST_BUCKET`: Bucket name (default: turingdb-test-bucket)
//! - `S3_TEST_REGION`: AWS region (optional)
//! - `S3_TEST_ENDPOINT`: Custom endpoint for MinIO/LocalStack (optional)
//! - `AWS_ACCESS_KEY_ID`: Access key (optional, uses credential chain if not set)
//! - `AWS_SECRET_ACCESS_KEY`: Secret key (optional, uses credential chain if not set)
//! - `S3_TESTS_ENABLED`: Set to "1" to enable integration tests

use super::*;
use std::env;
use tempfile::TempDir;

/// Check if S3 integration tests should run
fn s3_tests_enabled() -> bool {
    env::var("S3_TESTS_ENABLED").unwrap_or_default() == "1"
}

/// Get test configuration from environment
fn get_test_config() -> S3Config {
    let bucket =
        env::var("S3_TEST_BUCKET").unwrap_or_else(|_| "turingdb-test-bucket".to_string());

    let mut config = S3Config::new(bucket);
    config.region = env::var("S3_TEST_REGION").ok();
    config.access_key = env::var("AWS_ACCESS_KEY_ID").ok();
    config.secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();

    if let Ok(endpoint) = env::var("S3_TEST_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }

    config
}

fn test_prefix() -> String {
    format!("turingdb-tests/{}/", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn test_connection_resolves_credentials() {
    if !s3_tests_enabled() {
        println!("Skipping S3 integration test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let client = S3Client::new(get_test_config())
        .await
        .expect("Failed to create client");

    client
        .test_connection()
        .await
        .expect("Failed to connect to S3");

    assert!(!client.credentials().access_key.is_empty());
    assert!(!client.credentials().secret_key.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_put_get_round_trip() {
    if !s3_tests_enabled() {
        println!("Skipping S3 integration test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let client = S3Client::new(get_test_config())
        .await
        .expect("Failed to create client");

    let dir = TempDir::new().unwrap();
    let src = dir.path().join("g.gml");
    let dst = dir.path().join("nested").join("copy.gml");
    std::fs::write(&src, b"graph [ node [ id 1 ] ]").unwrap();

    let prefix = test_prefix();
    let key = format!("{}g.gml", prefix);

    client.put(&src, &key).await.expect("put failed");
    client.get(&key, &dst).await.expect("get failed");
    assert_eq!(std::fs::read(&dst).unwrap(), std::fs::read(&src).unwrap());

    let deleted = client
        .delete_by_prefix(&prefix)
        .await
        .expect("delete failed");
    assert_eq!(deleted, 1);
}

#[tokio::test]
#[ignore]
async fn test_delete_by_prefix_leaves_other_keys() {
    if !s3_tests_enabled() {
        println!("Skipping S3 integration test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let client = S3Client::new(get_test_config())
        .await
        .expect("Failed to create client");

    let dir = TempDir::new().unwrap();
    let src = dir.path().join("blob");
    std::fs::write(&src, b"x").unwrap();

    let prefix = test_prefix();
    let inside = [format!("{}scratch/a", prefix), format!("{}scratch/b", prefix)];
    let outside = format!("{}keep", prefix);

    for key in inside.iter().chain(std::iter::once(&outside)) {
        client.put(&src, key).await.expect("put failed");
    }

    let deleted = client
        .delete_by_prefix(&format!("{}scratch/", prefix))
        .await
        .expect("delete failed");
    assert_eq!(deleted, 2);

    client
        .get(&outside, &dir.path().join("kept"))
        .await
        .expect("unrelated key was deleted");

    client.delete_by_prefix(&prefix).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_get_missing_key_is_not_found() {
    if !s3_tests_enabled() {
        println!("Skipping S3 integration test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let client = S3Client::new(get_test_config())
        .await
        .expect("Failed to create client");

    let dir = TempDir::new().unwrap();
    let err = client
        .get(&format!("{}missing", test_prefix()), &dir.path().join("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, S3Error::NotFound { .. }));
}
