//! Event translation, storage hand-off and response assembly.

mod common;

use edgemark::service::{DirectInvocation, TriggerEvent};
use serde_json::json;

use common::*;

fn square_png() -> Vec<u8> {
    png_bytes(&squares_image(100, 100, &[Square::new(35, 35, 30)]))
}

fn handler(store: MemoryObjectStore) -> EventHandler<MemoryObjectStore> {
    EventHandler::new(store, ServiceConfig::default())
}

fn failure_kind(response: &Response) -> Option<ErrorKind> {
    match &response.body {
        ResponseBody::Failure(body) => Some(body.kind),
        ResponseBody::Success(_) => None,
    }
}

#[tokio::test]
async fn test_direct_invocation_success() -> anyhow::Result<()> {
    let store = store_with_object("uploads/square.png", square_png()).await;
    let handler = handler(store);

    let payload = json!({
        "imageId": "img-42",
        "s3Key": "uploads/square.png",
        "bucket": TEST_BUCKET,
        "timestamp": "2026-10-16T09:30:00Z"
    });
    let response = handler.handle(&payload).await;

    assert_eq!(response.status_code, 200);
    let ResponseBody::Success(body) = &response.body else {
        panic!("expected success, got {:?}", response);
    };
    assert_eq!(body.image_id.as_deref(), Some("img-42"));
    assert_eq!(body.original_key, "uploads/square.png");
    assert_eq!(body.processed_key, "processed/square.png");
    assert_eq!(
        body.processed_url,
        "https://test-bucket.s3.us-east-1.amazonaws.com/processed/square.png"
    );
    assert_eq!(body.annotations.len(), 1);
    assert_eq!(body.annotations[0].id, "contour_0");

    let stored = handler
        .store()
        .get(&ObjectLocation::new(TEST_BUCKET, "processed/square.png"))
        .await
        .expect("processed object should be stored");
    assert_eq!(stored.content_type, "image/jpeg");
    let overlay = image::load_from_memory(&stored.bytes)?;
    assert_eq!((overlay.width(), overlay.height()), (100, 100));
    Ok(())
}

#[tokio::test]
async fn test_batch_notification_success() -> anyhow::Result<()> {
    let store = store_with_object("uploads/a/b.png", square_png()).await;
    let handler = handler(store);

    let payload = json!({
        "Records": [{
            "s3": {
                "bucket": { "name": TEST_BUCKET },
                "object": { "key": "uploads/a/b.png" }
            }
        }]
    });
    let response = handler.handle(&payload).await;
    assert!(response.is_success());

    let value = serde_json::to_value(&response)?;
    assert_eq!(value["statusCode"], 200);
    assert_eq!(value["body"]["imageId"], serde_json::Value::Null);
    assert_eq!(value["body"]["processedKey"], "processed/a/b.png");
    assert_eq!(value["body"]["message"], "Image processed successfully");
    assert_eq!(value["body"]["annotations"][0]["type"], "edge");
    assert_eq!(value["body"]["annotations"][0]["label"], "Edge 1");
    Ok(())
}

#[tokio::test]
async fn test_default_bucket_applies_to_direct_invocation() {
    let store = store_with_object("uploads/square.png", square_png()).await;
    let config = ServiceConfig {
        default_bucket: Some(TEST_BUCKET.to_string()),
        ..ServiceConfig::default()
    };
    let handler = EventHandler::new(store, config);

    let response = handler
        .handle(&json!({ "s3Key": "uploads/square.png", "imageId": "x" }))
        .await;
    assert!(response.is_success());
}

#[tokio::test]
async fn test_missing_location_is_invalid_input() -> anyhow::Result<()> {
    let handler = handler(MemoryObjectStore::new(test_urls()));

    for payload in [
        json!({}),
        json!({ "bucket": TEST_BUCKET }),
        json!({ "s3Key": "uploads/x.png" }),
        json!({ "Records": [] }),
        json!("not an event"),
    ] {
        let response = handler.handle(&payload).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(failure_kind(&response), Some(ErrorKind::InvalidInputError), "{}", payload);
    }

    let response = handler.handle(&json!({})).await;
    let value = serde_json::to_value(&response)?;
    assert_eq!(value["body"]["message"], "Image processing failed");
    assert_eq!(value["body"]["kind"], "InvalidInputError");
    assert!(value["body"]["error"].as_str().unwrap_or_default().contains("Missing bucket or key"));
    assert_eq!(value["body"].as_object().map(|o| o.len()), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_missing_object_is_storage_error() {
    let handler = handler(MemoryObjectStore::new(test_urls()));
    let response = handler
        .handle(&json!({ "bucket": TEST_BUCKET, "s3Key": "uploads/nope.png" }))
        .await;
    assert_eq!(failure_kind(&response), Some(ErrorKind::StorageError));
}

#[tokio::test]
async fn test_corrupt_object_fails_without_storing() {
    let store = store_with_object("uploads/broken.png", b"\x89PNG broken".to_vec()).await;
    let handler = handler(store);

    let response = handler
        .handle(&json!({ "bucket": TEST_BUCKET, "s3Key": "uploads/broken.png" }))
        .await;
    assert_eq!(failure_kind(&response), Some(ErrorKind::DecodeError));
    assert_eq!(handler.store().len().await, 1);
}

#[test]
fn test_event_shapes_resolve_once() -> anyhow::Result<()> {
    let batch = TriggerEvent::from_value(&json!({
        "Records": [
            { "s3": { "bucket": { "name": "first" }, "object": { "key": "uploads/1.png" } } },
            { "s3": { "bucket": { "name": "second" }, "object": { "key": "uploads/2.png" } } }
        ]
    }))?;
    assert!(matches!(batch, TriggerEvent::BatchNotification { .. }));
    let target = batch.resolve(Some("ignored"))?;
    assert_eq!(target.location, ObjectLocation::new("first", "uploads/1.png"));
    assert_eq!(target.correlation_id, None);

    let direct = TriggerEvent::from_value(&json!({ "s3Key": "uploads/3.png", "imageId": "id-3" }))?;
    let target = direct.resolve(Some("fallback"))?;
    assert_eq!(target.location, ObjectLocation::new("fallback", "uploads/3.png"));
    assert_eq!(target.correlation_id.as_deref(), Some("id-3"));
    Ok(())
}

#[test]
fn test_direct_invocation_payload_shape() -> anyhow::Result<()> {
    let invocation = DirectInvocation::new("img-1", "uploads/x.png", Some("bucket".to_string()));
    assert!(invocation.requested_at().is_some());

    let value = serde_json::to_value(&invocation)?;
    assert_eq!(value["imageId"], "img-1");
    assert_eq!(value["s3Key"], "uploads/x.png");
    assert_eq!(value["bucket"], "bucket");
    assert!(value["timestamp"].is_string());
    Ok(())
}

#[test]
fn test_processed_key_naming() {
    let config = ServiceConfig::default();
    assert_eq!(config.processed_key("uploads/cat.jpg"), "processed/cat.jpg");
    assert_eq!(config.processed_key("users/7/uploads/cat.jpg"), "users/7/processed/cat.jpg");
    assert_eq!(config.processed_key("cat.jpg"), "processed/cat.jpg");
}

#[test]
fn test_public_url_styles() {
    let location = ObjectLocation::new("bucket", "processed/cat.jpg");

    let aws = PublicUrl {
        endpoint: None,
        region: "eu-west-1".to_string(),
    };
    assert_eq!(
        aws.locate(&location),
        "https://bucket.s3.eu-west-1.amazonaws.com/processed/cat.jpg"
    );

    let local = PublicUrl {
        endpoint: Some("http://localhost:4566/".to_string()),
        region: "us-east-1".to_string(),
    };
    assert_eq!(
        local.locate(&location),
        "http://localhost:4566/bucket/processed/cat.jpg"
    );
}

#[tokio::test]
async fn test_handler_uses_configured_pipeline() -> anyhow::Result<()> {
    let store = store_with_object("uploads/square.png", square_png()).await;
    let params = DetectionParams {
        min_contour_area: 10_000.0,
        ..DetectionParams::default()
    };
    let handler = handler(store).with_pipeline(Pipeline::new(params));
    assert_eq!(handler.config().processed_key("uploads/square.png"), "processed/square.png");

    let response = handler
        .handle(&json!({ "s3Key": "uploads/square.png", "bucket": TEST_BUCKET }))
        .await;

    // The square is found by the default pipeline but falls under this area bound
    let ResponseBody::Success(body) = &response.body else {
        panic!("expected success, got {:?}", response);
    };
    assert!(body.annotations.is_empty());
    assert_eq!(handler.store().len().await, 2);
    Ok(())
}

#[test]
fn test_pipeline_exposes_its_params() {
    let params = DetectionParams {
        low_threshold: 20.0,
        high_threshold: 60.0,
        ..DetectionParams::default()
    };
    let pipeline = Pipeline::new(params.clone());
    assert_eq!(pipeline.params(), &params);
    assert_eq!(Pipeline::default().params(), &DetectionParams::default());
}
