//! Integration test: Prediction endpoint

use diabetes_classifier::inference::{FeatureRecord, LabelFormat, Predictor};
use diabetes_classifier::server::{AppState, ServerConfig, create_router};
use diabetes_classifier::training::{train_and_save, TrainingConfig};
use std::path::Path;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

fn trained_predictor(dir: &Path) -> Predictor {
    let config = TrainingConfig::new()
        .with_model_path(dir.join("model.json"))
        .with_scaler_path(dir.join("scaler.json"));
    train_and_save(config).unwrap();
    Predictor::load(dir.join("model.json"), Some(dir.join("scaler.json"))).unwrap()
}

fn test_config(dir: &Path, label_format: LabelFormat) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_path: dir.join("model.json"),
        scaler_path: dir.join("scaler.json"),
        label_format,
    }
}

fn test_app(dir: &Path, label_format: LabelFormat) -> axum::Router {
    let predictor = trained_predictor(dir);
    let state = Arc::new(AppState::new(test_config(dir, label_format), predictor));
    create_router(state)
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_predict_partial_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app
        .oneshot(predict_request(r#"{"age": 0.05, "bmi": 0.02, "bp": 0.01}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let prediction = json["prediction"].as_u64().unwrap();
    assert!(prediction == 0 || prediction == 1);
    assert_eq!(json.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_predict_empty_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app.oneshot(predict_request("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["prediction"].is_u64());
}

#[tokio::test]
async fn test_sparse_request_matches_zero_filled_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = trained_predictor(dir.path());

    let mut full = FeatureRecord::new();
    for name in predictor.feature_names() {
        full.insert(name.clone(), 0.0);
    }
    full.insert("s5".to_string(), 0.09);
    let expected = predictor.predict(&full).unwrap().label.class();

    let state = Arc::new(AppState::new(test_config(dir.path(), LabelFormat::Class), predictor));
    let app = create_router(state);
    let response = app.oneshot(predict_request(r#"{"s5": 0.09}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["prediction"].as_u64(), Some(expected as u64));
}

#[tokio::test]
async fn test_identical_requests_identical_responses() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);
    let body = r#"{"bmi": 0.06, "s5": 0.03}"#;

    let first = app.clone().oneshot(predict_request(body)).await.unwrap();
    let second = app.oneshot(predict_request(body)).await.unwrap();
    assert_eq!(json_body(first).await, json_body(second).await);
}

#[tokio::test]
async fn test_predict_name_labels() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Name);

    let response = app.oneshot(predict_request(r#"{"bmi": 0.06}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let label = json["prediction"].as_str().unwrap();
    assert!(label == "Diabetic" || label == "Non-Diabetic");
}

#[tokio::test]
async fn test_invalid_json_then_still_serving() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app.clone().oneshot(predict_request("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], Value::Bool(true));

    let response = app.oneshot(predict_request(r#"{"age": 0.01}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_feature_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app
        .oneshot(predict_request(r#"{"age": 0.01, "extra_feature": 1.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("extra_feature"));
}

#[tokio::test]
async fn test_non_numeric_value_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app.oneshot(predict_request(r#"{"age": "old"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app.oneshot(predict_request("[0.1, 0.2]")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_predict_not_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), LabelFormat::Class);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_load_requires_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), LabelFormat::Class);
    assert!(AppState::load(config).is_err());
}
