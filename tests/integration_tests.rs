use axum::{routing::get, Json, Router};
use pulse_monitoring::routers::{create_analyzer_routes, create_provider_routes};
use pulse_monitoring::*;
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

// Поднимает router на свободном порту и возвращает его адрес
fn spawn_server(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);
    addr
}

fn spawn_provider() -> Url {
    let addr = spawn_server(create_provider_routes(ProviderState::from_config(&AppConfig::default())));
    Url::parse(&format!("http://{}/range", addr)).unwrap()
}

fn image(patient_id: &str, timestamp: &str, value: &str) -> NewImage {
    HashMap::from([
        ("patientId".to_string(), AttributeValue::number(patient_id)),
        ("timestamp".to_string(), AttributeValue::number(timestamp)),
        ("value".to_string(), AttributeValue::number(value)),
    ])
}

fn consumer_for(endpoint: &Url) -> (ChangeConsumer, AbnormalValuesHolder) {
    let holder = AbnormalValuesHolder::new();
    let evaluator = PulseEvaluator::new(
        Arc::new(HttpRangeResolver::new()),
        Arc::new(holder.clone()),
        Some(endpoint.to_string()),
    );
    (ChangeConsumer::new(evaluator, 4), holder)
}

#[tokio::test]
async fn test_range_endpoint_returns_registered_range() {
    let endpoint = spawn_provider();

    let response = reqwest::get(format!("{}?patientId=3", endpoint)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"min": 50, "max": 200}));
}

#[tokio::test]
async fn test_range_endpoint_errors_are_structured() {
    let endpoint = spawn_provider();

    let missing = reqwest::get(endpoint.clone()).await.unwrap();
    assert_eq!(missing.status(), 400);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "no patientId parameter");

    let unknown = reqwest::get(format!("{}?patientId=99", endpoint)).await.unwrap();
    assert_eq!(unknown.status(), 404);
    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["error"], "99 not found");
}

#[tokio::test]
async fn test_http_resolver_reads_range() {
    let endpoint = spawn_provider();
    let resolver = HttpRangeResolver::new();

    assert_eq!(resolver.resolve(1, &endpoint).await.unwrap(), Range::new(60, 150));

    let err = resolver.resolve(99, &endpoint).await.unwrap_err();
    assert_eq!(err.kind(), FaultKind::TransportFault);
    assert!(err.to_string().contains("99 not found"));
}

// Сервис диапазонов, который отвечает 200, но с негодным телом
fn spawn_broken_provider() -> SocketAddr {
    let app = Router::new()
        .route("/text", get(|| async { "range service is warming up" }))
        .route("/partial", get(|| async { Json(json!({ "min": 60 })) }))
        .route("/strings", get(|| async { Json(json!({ "min": "60", "max": "150" })) }));
    spawn_server(app)
}

#[tokio::test]
async fn test_http_resolver_rejects_unusable_bodies() {
    let addr = spawn_broken_provider();
    let resolver = HttpRangeResolver::new();

    for path in ["text", "partial", "strings"] {
        let endpoint = Url::parse(&format!("http://{}/{}", addr, path)).unwrap();
        let err = resolver.resolve(1, &endpoint).await.unwrap_err();
        assert_eq!(err.kind(), FaultKind::TransportFault, "{}: {}", path, err);
    }
}

#[tokio::test]
async fn test_unusable_range_body_persists_nothing() {
    let addr = spawn_broken_provider();

    for path in ["text", "partial"] {
        let endpoint = Url::parse(&format!("http://{}/{}", addr, path)).unwrap();
        let (consumer, holder) = consumer_for(&endpoint);

        let outcomes = consumer
            .handle(ChangeBatch {
                records: vec![ChangeEvent::insert(image("1", "1000", "155"))],
            })
            .await;

        assert!(matches!(
            outcomes.as_slice(),
            [RecordOutcome::Faulted { kind: FaultKind::TransportFault, .. }]
        ));
        assert_eq!(holder.len().await, 0);
    }
}

#[tokio::test]
async fn test_batch_with_unread_attribute_types_is_evaluated() {
    let endpoint = spawn_provider();
    let config = AppConfig {
        range_service_url: Some(endpoint.to_string()),
        ..AppConfig::default()
    };
    let analyzer = spawn_server(create_analyzer_routes(AnalyzerState::from_config(&config)));

    let payload = json!({
        "Records": [
            {"eventName": "INSERT", "dynamodb": {"NewImage": {
                "patientId": {"N": "1"}, "timestamp": {"N": "1000"}, "value": {"N": "100"},
                "tags": {"L": [{"S": "a"}]}
            }}},
            {"eventName": "INSERT", "dynamodb": {"NewImage": {
                "patientId": {"N": "2"}, "timestamp": {"N": "2000"}, "value": {"N": "300"}
            }}}
        ]
    });

    let response = reqwest::Client::new()
        .post(format!("http://{}/events", analyzer))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(
        summary,
        json!({"received": 2, "skipped": 0, "normal": 1, "persisted": 1, "faulted": 0})
    );
}

#[tokio::test]
async fn test_abnormal_value_is_persisted_end_to_end() {
    let endpoint = spawn_provider();
    let (consumer, holder) = consumer_for(&endpoint);

    let outcomes = consumer
        .handle(ChangeBatch {
            records: vec![
                ChangeEvent::insert(image("1", "1000", "155")),
                ChangeEvent::insert(image("1", "1001", "100")),
            ],
        })
        .await;

    let summary = BatchSummary::from_outcomes(&outcomes);
    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.normal, 1);
    assert_eq!(
        holder.get().await,
        vec![AbnormalRecord { patient_id: 1, timestamp: 1000, value: 155 }]
    );
}

#[tokio::test]
async fn test_batch_isolates_faulty_records() {
    let endpoint = spawn_provider();
    let (consumer, holder) = consumer_for(&endpoint);

    let outcomes = consumer
        .handle(ChangeBatch {
            records: vec![
                ChangeEvent::insert(image("1", "1000", "abc")),
                ChangeEvent::insert(image("42", "1000", "300")),
                ChangeEvent::insert(image("2", "2000", "165")),
            ],
        })
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(BatchSummary::from_outcomes(&outcomes).faulted, 2);
    assert_eq!(
        holder.get().await,
        vec![AbnormalRecord { patient_id: 2, timestamp: 2000, value: 165 }]
    );
}

#[tokio::test]
async fn test_analyzer_http_surface() {
    let endpoint = spawn_provider();
    let config = AppConfig {
        range_service_url: Some(endpoint.to_string()),
        ..AppConfig::default()
    };
    let analyzer = spawn_server(create_analyzer_routes(AnalyzerState::from_config(&config)));

    let payload = json!({
        "Records": [
            {"eventName": "INSERT", "dynamodb": {"NewImage": {
                "patientId": {"N": "5"}, "timestamp": {"N": "1700000000"}, "value": {"N": "45"}
            }}},
            {"eventName": "MODIFY", "dynamodb": {"NewImage": {
                "patientId": {"N": "5"}, "timestamp": {"N": "1700000001"}, "value": {"N": "250"}
            }}},
            {"eventName": "INSERT", "dynamodb": {}}
        ]
    });

    let client = reqwest::Client::new();
    let summary: Value = client
        .post(format!("http://{}/events", analyzer))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        summary,
        json!({"received": 3, "skipped": 2, "normal": 0, "persisted": 1, "faulted": 0})
    );

    let stored: Value = client
        .get(format!("http://{}/abnormal/5", analyzer))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, json!([{"patientId": 5, "timestamp": 1700000000, "value": 45}]));
}

#[test]
fn test_config_validation() {
    let mut config = AppConfig::default();

    // Конфигурация по умолчанию должна проходить
    assert!(config.validate().is_ok());
    assert_eq!(config.max_concurrent(), 10);

    config.max_concurrent_records = Some(0);
    assert!(config.validate().is_err());

    config.max_concurrent_records = Some(100);
    assert!(config.validate().is_err());

    config.max_concurrent_records = Some(5);
    config.provider_addr = "localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_configured_registry_replaces_defaults() {
    let state = ProviderState::from_config(&AppConfig {
        ranges: Some(HashMap::from([("7".to_string(), Range::new(55, 95))])),
        ..AppConfig::default()
    });

    let response = state
        .provider
        .handle_request(&HashMap::from([("patientId".to_string(), "7".to_string())]));
    assert_eq!(response.status_code, 200);

    let default_only = state
        .provider
        .handle_request(&HashMap::from([("patientId".to_string(), "1".to_string())]));
    assert_eq!(default_only.status_code, 404);
}

#[test]
fn test_in_memory_holder_filters_by_patient() {
    let holder = AbnormalValuesHolder::new();
    tokio_test::block_on(async {
        holder.persist(&AbnormalRecord { patient_id: 1, timestamp: 10, value: 200 }).await.unwrap();
        holder.persist(&AbnormalRecord { patient_id: 3, timestamp: 11, value: 20 }).await.unwrap();
        holder.persist(&AbnormalRecord { patient_id: 1, timestamp: 12, value: 30 }).await.unwrap();

        let records = holder.find_by_patient(1).await.unwrap();
        assert_eq!(records.iter().map(|r| r.timestamp).collect::<Vec<_>>(), vec![10, 12]);
        assert_eq!(holder.len().await, 3);
    });
}
