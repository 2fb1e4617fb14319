mod common;

use async_trait::async_trait;
use common::{order_item, spawn_server};
use pagarme_flow::credentials::RawResponse;
use pagarme_flow::order::CheckoutSettings;
use pagarme_flow::{
    AuthenticatingClient, ExecutionPolicy, NodeError, NodeParameters, OrderExecutor, PagarMeApi, PagarMeClient,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records request bodies and answers every call with a 200.
struct RecordingClient {
    calls: Arc<Mutex<Vec<Value>>>,
    delay: Option<Duration>,
}

#[async_trait]
impl AuthenticatingClient for RecordingClient {
    async fn post_json(&self, _path: &str, body: &Value) -> anyhow::Result<RawResponse> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(body.clone());
            calls.len() - 1
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(RawResponse {
            status: 200,
            body: serde_json::to_vec(&json!({ "id": format!("or_{}", n) }))?,
        })
    }
}

fn recording_executor(delay: Option<Duration>) -> (OrderExecutor, Arc<Mutex<Vec<Value>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let client = RecordingClient { calls: calls.clone(), delay };
    let executor = OrderExecutor::new(Box::new(client), NodeParameters::default()).unwrap();
    (executor, calls)
}

fn http_executor(base: &str, token: &str) -> OrderExecutor {
    let client = PagarMeClient::new(PagarMeApi::new(token)).with_base_url(base);
    OrderExecutor::new(Box::new(client), NodeParameters::default()).unwrap()
}

#[tokio::test]
async fn creates_one_order_per_item_in_input_order() {
    let (base, captured) = spawn_server(|n, _| (200, format!(r#"{{"id":"or_{}","status":"pending"}}"#, n)));
    let executor = http_executor(&base, "abc123");

    let items = vec![order_item("Ana Silva", 500), order_item("Bia Souza", 1), order_item("Caio Lima", 999)];
    let output = executor.execute(&items).await.unwrap();

    assert_eq!(output.len(), 3);
    for (i, item) in output.iter().enumerate() {
        assert_eq!(item.paired_item.item, i);
        assert_eq!(item.json, json!({ "id": format!("or_{}", i), "status": "pending" }));
    }

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 3);
    for (request, input) in requests.iter().zip(&items) {
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/orders");
        assert_eq!(request.body["customer"]["name"], input["name"]);
        assert_eq!(request.body["items"][0]["amount"], input["amount"]);
        assert_eq!(request.body["payments"][0]["amount"], input["amount"]);
    }
}

#[tokio::test]
async fn request_carries_token_headers_and_payload() {
    let (base, captured) = spawn_server(|_, _| (200, r#"{"id":"or_1"}"#.to_string()));
    let executor = http_executor(&base, "abc123");

    let item = json!({
        "name": "Ana Silva",
        "email": "ana@example.com",
        "amount": 500,
        "code": "SKU1",
        "description": "Widget"
    });
    executor.execute(&[item]).await.unwrap();

    let requests = captured.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.headers["authorization"], "Basic abc123");
    assert_eq!(request.headers["accept"], "application/json");
    assert_eq!(request.headers["content-type"], "application/json");
    assert_eq!(
        request.body,
        json!({
            "customer": { "name": "Ana Silva", "email": "ana@example.com" },
            "items": [{ "amount": 500, "description": "Widget", "quantity": 1, "code": "SKU1" }],
            "payments": [{
                "amount": 500,
                "payment_method": "checkout",
                "checkout": {
                    "expires_in": 120,
                    "billing_address_editable": false,
                    "customer_editable": true,
                    "accepted_payment_methods": ["credit_card"],
                    "success_url": "https://dias.agency/"
                }
            }]
        })
    );
}

#[tokio::test]
async fn success_url_is_configurable() {
    let (base, captured) = spawn_server(|_, _| (200, "{}".to_string()));
    let executor = http_executor(&base, "t").with_checkout(CheckoutSettings {
        success_url: "https://shop.example/thanks".into(),
    });

    executor.execute(&[order_item("Ana", 10)]).await.unwrap();
    let requests = captured.lock().unwrap();
    assert_eq!(requests[0].body["payments"][0]["checkout"]["success_url"], "https://shop.example/thanks");
}

#[tokio::test]
async fn unauthorized_aborts_the_run() {
    let (base, captured) = spawn_server(|_, _| (401, r#"{"message":"Authorization has been denied for this request."}"#.to_string()));
    let executor = http_executor(&base, "wrong");

    let err = executor
        .execute(&[order_item("Ana", 10), order_item("Bia", 20)])
        .await
        .unwrap_err();

    match err {
        NodeError::Authentication { index, status, body } => {
            assert_eq!(index, 0);
            assert_eq!(status, 401);
            assert_eq!(body["message"], "Authorization has been denied for this request.");
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn server_error_carries_remote_body() {
    let (base, _captured) = spawn_server(|_, _| (422, r#"{"message":"customer.email is invalid"}"#.to_string()));
    let executor = http_executor(&base, "t");

    let err = executor.execute(&[order_item("Ana", 10)]).await.unwrap_err();
    assert!(err.to_string().contains("customer.email is invalid"), "message was: {}", err);
    match err {
        NodeError::OrderSubmission { index, status, body, .. } => {
            assert_eq!(index, 0);
            assert_eq!(status, Some(422));
            assert_eq!(body.unwrap()["message"], "customer.email is invalid");
        }
        other => panic!("expected submission error, got {:?}", other),
    }
}

#[tokio::test]
async fn continue_on_fail_attempts_every_item() {
    let (base, captured) = spawn_server(|n, _| {
        if n == 0 {
            (422, r#"{"message":"customer.email is invalid"}"#.to_string())
        } else {
            (200, format!(r#"{{"id":"or_{}"}}"#, n))
        }
    });
    let executor = http_executor(&base, "t").with_policy(ExecutionPolicy { continue_on_fail: true });

    let output = executor
        .execute(&[order_item("Ana", 10), order_item("Bia", 20)])
        .await
        .unwrap();

    assert_eq!(output.len(), 2);
    assert!(output[0].is_error());
    let error = output[0].json["error"].as_str().unwrap();
    assert!(error.contains("HTTP Error: 422"));
    assert!(error.contains("customer.email is invalid"));
    assert_eq!(output[0].json["status"], json!(422));
    assert_eq!(output[0].json["body"], json!({"message": "customer.email is invalid"}));
    assert!(!output[1].is_error());
    assert_eq!(output[1].json, json!({"id": "or_1"}));
    assert_eq!(output[1].paired_item.item, 1);
    assert_eq!(captured.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_api_is_a_submission_error() {
    // Nothing listens on the port once the listener is dropped.
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let executor = http_executor(&format!("http://127.0.0.1:{}", port), "t");

    let err = executor.execute(&[order_item("Ana", 10)]).await.unwrap_err();
    assert!(matches!(err, NodeError::OrderSubmission { index: 0, status: None, .. }));
}

#[tokio::test]
async fn invalid_amount_stops_before_its_request() {
    for amount in [0, 1000] {
        let (executor, calls) = recording_executor(None);
        let err = executor
            .execute(&[order_item("Ana", 10), order_item("Bia", amount)])
            .await
            .unwrap_err();

        match err {
            NodeError::Parameter { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "amount");
            }
            other => panic!("expected parameter error, got {:?}", other),
        }
        // Only the first, valid item reached the client.
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn missing_field_never_reaches_the_client() {
    for field in ["name", "email", "amount", "code", "description"] {
        let (executor, calls) = recording_executor(None);
        let mut item = order_item("Ana", 10);
        item.as_object_mut().unwrap().remove(field);

        let err = executor.execute(&[item]).await.unwrap_err();
        assert!(matches!(err, NodeError::Parameter { index: 0, .. }), "field {}", field);
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn continue_on_fail_records_parameter_errors() {
    let (executor, calls) = recording_executor(None);
    let executor = executor.with_policy(ExecutionPolicy { continue_on_fail: true });

    let output = executor
        .execute(&[order_item("Ana", 0), order_item("Bia", 20)])
        .await
        .unwrap();

    assert!(output[0].is_error());
    assert_eq!(output[1].json, json!({"id": "or_0"}));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn dropped_run_never_starts_later_items() {
    let (executor, calls) = recording_executor(Some(Duration::from_secs(30)));
    let items = vec![order_item("Ana", 10), order_item("Bia", 20)];

    let result = tokio::time::timeout(Duration::from_millis(50), executor.execute(&items)).await;
    assert!(result.is_err());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_input_produces_empty_output() {
    let (executor, calls) = recording_executor(None);
    assert!(executor.execute(&[]).await.unwrap().is_empty());
    assert!(calls.lock().unwrap().is_empty());
}
