//! Lifecycle handler contract: 200 plus a fixed single-key JSON body.

use serde_json::{json, Value};

use infra_lambda::handlers::{handle_connect, handle_default, handle_disconnect, handle_health};
use infra_lambda::ApiGatewayResponse;

fn assert_fixed_acknowledgment(response: &ApiGatewayResponse, message: &str) {
    assert_eq!(response.status_code, 200);

    let body: Value = serde_json::from_str(&response.body).expect("body should be valid JSON");
    let object = body.as_object().expect("body should be a JSON object");
    assert_eq!(object.len(), 1);
    assert_eq!(object.get("message"), Some(&json!(message)));
}

#[test]
fn connect_acknowledges_empty_event() {
    let response = handle_connect(json!({}));
    assert_fixed_acknowledgment(&response, "Connected!");
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        "{\"statusCode\":200,\"body\":\"{\\\"message\\\": \\\"Connected!\\\"}\"}"
    );
}

#[test]
fn disconnect_acknowledges_empty_event() {
    let response = handle_disconnect(json!({}));
    assert_fixed_acknowledgment(&response, "Disconnected!");
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        "{\"statusCode\":200,\"body\":\"{\\\"message\\\": \\\"Disconnected!\\\"}\"}"
    );
}

#[test]
fn default_acknowledges_empty_event() {
    let response = handle_default(json!({}));
    assert_fixed_acknowledgment(&response, "Default!");
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        "{\"statusCode\":200,\"body\":\"{\\\"message\\\": \\\"Default!\\\"}\"}"
    );
}

#[test]
fn handlers_accept_arbitrary_json_serializable_events() {
    for event in [
        json!(null),
        json!(42),
        json!("text"),
        json!([{"nested": true}]),
        json!({"requestContext": {"routeKey": "$default"}}),
    ] {
        assert_fixed_acknowledgment(&handle_connect(event.clone()), "Connected!");
        assert_fixed_acknowledgment(&handle_disconnect(event.clone()), "Disconnected!");
        assert_fixed_acknowledgment(&handle_default(event.clone()), "Default!");
        assert_fixed_acknowledgment(&handle_health(event), "Healthy!");
    }
}
