//! Lambda handlers behind the gateways.
//!
//! This crate owns the runtime integration: the connect / disconnect /
//! default lifecycle handlers for the websocket gateway and the health
//! handler backing `GET /v1/health`, each with a thin `lambda_runtime`
//! binary in `src/bin/`. Handlers accept any JSON event, echo it to the
//! log, and return a fixed acknowledgment. None of them touches the event
//! stream yet (see DESIGN.md).

pub mod handlers;

use serde::{Deserialize, Serialize};

/// Gateway-shaped response: `statusCode` plus a JSON-encoded body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }
}

/// Fixed acknowledgment body. Rendered with `": "` separator spacing, the
/// exact wire shape existing gateway consumers assert on.
pub fn ack_body(message: &str) -> String {
    format!("{{\"message\": \"{message}\"}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ack_body_is_valid_json_with_single_message_key() {
        let body = ack_body("Connected!");
        assert_eq!(body, "{\"message\": \"Connected!\"}");

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("message"), Some(&json!("Connected!")));
    }

    #[test]
    fn response_serializes_with_status_code_field_name() {
        let response = ApiGatewayResponse::ok(ack_body("Default!"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"], "{\"message\": \"Default!\"}");
    }
}
