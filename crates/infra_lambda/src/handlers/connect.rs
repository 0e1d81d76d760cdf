use serde_json::Value;
use tracing::info;

use crate::{ack_body, ApiGatewayResponse};

const MESSAGE: &str = "Connected!";

/// `$connect` route: log the connection event, acknowledge.
pub fn handle_connect(event: Value) -> ApiGatewayResponse {
    info!(event = %event, "received connect event");
    ApiGatewayResponse::ok(ack_body(MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_event_gets_connected_acknowledgment() {
        let response = handle_connect(json!({}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 200,
                "body": "{\"message\": \"Connected!\"}",
            })
        );
    }

    #[test]
    fn arbitrary_event_shape_is_accepted() {
        let response = handle_connect(json!({
            "requestContext": {"connectionId": "abc123", "routeKey": "$connect"},
            "isBase64Encoded": false,
        }));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "{\"message\": \"Connected!\"}");

        let response = handle_connect(json!(null));
        assert_eq!(response.status_code, 200);
    }
}
