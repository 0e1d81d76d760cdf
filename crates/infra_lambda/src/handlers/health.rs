use serde_json::Value;
use tracing::info;

use crate::{ack_body, ApiGatewayResponse};

const MESSAGE: &str = "Healthy!";

/// Backend for `GET /v1/health`.
pub fn handle_health(event: Value) -> ApiGatewayResponse {
    info!(event = %event, "received health-check event");
    ApiGatewayResponse::ok(ack_body(MESSAGE))
}
