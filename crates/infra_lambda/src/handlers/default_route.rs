use serde_json::Value;
use tracing::info;

use crate::{ack_body, ApiGatewayResponse};

const MESSAGE: &str = "Default!";

/// `$default` catch-all route: log the event, acknowledge.
pub fn handle_default(event: Value) -> ApiGatewayResponse {
    info!(event = %event, "received default-route event");
    ApiGatewayResponse::ok(ack_body(MESSAGE))
}
