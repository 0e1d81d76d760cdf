use serde_json::Value;
use tracing::info;

use crate::{ack_body, ApiGatewayResponse};

const MESSAGE: &str = "Disconnected!";

/// `$disconnect` route: log the disconnection event, acknowledge.
pub fn handle_disconnect(event: Value) -> ApiGatewayResponse {
    info!(event = %event, "received disconnect event");
    ApiGatewayResponse::ok(ack_body(MESSAGE))
}
