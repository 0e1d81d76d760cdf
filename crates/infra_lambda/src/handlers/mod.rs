//! One module per handler, mirroring the deployed function layout.

pub mod connect;
pub mod default_route;
pub mod disconnect;
pub mod health;

pub use connect::handle_connect;
pub use default_route::handle_default;
pub use disconnect::handle_disconnect;
pub use health::handle_health;
