//! Web surface for the simulator.
//!
//! Serves a small page for picking a driver and grid slot, and a JSON
//! endpoint returning the finishing position summary.
//!
//! ## Usage
//!
//! Build with web feature:
//! ```sh
//! cargo build --features web
//! ```
//!
//! Run with web server:
//! ```sh
//! ./target/debug/pitwall --serve        # PORT env var, else 5000
//! ./target/debug/pitwall --serve=8080   # Custom port
//! ```

#[cfg(feature = "web")]
mod server;

#[cfg(feature = "web")]
pub use server::{
    parse_request_head, route, start_web_server, HttpRequest, HttpResponse, ServerConfig,
    WebServer,
};
