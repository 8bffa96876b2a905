//! Session Server for the order risk gateway
//!
//! Accepts binary protocol frames over TCP and serves each connection
//! with its own dispatcher. One OS thread drives every session on a
//! current-thread runtime: readiness-multiplexed I/O, no locking, no
//! state shared between sessions.

pub mod config;
pub mod server;

pub use config::GatewayConfig;
pub use server::Gateway;
