//! Configuration for scratch database connections and the share client.
//!
//! # Module Structure
//! - `connection`: Pool sizing and timeouts for the dev database
//! - `share`: Endpoint, timeout and transport for the visualization API

mod connection;
mod share;

pub use connection::ConnectionConfig;
pub use share::{DEFAULT_ENDPOINT, DEFAULT_SHARE_TIMEOUT, ShareConfig};
