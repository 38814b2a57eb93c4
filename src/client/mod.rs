//! Tenant client module
//!
//! [`SkopeClient`] owns the connection settings for one tenant (host,
//! port, protocol, token) and exposes the endpoint inventory through
//! [`SkopeClient::get_client_endpoints`].

mod skope;

pub use skope::{SkopeClient, CLIENTS_SERVICE, DEFAULT_HOST, DEFAULT_PATH_PREFIX};
