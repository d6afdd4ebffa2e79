//! Backend access
//!
//! [`ApiClient`] wraps the REST endpoints; [`Transport`] is the seam between
//! the client and the wire.

pub mod client;
pub mod transport;

pub use client::ApiClient;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
