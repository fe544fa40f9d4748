// Request service module.
// Provides the request-execution trait and its HTTP implementation.

pub mod client;
pub mod request;

pub use client::{DEFAULT_TIMEOUT, HttpService};
pub use request::{AcceptType, RequestService, ServiceRequest};
