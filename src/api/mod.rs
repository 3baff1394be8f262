//! Remote dashboard API
//!
//! One JSON endpoint, parameterized per call with query pairs, answering with
//! a `{ success, data, message }` envelope.

pub mod client;
pub mod constants;
pub mod envelope;
pub mod transport;

pub use client::{ApiClient, ApiParams};
pub use envelope::{ApiFailure, Record};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
