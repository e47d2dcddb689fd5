//! Velaa fleet management API client.
//!
//! Talks to the Velaa REST backend and transparently degrades to a local
//! simulation ("demo mode") the first time the backend cannot be reached.

mod client;
mod error;
mod operation;
pub mod phone;
mod presentation;
mod simulated;
mod transport;
mod types;

pub use client::{ClientConfig, VelaaClient, DEFAULT_BASE_URL, DEMO_MODE_WARNING};
pub use error::{ApiError, ErrorKind, NETWORK_FAILURE};
pub use operation::Operation;
pub use presentation::{LoadingTracker, NotificationKind, PresentationSink, TracingSink};
pub use simulated::{
    SimulatedBackend, DEFAULT_SIMULATED_LATENCY, DEMO_MIN_PASSWORD_LEN, DEMO_OTP,
};
pub use transport::{ApiRequest, HttpTransport, Transport, DEFAULT_TIMEOUT};
pub use types::*;
