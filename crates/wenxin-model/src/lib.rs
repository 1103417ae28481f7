//! Protocol types of the ERNIE chat-completion API.
//!
//! This crate holds everything about a request that can be decided without
//! talking to the service: the message and parameter types, the checks a
//! request must pass, the response payload, and the capabilities (HTTP
//! transport, tracing, credential encryption) a client is assembled from.
//!
//! Nothing here performs I/O. The client lives in its own crate and test
//! doubles of the capabilities live in theirs.

#![deny(missing_docs)]

mod error;
mod message;
mod params;
mod response;
mod trace;
mod transport;
pub mod validate;

pub use error::*;
pub use message::*;
pub use params::*;
pub use response::*;
pub use trace::*;
pub use transport::*;
pub use validate::{validate_messages, validate_parameters};
