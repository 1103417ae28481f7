//! Ready-to-use clients for the ERNIE chat models.
//!
//! The crate maps model names to their endpoints and defaults, and builds
//! a [`ChatClient`](wenxin_client::ChatClient) for them. A CLI tool for
//! chatting in the terminal is included behind the `cli` feature.
//!
//! ```no_run
//! use wenxin::{ChatOptions, ErnieClient, Message};
//!
//! # async fn run() -> Result<(), wenxin::Error> {
//! let client = ErnieClient::new("ernie-4.0-8k", "client-id", "secret")?;
//! let resp = client
//!     .send_request(&[Message::user("Hello")], ChatOptions::default())
//!     .await?;
//! println!("{}", resp.result);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod ernie;
mod variants;

pub use ernie::{ErnieBuilder, ErnieClient};
pub use variants::{DEFAULT_BASE_URL, DEFAULT_MODEL, VARIANTS, Variant};
pub use wenxin_client::{ChatOptions, ChatStream, LogTracer};
pub use wenxin_model::{ChatResponse, Error, ErrorKind, Message, Role};

/// Re-exports of [`wenxin_client`] crate.
pub mod client {
    pub use wenxin_client::*;
}

/// Re-exports of [`wenxin_model`] crate.
pub mod model {
    pub use wenxin_model::*;
}
