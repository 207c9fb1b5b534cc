//! # Courier - a typed HTTP API client with delegate hooks
//!
//! Courier is a generic, typed HTTP client built on top of `reqwest`. A call
//! is described as an immutable [`Request<T>`] (method, path, query, optional
//! JSON body, expected response type); the client builds the URL, dispatches
//! the request, validates the status code, decodes the body, and returns a
//! [`Response<T>`] envelope that keeps the raw bytes, the exact transport
//! request sent, the status code, and the headers.
//!
//! A [`ClientDelegate`] customizes the pipeline at three points: mutating
//! outgoing requests (e.g. auth headers), deciding a single bounded retry
//! after a failed first attempt (e.g. after refreshing a token), and mapping
//! non-2xx responses into domain errors.
//!
//! ## Quick start
//!
//! ```no_run
//! use courier::{Client, Request};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewEmails(Vec<String>);
//!
//! #[derive(Deserialize)]
//! struct User {
//!     login: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), courier::Error> {
//!     let client = Client::builder("api.github.com").build()?;
//!
//!     // Decode into a typed value.
//!     let user: User = client.value(Request::get("/user")).await?;
//!     println!("logged in as {}", user.login);
//!
//!     // Keep the envelope for status, headers, and raw bytes.
//!     let response = client.send::<Vec<User>>(Request::get("/user/followers")).await?;
//!     println!("{} followers, {} bytes", response.value.len(), response.data.len());
//!
//!     // Fire-and-forget: any 2xx succeeds, the body is never decoded.
//!     let emails = NewEmails(vec!["octocat@github.com".to_string()]);
//!     client.send_void(Request::post("/user/emails", emails)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retry model
//!
//! The client performs at most one retry per call, decided once by the
//! delegate, and only after the first attempt fails with a transport error or
//! an invalid response. The second attempt's outcome is terminal. URL, encode,
//! and decode failures never reach the retry hook. This keeps one-shot
//! recovery flows (refresh a token, retry the call) possible without allowing
//! retry storms.
//!
//! ## Concurrency
//!
//! [`Client`] is cheaply clonable and all of its state is immutable after
//! construction, so one instance can serve many concurrent tasks. Cancelling
//! a caller's task (dropping the future) aborts the in-flight transport
//! operation, including during the delegate's retry decision.

mod client;
mod delegate;
mod endpoint;
mod error;
mod request;
mod response;
mod serializer;

pub use client::{Client, ClientBuilder, Config};
pub use delegate::ClientDelegate;
pub use error::{Error, Result};
pub use request::Request;
pub use response::Response;
pub use serializer::Serializer;
