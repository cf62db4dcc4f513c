//! Core components for signing identity appliance requests.
//!
//! This crate provides the foundational types shared by the sarest crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the environment, the time source and
//!   the HTTP sender a signed call depends on
//! - **Error**: A single error type whose [`ErrorKind`] tells request-building
//!   failures, transport failures and appliance rejections apart
//!
//! ## Traits
//!
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access
//! - [`TimeSource`](time::TimeSource): For the signing time
//!
//! ## Utilities
//!
//! - [`hash`]: Keyed digest helpers
//! - [`time`]: HTTP date formatting and time sources
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};
