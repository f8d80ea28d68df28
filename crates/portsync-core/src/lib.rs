//! # portsync-core
//!
//! Core types shared by the portsync crates: the error taxonomy, HTTP
//! client tuning (timeouts, retry backoff) and Dashboard connection
//! configuration.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and conversions from transport errors
//! - [`client`] - Retry policy and HTTP client tuning
//! - [`config`] - Dashboard connection configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

pub use error::{Error, Result};
