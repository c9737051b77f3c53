//! Client for the appc metadata service available inside a running pod.
//!
//! [`MetadataClient`] fetches pod and app metadata from `$AC_METADATA_URL` and
//! caches each value for the lifetime of the client. [`Renderer`] exposes the
//! same values to text templates.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod appc;
pub mod client;
pub mod config;
pub mod error;
pub mod template;

pub use client::MetadataClient;
pub use config::Config;
pub use error::{MetadataError, Result};
pub use template::Renderer;
