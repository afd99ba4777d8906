#![doc = include_str!("../README.md")]

#[cfg(feature = "compute")]
pub mod compute;
#[cfg(feature = "object_storage")]
pub mod object_storage;

#[cfg(feature = "echo")]
pub mod echo;

/// Authentication seam shared by every service client.
pub mod auth;

mod error;
mod metadata;
mod page;
pub(crate) mod service;

pub use error::Error;
pub use metadata::MetadataMap;
pub use page::Page;
