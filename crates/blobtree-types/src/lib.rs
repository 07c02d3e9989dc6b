//! Foundation types for blobtree.
//!
//! blobtree lays a directory tree over a flat, content-addressed BLOB store.
//! This crate holds the small value types every other blobtree crate passes
//! around.
//!
//! # Key Types
//!
//! - [`Digest`] — SHA-1 content digest returned by the BLOB store
//! - [`Locator`] — Decoded connection descriptor (namespace + endpoint URL)
//! - [`EntryInfo`] — One row of a directory listing

pub mod digest;
pub mod entry;
pub mod error;
pub mod locator;

pub use digest::Digest;
pub use entry::EntryInfo;
pub use error::{LocatorError, TypeError};
pub use locator::{decode, Locator, SCHEME};
