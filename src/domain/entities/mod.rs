//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted short URL mapping
//! - [`NewUrlRecord`] - Input for creating one; the store assigns `id`,
//!   `clicks` and `created_at`

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
