//! Application layer services implementing business logic.
//!
//! Services consume the repository and cache traits and expose the
//! operations HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Shortening, resolution, lookup and deletion

pub mod services;
