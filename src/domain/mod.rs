//! Domain layer containing business entities and contracts.
//!
//! Nothing in here knows about PostgreSQL, Redis or HTTP. Infrastructure
//! implements the traits declared in [`repositories`], and the application
//! layer orchestrates them.
//!
//! # Architecture
//!
//! - [`entities`] - The URL record and its creation input
//! - [`repositories`] - Durable store contract
//! - [`click_event`] - Click accounting message
//! - [`click_worker`] - Background worker applying click increments
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::UrlService::resolve`] finds the URL
//! 2. A [`click_event::ClickEvent`] is pushed to a bounded channel (never awaited)
//! 3. [`click_worker::run_click_worker`] applies the increment with retry
//! 4. The counter is persisted via [`repositories::UrlRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
