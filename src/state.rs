//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::UrlService;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;

/// Dependencies shared by all HTTP handlers.
///
/// Built once at startup. Cloning is cheap: every field is reference counted
/// or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Creates the state from already constructed dependencies.
    pub fn new(
        url_service: Arc<UrlService>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            url_service,
            cache,
            click_sender,
        }
    }
}
