pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod views;

use services::api_client::ApiClient;
use std::sync::Arc;
use views::ViewCache;

/// Shared application state: the API client and the per-view listing cache.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub views: Arc<ViewCache>,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            views: Arc::new(ViewCache::new()),
        }
    }
}
