//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ProductService, ServiceContainer, Services};
use crate::utils::ReceiptTemplate;

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Product service
    pub product_service: Arc<dyn ProductService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from the database, config and loaded receipt template.
    pub fn from_config(
        database: Arc<Database>,
        config: Config,
        template: Arc<ReceiptTemplate>,
    ) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection(), &config, template)?;

        Ok(Self::new(container.products(), database, config))
    }

    /// Create new application state with manually injected services.
    pub fn new(
        product_service: Arc<dyn ProductService>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            product_service,
            database,
            config: Arc::new(config),
        }
    }
}
