//! Service Container - Centralized service access.
//!
//! Builds every application service from configuration and shared
//! infrastructure, and hands them out as trait objects.

use std::sync::Arc;

use super::{ProductManager, ProductService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{PdfClient, ProductStore};
use crate::types::Paginator;
use crate::utils::ReceiptTemplate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get product service
    fn products(&self) -> Arc<dyn ProductService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    product_service: Arc<dyn ProductService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: &Config,
        template: Arc<ReceiptTemplate>,
    ) -> AppResult<Self> {
        let repo = Arc::new(ProductStore::new(db));
        let pdf = Arc::new(PdfClient::new(
            &config.pdf_service_url,
            config.pdf_timeout_seconds,
        )?);
        let paginator = Paginator::new(config.app_serving_url.clone());

        let product_service = Arc::new(ProductManager::new(
            repo,
            paginator,
            pdf,
            template,
            config.receipts_dir.clone(),
        ));

        Ok(Self { product_service })
    }
}

impl ServiceContainer for Services {
    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}
