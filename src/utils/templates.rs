//! Receipt template.
//!
//! The Handlebars template and the shop configuration it is rendered with are
//! read once by [`ReceiptTemplate::load`]; the resulting handle is immutable
//! and shared through application state.

use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use crate::config::{RECEIPT_CONFIG_FILE, RECEIPT_TEMPLATE_FILE};
use crate::domain::receipt::format_currency;
use crate::domain::Receipt;
use crate::errors::{AppError, AppResult};

const TEMPLATE_NAME: &str = "receipt";

handlebars_helper!(currency: |amount: f64| format_currency(amount));

/// Compiled receipt template plus the static data merged into every render.
pub struct ReceiptTemplate {
    registry: Handlebars<'static>,
    config: Value,
}

impl std::fmt::Debug for ReceiptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptTemplate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReceiptTemplate {
    /// Load `template.hbs` and `app.json` from `dir`.
    pub async fn load(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        let template_path = dir.join(RECEIPT_TEMPLATE_FILE);
        let config_path = dir.join(RECEIPT_CONFIG_FILE);

        let source = tokio::fs::read_to_string(&template_path)
            .await
            .map_err(|e| {
                AppError::internal(format!("Failed to read {}: {}", template_path.display(), e))
            })?;
        let raw_config = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| {
                AppError::internal(format!("Failed to read {}: {}", config_path.display(), e))
            })?;
        let config: Value = serde_json::from_str(&raw_config).map_err(|e| {
            AppError::internal(format!("Invalid JSON in {}: {}", config_path.display(), e))
        })?;

        tracing::debug!(path = %template_path.display(), "Receipt template loaded");

        Self::from_parts(&source, config)
    }

    /// Compile a template from memory.
    pub fn from_parts(source: &str, config: Value) -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_helper("currency", Box::new(currency));
        registry.register_template_string(TEMPLATE_NAME, source)?;

        Ok(Self { registry, config })
    }

    /// Shop configuration merged under every receipt
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Render `receipt` as HTML.
    pub fn render(&self, receipt: &Receipt) -> AppResult<String> {
        let mut data = self.config.clone();
        let receipt = serde_json::to_value(receipt)
            .map_err(|e| AppError::internal(format!("Failed to serialize receipt: {}", e)))?;
        merge_deep(&mut data, receipt);

        Ok(self.registry.render(TEMPLATE_NAME, &data)?)
    }
}

/// Merge `overlay` into `base`. Objects merge key by key; any other value in
/// `overlay` replaces the one in `base`.
fn merge_deep(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_deep(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
