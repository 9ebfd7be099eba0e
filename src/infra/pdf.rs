//! Client for the Cloxel HTML to PDF service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const HTML_TO_PDF_PATH: &str = "/html-to-pdf";

/// Form field that carries uploaded HTML.
const FILE_CONTENT_FIELD: &str = "fileContent";

/// Turns HTML (or a page URL) into PDF bytes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render `url_or_content`. Inputs starting with `http` are fetched by
    /// the service; anything else is uploaded as an HTML document.
    async fn html_to_pdf(&self, url_or_content: &str, filename: &str) -> AppResult<Vec<u8>>;
}

/// Print options forwarded to the renderer. Unset fields use the service defaults.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_header_footer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ranges: Option<String>,
    /// Paper format such as `A4` or `Letter`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "preferCSSPageSize", skip_serializing_if = "Option::is_none")]
    pub prefer_css_page_size: Option<bool>,
}

impl PdfOptions {
    /// Options as flat `(name, value)` pairs for a multipart form.
    fn form_fields(&self) -> Vec<(String, String)> {
        let Ok(Value::Object(fields)) = serde_json::to_value(self) else {
            return Vec::new();
        };

        fields
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect()
    }
}

/// HTTP client for the `nodemium` PDF service.
#[derive(Debug, Clone)]
pub struct PdfClient {
    client: Client,
    endpoint: String,
    options: PdfOptions,
}

impl PdfClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), HTML_TO_PDF_PATH),
            options: PdfOptions::default(),
        })
    }

    /// Use `options` for every render.
    pub fn with_options(mut self, options: PdfOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url_body(&self, url: &str, filename: &str) -> Value {
        let mut body = Map::new();
        body.insert("filename".to_string(), Value::from(filename));
        body.insert("urlOrContent".to_string(), Value::from(url));
        if let Ok(Value::Object(options)) = serde_json::to_value(&self.options) {
            body.extend(options);
        }
        Value::Object(body)
    }

    fn upload_form(&self, html: &str, filename: &str) -> AppResult<Form> {
        let content = Part::text(html.to_string())
            .file_name("content.html")
            .mime_str("text/html")?;

        let mut form = Form::new()
            .text("filename", filename.to_string())
            .text("urlOrContent", FILE_CONTENT_FIELD)
            .part(FILE_CONTENT_FIELD, content);

        for (key, value) in self.options.form_fields() {
            form = form.text(key, value);
        }

        Ok(form)
    }
}

#[async_trait]
impl PdfRenderer for PdfClient {
    async fn html_to_pdf(&self, url_or_content: &str, filename: &str) -> AppResult<Vec<u8>> {
        let request = self.client.post(&self.endpoint);

        let request = if url_or_content.starts_with("http") {
            request.json(&self.url_body(url_or_content, filename))
        } else {
            request.multipart(self.upload_form(url_or_content, filename)?)
        };

        let response = request.send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        tracing::debug!(filename, size = bytes.len(), "PDF rendered");

        Ok(bytes.to_vec())
    }
}
