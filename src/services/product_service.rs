//! Product service - Catalog use cases and receipt generation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::receipt::{receipt_filename, unique_ids};
use crate::domain::{CreateProduct, ProductResponse, Receipt, UpdateProduct};
use crate::errors::{AppError, AppResult};
use crate::infra::{PdfRenderer, ProductRepository};
use crate::types::{Page, PageOptions, PageSource, Paginator, Window};
use crate::utils::ReceiptTemplate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A rendered receipt
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Product service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// One page of the catalog, ordered by name
    async fn list_products(&self, options: PageOptions) -> AppResult<Page<ProductResponse>>;

    /// Add a product to the catalog
    async fn create_product(&self, input: CreateProduct) -> AppResult<ProductResponse>;

    /// Update product details
    async fn update_product(&self, id: i32, input: UpdateProduct) -> AppResult<ProductResponse>;

    /// Remove a product from the catalog
    async fn delete_product(&self, id: i32) -> AppResult<()>;

    /// Render a PDF receipt for the given basket. Ids repeat once per unit.
    async fn generate_receipt(&self, product_ids: Vec<i32>) -> AppResult<ReceiptPdf>;
}

/// The catalog as seen through the repository.
struct CatalogSource<'a> {
    repo: &'a dyn ProductRepository,
}

#[async_trait]
impl PageSource for CatalogSource<'_> {
    type Item = crate::domain::Product;
    type Error = AppError;

    async fn count(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn fetch(&self, window: Window) -> AppResult<Vec<Self::Item>> {
        self.repo.list(window).await
    }
}

/// Concrete implementation of ProductService.
pub struct ProductManager {
    repo: Arc<dyn ProductRepository>,
    paginator: Paginator,
    pdf: Arc<dyn PdfRenderer>,
    template: Arc<ReceiptTemplate>,
    receipts_dir: PathBuf,
}

impl ProductManager {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        paginator: Paginator,
        pdf: Arc<dyn PdfRenderer>,
        template: Arc<ReceiptTemplate>,
        receipts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repo,
            paginator,
            pdf,
            template,
            receipts_dir: receipts_dir.into(),
        }
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn list_products(&self, options: PageOptions) -> AppResult<Page<ProductResponse>> {
        let source = CatalogSource {
            repo: self.repo.as_ref(),
        };

        self.paginator
            .paginate_with(&source, &options, |product, _| async move {
                Ok::<_, AppError>(ProductResponse::from(product))
            })
            .await
    }

    async fn create_product(&self, input: CreateProduct) -> AppResult<ProductResponse> {
        let product = self.repo.create(input.name, input.price).await?;
        tracing::info!(product_id = product.id, "Product created");
        Ok(product.into())
    }

    async fn update_product(&self, id: i32, input: UpdateProduct) -> AppResult<ProductResponse> {
        let product = self.repo.update(id, input.name, input.price).await?;
        Ok(product.into())
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn generate_receipt(&self, product_ids: Vec<i32>) -> AppResult<ReceiptPdf> {
        let products = self.repo.find_by_ids(unique_ids(&product_ids)).await?;

        let issued_at = chrono::Local::now();
        let receipt = Receipt::build(&product_ids, &products, &issued_at);
        let html = self.template.render(&receipt)?;
        let filename = receipt_filename(&issued_at);

        let bytes = self.pdf.html_to_pdf(&html, &filename).await?;

        tokio::fs::create_dir_all(&self.receipts_dir).await?;
        let path = self.receipts_dir.join(&filename);
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(
            path = %path.display(),
            lines = receipt.products.len(),
            total = receipt.total,
            "Receipt generated"
        );

        Ok(ReceiptPdf { filename, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::domain::Product;
    use crate::infra::{MockPdfRenderer, MockProductRepository};

    const BASE: &str = "http://localhost:3000";

    fn template() -> Arc<ReceiptTemplate> {
        let source = "{{shopName}}{{#each products}}[{{quantity}} {{name}} {{currency value}}]{{/each}}{{currency total}}";
        Arc::new(ReceiptTemplate::from_parts(source, json!({"shopName": "Shop"})).unwrap())
    }

    fn manager(repo: MockProductRepository, pdf: MockPdfRenderer, dir: PathBuf) -> ProductManager {
        ProductManager::new(
            Arc::new(repo),
            Paginator::new(BASE),
            Arc::new(pdf),
            template(),
            dir,
        )
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("product-catalog-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_list_products_maps_to_views() {
        let mut repo = MockProductRepository::new();
        repo.expect_count().returning(|| Ok(95));
        repo.expect_list()
            .with(eq(Window { skip: 30, limit: 30 }))
            .returning(|_| Ok(vec![Product::new(7, "Pen", 150.0), Product::new(3, "Ruler", 300.0)]));

        let service = manager(repo, MockPdfRenderer::new(), scratch_dir("list"));
        let page = service
            .list_products(PageOptions::new("/products").page(2))
            .await
            .unwrap();

        assert_eq!(page.total, 95);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.data.iter().map(|p| p.id).collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(page.next_page, format!("{}/products?page=3&per_page=30", BASE));
        assert_eq!(page.last_page, format!("{}/products?page=4&per_page=30", BASE));
    }

    #[tokio::test]
    async fn test_list_products_propagates_store_errors() {
        let mut repo = MockProductRepository::new();
        repo.expect_count()
            .returning(|| Err(AppError::internal("count failed")));
        repo.expect_list().returning(|_| Ok(vec![]));

        let service = manager(repo, MockPdfRenderer::new(), scratch_dir("list-err"));
        let result = service.list_products(PageOptions::new("/products")).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .with(eq(42), eq(Some("Pen".to_string())), eq(None))
            .returning(|_, _, _| Err(AppError::NotFound));

        let service = manager(repo, MockPdfRenderer::new(), scratch_dir("update"));
        let input = UpdateProduct {
            name: Some("Pen".to_string()),
            price: None,
        };

        assert!(matches!(
            service.update_product(42, input).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_generate_receipt_renders_and_stores_pdf() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_ids()
            .with(eq(vec![1, 2, 9]))
            .returning(|_| Ok(vec![Product::new(1, "Pen", 150.0), Product::new(2, "Book", 450.0)]));

        let mut pdf = MockPdfRenderer::new();
        pdf.expect_html_to_pdf()
            .withf(|html, filename| {
                html.to_string() == "Shop[1 Pen FCFA 150][2 Book FCFA 900]FCFA 1,050"
                    && filename.ends_with(".pdf")
            })
            .returning(|_, _| Ok(b"%PDF-1.4".to_vec()));

        let dir = scratch_dir("receipt");
        let service = manager(repo, pdf, dir.clone());

        let receipt = service.generate_receipt(vec![2, 1, 9, 2]).await.unwrap();

        assert_eq!(receipt.bytes, b"%PDF-1.4");
        let stored = tokio::fs::read(dir.join(&receipt.filename)).await.unwrap();
        assert_eq!(stored, receipt.bytes);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_generate_receipt_surfaces_pdf_failures() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_ids().returning(|_| Ok(vec![]));

        let mut pdf = MockPdfRenderer::new();
        pdf.expect_html_to_pdf()
            .returning(|_, _| Err(AppError::internal("renderer down")));

        let dir = scratch_dir("receipt-err");
        let service = manager(repo, pdf, dir.clone());

        assert!(service.generate_receipt(vec![]).await.is_err());
        assert!(!dir.exists());
    }
}
