//! Product repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::base::QuerySource;
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{round_price, Product};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageSource, Window};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Find every product whose id is in `ids`, ascending id order
    async fn find_by_ids(&self, ids: Vec<i32>) -> AppResult<Vec<Product>>;

    /// Create a new product
    async fn create(&self, name: String, price: f64) -> AppResult<Product>;

    /// Update product fields
    async fn update(&self, id: i32, name: Option<String>, price: Option<f64>)
        -> AppResult<Product>;

    /// Permanently delete product
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Number of products in the catalog
    async fn count(&self) -> AppResult<u64>;

    /// Products in `window`, ordered by name
    async fn list(&self, window: Window) -> AppResult<Vec<Product>>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Catalog listing: by name, ties broken by id.
    fn catalog(&self) -> QuerySource<ProductEntity> {
        QuerySource::new(
            self.db.clone(),
            ProductEntity::find()
                .order_by_asc(product::Column::Name)
                .order_by_asc(product::Column::Id),
        )
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::from))
    }

    async fn find_by_ids(&self, ids: Vec<i32>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, name: String, price: f64) -> AppResult<Product> {
        let active_model = ActiveModel {
            name: Set(name),
            price: Set(round_price(price)),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        tracing::debug!(product_id = model.id, "Product created");

        Ok(Product::from(model))
    }

    async fn update(
        &self,
        id: i32,
        name: Option<String>,
        price: Option<f64>,
    ) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(price) = price {
            active.price = Set(round_price(price));
        }

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        self.catalog().count().await
    }

    async fn list(&self, window: Window) -> AppResult<Vec<Product>> {
        let models = self.catalog().fetch(window).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infra::Database;

    async fn store() -> ProductStore {
        let mut config = Config::default();
        config.database_url = "sqlite::memory:".to_string();
        let db = Database::connect(&config).await.unwrap();
        ProductStore::new(db.get_connection())
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = store().await;

        let pen = store.create("Pen".to_string(), 150.0).await.unwrap();
        let book = store.create("Book".to_string(), 450.456).await.unwrap();

        assert!(book.id > pen.id);
        assert_eq!(book.price, 450.46);
        assert_eq!(store.find_by_id(pen.id).await.unwrap(), Some(pen));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name_and_windowed() {
        let store = store().await;
        for name in ["Ruler", "Eraser", "Pen", "Book"] {
            store.create(name.to_string(), 100.0).await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 4);

        let names: Vec<String> = store
            .list(Window { skip: 1, limit: 2 })
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Eraser", "Pen"]);

        let past_end = store.list(Window { skip: 10, limit: 2 }).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let store = store().await;
        let pen = store.create("Pen".to_string(), 150.0).await.unwrap();

        let found = store.find_by_ids(vec![pen.id, 999]).await.unwrap();
        assert_eq!(found, vec![pen]);
        assert!(store.find_by_ids(vec![]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = store().await;
        let pen = store.create("Pen".to_string(), 150.0).await.unwrap();

        let updated = store.update(pen.id, None, Some(175.0)).await.unwrap();
        assert_eq!(updated.name, "Pen");
        assert_eq!(updated.price, 175.0);

        store.delete(pen.id).await.unwrap();
        assert!(matches!(store.delete(pen.id).await, Err(AppError::NotFound)));
        assert!(matches!(
            store.update(pen.id, Some("Gone".to_string()), None).await,
            Err(AppError::NotFound)
        ));
    }
}
