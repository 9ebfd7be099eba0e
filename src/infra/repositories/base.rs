//! Page source backed by a SeaORM query.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect, Select};

use crate::errors::AppError;
use crate::types::{PageSource, Window};

/// Counts and windows an ordered `SELECT` over one entity.
///
/// The query must carry an `ORDER BY`, otherwise consecutive windows are not
/// guaranteed to be disjoint.
#[derive(Debug, Clone)]
pub struct QuerySource<E: EntityTrait> {
    db: DatabaseConnection,
    query: Select<E>,
}

impl<E: EntityTrait> QuerySource<E> {
    pub fn new(db: DatabaseConnection, query: Select<E>) -> Self {
        Self { db, query }
    }
}

#[async_trait]
impl<E> PageSource for QuerySource<E>
where
    E: EntityTrait,
    E::Model: Sync,
{
    type Item = E::Model;
    type Error = AppError;

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.query.clone().count(&self.db).await?)
    }

    async fn fetch(&self, window: Window) -> Result<Vec<E::Model>, AppError> {
        Ok(self
            .query
            .clone()
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await?)
    }
}
