//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod product;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use product::{
    ActiveModel as ProductActiveModel, Column as ProductColumn, Entity as ProductEntity,
    Model as ProductModel,
};
