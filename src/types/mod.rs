//! Shared types (pagination, responses).

mod pagination;
mod response;

pub use pagination::{Page, PageOptions, PageQuery, PageSource, Paginator, ProductPage, Window};
pub use response::{Attachment, Created, NoContent};
