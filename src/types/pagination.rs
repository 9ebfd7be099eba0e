//! Page builder for list endpoints.
//!
//! A [`Paginator`] turns any [`PageSource`] (something that can be counted
//! and fetched by window) into a [`Page`] carrying the requested slice plus
//! navigation metadata. The count and the window are read concurrently.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::ProductResponse;
use crate::utils::parallel;

/// The slice of an ordered collection to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// A collection that can be counted and read one window at a time.
///
/// Implementations must return items in a stable order so that consecutive
/// windows do not overlap.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Error: Send;

    /// Total number of items in the collection
    async fn count(&self) -> Result<u64, Self::Error>;

    /// Items in `window`, in collection order
    async fn fetch(&self, window: Window) -> Result<Vec<Self::Item>, Self::Error>;
}

const MAX_SKIP: u64 = i64::MAX as u64;

/// Requested page, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Appended to the paginator's base path when building links
    pub path: String,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page: None,
            per_page: None,
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Effective 1-based page number. Anything below 1 becomes the first page.
    pub fn current_page(&self) -> u64 {
        match self.page {
            Some(page) if page >= 1 => page as u64,
            _ => DEFAULT_PAGE_NUMBER,
        }
    }

    /// Effective page size, within `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u64 {
        match self.per_page {
            Some(per_page) if per_page >= 1 => (per_page as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Window of the collection covered by this page.
    ///
    /// `skip` never exceeds `i64::MAX`, the largest offset SQL backends accept.
    pub fn window(&self) -> Window {
        let per_page = self.page_size();
        Window {
            skip: (self.current_page() - 1)
                .saturating_mul(per_page)
                .min(MAX_SKIP),
            limit: per_page,
        }
    }
}

/// Pagination query parameters.
///
/// Values are kept as raw strings: anything that is not an integer is
/// treated as absent rather than rejected.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page to get, pages start from 1
    #[param(value_type = Option<i64>, minimum = 1, default = 1)]
    pub page: Option<String>,
    /// Items per page, maximum is 100
    #[param(value_type = Option<i64>, maximum = 100, default = 30)]
    pub per_page: Option<String>,
}

impl PageQuery {
    /// Build page options for a request served at `path`.
    pub fn into_options(self, path: impl Into<String>) -> PageOptions {
        PageOptions {
            path: path.into(),
            page: parse_lenient(self.page.as_deref()),
            per_page: parse_lenient(self.per_page.as_deref()),
        }
    }
}

fn parse_lenient(value: Option<&str>) -> Option<i64> {
    let value = value?.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// One page of a larger ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[aliases(ProductPage = Page<ProductResponse>)]
pub struct Page<T> {
    /// Actual data as requested
    pub data: Vec<T>,
    /// Total elements available in the collection
    pub total: u64,
    /// Items on each page
    pub per_page: u64,
    /// Current page number
    pub current_page: u64,
    /// Whether a page follows the current one
    pub has_next: bool,
    /// Whether a page precedes the current one
    pub has_prev: bool,
    /// Link to the next page
    pub next_page: String,
    /// Link to the previous page
    pub prev_page: String,
    /// Link to the first page
    pub first_page: String,
    /// Link to the last page
    pub last_page: String,
}

impl<T> Page<T> {
    /// Number of pages in the collection (never less than one)
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.per_page)
    }

}

fn total_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Builds pages with links rooted at a fixed base path.
#[derive(Debug, Clone)]
pub struct Paginator {
    base_path: String,
}

impl Paginator {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// `{base_path}{path}?page={page}&per_page={per_page}`
    pub fn link(&self, path: &str, page: u64, per_page: u64) -> String {
        format!(
            "{}{}?page={}&per_page={}",
            self.base_path, path, page, per_page
        )
    }

    /// Fetch one page of `source`, items unchanged.
    pub async fn paginate<S>(
        &self,
        source: &S,
        options: &PageOptions,
    ) -> Result<Page<S::Item>, S::Error>
    where
        S: PageSource,
    {
        let (total, data) =
            parallel::join2(source.count(), source.fetch(options.window())).await?;

        Ok(self.assemble(options, total, data))
    }

    /// Fetch one page of `source` and transform each item with `map_fn`.
    ///
    /// `map_fn` receives the item and its index within the page. All
    /// transforms run concurrently; the output keeps the fetched order.
    pub async fn paginate_with<S, F, Fut, M>(
        &self,
        source: &S,
        options: &PageOptions,
        map_fn: F,
    ) -> Result<Page<M>, S::Error>
    where
        S: PageSource,
        F: Fn(S::Item, usize) -> Fut,
        Fut: Future<Output = Result<M, S::Error>>,
    {
        let (total, items) =
            parallel::join2(source.count(), source.fetch(options.window())).await?;

        let data = parallel::join_all(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| map_fn(item, index)),
        )
        .await?;

        Ok(self.assemble(options, total, data))
    }

    /// Wrap already fetched data and its collection total into a page.
    pub fn assemble<T>(&self, options: &PageOptions, total: u64, data: Vec<T>) -> Page<T> {
        let page = options.current_page();
        let per_page = options.page_size();
        let page_count = total_pages(total, per_page);

        Page {
            data,
            total,
            per_page,
            current_page: page,
            has_next: page.saturating_add(1) <= page_count,
            // Literal bound check, not `page > 1`: false once page - 1 overshoots the last page.
            has_prev: page - 1 <= page_count && page - 1 > 0,
            next_page: self.link(&options.path, page.saturating_add(1), per_page),
            prev_page: self.link(&options.path, page - 1, per_page),
            first_page: self.link(&options.path, 1, per_page),
            last_page: self.link(&options.path, page_count, per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Barrier;

    const BASE: &str = "http://localhost:3000";

    /// In-memory source recording every window it serves.
    struct VecSource {
        items: Vec<u32>,
        windows: Mutex<Vec<Window>>,
        fail_count: bool,
    }

    impl VecSource {
        fn new(len: u32) -> Self {
            Self {
                items: (1..=len).collect(),
                windows: Mutex::new(Vec::new()),
                fail_count: false,
            }
        }

        fn last_window(&self) -> Window {
            *self.windows.lock().unwrap().last().unwrap()
        }
    }

    #[async_trait]
    impl PageSource for VecSource {
        type Item = u32;
        type Error = String;

        async fn count(&self) -> Result<u64, String> {
            if self.fail_count {
                return Err("store unavailable".to_string());
            }
            Ok(self.items.len() as u64)
        }

        async fn fetch(&self, window: Window) -> Result<Vec<u32>, String> {
            self.windows.lock().unwrap().push(window);
            Ok(self
                .items
                .iter()
                .skip(window.skip as usize)
                .take(window.limit as usize)
                .copied()
                .collect())
        }
    }

    /// Count and fetch each wait for the other to start.
    struct RendezvousSource {
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl PageSource for RendezvousSource {
        type Item = u32;
        type Error = String;

        async fn count(&self) -> Result<u64, String> {
            self.barrier.wait().await;
            Ok(1)
        }

        async fn fetch(&self, _window: Window) -> Result<Vec<u32>, String> {
            self.barrier.wait().await;
            Ok(vec![7])
        }
    }

    #[test]
    fn test_per_page_defaults_when_missing_or_not_positive() {
        for per_page in [None, Some(0), Some(-1), Some(-250)] {
            let options = PageOptions {
                per_page,
                ..PageOptions::new("/products")
            };
            assert_eq!(options.page_size(), 30, "per_page = {:?}", per_page);
        }
    }

    #[test]
    fn test_per_page_is_capped() {
        assert_eq!(PageOptions::new("/").per_page(101).page_size(), 100);
        assert_eq!(PageOptions::new("/").per_page(5000).page_size(), 100);
        assert_eq!(PageOptions::new("/").per_page(100).page_size(), 100);
        assert_eq!(PageOptions::new("/").per_page(1).page_size(), 1);
    }

    #[test]
    fn test_page_defaults_to_first() {
        for page in [None, Some(0), Some(-3)] {
            let options = PageOptions {
                page,
                ..PageOptions::new("/products")
            };
            assert_eq!(options.current_page(), 1, "page = {:?}", page);
        }
        assert_eq!(PageOptions::new("/").page(7).current_page(), 7);
    }

    #[test]
    fn test_window_starts_at_previous_pages() {
        let options = PageOptions::new("/").page(4).per_page(25);
        assert_eq!(options.window(), Window { skip: 75, limit: 25 });

        let first = PageOptions::new("/");
        assert_eq!(first.window(), Window { skip: 0, limit: 30 });
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 30), 1);
        assert_eq!(total_pages(1, 30), 1);
        assert_eq!(total_pages(30, 30), 1);
        assert_eq!(total_pages(31, 30), 2);
        assert_eq!(total_pages(95, 30), 4);
        assert_eq!(total_pages(100, 1), 100);
    }

    #[test]
    fn test_query_parsing_is_lenient() {
        let query = PageQuery {
            page: Some("abc".to_string()),
            per_page: Some(" 40 ".to_string()),
        };
        let options = query.into_options("/products");
        assert_eq!(options.page, None);
        assert_eq!(options.per_page, Some(40));

        let query = PageQuery {
            page: Some("2.9".to_string()),
            per_page: None,
        };
        assert_eq!(query.into_options("/").page, Some(2));
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(0);

        let page = paginator
            .paginate(&source, &PageOptions::new("/products").page(1).per_page(30))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
        assert_eq!(page.last_page, format!("{BASE}/products?page=1&per_page=30"));
    }

    #[tokio::test]
    async fn test_middle_page_links() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(95);

        let page = paginator
            .paginate(&source, &PageOptions::new("/products").page(2).per_page(30))
            .await
            .unwrap();

        assert_eq!(source.last_window(), Window { skip: 30, limit: 30 });
        assert_eq!(page.data, (31..=60).collect::<Vec<_>>());
        assert_eq!(page.total, 95);
        assert_eq!(page.per_page, 30);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages(), 4);
        assert!(page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.next_page, format!("{BASE}/products?page=3&per_page=30"));
        assert_eq!(page.prev_page, format!("{BASE}/products?page=1&per_page=30"));
        assert_eq!(page.first_page, format!("{BASE}/products?page=1&per_page=30"));
        assert_eq!(page.last_page, format!("{BASE}/products?page=4&per_page=30"));
    }

    #[tokio::test]
    async fn test_single_page_collection() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(10);

        let page = paginator
            .paginate(&source, &PageOptions::new("/products").page(1).per_page(30))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
        assert_eq!(page.prev_page, format!("{BASE}/products?page=0&per_page=30"));
    }

    #[tokio::test]
    async fn test_last_page_is_partial() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(95);

        let page = paginator
            .paginate(&source, &PageOptions::new("/products").page(4).per_page(30))
            .await
            .unwrap();

        assert_eq!(page.data, (91..=95).collect::<Vec<_>>());
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[tokio::test]
    async fn test_has_prev_uses_literal_bound_past_the_end() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(95);

        // One past the last page: page - 1 == total_pages still counts.
        let page = paginator
            .paginate(&source, &PageOptions::new("/p").page(5).per_page(30))
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert!(page.has_prev);

        // Further out the bound check fails.
        let page = paginator
            .paginate(&source, &PageOptions::new("/p").page(10).per_page(30))
            .await
            .unwrap();
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_out_of_range_inputs_are_normalized() {
        let paginator = Paginator::new("");
        let source = VecSource::new(250);

        let page = paginator
            .paginate(&source, &PageOptions::new("/items").page(-4).per_page(1000))
            .await
            .unwrap();

        assert_eq!(source.last_window(), Window { skip: 0, limit: 100 });
        assert_eq!(page.current_page, 1);
        assert_eq!(page.per_page, 100);
        assert_eq!(page.next_page, "/items?page=2&per_page=100");
    }

    #[tokio::test]
    async fn test_map_preserves_order_and_receives_index() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(5);

        let page = paginator
            .paginate_with(&source, &PageOptions::new("/p"), |item, index| async move {
                // Earlier items finish last.
                tokio::time::sleep(Duration::from_millis(5 * (5 - index as u64))).await;
                Ok::<_, String>(format!("{}:{}", index, item * 10))
            })
            .await
            .unwrap();

        assert_eq!(page.data, vec!["0:10", "1:20", "2:30", "3:40", "4:50"]);
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_map_error_propagates() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(3);

        let result = paginator
            .paginate_with(&source, &PageOptions::new("/p"), |item, _| async move {
                if item == 2 {
                    Err("cannot render item 2".to_string())
                } else {
                    Ok(item)
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "cannot render item 2");
    }

    #[tokio::test]
    async fn test_store_error_propagates_unchanged() {
        let paginator = Paginator::new(BASE);
        let mut source = VecSource::new(3);
        source.fail_count = true;

        let result = paginator.paginate(&source, &PageOptions::new("/p")).await;
        assert_eq!(result.unwrap_err(), "store unavailable");
    }

    #[tokio::test]
    async fn test_count_and_fetch_run_concurrently() {
        let paginator = Paginator::new(BASE);
        let source = RendezvousSource {
            barrier: Arc::new(Barrier::new(2)),
        };

        // Sequential reads would never get past the barrier.
        let page = tokio::time::timeout(
            Duration::from_secs(5),
            paginator.paginate(&source, &PageOptions::new("/p")),
        )
        .await
        .expect("count and fetch should be awaited jointly")
        .unwrap();

        assert_eq!(page.data, vec![7]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_same_inputs_give_same_page() {
        let paginator = Paginator::new(BASE);
        let source = VecSource::new(42);
        let options = PageOptions::new("/products").page(2).per_page(10);

        let first = paginator.paginate(&source, &options).await.unwrap();
        let second = paginator.paginate(&source, &options).await.unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_window_skip_fits_signed_offset() {
        let options = PageOptions::new("/").page(i64::MAX).per_page(30);
        assert_eq!(options.current_page(), i64::MAX as u64);
        assert_eq!(options.window().skip, i64::MAX as u64);

        let options = PageOptions::new("/").page(307_445_734_561_825_861).per_page(30);
        assert_eq!(options.window().skip, 9_223_372_036_854_775_800);
    }
}
