/// Paginated movie list shared by every feed
///
/// One state machine covers "fetch page 1, append page N, recompute has-more"
/// for all list endpoints. A fetch is bracketed by a [`PageTicket`]: the list
/// refuses a second next-page ticket while one is outstanding, and a ticket
/// issued before a reset is stale, so its result is dropped on arrival.
use std::future::Future;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, PagedResult},
};

/// Permission to apply one fetched page to a [`PagedList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    page: u32,
    generation: u64,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What happened to a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing requested: a fetch is in flight, no more pages, or the feed
    /// is not in a state that allows loading
    Skipped,
    /// The list was reset while the fetch was outstanding; result dropped
    Stale,
    /// The fetch failed; the list kept its previous contents
    Failed,
    Loaded { page: u32, added: usize },
}

/// Read-only copy of a list for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    pub items: Vec<Movie>,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PagedList {
    items: Vec<Movie>,
    page: u32,
    has_more: bool,
    in_flight: bool,
    generation: u64,
    page_cap: Option<usize>,
}

impl PagedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that keeps at most `cap` results of every page it receives
    pub fn with_page_cap(cap: usize) -> Self {
        Self {
            page_cap: Some(cap),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items.clone(),
            page: self.page,
            has_more: self.has_more,
            loading: self.in_flight,
        }
    }

    /// Empties the list and invalidates every outstanding ticket
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.has_more = false;
        self.in_flight = false;
        self.generation += 1;
    }

    /// Resets the list and applies `result` as its first page
    pub fn load_first_page(&mut self, result: PagedResult<Movie>) -> usize {
        self.reset();
        self.accept(1, result)
    }

    /// Resets the list and issues the ticket for page 1
    pub fn begin_first_page(&mut self) -> PageTicket {
        self.reset();
        self.in_flight = true;
        PageTicket {
            page: 1,
            generation: self.generation,
        }
    }

    /// Ticket for the page after the current one, `None` while a fetch is
    /// in flight or when the last page was reached
    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        if self.in_flight || !self.has_more {
            return None;
        }
        self.in_flight = true;
        Some(PageTicket {
            page: self.page + 1,
            generation: self.generation,
        })
    }

    /// Applies the outcome of the fetch `ticket` was issued for
    ///
    /// A failed fetch leaves the items, page counter and has-more flag as
    /// they were and hands the error back.
    pub fn finish(
        &mut self,
        ticket: PageTicket,
        result: AppResult<PagedResult<Movie>>,
    ) -> AppResult<LoadOutcome> {
        if ticket.generation != self.generation {
            tracing::debug!(page = ticket.page, "Dropping page for a reset list");
            return Ok(LoadOutcome::Stale);
        }

        self.in_flight = false;
        let result = result?;
        let added = self.accept(ticket.page, result);
        Ok(LoadOutcome::Loaded {
            page: ticket.page,
            added,
        })
    }

    fn accept(&mut self, page: u32, result: PagedResult<Movie>) -> usize {
        let cap = self.page_cap.unwrap_or(usize::MAX);
        let incoming: Vec<Movie> = result.results.into_iter().take(cap).collect();
        let added = incoming.len();

        if page <= 1 {
            self.items = incoming;
        } else {
            self.items.extend(incoming);
        }
        self.page = page;
        self.has_more = page < result.total_pages;
        added
    }
}

/// Fetches and appends the next page of the list `select` picks out of
/// `state`
///
/// The lock is never held across `fetch`. Errors come back to the caller
/// with the list unchanged.
pub async fn load_next<S, F, Fut>(
    state: &RwLock<S>,
    select: fn(&mut S) -> &mut PagedList,
    fetch: F,
) -> AppResult<LoadOutcome>
where
    F: FnOnce(u32) -> Fut,
    Fut: Future<Output = AppResult<PagedResult<Movie>>>,
{
    let ticket = {
        let mut guard = state.write().await;
        match select(&mut *guard).begin_next_page() {
            Some(ticket) => ticket,
            None => return Ok(LoadOutcome::Skipped),
        }
    };

    let result = fetch(ticket.page()).await;

    let mut guard = state.write().await;
    select(&mut *guard).finish(ticket, result)
}

/// Logs a failed next-page fetch and folds it into [`LoadOutcome::Failed`]
pub fn swallow_failure(list: &str, result: AppResult<LoadOutcome>) -> LoadOutcome {
    result.unwrap_or_else(|e: AppError| {
        tracing::warn!(list = %list, error = %e, "Loading next page failed");
        LoadOutcome::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::movie;

    fn page(page: u32, ids: std::ops::Range<i64>, total_pages: u32) -> PagedResult<Movie> {
        PagedResult {
            page,
            results: ids.map(movie).collect(),
            total_pages,
            total_results: total_pages * 20,
        }
    }

    fn ids(list: &PagedList) -> Vec<i64> {
        list.items().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_first_page_replaces_and_caps() {
        let mut list = PagedList::with_page_cap(8);
        list.load_first_page(page(1, 0..20, 5));

        assert_eq!(list.items().len(), 8);
        assert_eq!(list.page(), 1);
        assert!(list.has_more());

        list.load_first_page(page(1, 100..103, 1));
        assert_eq!(ids(&list), vec![100, 101, 102]);
        assert!(!list.has_more());
    }

    #[test]
    fn test_next_page_appends() {
        let mut list = PagedList::with_page_cap(8);
        list.load_first_page(page(1, 0..20, 5));

        let ticket = list.begin_next_page().unwrap();
        assert_eq!(ticket.page(), 2);
        let outcome = list.finish(ticket, Ok(page(2, 20..40, 5))).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { page: 2, added: 8 });
        assert_eq!(list.items().len(), 16);
        assert_eq!(list.items()[8].id, 20);
        assert!(list.has_more());
    }

    #[test]
    fn test_has_more_false_on_last_page() {
        let mut list = PagedList::new();
        list.load_first_page(page(1, 0..20, 2));

        let ticket = list.begin_next_page().unwrap();
        list.finish(ticket, Ok(page(2, 20..25, 2))).unwrap();

        assert_eq!(list.items().len(), 25);
        assert!(!list.has_more());
        assert!(list.begin_next_page().is_none());
    }

    #[test]
    fn test_second_ticket_refused_while_in_flight() {
        let mut list = PagedList::new();
        list.load_first_page(page(1, 0..20, 5));

        let first = list.begin_next_page();
        assert!(first.is_some());
        assert!(list.is_loading());
        assert!(list.begin_next_page().is_none());
    }

    #[test]
    fn test_failure_keeps_items_and_allows_retry() {
        let mut list = PagedList::with_page_cap(8);
        list.load_first_page(page(1, 0..20, 5));

        let ticket = list.begin_next_page().unwrap();
        let result = list.finish(ticket, Err(AppError::Internal("down".to_string())));

        assert!(result.is_err());
        assert_eq!(list.items().len(), 8);
        assert_eq!(list.page(), 1);
        assert!(list.has_more());
        assert!(!list.is_loading());

        let retry = list.begin_next_page().unwrap();
        assert_eq!(retry.page(), 2);
    }

    #[test]
    fn test_ticket_from_before_reset_is_stale() {
        let mut list = PagedList::new();
        list.load_first_page(page(1, 0..20, 5));
        let old = list.begin_next_page().unwrap();

        let fresh = list.begin_first_page();
        let outcome = list.finish(old, Ok(page(2, 20..40, 5))).unwrap();
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(list.items().is_empty());
        assert!(list.is_loading());

        list.finish(fresh, Ok(page(1, 50..52, 1))).unwrap();
        assert_eq!(ids(&list), vec![50, 51]);
        assert!(!list.is_loading());
    }

    #[test]
    fn test_no_next_page_before_first_load() {
        let mut list = PagedList::new();
        assert!(list.begin_next_page().is_none());
    }

    #[tokio::test]
    async fn test_load_next_skips_when_exhausted() {
        let state = RwLock::new(PagedList::new());
        let outcome = load_next(&state, |l| l, |_page| async {
            Err::<PagedResult<Movie>, _>(AppError::Internal("should not be called".to_string()))
        })
        .await
        .unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_load_next_requests_following_page() {
        let mut list = PagedList::new();
        list.load_first_page(page(1, 0..20, 3));
        let state = RwLock::new(list);

        let outcome = load_next(&state, |l| l, |requested| async move {
            assert_eq!(requested, 2);
            Ok(page(2, 20..40, 3))
        })
        .await
        .unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { page: 2, added: 20 });
        assert_eq!(state.read().await.items().len(), 40);
    }

    #[test]
    fn test_swallow_failure() {
        let outcome = swallow_failure("popular", Err(AppError::Internal("x".to_string())));
        assert_eq!(outcome, LoadOutcome::Failed);

        let outcome = swallow_failure("popular", Ok(LoadOutcome::Skipped));
        assert_eq!(outcome, LoadOutcome::Skipped);
    }
}
