//! Stateful controller for the listings grid.
//!
//! Owns one [`ListingQuery`] per mounted view, debounces free-text search,
//! resets pagination when filters settle, and issues reads against a
//! [`ListingStore`]. Responses are committed only when they belong to the
//! most recently issued request — in-flight I/O is never cancelled, stale
//! results are simply discarded.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::browse::query::{ListingQuery, ListingRequest, QueryResult, SortKey, StatusFilter};
use crate::errors::AppError;
use crate::models::villa::VillaSummary;

/// Inactivity window before a search-term change settles.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Black-box collaborator providing filtered, sorted, paginated reads.
#[async_trait]
pub trait ListingStore: Send + Sync + 'static {
    async fn fetch(&self, request: ListingRequest) -> Result<QueryResult, AppError>;
}

/// Reactive view of the controller, published after every state change.
#[derive(Debug, Clone)]
pub struct BrowseSnapshot {
    /// Settled query state (the debounced search term, not keystrokes).
    pub query: ListingQuery,
    /// URL query string for the settled state; the embedding view pushes
    /// this into its location bar so the view stays bookmarkable.
    pub url_query: String,
    pub rows: Vec<VillaSummary>,
    pub total_count: i64,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner {
    query: ListingQuery,
    /// Raw search input awaiting its debounce window.
    pending_search: String,
    /// Bumped per keystroke; a timer only settles if it is still current.
    search_gen: u64,
    /// Bumped per issued request; a response only commits if still current.
    query_seq: u64,
    rows: Vec<VillaSummary>,
    total_count: i64,
    loading: bool,
    error: Option<String>,
}

impl Inner {
    fn snapshot(&self) -> BrowseSnapshot {
        BrowseSnapshot {
            query: self.query.clone(),
            url_query: self.query.to_query_string(),
            rows: self.rows.clone(),
            total_count: self.total_count,
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// Query controller for one mounted listings view.
///
/// Constructed per mount (typically seeded from the current URL via
/// [`ListingQuery::from_query_str`]) and discarded on unmount.
pub struct ListingQueryController {
    inner: Arc<Mutex<Inner>>,
    store: Arc<dyn ListingStore>,
    tx: Arc<watch::Sender<BrowseSnapshot>>,
    debounce: Duration,
}

impl ListingQueryController {
    /// Mount the controller and issue the initial query.
    pub fn new(store: Arc<dyn ListingStore>, initial: ListingQuery) -> Self {
        Self::with_debounce(store, initial, SEARCH_DEBOUNCE)
    }

    /// As [`Self::new`] with an explicit debounce window.
    pub fn with_debounce(
        store: Arc<dyn ListingStore>,
        initial: ListingQuery,
        debounce: Duration,
    ) -> Self {
        let inner = Inner {
            pending_search: initial.search_term.clone(),
            query: initial,
            search_gen: 0,
            query_seq: 0,
            rows: Vec::new(),
            total_count: 0,
            loading: false,
            error: None,
        };
        let (tx, _rx) = watch::channel(inner.snapshot());
        let controller = Self {
            inner: Arc::new(Mutex::new(inner)),
            store,
            tx: Arc::new(tx),
            debounce,
        };
        {
            let mut inner = controller.inner.lock().expect("browse state poisoned");
            start_fetch(&controller.store, &controller.inner, &controller.tx, &mut inner);
        }
        controller
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<BrowseSnapshot> {
        self.tx.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> BrowseSnapshot {
        self.tx.borrow().clone()
    }

    /// Record a search keystroke. The change only settles once the debounce
    /// window passes without another keystroke; nothing is queried and the
    /// URL state does not move until then.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let generation = {
            let mut inner = self.inner.lock().expect("browse state poisoned");
            inner.pending_search = term;
            inner.search_gen += 1;
            inner.search_gen
        };
        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.inner);
        let tx = Arc::clone(&self.tx);
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let mut inner = shared.lock().expect("browse state poisoned");
            if generation != inner.search_gen {
                // A newer keystroke re-armed the timer.
                return;
            }
            if inner.pending_search == inner.query.search_term {
                return;
            }
            let term = inner.pending_search.clone();
            inner.query.set_search_term(&term);
            start_fetch(&store, &shared, &tx, &mut inner);
        });
    }

    /// Change the status facet; takes effect immediately.
    pub fn set_status_filter(&self, status: StatusFilter) {
        let mut inner = self.inner.lock().expect("browse state poisoned");
        if inner.query.status == status {
            return;
        }
        inner.query.set_status(status);
        start_fetch(&self.store, &self.inner, &self.tx, &mut inner);
    }

    /// Change the sort order; takes effect immediately.
    pub fn set_sort_key(&self, sort: SortKey) {
        let mut inner = self.inner.lock().expect("browse state poisoned");
        if inner.query.sort == sort {
            return;
        }
        inner.query.set_sort(sort);
        start_fetch(&self.store, &self.inner, &self.tx, &mut inner);
    }

    /// Navigate to a page; leaves every filter field untouched.
    pub fn set_page(&self, page: i64) {
        let mut inner = self.inner.lock().expect("browse state poisoned");
        if inner.query.page == page.max(1) {
            return;
        }
        inner.query.set_page(page);
        start_fetch(&self.store, &self.inner, &self.tx, &mut inner);
    }

    /// Clear all filters back to defaults; cancels any pending search
    /// debounce and takes effect immediately.
    pub fn reset_filters(&self) {
        let mut inner = self.inner.lock().expect("browse state poisoned");
        inner.search_gen += 1;
        inner.pending_search.clear();
        if inner.query == ListingQuery::default() {
            return;
        }
        inner.query.reset_filters();
        start_fetch(&self.store, &self.inner, &self.tx, &mut inner);
    }

    /// Re-issue the current query; the retry path after a store error.
    pub fn refresh(&self) {
        let mut inner = self.inner.lock().expect("browse state poisoned");
        start_fetch(&self.store, &self.inner, &self.tx, &mut inner);
    }
}

/// Issue the query for the current state and commit its response unless a
/// newer request supersedes it in the meantime.
fn start_fetch(
    store: &Arc<dyn ListingStore>,
    shared: &Arc<Mutex<Inner>>,
    tx: &Arc<watch::Sender<BrowseSnapshot>>,
    inner: &mut Inner,
) {
    inner.query_seq += 1;
    let seq = inner.query_seq;
    inner.loading = true;
    inner.error = None;
    let request = inner.query.to_request();
    tx.send_replace(inner.snapshot());

    let store = Arc::clone(store);
    let shared = Arc::clone(shared);
    let tx = Arc::clone(tx);
    tokio::spawn(async move {
        let result = store.fetch(request).await;
        let mut inner = shared.lock().expect("browse state poisoned");
        if seq != inner.query_seq {
            // Superseded while in flight; discard the stale response.
            return;
        }
        match result {
            Ok(page) => {
                inner.rows = page.rows;
                inner.total_count = page.total_count;
                inner.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "listing query failed");
                inner.rows.clear();
                inner.total_count = 0;
                inner.error = Some(err.to_string());
            }
        }
        inner.loading = false;
        tx.send_replace(inner.snapshot());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::villa::{VillaStatus, VillaType};
    use chrono::Utc;
    use std::collections::VecDeque;
    use uuid::Uuid;

    fn summary(name: &str) -> VillaSummary {
        VillaSummary {
            id: Uuid::new_v4(),
            slug: crate::models::villa::slugify(name),
            nama_listing: name.to_string(),
            alamat_lengkap: "Jl. Raya Ubud No. 1".to_string(),
            harga: 900_000_000,
            harga_promo: None,
            roi_perkiraan: Some(10.0),
            status: VillaStatus::Tersedia,
            tipe_villa: VillaType::OneBedroom,
            foto_urls: serde_json::json!([]),
            memiliki_private_pool: false,
            created_at: Utc::now(),
        }
    }

    fn page_with_total(total: i64) -> QueryResult {
        QueryResult {
            rows: vec![summary("Villa Uji")],
            total_count: total,
        }
    }

    /// Scripted store: each fetch pops a (delay, outcome) step; once the
    /// script runs out it answers instantly with an empty page.
    #[derive(Default)]
    struct ScriptedStore {
        calls: Mutex<Vec<ListingRequest>>,
        script: Mutex<VecDeque<(Duration, Result<QueryResult, String>)>>,
    }

    impl ScriptedStore {
        fn push(&self, delay: Duration, outcome: Result<QueryResult, String>) {
            self.script.lock().unwrap().push_back((delay, outcome));
        }

        fn calls(&self) -> Vec<ListingRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingStore for ScriptedStore {
        async fn fetch(&self, request: ListingRequest) -> Result<QueryResult, AppError> {
            self.calls.lock().unwrap().push(request);
            let step = self.script.lock().unwrap().pop_front();
            let (delay, outcome) =
                step.unwrap_or((Duration::ZERO, Ok(QueryResult::default())));
            tokio::time::sleep(delay).await;
            outcome.map_err(AppError::Internal)
        }
    }

    /// Let spawned controller tasks run without advancing the clock.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mount_issues_initial_query() {
        let store = Arc::new(ScriptedStore::default());
        store.push(Duration::ZERO, Ok(page_with_total(12)));
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::from_query_str("page=2"));
        settle().await;

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].offset, 9);
        let snap = controller.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.total_count, 12);
        assert_eq!(snap.url_query, "page=2");
    }

    #[tokio::test(start_paused = true)]
    async fn typing_debounces_to_a_single_query() {
        let store = Arc::new(ScriptedStore::default());
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;
        assert_eq!(store.calls().len(), 1);

        for prefix in ["v", "vi", "vil", "vill", "villa"] {
            controller.set_search_term(prefix);
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        settle().await;
        // Inside the window: nothing has settled yet.
        assert_eq!(store.calls().len(), 1);

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;

        let calls = store.calls();
        assert_eq!(calls.len(), 2, "one query per settled term, not per keystroke");
        assert_eq!(calls[1].search_term, "villa");
        assert_eq!(controller.snapshot().url_query, "search=villa");
    }

    #[tokio::test(start_paused = true)]
    async fn settled_search_resets_page() {
        let store = Arc::new(ScriptedStore::default());
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;

        controller.set_page(3);
        settle().await;
        assert_eq!(store.calls().last().unwrap().offset, 18);

        controller.set_search_term("ubud");
        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;

        let last = store.calls().last().unwrap().clone();
        assert_eq!(last.search_term, "ubud");
        assert_eq!(last.offset, 0, "settled search change must reset to page 1");
        assert_eq!(controller.snapshot().query.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn status_and_sort_changes_apply_immediately_and_reset_page() {
        let store = Arc::new(ScriptedStore::default());
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::from_query_str("page=4"));
        settle().await;

        controller.set_status_filter(StatusFilter::Only(VillaStatus::Promo));
        settle().await;
        let last = store.calls().last().unwrap().clone();
        assert_eq!(last.status, StatusFilter::Only(VillaStatus::Promo));
        assert_eq!(last.offset, 0);

        controller.set_page(2);
        settle().await;
        controller.set_sort_key(SortKey::PriceAsc);
        settle().await;
        let last = store.calls().last().unwrap().clone();
        assert_eq!(last.sort, SortKey::PriceAsc);
        assert_eq!(last.offset, 0);
        assert_eq!(
            controller.snapshot().url_query,
            "status=Promo&sort=harga-asc"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let store = Arc::new(ScriptedStore::default());
        store.push(Duration::ZERO, Ok(QueryResult::default())); // mount
        store.push(Duration::from_millis(300), Ok(page_with_total(111))); // A, slow
        store.push(Duration::from_millis(10), Ok(page_with_total(222))); // B, fast
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;

        controller.set_status_filter(StatusFilter::Only(VillaStatus::Tersedia)); // A
        controller.set_sort_key(SortKey::RoiDesc); // B supersedes A
        settle().await;

        tokio::time::advance(Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(controller.snapshot().total_count, 222);

        // A resolves afterwards; its result must never surface.
        tokio::time::advance(Duration::from_millis(300)).await;
        settle().await;
        let snap = controller.snapshot();
        assert_eq!(snap.total_count, 222);
        assert!(!snap.loading);
        assert!(snap.error.is_none());
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn store_error_surfaces_without_throwing() {
        let store = Arc::new(ScriptedStore::default());
        store.push(Duration::ZERO, Ok(page_with_total(5)));
        store.push(Duration::ZERO, Err("store unavailable".to_string()));
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;
        assert_eq!(controller.snapshot().total_count, 5);

        controller.set_page(2);
        settle().await;

        let snap = controller.snapshot();
        assert!(snap.error.as_deref().unwrap().contains("store unavailable"));
        assert!(snap.rows.is_empty());
        assert_eq!(snap.total_count, 0);
        assert!(!snap.loading);

        // Next user-triggered change is the retry path.
        store.push(Duration::ZERO, Ok(page_with_total(5)));
        controller.refresh();
        settle().await;
        let snap = controller.snapshot();
        assert!(snap.error.is_none());
        assert_eq!(snap.total_count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_tracks_in_flight_query() {
        let store = Arc::new(ScriptedStore::default());
        store.push(Duration::from_millis(50), Ok(page_with_total(1)));
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;
        assert!(controller.snapshot().loading);

        tokio::time::advance(Duration::from_millis(50)).await;
        settle().await;
        assert!(!controller.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_search_and_clears_filters() {
        let store = Arc::new(ScriptedStore::default());
        let controller = ListingQueryController::new(
            store.clone(),
            ListingQuery::from_query_str("status=Promo&page=3"),
        );
        settle().await;

        controller.set_search_term("cang");
        tokio::time::advance(Duration::from_millis(200)).await;
        controller.reset_filters();
        settle().await;

        let snap = controller.snapshot();
        assert_eq!(snap.query, ListingQuery::default());
        assert_eq!(snap.url_query, "");

        // The cancelled debounce never fires a query for "cang".
        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;
        assert!(store
            .calls()
            .iter()
            .all(|request| request.search_term != "cang"));
    }

    #[tokio::test(start_paused = true)]
    async fn identical_mutations_do_not_requery() {
        let store = Arc::new(ScriptedStore::default());
        let controller =
            ListingQueryController::new(store.clone(), ListingQuery::default());
        settle().await;
        assert_eq!(store.calls().len(), 1);

        controller.set_status_filter(StatusFilter::All);
        controller.set_page(1);
        controller.set_sort_key(SortKey::Newest);
        controller.set_search_term("");
        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(store.calls().len(), 1);
    }
}
