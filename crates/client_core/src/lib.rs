use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{FilterKey, FilterState, NO_PREFERENCE},
    protocol::ResultPage,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub mod cards;
pub mod error;
pub mod query;
pub mod transport;
pub mod view;

pub use cards::{
    popup_placement, CardPopup, CardPosition, MaidCard, PageStripEntry, PagerDirection,
    PopupPlacement, PopupSide,
};
pub use error::FetchError;
pub use transport::{HttpListingTransport, ListingTransport};
pub use view::ListingView;

use query::{parse_query_string, resolve_page_url};

/// What a controller operation ended up doing to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Rendered { shown: usize },
    Empty,
    Failed,
    /// A newer request was issued before this one completed; its result was dropped.
    Stale,
    /// The pager or page link had no target, so nothing was requested.
    NoTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Search,
    Pagination,
}

impl RequestKind {
    fn as_str(self) -> &'static str {
        match self {
            RequestKind::Search => "search",
            RequestKind::Pagination => "pagination",
        }
    }
}

/// A request that already holds its sequence number, URL and query.
///
/// Taking one fixes the request's place in the "last request wins" order at
/// the moment the user acted, even if [`ResultListController::complete`] runs
/// later on another task.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    seq: u64,
    kind: RequestKind,
    url: Url,
    query: Vec<(&'static str, String)>,
}

impl PendingRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Default)]
struct RenderState {
    previous: Option<Url>,
    next: Option<Url>,
    page_strip: Vec<PageStripEntry>,
    card_count: usize,
    hovered: Option<usize>,
}

/// Owns the filter state of one listing page and keeps the view in sync with
/// the listing endpoint.
///
/// Operations take `&self`, so an `Arc<ResultListController>` can be shared by
/// concurrent event handlers. Each request takes a sequence number when it is
/// issued (`begin_*`) and only the most recently issued request may touch the
/// view when it completes.
pub struct ResultListController {
    listing_url: Url,
    transport: Arc<dyn ListingTransport>,
    view: Arc<dyn ListingView>,
    filters: Mutex<FilterState>,
    latest_request: AtomicU64,
    rendered: Mutex<RenderState>,
}

impl ResultListController {
    pub fn new(listing_url: &str, view: Arc<dyn ListingView>) -> Result<Self, FetchError> {
        Self::new_with_transport(listing_url, Arc::new(HttpListingTransport::new()), view)
    }

    pub fn new_with_transport(
        listing_url: &str,
        transport: Arc<dyn ListingTransport>,
        view: Arc<dyn ListingView>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            listing_url: Url::parse(listing_url)?,
            transport,
            view,
            filters: Mutex::new(FilterState::default()),
            latest_request: AtomicU64::new(0),
            rendered: Mutex::new(RenderState::default()),
        })
    }

    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }

    pub async fn filters(&self) -> FilterState {
        self.filters.lock().await.clone()
    }

    /// Resets the controls, seeds filters from the page query string and loads
    /// the first page.
    pub async fn initialize(&self, page_query: &str) -> FetchOutcome {
        self.seed(page_query).await;
        self.fetch_and_render().await
    }

    pub async fn seed(&self, page_query: &str) {
        let params = parse_query_string(page_query);
        let mut filters = self.filters.lock().await;
        self.reset_controls(&mut filters);

        for key in FilterKey::CONTROLS {
            let Some(value) = params.get(key.as_str()) else {
                continue;
            };
            if value.is_empty() || value == NO_PREFERENCE {
                continue;
            }
            filters.set(key, value);
            self.view.set_control_value(key, value);
            info!(key = key.as_str(), value = %value, "listing: filter seeded from page url");
        }
    }

    /// Records a control change without fetching.
    pub async fn apply_filter_change(&self, key: FilterKey, value: &str) {
        if !key.has_control() {
            warn!(key = key.as_str(), "listing: ignoring change for key without a control");
            return;
        }
        self.filters.lock().await.set(key, value);
        debug!(key = key.as_str(), value, "listing: filter changed");
    }

    pub async fn change_filter(&self, key: FilterKey, value: &str) -> FetchOutcome {
        self.apply_filter_change(key, value).await;
        self.fetch_and_render().await
    }

    /// Restores every control to "none" and clears the filters without fetching.
    pub async fn apply_reset(&self) {
        let mut filters = self.filters.lock().await;
        self.reset_controls(&mut filters);
        info!("listing: filters reset");
    }

    pub async fn reset(&self) -> FetchOutcome {
        self.apply_reset().await;
        self.fetch_and_render().await
    }

    /// Queries the listing endpoint with the current filters and renders the answer.
    pub async fn fetch_and_render(&self) -> FetchOutcome {
        let request = self.begin_search().await;
        self.complete(request).await
    }

    /// Snapshots the current filters into a search request and reserves its
    /// sequence number.
    pub async fn begin_search(&self) -> PendingRequest {
        let filters = self.filters.lock().await;
        self.reserve(
            RequestKind::Search,
            self.listing_url.clone(),
            filters.query_pairs(),
        )
    }

    pub async fn follow_previous(&self) -> FetchOutcome {
        self.follow_pager(PagerDirection::Previous).await
    }

    pub async fn follow_next(&self) -> FetchOutcome {
        self.follow_pager(PagerDirection::Next).await
    }

    pub async fn follow_pager(&self, direction: PagerDirection) -> FetchOutcome {
        match self.begin_pager(direction).await {
            Some(request) => self.complete(request).await,
            None => FetchOutcome::NoTarget,
        }
    }

    /// Reserves a request for the pager's current target, or `None` when the
    /// pager is disabled.
    pub async fn begin_pager(&self, direction: PagerDirection) -> Option<PendingRequest> {
        let Some(target) = self.pager_target(direction).await else {
            debug!(?direction, "listing: pager has no target");
            return None;
        };
        Some(self.reserve(RequestKind::Pagination, target, Vec::new()))
    }

    /// Follows the numbered page link labelled `label`. The active page and
    /// ellipsis entries do nothing.
    pub async fn follow_page_link(&self, label: &str) -> FetchOutcome {
        match self.begin_page_link(label).await {
            Some(request) => self.complete(request).await,
            None => FetchOutcome::NoTarget,
        }
    }

    pub async fn begin_page_link(&self, label: &str) -> Option<PendingRequest> {
        let target = self
            .rendered
            .lock()
            .await
            .page_strip
            .iter()
            .find(|entry| entry.label == label && entry.is_clickable())
            .and_then(|entry| entry.target.clone());
        let Some(target) = target else {
            debug!(label, "listing: page link is not clickable");
            return None;
        };
        Some(self.reserve(RequestKind::Pagination, target, Vec::new()))
    }

    /// Sends a reserved request and renders the answer if no newer request
    /// was reserved in the meantime.
    pub async fn complete(&self, request: PendingRequest) -> FetchOutcome {
        let PendingRequest {
            seq,
            kind,
            url,
            query,
        } = request;
        let result = self.load_page(url, &query).await;

        let mut rendered = self.rendered.lock().await;
        let latest = self.latest_request.load(Ordering::SeqCst);
        if seq != latest {
            debug!(seq, latest, kind = kind.as_str(), "listing: dropping stale response");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => self.render(&mut rendered, &page),
            Err(err) => {
                warn!(seq, kind = kind.as_str(), "listing: request failed: {err}");
                if kind == RequestKind::Search || err.is_malformed() {
                    self.view.hide_results();
                }
                FetchOutcome::Failed
            }
        }
    }

    pub async fn pager_target(&self, direction: PagerDirection) -> Option<Url> {
        let rendered = self.rendered.lock().await;
        match direction {
            PagerDirection::Previous => rendered.previous.clone(),
            PagerDirection::Next => rendered.next.clone(),
        }
    }

    pub async fn page_strip(&self) -> Vec<PageStripEntry> {
        self.rendered.lock().await.page_strip.clone()
    }

    pub async fn card_count(&self) -> usize {
        self.rendered.lock().await.card_count
    }

    /// Shows the detail popup of card `index`, hiding whichever popup was open.
    pub async fn hover_card(
        &self,
        index: usize,
        position: CardPosition,
        viewport_width: f64,
    ) -> Option<PopupPlacement> {
        let mut rendered = self.rendered.lock().await;
        if index >= rendered.card_count {
            warn!(index, cards = rendered.card_count, "listing: hover on unknown card");
            return None;
        }

        if let Some(open) = rendered.hovered.filter(|open| *open != index) {
            self.view.hide_popup(open);
        }
        let placement = popup_placement(position, viewport_width);
        self.view.show_popup(index, placement);
        rendered.hovered = Some(index);
        Some(placement)
    }

    pub async fn unhover_card(&self, index: usize) {
        let mut rendered = self.rendered.lock().await;
        if rendered.hovered == Some(index) {
            self.view.hide_popup(index);
            rendered.hovered = None;
        }
    }

    fn reset_controls(&self, filters: &mut FilterState) {
        for key in FilterKey::CONTROLS {
            self.view.set_control_value(key, NO_PREFERENCE);
        }
        filters.reset();
    }

    fn reserve(
        &self,
        kind: RequestKind,
        url: Url,
        query: Vec<(&'static str, String)>,
    ) -> PendingRequest {
        let seq = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, kind = kind.as_str(), url = %url, "listing: request issued");
        PendingRequest {
            seq,
            kind,
            url,
            query,
        }
    }

    async fn load_page(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<ResultPage, FetchError> {
        let body = self.transport.fetch_page(url, query).await?;
        let page: ResultPage = serde_json::from_str(&body)?;
        page.validate()?;
        Ok(page)
    }

    /// An empty page stops after the "No" indicator, so the pager targets and
    /// page strip of the last non-empty page stay in place and remain
    /// followable.
    fn render(&self, rendered: &mut RenderState, page: &ResultPage) -> FetchOutcome {
        rendered.hovered = None;
        self.view.set_result_count(page.count);

        if page.results.is_empty() {
            self.view.hide_results();
            self.view.show_no_results();
            rendered.card_count = 0;
            info!(count = page.count, "listing: no results");
            return FetchOutcome::Empty;
        }

        self.view.show_results();
        for summary in &page.results {
            self.view.append_card(&MaidCard::from_summary(summary));
        }
        rendered.card_count = page.results.len();

        let previous = page.previous.as_deref().and_then(|raw| self.resolve_target(raw));
        let next = page.next.as_deref().and_then(|raw| self.resolve_target(raw));
        self.view.set_pager(PagerDirection::Previous, previous.as_ref());
        self.view.set_pager(PagerDirection::Next, next.as_ref());

        let strip: Vec<PageStripEntry> = page
            .page_links()
            .iter()
            .map(|link| {
                let target = link.url.as_deref().and_then(|raw| self.resolve_target(raw));
                PageStripEntry::new(link, target)
            })
            .collect();
        self.view.clear_page_strip();
        // Each entry goes right after the anchor, so walking backwards leaves
        // the strip in server order.
        for entry in strip.iter().rev() {
            self.view.insert_page_entry(entry);
        }

        rendered.previous = previous;
        rendered.next = next;
        rendered.page_strip = strip;

        info!(
            count = page.count,
            shown = rendered.card_count,
            "listing: page rendered"
        );
        FetchOutcome::Rendered {
            shown: rendered.card_count,
        }
    }

    fn resolve_target(&self, raw: &str) -> Option<Url> {
        match resolve_page_url(&self.listing_url, raw) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(raw, "listing: unusable page url: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
