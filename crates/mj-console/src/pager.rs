use chrono::Utc;

use crate::record::{LogRecord, TaskAction};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default query window reaches 30 days back and one hour forward, so
/// freshly submitted tasks with slightly skewed clocks still show up.
const DEFAULT_LOOKBACK_MS: i64 = 30 * 24 * 3600 * 1000;
const DEFAULT_LOOKAHEAD_MS: i64 = 3600 * 1000;

/// User-editable query parameters. Editing a field never refetches by
/// itself; the explicit query action does. The coarse `action` dimension is
/// the exception: changing it triggers a refresh (see `LogViewer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub channel_id: String,
    pub mj_id: String,
    /// Epoch millis, inclusive lower bound.
    pub start_timestamp: i64,
    /// Epoch millis, exclusive upper bound.
    pub end_timestamp: i64,
    pub action: Option<TaskAction>,
}

impl FilterState {
    pub fn default_window(now_ms: i64) -> Self {
        Self {
            channel_id: String::new(),
            mj_id: String::new(),
            start_timestamp: now_ms - DEFAULT_LOOKBACK_MS,
            end_timestamp: now_ms + DEFAULT_LOOKAHEAD_MS,
            action: None,
        }
    }

    pub fn now() -> Self {
        Self::default_window(Utc::now().timestamp_millis())
    }
}

/// Client-held buffer of fetched records plus the pagination cursor.
///
/// Position `i` belongs to logical page `i / page_size` (zero-based). The
/// buffer is a prefix-complete window: successful loads either replace it
/// (page 0) or splice exactly one page in at its offset, so pages before
/// the active one are always fully populated.
#[derive(Debug, Clone)]
pub struct Pager {
    records: Vec<LogRecord>,
    page_size: usize,
    /// 1-based, what the table currently shows.
    active_page: usize,
    /// Upper-bound heuristic; the backend returns no exact total.
    estimated_total: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            records: Vec::new(),
            page_size,
            active_page: 1,
            estimated_total: page_size,
        }
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn active_page(&self) -> usize {
        self.active_page
    }

    pub fn estimated_total(&self) -> usize {
        self.estimated_total
    }

    /// Number of fully or partially cached logical pages.
    pub fn known_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    /// Highest page the pagination controls may offer: everything cached
    /// plus exactly one unseen page, per the estimated-total heuristic.
    pub fn last_reachable_page(&self) -> usize {
        self.estimated_total.div_ceil(self.page_size).max(1)
    }

    pub fn set_active_page(&mut self, page: usize) {
        self.active_page = page.max(1);
    }

    /// Merge one fetched page. Page 0 replaces the whole buffer; any later
    /// page overwrites `data.len()` entries at its offset and leaves
    /// entries beyond the spliced range intact. The estimated total is
    /// recomputed after every merge.
    pub fn apply_page(&mut self, page_index: usize, data: Vec<LogRecord>) {
        if page_index == 0 {
            self.records = data;
        } else {
            let offset = page_index * self.page_size;
            let start = offset.min(self.records.len());
            let end = (start + data.len()).min(self.records.len());
            self.records.splice(start..end, data);
        }
        self.estimated_total = self.records.len() + self.page_size;
    }

    /// Returns the zero-based page index to fetch when `page` is exactly
    /// one past the cached window; in-window pages need no network.
    pub fn fetch_trigger(&self, page: usize) -> Option<usize> {
        (page == self.known_pages() + 1).then(|| page - 1)
    }

    /// The visible slice for the active page.
    pub fn page_slice(&self) -> &[LogRecord] {
        projection(&self.records, self.active_page, self.page_size)
    }
}

/// Pure render projection: rows of `page` (1-based) at the given page size.
/// Tolerates a short final page and any page index without panicking.
pub fn projection(records: &[LogRecord], page: usize, page_size: usize) -> &[LogRecord] {
    let size = page_size.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(size).min(records.len());
    let end = page.saturating_mul(size).min(records.len());
    &records[start..end]
}
