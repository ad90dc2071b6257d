use crate::client::{ApiClient, Role};
use crate::error::Result;
use crate::pager::{FilterState, Pager};
use crate::record::{LogRecord, TaskAction};

/// Fetch controller binding the API client to the page cache. Used directly
/// by the CLI paths; the TUI replays the same pager rules with the fetch on
/// a worker thread.
#[derive(Debug)]
pub struct LogViewer {
    client: ApiClient,
    role: Role,
    pub filters: FilterState,
    pager: Pager,
}

impl LogViewer {
    pub fn new(client: ApiClient, role: Role, page_size: usize) -> Self {
        Self {
            client,
            role,
            filters: FilterState::now(),
            pager: Pager::new(page_size),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Fetch one page and merge it into the cache. On failure the cache and
    /// cursor are left untouched and the error carries the server message.
    pub fn load(&mut self, page_index: usize) -> Result<()> {
        let data = self.client.list_logs(self.role, page_index, &self.filters)?;
        self.pager.apply_page(page_index, data);
        Ok(())
    }

    /// The explicit query action: back to page 1, unconditionally replace
    /// the cache with a fresh page 0.
    pub fn refresh(&mut self) -> Result<()> {
        self.pager.set_active_page(1);
        self.load(0)
    }

    /// Move to `page`. In-window pages are a local slice; exactly one page
    /// past the window triggers a fetch-and-merge. The cursor moves first,
    /// matching the display-first behavior of the table controls.
    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        let trigger = self.pager.fetch_trigger(page);
        self.pager.set_active_page(page);
        match trigger {
            Some(idx) => self.load(idx),
            None => Ok(()),
        }
    }

    /// Changing the coarse task-type dimension refetches immediately;
    /// fine-grained filter edits wait for the explicit query action.
    pub fn set_action_filter(&mut self, action: Option<TaskAction>) -> Result<()> {
        if self.filters.action == action {
            return Ok(());
        }
        self.filters.action = action;
        self.refresh()
    }

    pub fn visible_rows(&self) -> &[LogRecord] {
        self.pager.page_slice()
    }
}
