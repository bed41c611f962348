// libs/scheduling-cell/src/services/pagination.rs
use tracing::debug;

/// Visible page-number window: centered on `current_page` within
/// `max_pages_to_show`, clamped to `[1, total_pages]`, shifted left when the
/// centered window would run past the last page.
pub fn page_window(
    total_items: u64,
    page_size: u32,
    current_page: u32,
    max_pages_to_show: u32,
) -> Vec<u32> {
    let total_pages = total_page_count(total_items, page_size);
    if total_pages == 0 {
        return Vec::new();
    }

    let show = max_pages_to_show.max(1).min(total_pages);
    let mut start = current_page.saturating_sub(show / 2).max(1);
    if start + show - 1 > total_pages {
        start = total_pages - show + 1;
    }

    (start..start + show).collect()
}

pub fn total_page_count(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size)) as u32
}

#[derive(Debug, Clone)]
pub struct Paginator {
    total_items: u64,
    page_size: u32,
    current_page: u32,
    max_pages_to_show: u32,
}

impl Paginator {
    pub fn new(page_size: u32, max_pages_to_show: u32) -> Self {
        Self {
            total_items: 0,
            page_size,
            current_page: 1,
            max_pages_to_show,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        total_page_count(self.total_items, self.page_size)
    }

    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        let total_pages = self.total_pages();
        if total_pages > 0 && self.current_page > total_pages {
            self.current_page = total_pages;
        }
    }

    /// Back to the first page, e.g. after a navigation transition.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        page_window(
            self.total_items,
            self.page_size,
            self.current_page,
            self.max_pages_to_show,
        )
    }

    /// Returns the new page, or `None` (no page-change event) when the
    /// target is out of range or already current.
    pub fn go_to_page(&mut self, page: u32) -> Option<u32> {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            debug!("Ignoring page change to {}", page);
            return None;
        }
        self.current_page = page;
        Some(page)
    }
}
