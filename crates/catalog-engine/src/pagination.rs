//! Page slicing and navigation for flat listings.
//!
//! Pages are 1-indexed. Navigation outside `[1, total_pages]` is a no-op.

use std::ops::Range;

/// Default number of numbered page buttons.
pub const DEFAULT_PAGE_WINDOW: usize = 5;

/// Number of pages needed for `len` items, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Contiguous page numbers to show as buttons, centred on `current` and
/// shifted at the edges so the window stays inside `[1, total]`.
pub fn page_window(current: usize, total: usize, max_buttons: usize) -> Vec<usize> {
    let total = total.max(1);
    let count = max_buttons.min(total);
    if count == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(count / 2).max(1);
    if start + count - 1 > total {
        start = total + 1 - count;
    }
    (start..start + count).collect()
}

/// Current page of a flat listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Back to the first page.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Pull the current page into range after `len` changed.
    /// Returns `true` if the page moved.
    pub fn clamp(&mut self, len: usize) -> bool {
        let clamped = self.current_page.clamp(1, self.total_pages(len));
        let moved = clamped != self.current_page;
        self.current_page = clamped;
        moved
    }

    pub fn next(&mut self, len: usize) -> bool {
        self.go_to(self.current_page + 1, len)
    }

    pub fn prev(&mut self, len: usize) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to(page, len),
            None => false,
        }
    }

    /// Jump to `page`; out-of-range pages leave the state untouched.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        if page < 1 || page > self.total_pages(len) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Bounds of the current page within `len` items.
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    pub fn window(&self, len: usize, max_buttons: usize) -> Vec<usize> {
        page_window(self.current_page, self.total_pages(len), max_buttons)
    }
}
