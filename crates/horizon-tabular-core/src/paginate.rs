//! Page windowing.
//!
//! [`PageWindow`] is the `{current_page, page_size, total_items}` triple behind
//! on-screen paging. Every mutation re-clamps the current page so that
//! `1 <= current_page <= total_pages` always holds, and `total_pages` is never
//! less than one.
//!
//! Pages are 1-based throughout.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::logging::targets;

/// The paging state of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl PageWindow {
    /// Creates a window on page 1.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// Returns the current (clamped) 1-based page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of items being paged.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Returns `max(1, ceil(total_items / page_size))`.
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Updates the item count and re-clamps the current page.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.clamp();
    }

    /// Updates the page size and re-clamps the current page.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp();
    }

    /// Moves to `page`, clamped into range.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp();
    }

    /// Moves to the next page. Returns `false` on the last page.
    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous page. Returns `false` on the first page.
    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Returns `true` if there is a page before the current one.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Returns the item range covered by the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    fn clamp(&mut self) {
        let clamped = self.current_page.clamp(1, self.total_pages());
        if clamped != self.current_page {
            tracing::trace!(
                target: targets::PAGINATE,
                from = self.current_page,
                to = clamped,
                "clamped current page"
            );
            self.current_page = clamped;
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

/// One page of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The clamped 1-based page number.
    pub current_page: usize,
    /// Total number of pages, at least one.
    pub total_pages: usize,
}

/// Slices one page out of `items`.
///
/// `current_page` is clamped into `[1, total_pages]` before slicing, so an
/// out-of-range request yields the nearest valid page. A `page_size` of zero
/// is treated as one.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::paginate;
///
/// let items: Vec<u32> = (1..=23).collect();
/// let page = paginate(&items, 10, 7);
/// assert_eq!(page.current_page, 3);
/// assert_eq!(page.total_pages, 3);
/// assert_eq!(page.items, vec![21, 22, 23]);
/// ```
pub fn paginate<T: Clone>(items: &[T], page_size: usize, current_page: usize) -> Page<T> {
    let mut window = PageWindow::new(page_size, items.len());
    window.set_current_page(current_page);

    Page {
        items: items[window.range()].to_vec(),
        current_page: window.current_page(),
        total_pages: window.total_pages(),
    }
}

fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}
