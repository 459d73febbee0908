//! Offset pagination state.

use crate::api::PageResponse;

/// Page cursor derived from the latest successful [`PageResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Zero-based current page.
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl Pager {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size,
            total_pages: 0,
            total_elements: 0,
        }
    }

    /// Take the totals from a response.
    ///
    /// The page index is not copied: it is the page being requested, which
    /// may already be ahead of the last response.
    pub fn sync<T>(&mut self, response: &PageResponse<T>) {
        self.total_pages = response.total_pages;
        self.total_elements = response.total_elements;
        if response.size > 0 {
            self.size = response.size;
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Move forward one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Move back one page. Returns whether the page changed.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Return to the first page. Returns whether the page changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.page != 0;
        self.page = 0;
        changed
    }

    /// Whether the pagination controls should be shown at all.
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    /// One-based `(first, last)` item numbers shown on this page.
    pub fn range(&self) -> (u64, u64) {
        if self.total_elements == 0 {
            return (0, 0);
        }
        let size = u64::from(self.size);
        let first = u64::from(self.page) * size + 1;
        let last = (u64::from(self.page) + 1) * size;
        (first.min(self.total_elements), last.min(self.total_elements))
    }

    /// "1-50 / 1,234" style summary, with a "page / pages" suffix when
    /// there is more than one page.
    pub fn label(&self) -> String {
        let (first, last) = self.range();
        let total = crate::format::group_digits(self.total_elements);
        if self.is_paginated() {
            format!("{first}-{last} / {total}  ({} / {})", self.page + 1, self.total_pages)
        } else {
            format!("{first}-{last} / {total}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_page(number: u32, total_pages: u32, total_elements: u64) -> Pager {
        let mut pager = Pager::new(50);
        pager.sync(&PageResponse::<()> {
            content: Vec::new(),
            total_elements,
            total_pages,
            size: 50,
            number,
        });
        pager.page = number;
        pager
    }

    #[test]
    fn test_next_from_middle_page() {
        let mut pager = at_page(2, 5, 230);
        assert!(pager.next());
        assert_eq!(pager.page, 3);
    }

    #[test]
    fn test_prev_at_first_page_is_noop() {
        let mut pager = at_page(0, 5, 230);
        assert!(!pager.has_prev());
        assert!(!pager.prev());
        assert_eq!(pager.page, 0);
    }

    #[test]
    fn test_next_at_last_page_is_noop() {
        let mut pager = at_page(4, 5, 230);
        assert!(!pager.has_next());
        assert!(!pager.next());
        assert_eq!(pager.page, 4);
    }

    #[test]
    fn test_range_clamps_to_total() {
        let mut pager = at_page(4, 5, 230);
        assert_eq!(pager.range(), (201, 230));

        pager.page = 0;
        assert_eq!(pager.range(), (1, 50));

        assert_eq!(Pager::new(20).range(), (0, 0));
    }

    #[test]
    fn test_label() {
        let pager = at_page(1, 30, 1500);
        assert_eq!(pager.label(), "51-100 / 1,500  (2 / 30)");
    }

    #[test]
    fn test_single_page_hides_controls() {
        let mut pager = at_page(0, 1, 12);
        assert!(!pager.is_paginated());
        assert_eq!(pager.label(), "1-12 / 12");
        assert!(!pager.reset());
    }
}
