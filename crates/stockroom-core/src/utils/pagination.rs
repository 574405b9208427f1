//! Pagination index arithmetic for list screens.

use crate::models::PaginationInfo;

/// Most page links shown before gaps are introduced.
const MAX_VISIBLE_PAGES: u32 = 5;

/// One entry in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

impl std::fmt::Display for PageLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageLink::Page(n) => write!(f, "{}", n),
            PageLink::Gap => write!(f, "..."),
        }
    }
}

impl PaginationInfo {
    /// 1-based number of the `index`-th row on the current page.
    pub fn row_number(&self, index: usize, limit: u32) -> u64 {
        let page = u64::from(self.current.max(1));
        (page - 1) * u64::from(limit) + index as u64 + 1
    }

    /// First and last row shown on the current page, as in
    /// "Showing 11 - 20 of 23". `(0, 0)` when there are no rows.
    pub fn showing_range(&self, limit: u32) -> (u64, u64) {
        if self.total_data == 0 || limit == 0 {
            return (0, 0);
        }
        let page = u64::from(self.current.max(1));
        let first = (page - 1) * u64::from(limit) + 1;
        let last = (page * u64::from(limit)).min(self.total_data);
        (first.min(self.total_data), last)
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Page links for a bar with at most five numbered entries: the first and
/// last pages are always present, up to three neighbours of `current`
/// in between, and gaps where pages are skipped.
pub fn page_window(current: u32, total: u32) -> Vec<PageLink> {
    if total == 0 {
        return Vec::new();
    }
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let current = current.clamp(1, total);
    let (start, end) = if current <= 3 {
        (2, 4)
    } else if current >= total - 2 {
        (total - 3, total - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut links = vec![PageLink::Page(1)];
    if start > 2 {
        links.push(PageLink::Gap);
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total - 1 {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(total));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    fn info(current: u32, total_data: u64) -> PaginationInfo {
        PaginationInfo {
            total_data,
            current,
            ..Default::default()
        }
    }

    #[test]
    fn test_row_number() {
        assert_eq!(info(1, 23).row_number(0, 10), 1);
        assert_eq!(info(3, 23).row_number(2, 10), 23);
        // page 0 from a misbehaving server is treated as page 1
        assert_eq!(info(0, 23).row_number(4, 10), 5);
    }

    #[test]
    fn test_showing_range() {
        assert_eq!(info(1, 23).showing_range(10), (1, 10));
        assert_eq!(info(3, 23).showing_range(10), (21, 23));
        assert_eq!(info(1, 0).showing_range(10), (0, 0));
    }

    #[test]
    fn test_page_window_small() {
        assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_page_window_start() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(10)]
        );
    }

    #[test]
    fn test_page_window_middle() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn test_page_window_end() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Gap, Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            page_window(4, 6),
            vec![Page(1), Gap, Page(3), Page(4), Page(5), Page(6)]
        );
    }

    #[test]
    fn test_page_link_display() {
        assert_eq!(Gap.to_string(), "...");
        assert_eq!(Page(7).to_string(), "7");
    }
}
