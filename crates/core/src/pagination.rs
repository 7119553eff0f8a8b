//! Client-side pagination over eagerly fetched lists.
//!
//! The backend has no paging; every list is fetched in full and sliced here.

use serde::Serialize;

/// Number of items on one page.
pub const PAGE_SIZE: usize = 40;

/// Pages on each side of the current page that get their own link.
const LINK_WINDOW: usize = 2;

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page, in source order.
    pub items: &'a [T],
    /// 1-based page number, clamped into range.
    pub current_page: usize,
    /// `ceil(total_items / PAGE_SIZE)`; zero for an empty list.
    pub total_pages: usize,
    /// Length of the full list.
    pub total_items: usize,
}

/// An entry in the page-link strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageLink {
    /// A numbered link.
    Number { page: usize, current: bool },
    /// A skipped run of pages.
    Gap,
}

/// Total number of pages for `total_items` items.
#[must_use]
pub const fn total_pages(total_items: usize) -> usize {
    total_items.div_ceil(PAGE_SIZE)
}

/// Slice page `requested` (1-based) out of `items`.
///
/// Out-of-range page numbers are clamped to the first or last page.
#[must_use]
pub fn paginate<T>(items: &[T], requested: usize) -> Page<'_, T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items);
    let current_page = requested.clamp(1, total_pages.max(1));
    let start = (current_page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total_items);

    Page {
        items: items.get(start..end).unwrap_or_default(),
        current_page,
        total_pages,
        total_items,
    }
}

impl<T> Page<'_, T> {
    /// The pagination control is only shown when there is more than one page.
    #[must_use]
    pub const fn show_controls(&self) -> bool {
        self.total_items > PAGE_SIZE
    }

    /// Previous page number, if any.
    #[must_use]
    pub const fn previous(&self) -> Option<usize> {
        if self.current_page > 1 {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// Next page number, if any.
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        if self.current_page < self.total_pages {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// Page links: first, last, and a window around the current page.
    #[must_use]
    pub fn links(&self) -> Vec<PageLink> {
        let mut links = Vec::new();
        let mut last_emitted = 0;
        for page in 1..=self.total_pages {
            let near_current = page.abs_diff(self.current_page) <= LINK_WINDOW;
            if page == 1 || page == self.total_pages || near_current {
                if last_emitted != 0 && page > last_emitted + 1 {
                    links.push(PageLink::Gap);
                }
                links.push(PageLink::Number {
                    page,
                    current: page == self.current_page,
                });
                last_emitted = page;
            }
        }
        links
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(40), 1);
        assert_eq!(total_pages(41), 2);
        assert_eq!(total_pages(80), 2);
        assert_eq!(total_pages(81), 3);
    }

    #[test]
    fn test_pages_cover_every_item_exactly_once() {
        for n in [0_usize, 1, 39, 40, 41, 79, 80, 81, 123, 400] {
            let items: Vec<usize> = (0..n).collect();
            let pages = total_pages(n);
            assert_eq!(pages, n.div_ceil(40));

            let mut seen = Vec::new();
            for page in 1..=pages {
                let slice = paginate(&items, page);
                assert!(slice.items.len() <= PAGE_SIZE);
                seen.extend_from_slice(slice.items);
            }
            assert_eq!(seen, items, "n = {n}");
        }
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        let items: Vec<usize> = (0..85).collect();

        let first = paginate(&items, 0);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.items.first(), Some(&0));

        let last = paginate(&items, 99);
        assert_eq!(last.current_page, 3);
        assert_eq!(last.items, &[80, 81, 82, 83, 84]);
    }

    #[test]
    fn test_empty_list() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.show_controls());
        assert!(page.links().is_empty());
    }

    #[test]
    fn test_controls_only_above_one_page() {
        let forty: Vec<u8> = vec![0; 40];
        assert!(!paginate(&forty, 1).show_controls());

        let forty_one: Vec<u8> = vec![0; 41];
        assert!(paginate(&forty_one, 1).show_controls());
    }

    #[test]
    fn test_previous_and_next() {
        let items: Vec<u8> = vec![0; 100];
        let middle = paginate(&items, 2);
        assert_eq!(middle.previous(), Some(1));
        assert_eq!(middle.next(), Some(3));

        let last = paginate(&items, 3);
        assert_eq!(last.next(), None);
    }

    #[test]
    fn test_links_window_with_gaps() {
        let items: Vec<u8> = vec![0; 40 * 10];
        let page = paginate(&items, 5);
        let numbers: Vec<Option<usize>> = page
            .links()
            .into_iter()
            .map(|l| match l {
                PageLink::Number { page, .. } => Some(page),
                PageLink::Gap => None,
            })
            .collect();
        assert_eq!(
            numbers,
            vec![Some(1), None, Some(3), Some(4), Some(5), Some(6), Some(7), None, Some(10)]
        );
        assert!(page.links().contains(&PageLink::Number {
            page: 5,
            current: true
        }));
    }
}
