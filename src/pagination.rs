use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// Compact page strip: both edges, a window around the current page and
/// `None` where pages are skipped.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Requested page of a list endpoint, normalised to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub pages: Vec<Option<usize>>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        let total_pages = total.div_ceil(request.per_page);
        let pages = get_pages(total_pages, request.page, 2, 2, 4, 2);

        Self {
            items,
            total,
            page: request.page,
            pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_show_every_page() {
        assert_eq!(get_pages(3, 1, 2, 2, 4, 2), vec![Some(1), Some(2), Some(3)]);
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn long_lists_collapse_gaps() {
        let pages = get_pages(30, 15, 2, 2, 4, 2);
        assert_eq!(
            pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(13),
                Some(14),
                Some(15),
                Some(16),
                Some(17),
                Some(18),
                Some(19),
                None,
                Some(29),
                Some(30),
            ]
        );
    }

    #[test]
    fn page_request_is_clamped() {
        assert_eq!(PageRequest::new(Some(0), Some(1_000)), PageRequest { page: 1, per_page: 100 });
        assert_eq!(PageRequest::default(), PageRequest { page: 1, per_page: 20 });
    }

    #[test]
    fn paginated_counts_pages_from_total() {
        let page = Paginated::new(vec![1, 2], 45, PageRequest::new(Some(3), Some(20)));
        assert_eq!(page.total, 45);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page.map(|n| n * 10).items, vec![10, 20]);
    }
}
