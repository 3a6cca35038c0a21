//! Pagination primitives shared across all list endpoints, including the
//! page-control range calculation used to render numbered pagers.

use serde::{Deserialize, Serialize, Serializer};

/// Pagination query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PER_PAGE: i64 = 60;

    /// Default items per page — the listings grid shows 9 cards.
    pub const DEFAULT_PER_PAGE: i64 = 9;

    pub fn limit(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        let page = self.page.unwrap_or(1).max(1);
        (page - 1) * self.limit()
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let per_page = pagination.limit();
        let total_pages = (total + per_page - 1) / per_page;
        Self {
            items,
            total,
            page: pagination.current_page(),
            per_page,
            total_pages,
        }
    }

    /// Page-control tokens for this result, with `sibling_count` numbered
    /// buttons on each side of the current page.
    pub fn page_tokens(&self, sibling_count: i64) -> Vec<PageToken> {
        compute_range(self.page, self.total, self.per_page, sibling_count)
    }
}

/// One slot in a rendered pager: either a clickable page number or a
/// non-interactive ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(i64),
    Dots,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(n) => serializer.serialize_i64(*n),
            PageToken::Dots => serializer.serialize_str("dots"),
        }
    }
}

/// Compute the ordered sequence of pager slots for a result set.
///
/// The visible window is `sibling_count * 2 + 5` slots (current page, its
/// siblings, the first and last page, and up to two ellipses). Small result
/// sets yield the full `1..=total_pages` run with no ellipsis. The current
/// page is not clamped; out-of-range values degrade to a valid boundary
/// shape instead of panicking.
pub fn compute_range(
    current_page: i64,
    total_count: i64,
    page_size: i64,
    sibling_count: i64,
) -> Vec<PageToken> {
    let page_size = page_size.max(1);
    let total_count = total_count.max(0);
    let sibling_count = sibling_count.max(0);
    let total_pages = (total_count + page_size - 1) / page_size;

    let window = sibling_count * 2 + 5;
    if total_pages <= window {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let left_sibling = (current_page - sibling_count).max(1);
    let right_sibling = (current_page + sibling_count).min(total_pages);

    let show_left_dots = left_sibling > 2;
    let show_right_dots = right_sibling < total_pages - 1;

    if !show_left_dots && show_right_dots {
        let left_items = 3 + 2 * sibling_count;
        let mut range: Vec<PageToken> = (1..=left_items).map(PageToken::Page).collect();
        range.push(PageToken::Dots);
        range.push(PageToken::Page(total_pages));
        return range;
    }

    if show_left_dots && !show_right_dots {
        let right_items = 3 + 2 * sibling_count;
        let mut range = vec![PageToken::Page(1), PageToken::Dots];
        range.extend((total_pages - right_items + 1..=total_pages).map(PageToken::Page));
        return range;
    }

    let mut range = vec![PageToken::Page(1), PageToken::Dots];
    range.extend((left_sibling..=right_sibling).map(PageToken::Page));
    range.push(PageToken::Dots);
    range.push(PageToken::Page(total_pages));
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageToken::{Dots, Page};

    fn pages(range: &[PageToken]) -> Vec<i64> {
        range
            .iter()
            .filter_map(|t| match t {
                Page(n) => Some(*n),
                Dots => None,
            })
            .collect()
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.limit(), 9);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_per_page() {
        let p = Pagination {
            page: Some(1),
            per_page: Some(500),
        };
        assert_eq!(p.limit(), 60);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page: Some(3),
            per_page: Some(9),
        };
        assert_eq!(p.offset(), 18);
    }

    #[test]
    fn paged_result_total_pages() {
        let p = Pagination {
            page: Some(1),
            per_page: Some(9),
        };
        let result = PagedResult::new(vec![1, 2, 3], 20, &p);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total, 20);
        assert_eq!(result.page, 1);
    }

    #[test]
    fn empty_result_yields_empty_range() {
        assert!(compute_range(1, 0, 9, 1).is_empty());
    }

    #[test]
    fn single_page_yields_one_entry() {
        assert_eq!(compute_range(1, 5, 9, 1), vec![Page(1)]);
    }

    #[test]
    fn exact_page_boundary() {
        // 18 items at 9 per page is exactly two pages.
        assert_eq!(compute_range(1, 18, 9, 1), vec![Page(1), Page(2)]);
        assert_eq!(compute_range(2, 18, 9, 1), vec![Page(1), Page(2)]);
    }

    #[test]
    fn small_total_has_no_dots() {
        // 7 pages fit the default window (2*1 + 5) exactly.
        let range = compute_range(4, 63, 9, 1);
        assert_eq!(range, (1..=7).map(Page).collect::<Vec<_>>());
    }

    #[test]
    fn right_dots_only_near_start() {
        // 23 pages, current at the left edge.
        let range = compute_range(1, 200, 9, 1);
        assert_eq!(
            range,
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Dots, Page(23)]
        );
        // Current page at the exact boundary still shows no left dots.
        let range = compute_range(3, 200, 9, 1);
        assert_eq!(
            range,
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Dots, Page(23)]
        );
    }

    #[test]
    fn left_dots_only_near_end() {
        let range = compute_range(23, 200, 9, 1);
        assert_eq!(
            range,
            vec![Page(1), Dots, Page(19), Page(20), Page(21), Page(22), Page(23)]
        );
    }

    #[test]
    fn both_dots_in_the_middle() {
        let range = compute_range(12, 200, 9, 1);
        assert_eq!(
            range,
            vec![Page(1), Dots, Page(11), Page(12), Page(13), Dots, Page(23)]
        );
    }

    #[test]
    fn zero_sibling_count() {
        // Window shrinks to 5 slots; the middle shape keeps only the current page.
        let range = compute_range(6, 100, 9, 0);
        assert_eq!(range, vec![Page(1), Dots, Page(6), Dots, Page(12)]);
        let range = compute_range(1, 45, 9, 0);
        assert_eq!(range, (1..=5).map(Page).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_current_page_does_not_panic() {
        let range = compute_range(99, 200, 9, 1);
        assert_eq!(range.first(), Some(&Page(1)));
        assert_eq!(range.last(), Some(&Page(23)));
        let range = compute_range(0, 200, 9, 1);
        assert_eq!(range.last(), Some(&Page(23)));
        let range = compute_range(-3, 200, 9, 1);
        assert_eq!(range.last(), Some(&Page(23)));
    }

    #[test]
    fn boundaries_and_no_adjacent_dots_hold_across_inputs() {
        for total_count in [0, 1, 9, 18, 81, 200, 1000] {
            for sibling_count in 0..=3 {
                let total_pages = (total_count + 8) / 9;
                for current in 1..=total_pages.max(1) {
                    let range = compute_range(current, total_count, 9, sibling_count);
                    // No two adjacent dots.
                    for pair in range.windows(2) {
                        assert!(
                            !(pair[0] == Dots && pair[1] == Dots),
                            "adjacent dots for total={total_count} sibling={sibling_count} current={current}"
                        );
                    }
                    if total_pages > sibling_count * 2 + 5 {
                        assert_eq!(range.first(), Some(&Page(1)));
                        assert_eq!(range.last(), Some(&Page(total_pages)));
                    } else {
                        assert_eq!(pages(&range), (1..=total_pages).collect::<Vec<_>>());
                    }
                }
            }
        }
    }

    #[test]
    fn page_token_serialization_distinguishes_dots() {
        let json = serde_json::to_string(&[Page(2), Dots, Page(23)]).unwrap();
        assert_eq!(json, "[2,\"dots\",23]");
    }

    #[test]
    fn paged_result_exposes_page_tokens() {
        let p = Pagination {
            page: Some(12),
            per_page: Some(9),
        };
        let result = PagedResult::new(Vec::<i32>::new(), 200, &p);
        assert_eq!(
            result.page_tokens(1),
            vec![Page(1), Dots, Page(11), Page(12), Page(13), Dots, Page(23)]
        );
    }
}
