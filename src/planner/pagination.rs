//! Pagination planning
//!
//! A request is paginated iff it carries `page` or `offset` and a limit
//! resolves. Zero values count as absent when resolving limit and skip.

use crate::config::QueryOptions;
use crate::request::ParsedRequestParams;

/// Limit/skip resolution and count-query decisions
pub struct PaginationPlanner;

impl PaginationPlanner {
    /// Caller limit (clamped to max), else default limit (clamped to max),
    /// else max, else unbounded.
    pub fn resolve_limit(parsed: &ParsedRequestParams, options: &QueryOptions) -> Option<u64> {
        let max = options.max_limit.filter(|&m| m > 0);
        let clamp = |limit: u64| match max {
            Some(max) if limit > max => max,
            _ => limit,
        };

        if let Some(limit) = parsed.limit.filter(|&l| l > 0) {
            return Some(clamp(limit));
        }
        if let Some(limit) = options.limit.filter(|&l| l > 0) {
            return Some(clamp(limit));
        }
        max
    }

    /// `limit * (page - 1)` when both are set, else the offset.
    ///
    /// Saturates; an unreachable page yields an empty window.
    pub fn resolve_skip(parsed: &ParsedRequestParams, limit: Option<u64>) -> Option<u64> {
        match (parsed.page.filter(|&p| p > 0), limit) {
            (Some(page), Some(limit)) => Some(limit.saturating_mul(page - 1)),
            _ => parsed.offset.filter(|&o| o > 0),
        }
    }

    pub fn is_paginated(parsed: &ParsedRequestParams, options: &QueryOptions) -> bool {
        (parsed.page.is_some() || parsed.offset.is_some())
            && Self::resolve_limit(parsed, options).is_some()
    }

    /// A full window may hide more records; a short one proves the total.
    pub fn needs_count(returned: usize, limit: Option<u64>) -> bool {
        limit.map_or(false, |limit| returned as u64 == limit)
    }

    /// Total implied by a short window.
    ///
    /// An empty window past the end still reports `skip` as the total.
    pub fn window_total(returned: usize, skip: u64) -> u64 {
        (returned as u64).saturating_add(skip)
    }

    /// 1-based page number of a window
    pub fn page_number(skip: u64, limit: u64) -> u64 {
        if limit == 0 {
            1
        } else {
            skip / limit + 1
        }
    }

    pub fn page_count(total: u64, limit: u64) -> u64 {
        if limit == 0 || total == 0 {
            1
        } else {
            total / limit + u64::from(total % limit != 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ParsedRequestParams {
        ParsedRequestParams::default()
    }

    #[test]
    fn test_limit_resolution() {
        let options = QueryOptions::default();
        assert_eq!(PaginationPlanner::resolve_limit(&params(), &options), None);
        assert_eq!(
            PaginationPlanner::resolve_limit(&params().with_limit(5), &options),
            Some(5)
        );

        let options = QueryOptions::default().with_limit(10).with_max_limit(20);
        assert_eq!(PaginationPlanner::resolve_limit(&params(), &options), Some(10));
        assert_eq!(
            PaginationPlanner::resolve_limit(&params().with_limit(50), &options),
            Some(20)
        );

        let options = QueryOptions::default().with_limit(30).with_max_limit(20);
        assert_eq!(PaginationPlanner::resolve_limit(&params(), &options), Some(20));

        let options = QueryOptions::default().with_max_limit(7);
        assert_eq!(PaginationPlanner::resolve_limit(&params(), &options), Some(7));
    }

    #[test]
    fn test_zero_limit_is_absent() {
        let options = QueryOptions::default().with_limit(4);
        assert_eq!(
            PaginationPlanner::resolve_limit(&params().with_limit(0), &options),
            Some(4)
        );
    }

    #[test]
    fn test_skip_resolution() {
        assert_eq!(
            PaginationPlanner::resolve_skip(&params().with_page(3), Some(10)),
            Some(20)
        );
        assert_eq!(
            PaginationPlanner::resolve_skip(&params().with_page(1), Some(10)),
            Some(0)
        );
        assert_eq!(
            PaginationPlanner::resolve_skip(&params().with_offset(3), None),
            Some(3)
        );
        assert_eq!(
            PaginationPlanner::resolve_skip(&params().with_page(2), None),
            None
        );
        assert_eq!(PaginationPlanner::resolve_skip(&params(), Some(5)), None);
    }

    #[test]
    fn test_paginated_needs_page_or_offset_and_limit() {
        let options = QueryOptions::default();
        assert!(!PaginationPlanner::is_paginated(&params().with_limit(5), &options));
        assert!(!PaginationPlanner::is_paginated(&params().with_page(1), &options));
        assert!(PaginationPlanner::is_paginated(
            &params().with_page(1).with_limit(3),
            &options
        ));
        assert!(PaginationPlanner::is_paginated(
            &params().with_offset(0),
            &QueryOptions::default().with_max_limit(10)
        ));
    }

    #[test]
    fn test_count_decision() {
        assert!(PaginationPlanner::needs_count(3, Some(3)));
        assert!(!PaginationPlanner::needs_count(2, Some(3)));
        assert!(!PaginationPlanner::needs_count(3, None));
        assert_eq!(PaginationPlanner::window_total(2, 9), 11);
    }

    #[test]
    fn test_page_info_numbers() {
        assert_eq!(PaginationPlanner::page_number(0, 3), 1);
        assert_eq!(PaginationPlanner::page_number(6, 3), 3);
        assert_eq!(PaginationPlanner::page_number(4, 3), 2);
        assert_eq!(PaginationPlanner::page_count(10, 3), 4);
        assert_eq!(PaginationPlanner::page_count(9, 3), 3);
        assert_eq!(PaginationPlanner::page_count(0, 3), 1);
    }

    #[test]
    fn test_huge_page_saturates() {
        let skip = PaginationPlanner::resolve_skip(&params().with_page(u64::MAX), Some(10));
        assert_eq!(skip, Some(u64::MAX));
        assert_eq!(PaginationPlanner::page_number(u64::MAX, 10), u64::MAX / 10 + 1);
    }

    #[test]
    fn test_huge_offset_saturates() {
        let skip = PaginationPlanner::resolve_skip(&params().with_offset(u64::MAX), Some(10));
        assert_eq!(skip, Some(u64::MAX));

        let total = PaginationPlanner::window_total(3, u64::MAX);
        assert_eq!(total, u64::MAX);
        assert_eq!(PaginationPlanner::page_count(total, 10), u64::MAX / 10 + 1);
        assert_eq!(PaginationPlanner::page_count(u64::MAX, 1), u64::MAX);
    }
}
