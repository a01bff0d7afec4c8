//! Footer links for a loaded page.

use serde::Serialize;

use crate::domain::list::ListResult;

/// Pages always linked at each end of the footer.
const EDGE_PAGES: usize = 2;
const BEFORE_CURRENT: usize = 2;
const AFTER_CURRENT: usize = 4;

/// One entry of the list footer.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    Page { number: usize, current: bool },
    /// Collapsed run of pages, rendered as an ellipsis.
    Gap,
}

impl<R> ListResult<R> {
    /// Both edges plus a window around the current page, gaps in between.
    pub fn page_links(&self) -> Vec<PageLink> {
        let last = self.total_pages();
        let current = self.page.max(1);
        let window = current.saturating_sub(BEFORE_CURRENT)..=current + AFTER_CURRENT;

        let mut links = Vec::new();
        for number in 1..=last {
            let linked =
                number <= EDGE_PAGES || number + EDGE_PAGES > last || window.contains(&number);
            if linked {
                links.push(PageLink::Page {
                    number,
                    current: number == current,
                });
            } else if links.last() != Some(&PageLink::Gap) {
                links.push(PageLink::Gap);
            }
        }
        links
    }

    pub fn previous_page(&self) -> Option<usize> {
        self.page.checked_sub(1).filter(|page| *page >= 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        let next = self.page + 1;
        (next <= self.total_pages()).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PageSize;

    fn result(total_count: usize, page: usize) -> ListResult<()> {
        ListResult {
            rows: Vec::new(),
            total_count,
            page,
            page_size: PageSize::new(10).unwrap(),
        }
    }

    /// Page numbers with `0` standing for a gap.
    fn numbers(links: &[PageLink]) -> Vec<usize> {
        links
            .iter()
            .map(|link| match link {
                PageLink::Page { number, .. } => *number,
                PageLink::Gap => 0,
            })
            .collect()
    }

    #[test]
    fn no_links_for_empty_lists() {
        assert!(result(0, 1).page_links().is_empty());
    }

    #[test]
    fn short_lists_link_every_page() {
        let links = result(40, 2).page_links();
        assert_eq!(numbers(&links), vec![1, 2, 3, 4]);
        assert_eq!(
            links[1],
            PageLink::Page {
                number: 2,
                current: true
            }
        );
    }

    #[test]
    fn long_lists_collapse_into_gaps() {
        assert_eq!(
            numbers(&result(200, 10).page_links()),
            vec![1, 2, 0, 8, 9, 10, 11, 12, 13, 14, 0, 19, 20]
        );
    }

    #[test]
    fn a_single_hidden_page_is_still_a_gap() {
        assert_eq!(
            numbers(&result(100, 6).page_links()),
            vec![1, 2, 0, 4, 5, 6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let links = result(20, 0).page_links();
        assert_eq!(numbers(&links), vec![1, 2]);
        assert_eq!(
            links[0],
            PageLink::Page {
                number: 1,
                current: true
            }
        );
    }

    #[test]
    fn neighbours_stay_in_range() {
        assert_eq!(result(30, 1).previous_page(), None);
        assert_eq!(result(30, 1).next_page(), Some(2));
        assert_eq!(result(30, 3).previous_page(), Some(2));
        assert_eq!(result(30, 3).next_page(), None);
        assert_eq!(result(0, 1).next_page(), None);
    }

    #[test]
    fn links_serialize_for_templates() {
        assert_eq!(
            serde_json::to_value(result(30, 1).page_links()[0]).unwrap(),
            serde_json::json!({"kind": "page", "number": 1, "current": true})
        );
    }
}
