//! Faceted query engine: filter, sort, paginate, derive facets
//!
//! Queries run over an immutable snapshot of the corpus and share no state,
//! so concurrent queries need no coordination.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::component::Component;
use crate::catalog::filter::FilterCriteria;
use crate::core::entity::QualityLevel;

/// Default page size used when the caller supplies an invalid one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Sortable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    PartNumber,
    Manufacturer,
    ReferencePrice,
    QualityLevel,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A sort request: key plus direction
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

/// A validated pagination request (1-indexed page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Clamp raw values into a valid request: page -> 1, page_size -> default.
    /// Stale bookmarked query state degrades instead of failing.
    pub fn clamped(page: i64, page_size: i64) -> Self {
        Self {
            page: if page >= 1 { page as usize } else { 1 },
            page_size: if page_size >= 1 {
                page_size as usize
            } else {
                DEFAULT_PAGE_SIZE
            },
        }
    }
}

/// Distinct values observed on the filtered result set, sorted and deduplicated
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub manufacturers: Vec<String>,
    pub categories: Vec<String>,
    pub quality_levels: Vec<String>,
}

/// One page of query results plus derived facets
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub items: Vec<Component>,
    /// Filtered count, not corpus size
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub facets: Facets,
}

impl QueryPage {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Run a faceted query over the corpus snapshot
pub fn run_query(
    corpus: &[Component],
    criteria: &FilterCriteria,
    page: PageRequest,
    sort: Option<SortSpec>,
) -> QueryPage {
    let mut filtered: Vec<&Component> = corpus.iter().filter(|c| criteria.matches(c)).collect();

    if let Some(spec) = sort {
        sort_components(&mut filtered, spec);
    }

    let facets = derive_facets(&filtered);
    let total = filtered.len();

    let start = (page.page - 1).saturating_mul(page.page_size);
    let items: Vec<Component> = filtered
        .into_iter()
        .skip(start)
        .take(page.page_size)
        .cloned()
        .collect();

    QueryPage {
        items,
        total,
        page: page.page,
        page_size: page.page_size,
        facets,
    }
}

/// Stable sort: equal keys keep their original corpus order
fn sort_components(items: &mut [&Component], spec: SortSpec) {
    items.sort_by(|a, b| {
        let ordering = match spec.key {
            SortKey::PartNumber => a.part_number.cmp(&b.part_number),
            SortKey::Manufacturer => a.manufacturer.cmp(&b.manufacturer),
            SortKey::ReferencePrice => a.reference_price.total_cmp(&b.reference_price),
            SortKey::QualityLevel => quality_sort_key(a).cmp(&quality_sort_key(b)),
            SortKey::Created => a.created.cmp(&b.created),
        };
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Recognized quality labels sort by rank; unrecognized labels sort after
/// them, by raw string
fn quality_sort_key(component: &Component) -> (u8, String) {
    match QualityLevel::from_label(&component.quality_level) {
        Some(level) => (level.rank(), String::new()),
        None => (u8::MAX, component.quality_level.clone()),
    }
}

/// Facets are derived from the filtered set, never the whole corpus, so the
/// UI can populate follow-on dropdowns and hide empty controls
fn derive_facets(filtered: &[&Component]) -> Facets {
    let mut manufacturers = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut quality_levels = BTreeSet::new();

    for component in filtered {
        if !component.manufacturer.is_empty() {
            manufacturers.insert(component.manufacturer.clone());
        }
        if !component.primary_category.is_empty() {
            categories.insert(component.primary_category.clone());
        }
        if !component.quality_level.is_empty() {
            quality_levels.insert(component.quality_level.clone());
        }
    }

    Facets {
        manufacturers: manufacturers.into_iter().collect(),
        categories: categories.into_iter().collect(),
        quality_levels: quality_levels.into_iter().collect(),
    }
}

/// A search suggestion for typeahead controls
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Component,
    Category,
    Manufacturer,
}

/// Mixed typeahead suggestions: components, categories, manufacturers,
/// split roughly 60/20/20 within `limit`. Terms under two characters
/// return nothing.
pub fn suggest(corpus: &[Component], term: &str, limit: usize) -> Vec<Suggestion> {
    let term = term.trim().to_lowercase();
    if term.len() < 2 || limit == 0 {
        return Vec::new();
    }

    let component_quota = (limit * 6 / 10).max(1);
    let facet_quota = (limit * 2 / 10).max(1);

    let mut suggestions: Vec<Suggestion> = corpus
        .iter()
        .filter(|c| {
            c.part_number.to_lowercase().contains(&term)
                || c.description.to_lowercase().contains(&term)
        })
        .take(component_quota)
        .map(|c| Suggestion {
            kind: SuggestionKind::Component,
            value: c.part_number.clone(),
            label: if c.description.is_empty() {
                c.part_number.clone()
            } else {
                format!("{} - {}", c.part_number, c.description)
            },
        })
        .collect();

    let categories: BTreeSet<String> = corpus
        .iter()
        .map(|c| c.primary_category.clone())
        .filter(|cat| cat.to_lowercase().contains(&term))
        .collect();
    suggestions.extend(categories.into_iter().take(facet_quota).map(|cat| {
        Suggestion {
            kind: SuggestionKind::Category,
            value: cat.clone(),
            label: cat,
        }
    }));

    let manufacturers: BTreeSet<String> = corpus
        .iter()
        .map(|c| c.manufacturer.clone())
        .filter(|m| m.to_lowercase().contains(&term))
        .collect();
    suggestions.extend(manufacturers.into_iter().take(facet_quota).map(|m| {
        Suggestion {
            kind: SuggestionKind::Manufacturer,
            value: m.clone(),
            label: m,
        }
    }));

    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(part: &str, manufacturer: &str, category: &str, price: f64) -> Component {
        let mut cmp = Component::new(
            part.to_string(),
            manufacturer.to_string(),
            category.to_string(),
            "test".to_string(),
        );
        cmp.reference_price = price;
        cmp
    }

    fn corpus() -> Vec<Component> {
        vec![
            component("STM32F103C8T6", "ST", "数字单片集成电路", 12.5),
            component("STM32F103", "ST", "数字单片集成电路", 9.8),
            component("LM324AN", "TI", "模拟集成电路", 1.2),
            component("AD8066ARZ", "ADI", "模拟集成电路", 15.0),
            component("MAX232CPE", "Maxim", "接口电路", 3.4),
            component("ESP32-WROOM-32", "Espressif", "数字单片集成电路", 18.0),
        ]
    }

    #[test]
    fn test_identity_query_returns_whole_corpus() {
        let corpus = corpus();
        let page = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest::default(),
            None,
        );
        assert_eq!(page.total, corpus.len());
        assert_eq!(page.items.len(), corpus.len());
    }

    #[test]
    fn test_category_filter_drives_facets() {
        let corpus = corpus();
        let criteria = FilterCriteria {
            category: Some("数字单片集成电路".to_string()),
            ..Default::default()
        };
        let page = run_query(&corpus, &criteria, PageRequest::default(), None);

        assert_eq!(page.total, 3);
        assert_eq!(
            page.facets.manufacturers,
            vec!["Espressif".to_string(), "ST".to_string()]
        );
        assert_eq!(page.facets.categories, vec!["数字单片集成电路".to_string()]);
    }

    #[test]
    fn test_facet_soundness() {
        let corpus = corpus();
        let criteria = FilterCriteria {
            search: Some("STM32".to_string()),
            ..Default::default()
        };
        let page = run_query(&corpus, &criteria, PageRequest::default(), None);
        let filtered: Vec<&Component> =
            corpus.iter().filter(|c| criteria.matches(c)).collect();

        for manufacturer in &page.facets.manufacturers {
            assert!(filtered.iter().any(|c| &c.manufacturer == manufacturer));
        }
        assert_eq!(page.facets.manufacturers, vec!["ST".to_string()]);
    }

    #[test]
    fn test_pagination_coverage() {
        let corpus: Vec<Component> = (0..25)
            .map(|i| component(&format!("PN-{:03}", i), "M", "C", i as f64 + 1.0))
            .collect();

        let mut seen = Vec::new();
        let mut page_no = 1;
        loop {
            let page = run_query(
                &corpus,
                &FilterCriteria::default(),
                PageRequest {
                    page: page_no,
                    page_size: 10,
                },
                None,
            );
            if page.items.is_empty() {
                break;
            }
            seen.extend(page.items.iter().map(|c| c.part_number.clone()));
            if !page.has_next() {
                break;
            }
            page_no += 1;
        }

        let expected: Vec<String> = corpus.iter().map(|c| c.part_number.clone()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_price_sort_desc_across_pages() {
        let corpus: Vec<Component> = (0..25)
            .map(|i| component(&format!("PN-{:03}", i), "M", "C", (i + 1) as f64))
            .collect();

        let sort = Some(SortSpec {
            key: SortKey::ReferencePrice,
            order: SortOrder::Desc,
        });
        let page1 = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest {
                page: 1,
                page_size: 10,
            },
            sort,
        );
        let page3 = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest {
                page: 3,
                page_size: 10,
            },
            sort,
        );

        assert_eq!(page1.items.len(), 10);
        assert!(page1
            .items
            .windows(2)
            .all(|w| w[0].reference_price >= w[1].reference_price));
        assert_eq!(page1.items[0].reference_price, 25.0);
        assert_eq!(page3.items.len(), 5);
        assert_eq!(page3.items.last().unwrap().reference_price, 1.0);
    }

    #[test]
    fn test_stable_sort_preserves_corpus_order_on_ties() {
        let corpus = vec![
            component("B-FIRST", "M", "C", 5.0),
            component("A-SECOND", "M", "C", 5.0),
        ];
        let page = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest::default(),
            Some(SortSpec {
                key: SortKey::ReferencePrice,
                order: SortOrder::Asc,
            }),
        );
        assert_eq!(page.items[0].part_number, "B-FIRST");
        assert_eq!(page.items[1].part_number, "A-SECOND");
    }

    #[test]
    fn test_invalid_page_clamps_instead_of_failing() {
        let req = PageRequest::clamped(0, -5);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_past_end_is_empty_with_total() {
        let corpus = corpus();
        let page = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest {
                page: 99,
                page_size: 10,
            },
            None,
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total, corpus.len());
    }

    #[test]
    fn test_quality_level_sort_order() {
        let mut a = component("A", "M", "C", 1.0);
        a.quality_level = "aerospace".to_string();
        let mut b = component("B", "M", "C", 1.0);
        b.quality_level = "consumer".to_string();
        let mut c = component("C", "M", "C", 1.0);
        c.quality_level = "QPL-1".to_string();

        let corpus = vec![a, b, c];
        let page = run_query(
            &corpus,
            &FilterCriteria::default(),
            PageRequest::default(),
            Some(SortSpec {
                key: SortKey::QualityLevel,
                order: SortOrder::Asc,
            }),
        );
        let order: Vec<&str> = page.items.iter().map(|c| c.part_number.as_str()).collect();
        // consumer < aerospace < unrecognized label
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_suggestions_mix_and_short_term() {
        let corpus = corpus();
        assert!(suggest(&corpus, "S", 10).is_empty());

        let suggestions = suggest(&corpus, "st", 10);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Component && s.value.starts_with("STM32")));
        assert!(suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Manufacturer && s.value == "ST"));
        assert!(suggestions.len() <= 10);
    }
}
