//! Component catalog: data model, filter predicate, faceted query engine

pub mod component;
pub mod export;
pub mod filter;
pub mod params;
pub mod provider;
pub mod query;
pub mod stats;

pub use component::{Component, Lifecycle};
pub use filter::FilterCriteria;
pub use params::QueryParams;
pub use provider::{CorpusProvider, FacetField, MemoryCorpus, ProviderError, YamlCorpus};
pub use query::{
    run_query, suggest, Facets, PageRequest, QueryPage, SortKey, SortOrder, SortSpec, Suggestion,
    SuggestionKind, DEFAULT_PAGE_SIZE,
};
pub use stats::{category_stats, filter_options, CategoryStats, FilterOptions};
