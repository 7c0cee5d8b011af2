//! # Sift
//!
//! Client-side filtering and faceting for hosted search APIs.
//!
//! ## Features
//!
//! - Typed facet, numeric and tag filters with negation
//! - Named filter groups combined with AND, OR or a hierarchy
//! - Observable filter state with change notification
//! - SQL-like and legacy nested-array filter rendering
//! - Disjunctive and hierarchical faceting over a single logical search
//!
//! ## Example
//!
//! ```
//! use sift::{FacetFilter, FilterState, Query, QueryBuilder};
//!
//! let mut state = FilterState::new();
//! state.or_group::<FacetFilter>("colors").add(FacetFilter::new("color", "red"));
//!
//! let builder = QueryBuilder::from_state(Query::new("shoes").with_facets(["color"]), &state);
//! assert_eq!(builder.build().len(), 2);
//! ```

pub mod error;
pub mod filter;
mod observer;
pub mod query;
pub mod response;
pub mod state;
pub mod syntax;

// Re-exports for the public API
pub use error::{Result, SiftError};
pub use filter::{
    Attribute, FacetFilter, FacetValue, Filter, FilterGroup, FilterGroupId, FilterType,
    GroupKind, NumericFilter, NumericOperator, NumericValue, TagFilter,
};
pub use observer::SubscriptionId;
pub use query::{Query, QueryBuilder, QueryBuilderConfig};
pub use response::{Facet, FacetStats, RawSearchResponse, SearchResponse, SearchStats};
pub use state::{FilterCommand, FilterState, Filters};
pub use syntax::{LegacyFilters, LegacySyntax, SqlSyntax};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
