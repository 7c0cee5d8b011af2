//! Disjunctive and hierarchical faceting.
//!
//! Applying every active filter to one query makes the facet counts of a
//! disjunctive attribute reflect the user's own selection on it, and makes the
//! counts of each hierarchy level reflect the selected leaf. [`QueryBuilder`]
//! expands one logical query into:
//!
//! 1. the main query, filtered by every group;
//! 2. one probe per requested disjunctive attribute, filtered by every group
//!    except the disjunctive groups targeting that attribute;
//! 3. one probe per selected hierarchy level, filtered by every
//!    non-hierarchical group plus the ancestors of that level.
//!
//! The responses are merged back by [`QueryBuilder::aggregate`].
//!
//! # Example
//!
//! ```
//! use sift::filter::{FacetFilter, FilterGroup};
//! use sift::query::{Query, QueryBuilder};
//!
//! let groups = vec![
//!     FilterGroup::and("brands", vec![FacetFilter::new("brand", "acme").into()]),
//!     FilterGroup::or(
//!         "colors",
//!         vec![FacetFilter::new("color", "red"), FacetFilter::new("color", "blue")],
//!     ),
//! ];
//! let builder = QueryBuilder::new(Query::new("shoes").with_facets(["color"]), groups);
//! let queries = builder.build();
//!
//! assert_eq!(queries.len(), 2);
//! assert_eq!(builder.disjunctive_faceting_queries_count(), 1);
//! assert_eq!(queries[1].filters.as_deref(), Some(r#"("brand":"acme")"#));
//! ```

use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::filter::{Attribute, FacetFilter, Filter, FilterGroup, FilterGroupId};
use crate::query::Query;
use crate::response::aggregate::AggregationPlan;
use crate::response::{RawSearchResponse, SearchResponse};
use crate::state::FilterState;
use crate::syntax::sql;

/// Largest page size accepted by the hosted API.
pub const MAX_HITS_PER_PAGE: usize = 1000;

fn default_keep_selected_empty_facets() -> bool {
    true
}

fn default_disable_probe_analytics() -> bool {
    true
}

/// Options of a [`QueryBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBuilderConfig {
    /// Keep selected facet values that a probe response omits, with count 0.
    #[serde(default = "default_keep_selected_empty_facets")]
    pub keep_selected_empty_facets: bool,
    /// Hits requested by probe queries.
    #[serde(default)]
    pub probe_hits_per_page: usize,
    /// Turn analytics off on probe queries.
    #[serde(default = "default_disable_probe_analytics")]
    pub disable_probe_analytics: bool,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            keep_selected_empty_facets: default_keep_selected_empty_facets(),
            probe_hits_per_page: 0,
            disable_probe_analytics: default_disable_probe_analytics(),
        }
    }
}

impl QueryBuilderConfig {
    pub fn with_keep_selected_empty_facets(mut self, keep: bool) -> Self {
        self.keep_selected_empty_facets = keep;
        self
    }

    pub fn with_probe_hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.probe_hits_per_page = hits_per_page;
        self
    }

    pub fn with_disable_probe_analytics(mut self, disable: bool) -> Self {
        self.disable_probe_analytics = disable;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe_hits_per_page > MAX_HITS_PER_PAGE {
            return Err(SiftError::invalid_config(format!(
                "probe_hits_per_page must be at most {MAX_HITS_PER_PAGE}, got {}",
                self.probe_hits_per_page
            )));
        }
        Ok(())
    }
}

/// Expands one logical query into the physical queries needed for correct
/// disjunctive and hierarchical facet counts, and merges their responses.
///
/// Build once per search, then aggregate the responses in query order.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
    groups: Vec<FilterGroup>,
    hierarchical_attributes: Vec<Attribute>,
    hierarchical_path: Vec<FacetFilter>,
    config: QueryBuilderConfig,
}

impl QueryBuilder {
    pub fn new(query: Query, groups: Vec<FilterGroup>) -> Self {
        QueryBuilder {
            query,
            groups,
            hierarchical_attributes: Vec::new(),
            hierarchical_path: Vec::new(),
            config: QueryBuilderConfig::default(),
        }
    }

    /// Builder over the current content of `state`.
    ///
    /// The hierarchy is taken from the first hierarchical group with a
    /// configured attribute chain. Its path only counts while the group holds
    /// a selection.
    pub fn from_state(query: Query, state: &FilterState) -> Self {
        let filters = state.filters();
        let mut builder = Self::new(query, filters.groups());
        if let Some(name) = filters.hierarchical_group_names().next() {
            let path = if filters.group(&FilterGroupId::hierarchical(name)).is_some() {
                filters.hierarchical_path(name).to_vec()
            } else {
                Vec::new()
            };
            builder = builder.with_hierarchy(filters.hierarchical_attributes(name).to_vec(), path);
        }
        builder
    }

    /// Attribute per hierarchy level (root first) and the selected path.
    pub fn with_hierarchy(mut self, attributes: Vec<Attribute>, path: Vec<FacetFilter>) -> Self {
        self.hierarchical_attributes = attributes;
        self.hierarchical_path = path;
        self
    }

    /// Replace the options after checking them with
    /// [`QueryBuilderConfig::validate`].
    pub fn with_config(mut self, config: QueryBuilderConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Requested facet attributes constrained by a disjunctive group, in
    /// requested order.
    pub fn disjunctive_attributes(&self) -> Vec<Attribute> {
        let disjunctive: AHashSet<Attribute> = self
            .groups
            .iter()
            .filter(|group| group.is_disjunctive())
            .flat_map(FilterGroup::attributes)
            .collect();

        let mut seen = AHashSet::new();
        self.query
            .facets
            .iter()
            .filter(|attribute| disjunctive.contains(*attribute))
            .filter(|attribute| seen.insert((*attribute).clone()))
            .cloned()
            .collect()
    }

    pub fn disjunctive_faceting_queries_count(&self) -> usize {
        self.disjunctive_attributes().len()
    }

    pub fn hierarchical_faceting_queries_count(&self) -> usize {
        if self.hierarchical_attributes.is_empty() {
            0
        } else {
            self.hierarchical_path.len().min(self.hierarchical_attributes.len())
        }
    }

    /// Main query, then disjunctive probes, then hierarchical probes.
    pub fn build(&self) -> Vec<Query> {
        let main = self.main_query();
        let disjunctive_attributes = self.disjunctive_attributes();
        let levels = self.hierarchical_faceting_queries_count();

        let mut queries = Vec::with_capacity(1 + disjunctive_attributes.len() + levels);
        queries.push(main.clone());
        for attribute in &disjunctive_attributes {
            queries.push(self.disjunctive_query(&main, attribute));
        }
        for level in 0..levels {
            queries.push(self.hierarchical_query(&main, level));
        }

        log::debug!(
            "built {} queries: {} disjunctive, {} hierarchical",
            queries.len(),
            disjunctive_attributes.len(),
            levels
        );
        queries
    }

    /// Merge the responses of [`build`](Self::build)'s queries, in the same order.
    pub fn aggregate(self, responses: Vec<RawSearchResponse>) -> Result<SearchResponse> {
        self.plan().aggregate(responses)
    }

    /// Decode then merge JSON response bodies.
    pub fn aggregate_json(self, responses: &[serde_json::Value]) -> Result<SearchResponse> {
        self.plan().aggregate_json(responses)
    }

    fn main_query(&self) -> Query {
        let mut query = self.query.clone();
        for attribute in &self.hierarchical_attributes {
            if !query.facets.contains(attribute) {
                query.facets.push(attribute.clone());
            }
        }
        query.set_filters(sql::render_groups(&self.groups));
        query
    }

    fn probe(&self, main: &Query, facet: &Attribute, groups: &[FilterGroup]) -> Query {
        let mut query = main.clone();
        query.facets = vec![facet.clone()];
        query.set_filters(sql::render_groups(groups));
        query.page = Some(0);
        query.hits_per_page = Some(self.config.probe_hits_per_page);
        query.attributes_to_retrieve = Some(Vec::new());
        query.attributes_to_highlight = Some(Vec::new());
        query.attributes_to_snippet = Some(Vec::new());
        if self.config.disable_probe_analytics {
            query.analytics = Some(false);
            query.click_analytics = Some(false);
        }
        query
    }

    fn disjunctive_query(&self, main: &Query, attribute: &Attribute) -> Query {
        let groups: Vec<FilterGroup> = self
            .groups
            .iter()
            .filter(|group| !(group.is_disjunctive() && group.targets(attribute)))
            .cloned()
            .collect();
        self.probe(main, attribute, &groups)
    }

    fn hierarchical_query(&self, main: &Query, level: usize) -> Query {
        let mut groups: Vec<FilterGroup> = self
            .groups
            .iter()
            .filter(|group| !self.is_own_hierarchy(group))
            .cloned()
            .collect();
        let ancestors: Vec<Filter> = self.hierarchical_path[..level]
            .iter()
            .cloned()
            .map(Filter::Facet)
            .collect();
        if !ancestors.is_empty() {
            groups.push(FilterGroup::and("_hierarchical_ancestors", ancestors));
        }
        self.probe(main, &self.hierarchical_attributes[level], &groups)
    }

    fn is_own_hierarchy(&self, group: &FilterGroup) -> bool {
        group.is_hierarchical()
            && group
                .attributes()
                .iter()
                .any(|attribute| self.hierarchical_attributes.contains(attribute))
    }

    fn plan(&self) -> AggregationPlan {
        let disjunctive_attributes = self.disjunctive_attributes();
        let levels = self.hierarchical_faceting_queries_count();
        let hierarchical_attributes = self.hierarchical_attributes[..levels].to_vec();
        let hierarchical_leaf = if levels > 0 {
            self.hierarchical_attributes.get(levels).cloned()
        } else {
            None
        };

        let mut selected_values: IndexMap<Attribute, Vec<String>> = IndexMap::new();
        for group in self.groups.iter().filter(|group| group.is_disjunctive()) {
            for filter in group.filters() {
                if let Filter::Facet(facet) = filter {
                    if !facet.is_negated() && disjunctive_attributes.contains(facet.attribute()) {
                        let values = selected_values.entry(facet.attribute().clone()).or_default();
                        let value = facet.value().to_string();
                        if !values.contains(&value) {
                            values.push(value);
                        }
                    }
                }
            }
        }
        for (attribute, facet) in hierarchical_attributes.iter().zip(&self.hierarchical_path) {
            selected_values
                .entry(attribute.clone())
                .or_default()
                .push(facet.value().to_string());
        }

        AggregationPlan {
            disjunctive_attributes,
            hierarchical_attributes,
            hierarchical_leaf,
            selected_values,
            keep_selected_empty_facets: self.config.keep_selected_empty_facets,
        }
    }
}
