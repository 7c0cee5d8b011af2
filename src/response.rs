//! Search responses.
//!
//! [`RawSearchResponse`] is the decoded body of one physical query.
//! [`SearchResponse`] is the single logical result assembled by
//! [`QueryBuilder::aggregate`](crate::query::QueryBuilder::aggregate) from the
//! responses of every query the builder produced.

pub mod aggregate;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter::Attribute;

/// A facet value and the number of hits carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facet {
    pub value: String,
    pub count: u64,
}

impl Facet {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Facet {
            value: value.into(),
            count,
        }
    }
}

/// Statistics over the numeric values of a faceted attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetStats {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

/// Decoded body of a single search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchResponse {
    pub hits: Vec<serde_json::Value>,
    pub nb_hits: usize,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub nb_pages: usize,
    #[serde(default)]
    pub hits_per_page: usize,
    #[serde(default, rename = "processingTimeMS")]
    pub processing_time_ms: u64,
    #[serde(default)]
    pub query: String,
    /// Facet value counts per attribute, in server order.
    #[serde(default)]
    pub facets: IndexMap<String, IndexMap<String, u64>>,
    #[serde(default, rename = "facets_stats")]
    pub facets_stats: IndexMap<String, FacetStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhaustive_facets_count: Option<bool>,
}

impl RawSearchResponse {
    pub fn from_json(value: &serde_json::Value) -> serde_json::Result<Self> {
        RawSearchResponse::deserialize(value)
    }

    /// Facet counts of `attribute`; empty when the server omitted it.
    pub fn facets_for(&self, attribute: &Attribute) -> Vec<Facet> {
        self.facets
            .get(attribute.as_str())
            .map(|counts| {
                counts
                    .iter()
                    .map(|(value, count)| Facet::new(value.clone(), *count))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_facets_for(&self, attribute: &Attribute) -> bool {
        self.facets.contains_key(attribute.as_str())
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            query: self.query.clone(),
            page: self.page,
            pages_count: self.nb_pages,
            hits_per_page: self.hits_per_page,
            total_hits: self.nb_hits,
            processing_time_ms: self.processing_time_ms,
        }
    }
}

/// Pagination and timing statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub query: String,
    pub page: usize,
    pub pages_count: usize,
    pub hits_per_page: usize,
    pub total_hits: usize,
    /// Sum over every physical query of one logical search.
    pub processing_time_ms: u64,
}

pub type FacetMap = IndexMap<Attribute, Vec<Facet>>;

/// One logical search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<serde_json::Value>,
    pub stats: SearchStats,
    /// Facets of the main query, without the disjunctive attributes.
    pub facets: FacetMap,
    /// Counts of each disjunctive attribute computed without its own selection.
    pub disjunctive_facets: Option<FacetMap>,
    /// Counts of each hierarchy level constrained by its ancestors only.
    pub hierarchical_facets: Option<FacetMap>,
    pub facets_stats: Option<IndexMap<Attribute, FacetStats>>,
    pub exhaustive_facets_count: Option<bool>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_raw_response() {
        let raw = RawSearchResponse::from_json(&json!({
            "hits": [{ "objectID": "1" }],
            "nbHits": 1,
            "page": 0,
            "nbPages": 1,
            "hitsPerPage": 20,
            "processingTimeMS": 3,
            "query": "shoe",
            "facets": { "color": { "red": 4, "blue": 2 } },
            "facets_stats": { "price": { "min": 1.0, "max": 9.0, "avg": 4.5, "sum": 18.0 } },
            "exhaustiveFacetsCount": true,
        }))
        .unwrap();

        assert_eq!(
            raw.facets_for(&"color".into()),
            vec![Facet::new("red", 4), Facet::new("blue", 2)]
        );
        assert_eq!(raw.facets_stats["price"].avg, Some(4.5));
        assert_eq!(raw.stats().total_hits, 1);
        assert_eq!(raw.stats().processing_time_ms, 3);
    }

    #[test]
    fn test_absent_attribute_has_no_facets() {
        let raw = RawSearchResponse::from_json(&json!({ "hits": [], "nbHits": 0 })).unwrap();
        assert!(raw.facets_for(&"color".into()).is_empty());
        assert!(!raw.has_facets_for(&"color".into()));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(RawSearchResponse::from_json(&json!({ "hits": "nope", "nbHits": 0 })).is_err());
        assert!(RawSearchResponse::from_json(&json!({ "nbHits": 0 })).is_err());
    }
}
