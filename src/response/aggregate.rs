//! Merging of the responses of one logical search.
//!
//! Responses arrive in query order: the main query first, then one response
//! per disjunctive attribute, then one per hierarchy level (root first).

use indexmap::IndexMap;

use crate::error::{Result, SiftError};
use crate::filter::Attribute;
use crate::response::{Facet, FacetMap, RawSearchResponse, SearchResponse};

/// Routing information produced by the query builder for one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationPlan {
    /// Attribute probed by each disjunctive query, in query order.
    pub disjunctive_attributes: Vec<Attribute>,
    /// Attribute of each hierarchical query, root first.
    pub hierarchical_attributes: Vec<Attribute>,
    /// Level below the deepest selection, counted by the main query.
    pub hierarchical_leaf: Option<Attribute>,
    /// Selected values per faceted attribute, kept with a zero count when a
    /// response omits them.
    pub selected_values: IndexMap<Attribute, Vec<String>>,
    pub keep_selected_empty_facets: bool,
}

impl AggregationPlan {
    pub fn expected_responses(&self) -> usize {
        1 + self.disjunctive_attributes.len() + self.hierarchical_attributes.len()
    }

    /// Merge `responses` into one logical result.
    pub fn aggregate(&self, responses: Vec<RawSearchResponse>) -> Result<SearchResponse> {
        let expected = self.expected_responses();
        if responses.len() != expected {
            return Err(SiftError::cardinality_mismatch(expected, responses.len()));
        }

        let mut responses = responses.into_iter();
        let Some(main) = responses.next() else {
            return Err(SiftError::cardinality_mismatch(expected, 0));
        };
        let disjunctive: Vec<RawSearchResponse> = responses
            .by_ref()
            .take(self.disjunctive_attributes.len())
            .collect();
        let hierarchical: Vec<RawSearchResponse> = responses.collect();

        let mut stats = main.stats();
        let mut exhaustive = main.exhaustive_facets_count;
        for probe in disjunctive.iter().chain(hierarchical.iter()) {
            stats.processing_time_ms += probe.processing_time_ms;
            exhaustive = match (exhaustive, probe.exhaustive_facets_count) {
                (Some(a), Some(b)) => Some(a && b),
                (a, b) => a.or(b),
            };
        }

        let mut facets_stats: IndexMap<Attribute, _> = main
            .facets_stats
            .iter()
            .map(|(attribute, stats)| (Attribute::from(attribute.as_str()), *stats))
            .collect();

        let facets: FacetMap = main
            .facets
            .keys()
            .map(|attribute| {
                let attribute = Attribute::from(attribute.as_str());
                let values = main.facets_for(&attribute);
                (attribute, values)
            })
            .filter(|(attribute, _)| !self.disjunctive_attributes.contains(attribute))
            .collect();

        let disjunctive_facets = if self.disjunctive_attributes.is_empty() {
            None
        } else {
            let mut map = FacetMap::new();
            for (attribute, probe) in self.disjunctive_attributes.iter().zip(&disjunctive) {
                if !probe.has_facets_for(attribute) {
                    log::warn!("disjunctive response has no facets for '{attribute}'");
                }
                let values = self.with_selected(attribute, probe.facets_for(attribute));
                map.insert(attribute.clone(), values);
                if let Some(stats) = probe.facets_stats.get(attribute.as_str()) {
                    facets_stats.insert(attribute.clone(), *stats);
                }
            }
            Some(map)
        };

        let hierarchical_facets = if self.hierarchical_attributes.is_empty() {
            None
        } else {
            let mut map = FacetMap::new();
            for (attribute, probe) in self.hierarchical_attributes.iter().zip(&hierarchical) {
                if !probe.has_facets_for(attribute) {
                    log::warn!("hierarchical response has no facets for '{attribute}'");
                }
                let values = self.with_selected(attribute, probe.facets_for(attribute));
                map.insert(attribute.clone(), values);
            }
            if let Some(leaf) = &self.hierarchical_leaf {
                if main.has_facets_for(leaf) {
                    map.insert(leaf.clone(), main.facets_for(leaf));
                }
            }
            Some(map)
        };

        log::debug!(
            "aggregated {} responses: {} disjunctive, {} hierarchical",
            expected,
            self.disjunctive_attributes.len(),
            self.hierarchical_attributes.len()
        );

        Ok(SearchResponse {
            hits: main.hits,
            stats,
            facets,
            disjunctive_facets,
            hierarchical_facets,
            facets_stats: if facets_stats.is_empty() { None } else { Some(facets_stats) },
            exhaustive_facets_count: exhaustive,
        })
    }

    /// Decode each JSON body, then [`aggregate`](Self::aggregate).
    pub fn aggregate_json(&self, responses: &[serde_json::Value]) -> Result<SearchResponse> {
        let expected = self.expected_responses();
        if responses.len() != expected {
            return Err(SiftError::cardinality_mismatch(expected, responses.len()));
        }
        let decoded = responses
            .iter()
            .enumerate()
            .map(|(index, body)| {
                RawSearchResponse::from_json(body).map_err(|e| SiftError::decode(index, e))
            })
            .collect::<Result<Vec<_>>>()?;
        self.aggregate(decoded)
    }

    /// Append selected values missing from `facets` with a zero count.
    fn with_selected(&self, attribute: &Attribute, mut facets: Vec<Facet>) -> Vec<Facet> {
        if !self.keep_selected_empty_facets {
            return facets;
        }
        if let Some(selected) = self.selected_values.get(attribute) {
            for value in selected {
                if !facets.iter().any(|f| &f.value == value) {
                    facets.push(Facet::new(value.clone(), 0));
                }
            }
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(facets: serde_json::Value) -> RawSearchResponse {
        RawSearchResponse::from_json(&json!({
            "hits": [],
            "nbHits": 0,
            "processingTimeMS": 2,
            "facets": facets,
        }))
        .unwrap()
    }

    #[test]
    fn test_cardinality_mismatch() {
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            ..Default::default()
        };
        let err = plan.aggregate(vec![raw(json!({}))]).unwrap_err();
        assert!(matches!(
            err,
            SiftError::CardinalityMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_disjunctive_counts_replace_main_counts() {
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            ..Default::default()
        };
        let result = plan
            .aggregate(vec![
                raw(json!({ "color": { "red": 3 }, "brand": { "acme": 3 } })),
                raw(json!({ "color": { "red": 3, "blue": 5 } })),
            ])
            .unwrap();

        assert!(!result.facets.contains_key(&Attribute::from("color")));
        assert_eq!(result.facets[&Attribute::from("brand")], vec![Facet::new("acme", 3)]);
        assert_eq!(
            result.disjunctive_facets.unwrap()[&Attribute::from("color")],
            vec![Facet::new("red", 3), Facet::new("blue", 5)]
        );
        assert!(result.hierarchical_facets.is_none());
        assert_eq!(result.stats.processing_time_ms, 4);
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            ..Default::default()
        };
        let result = plan
            .aggregate(vec![raw(json!({})), raw(json!({}))])
            .unwrap();
        assert!(result.disjunctive_facets.unwrap()[&Attribute::from("color")].is_empty());
    }

    #[test]
    fn test_keep_selected_empty_facets() {
        let mut selected_values = IndexMap::new();
        selected_values.insert(Attribute::from("color"), vec!["green".to_string()]);
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            selected_values,
            keep_selected_empty_facets: true,
            ..Default::default()
        };
        let result = plan
            .aggregate(vec![raw(json!({})), raw(json!({ "color": { "red": 1 } }))])
            .unwrap();
        assert_eq!(
            result.disjunctive_facets.unwrap()[&Attribute::from("color")],
            vec![Facet::new("red", 1), Facet::new("green", 0)]
        );
    }

    #[test]
    fn test_decode_error_reports_index() {
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            ..Default::default()
        };
        let err = plan
            .aggregate_json(&[json!({ "hits": [], "nbHits": 0 }), json!({ "hits": 1 })])
            .unwrap_err();
        assert!(matches!(err, SiftError::Decode { index: 1, .. }));
    }

    #[test]
    fn test_exhaustive_facets_count_is_conjunction() {
        let plan = AggregationPlan {
            disjunctive_attributes: vec!["color".into()],
            ..Default::default()
        };
        let mut main = raw(json!({}));
        main.exhaustive_facets_count = Some(true);
        let mut probe = raw(json!({}));
        probe.exhaustive_facets_count = Some(false);

        let result = plan.aggregate(vec![main, probe]).unwrap();
        assert_eq!(result.exhaustive_facets_count, Some(false));
    }
}
