//! Filter groups and their identifiers.
//!
//! Filters inside an `And` group are conjunctive, filters inside an `Or`
//! group are disjunctive, and a `Hierarchical` group holds a breadcrumb path
//! through a chain of per-level attributes (root first).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::{Attribute, FacetFilter, Filter, FilterType, TypedFilter};

/// Kind of a filter group.
///
/// A disjunctive group records the single filter type it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "filter_type", rename_all = "snake_case")]
pub enum GroupKind {
    And,
    Or(FilterType),
    Hierarchical,
}

/// Identifies a group by kind and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterGroupId {
    kind: GroupKind,
    name: String,
}

impl FilterGroupId {
    pub fn new(kind: GroupKind, name: impl Into<String>) -> Self {
        FilterGroupId {
            kind,
            name: name.into(),
        }
    }

    pub fn and(name: impl Into<String>) -> Self {
        Self::new(GroupKind::And, name)
    }

    pub fn or(name: impl Into<String>, filter_type: FilterType) -> Self {
        Self::new(GroupKind::Or(filter_type), name)
    }

    /// Disjunctive group identifier for the filter type `F`.
    pub fn or_of<F: TypedFilter>(name: impl Into<String>) -> Self {
        Self::or(name, F::FILTER_TYPE)
    }

    pub fn hierarchical(name: impl Into<String>) -> Self {
        Self::new(GroupKind::Hierarchical, name)
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_disjunctive(&self) -> bool {
        matches!(self.kind, GroupKind::Or(_))
    }

    /// Whether `filter` may be stored in a group with this identifier.
    pub fn accepts(&self, filter: &Filter) -> bool {
        match self.kind {
            GroupKind::And => true,
            GroupKind::Or(filter_type) => filter.filter_type() == filter_type,
            GroupKind::Hierarchical => matches!(filter, Filter::Facet(_)),
        }
    }
}

impl fmt::Display for FilterGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GroupKind::And => write!(f, "and({})", self.name),
            GroupKind::Or(filter_type) => write!(f, "or({}, {:?})", self.name, filter_type),
            GroupKind::Hierarchical => write!(f, "hierarchical({})", self.name),
        }
    }
}

/// An immutable group of filters combined by one boolean operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterGroup {
    And {
        name: String,
        filters: Vec<Filter>,
    },
    Or {
        name: String,
        filter_type: FilterType,
        filters: Vec<Filter>,
    },
    Hierarchical {
        name: String,
        filters: Vec<Filter>,
    },
}

impl FilterGroup {
    pub fn and(name: impl Into<String>, filters: Vec<Filter>) -> Self {
        FilterGroup::And {
            name: name.into(),
            filters,
        }
    }

    /// Disjunctive group whose members all share the variant `F`.
    pub fn or<F: TypedFilter>(name: impl Into<String>, filters: Vec<F>) -> Self {
        FilterGroup::Or {
            name: name.into(),
            filter_type: F::FILTER_TYPE,
            filters: filters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn hierarchical(name: impl Into<String>, filters: Vec<FacetFilter>) -> Self {
        FilterGroup::Hierarchical {
            name: name.into(),
            filters: filters.into_iter().map(Filter::Facet).collect(),
        }
    }

    /// Rebuild a group from an identifier and the filters stored under it.
    ///
    /// Filters the identifier does not accept are dropped.
    pub fn from_parts(id: &FilterGroupId, filters: Vec<Filter>) -> Self {
        let filters: Vec<Filter> = filters.into_iter().filter(|f| id.accepts(f)).collect();
        let name = id.name().to_string();
        match id.kind() {
            GroupKind::And => FilterGroup::And { name, filters },
            GroupKind::Or(filter_type) => FilterGroup::Or {
                name,
                filter_type,
                filters,
            },
            GroupKind::Hierarchical => FilterGroup::Hierarchical { name, filters },
        }
    }

    pub fn id(&self) -> FilterGroupId {
        match self {
            FilterGroup::And { name, .. } => FilterGroupId::and(name.clone()),
            FilterGroup::Or {
                name, filter_type, ..
            } => FilterGroupId::or(name.clone(), *filter_type),
            FilterGroup::Hierarchical { name, .. } => FilterGroupId::hierarchical(name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FilterGroup::And { name, .. }
            | FilterGroup::Or { name, .. }
            | FilterGroup::Hierarchical { name, .. } => name,
        }
    }

    pub fn filters(&self) -> &[Filter] {
        match self {
            FilterGroup::And { filters, .. }
            | FilterGroup::Or { filters, .. }
            | FilterGroup::Hierarchical { filters, .. } => filters,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters().is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters().len()
    }

    pub fn is_disjunctive(&self) -> bool {
        matches!(self, FilterGroup::Or { .. })
    }

    pub fn is_hierarchical(&self) -> bool {
        matches!(self, FilterGroup::Hierarchical { .. })
    }

    /// Whether any member filter constrains `attribute`.
    pub fn targets(&self, attribute: &Attribute) -> bool {
        self.filters().iter().any(|f| &f.attribute() == attribute)
    }

    /// Distinct attributes of the member filters, in first-seen order.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = Vec::new();
        for filter in self.filters() {
            let attribute = filter.attribute();
            if !attributes.contains(&attribute) {
                attributes.push(attribute);
            }
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{NumericFilter, NumericOperator, TagFilter};

    #[test]
    fn test_or_group_records_filter_type() {
        let group = FilterGroup::or(
            "colors",
            vec![FacetFilter::new("color", "red"), FacetFilter::new("color", "blue")],
        );
        assert_eq!(group.id(), FilterGroupId::or("colors", FilterType::Facet));
        assert!(group.is_disjunctive());
        assert_eq!(group.attributes(), vec![Attribute::from("color")]);
    }

    #[test]
    fn test_accepts() {
        let facet = Filter::from(FacetFilter::new("color", "red"));
        let numeric = Filter::from(NumericFilter::comparison(
            "price",
            NumericOperator::LessThan,
            5.0,
        ));
        let tag = Filter::from(TagFilter::new("new"));

        let and = FilterGroupId::and("g");
        assert!(and.accepts(&facet) && and.accepts(&numeric) && and.accepts(&tag));

        let or = FilterGroupId::or_of::<NumericFilter>("g");
        assert!(or.accepts(&numeric));
        assert!(!or.accepts(&facet));

        let hierarchical = FilterGroupId::hierarchical("g");
        assert!(hierarchical.accepts(&facet));
        assert!(!hierarchical.accepts(&tag));
    }

    #[test]
    fn test_from_parts_drops_foreign_filters() {
        let id = FilterGroupId::or_of::<TagFilter>("tags");
        let group = FilterGroup::from_parts(
            &id,
            vec![
                TagFilter::new("a").into(),
                FacetFilter::new("color", "red").into(),
            ],
        );
        assert_eq!(group.len(), 1);
        assert_eq!(group.id(), id);
    }

    #[test]
    fn test_ids_differ_by_kind() {
        assert_ne!(FilterGroupId::and("x"), FilterGroupId::hierarchical("x"));
        assert_ne!(
            FilterGroupId::or("x", FilterType::Facet),
            FilterGroupId::or("x", FilterType::Tag)
        );
    }
}
