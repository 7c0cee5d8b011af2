//! Plain filter container without change notification.
//!
//! [`Filters`] is the value published by [`FilterState`](super::FilterState)
//! on every change. It maps group identifiers to ordered, duplicate-free
//! filter lists and keeps the hierarchical configuration of each
//! hierarchical group. Groups with no filters are never stored, so an empty
//! group is indistinguishable from an absent one.

use indexmap::IndexMap;

use crate::filter::{Attribute, FacetFilter, Filter, FilterGroup, FilterGroupId, GroupKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    groups: IndexMap<FilterGroupId, Vec<Filter>>,
    hierarchical_attributes: IndexMap<String, Vec<Attribute>>,
    hierarchical_paths: IndexMap<String, Vec<FacetFilter>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `filter` to the group unless already present.
    ///
    /// Returns `true` if the group changed. Filters whose variant the group
    /// does not accept, and filters on NaN or infinite numbers, are ignored.
    pub fn add(&mut self, filter: impl Into<Filter>, group: &FilterGroupId) -> bool {
        let filter = filter.into();
        if !group.accepts(&filter) {
            log::warn!("ignoring {:?} filter for group {}", filter.filter_type(), group);
            return false;
        }
        if !filter.is_finite() {
            log::warn!("ignoring non-finite filter on '{}'", filter.attribute());
            return false;
        }
        let filters = self.groups.entry(group.clone()).or_default();
        if filters.contains(&filter) {
            return false;
        }
        filters.push(filter);
        true
    }

    pub fn add_all<I, F>(&mut self, filters: I, group: &FilterGroupId) -> bool
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        let mut changed = false;
        for filter in filters {
            changed |= self.add(filter, group);
        }
        changed
    }

    /// Remove `filter` from the group. Returns `false` if it was not there.
    pub fn remove(&mut self, filter: &Filter, group: &FilterGroupId) -> bool {
        self.retain_in(group, |f| f != filter)
    }

    /// Empty the group. A hierarchical group also forgets its selected path.
    pub fn remove_all(&mut self, group: &FilterGroupId) -> bool {
        let mut changed = self.groups.shift_remove(group).is_some();
        if group.kind() == GroupKind::Hierarchical {
            changed |= self.hierarchical_paths.shift_remove(group.name()).is_some();
        }
        changed
    }

    pub fn remove_filters(&mut self, filters: &[Filter], group: &FilterGroupId) -> bool {
        self.retain_in(group, |f| !filters.contains(f))
    }

    /// Remove every filter of the group that constrains `attribute`.
    pub fn remove_attribute(&mut self, attribute: &Attribute, group: &FilterGroupId) -> bool {
        self.retain_in(group, |f| &f.attribute() != attribute)
    }

    pub fn contains(&self, filter: &Filter, group: &FilterGroupId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|filters| filters.contains(filter))
    }

    /// Remove `filter` if present, add it otherwise.
    ///
    /// Returns whether the filter is in the group afterwards.
    pub fn toggle(&mut self, filter: impl Into<Filter>, group: &FilterGroupId) -> bool {
        let filter = filter.into();
        if self.remove(&filter, group) {
            false
        } else {
            self.add(filter, group)
        }
    }

    /// Filters of the group in insertion order.
    pub fn filters(&self, group: &FilterGroupId) -> Vec<Filter> {
        self.groups.get(group).cloned().unwrap_or_default()
    }

    pub fn group(&self, group: &FilterGroupId) -> Option<FilterGroup> {
        self.groups
            .get(group)
            .map(|filters| FilterGroup::from_parts(group, filters.clone()))
    }

    /// Identifiers of the non-empty groups in insertion order.
    pub fn group_ids(&self) -> Vec<FilterGroupId> {
        self.groups.keys().cloned().collect()
    }

    /// Snapshot of every non-empty group in insertion order.
    pub fn groups(&self) -> Vec<FilterGroup> {
        self.groups
            .iter()
            .map(|(id, filters)| FilterGroup::from_parts(id, filters.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of non-empty groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn contains_anywhere(&self, filter: &Filter) -> bool {
        self.groups.values().any(|filters| filters.contains(filter))
    }

    /// Empty every group and every selected hierarchical path.
    ///
    /// Hierarchical attribute chains are configuration and survive.
    pub fn clear(&mut self) -> bool {
        let changed = !self.groups.is_empty() || !self.hierarchical_paths.is_empty();
        self.groups.clear();
        self.hierarchical_paths.clear();
        changed
    }

    /// Empty every group except the listed ones.
    pub fn remove_all_except(&mut self, keep: &[FilterGroupId]) -> bool {
        let removed: Vec<FilterGroupId> = self
            .groups
            .keys()
            .filter(|id| !keep.contains(id))
            .cloned()
            .collect();
        let mut changed = false;
        for id in &removed {
            changed |= self.remove_all(id);
        }
        changed
    }

    pub fn remove_attribute_everywhere(&mut self, attribute: &Attribute) -> bool {
        let ids = self.group_ids();
        let mut changed = false;
        for id in &ids {
            changed |= self.remove_attribute(attribute, id);
        }
        changed
    }

    pub fn set_hierarchical_attributes(&mut self, group: &str, attributes: Vec<Attribute>) -> bool {
        if self.hierarchical_attributes(group) == attributes.as_slice() {
            return false;
        }
        if attributes.is_empty() {
            self.hierarchical_attributes.shift_remove(group);
        } else {
            self.hierarchical_attributes.insert(group.to_string(), attributes);
        }
        true
    }

    /// Set the selected breadcrumb path, root first.
    pub fn set_hierarchical_path(&mut self, group: &str, path: Vec<FacetFilter>) -> bool {
        if self.hierarchical_path(group) == path.as_slice() {
            return false;
        }
        if path.is_empty() {
            self.hierarchical_paths.shift_remove(group);
        } else {
            self.hierarchical_paths.insert(group.to_string(), path);
        }
        true
    }

    pub fn hierarchical_attributes(&self, group: &str) -> &[Attribute] {
        self.hierarchical_attributes
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn hierarchical_path(&self, group: &str) -> &[FacetFilter] {
        self.hierarchical_paths
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of the hierarchical groups with a configured attribute chain.
    pub fn hierarchical_group_names(&self) -> impl Iterator<Item = &str> {
        self.hierarchical_attributes.keys().map(String::as_str)
    }

    fn retain_in(&mut self, group: &FilterGroupId, keep: impl Fn(&Filter) -> bool) -> bool {
        let Some(filters) = self.groups.get_mut(group) else {
            return false;
        };
        let before = filters.len();
        filters.retain(|f| keep(f));
        let changed = filters.len() != before;
        if filters.is_empty() {
            self.groups.shift_remove(group);
            if group.kind() == GroupKind::Hierarchical {
                self.hierarchical_paths.shift_remove(group.name());
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{NumericFilter, NumericOperator, TagFilter};

    fn red() -> Filter {
        FacetFilter::new("color", "red").into()
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");

        assert!(filters.add(red(), &group));
        assert!(!filters.add(red(), &group));
        assert_eq!(filters.filters(&group), vec![red()]);
    }

    #[test]
    fn test_same_filter_in_two_groups() {
        let mut filters = Filters::new();
        assert!(filters.add(red(), &FilterGroupId::and("a")));
        assert!(filters.add(red(), &FilterGroupId::and("b")));
        assert_eq!(filters.groups().len(), 2);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");

        assert!(!filters.remove(&red(), &group));
        filters.add(red(), &group);
        assert!(filters.remove(&red(), &group));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_empty_group_is_absent() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");
        filters.add(red(), &group);
        filters.remove(&red(), &group);

        assert!(filters.group(&group).is_none());
        assert!(filters.group_ids().is_empty());
    }

    #[test]
    fn test_or_group_rejects_foreign_variant() {
        let mut filters = Filters::new();
        let group = FilterGroupId::or_of::<FacetFilter>("colors");

        assert!(!filters.add(TagFilter::new("sale"), &group));
        assert!(filters.add(red(), &group));
        assert_eq!(filters.filters(&group).len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");

        assert!(filters.toggle(red(), &group));
        assert!(filters.contains(&red(), &group));
        assert!(!filters.toggle(red(), &group));
        assert!(!filters.contains(&red(), &group));
    }

    #[test]
    fn test_remove_attribute() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");
        filters.add(red(), &group);
        filters.add(FacetFilter::new("color", "blue"), &group);
        filters.add(
            NumericFilter::comparison("price", NumericOperator::LessThan, 10.0),
            &group,
        );

        assert!(filters.remove_attribute(&Attribute::from("color"), &group));
        assert_eq!(filters.filters(&group).len(), 1);
        assert!(!filters.remove_attribute(&Attribute::from("color"), &group));
    }

    #[test]
    fn test_remove_all_except() {
        let mut filters = Filters::new();
        let keep = FilterGroupId::and("keep");
        filters.add(red(), &keep);
        filters.add(red(), &FilterGroupId::and("drop"));

        assert!(filters.remove_all_except(std::slice::from_ref(&keep)));
        assert_eq!(filters.group_ids(), vec![keep]);
    }

    #[test]
    fn test_hierarchical_configuration() {
        let mut filters = Filters::new();
        let attributes = vec![Attribute::from("lvl0"), Attribute::from("lvl1")];
        let path = vec![FacetFilter::new("lvl0", "Clothing")];

        assert!(filters.set_hierarchical_attributes("category", attributes.clone()));
        assert!(!filters.set_hierarchical_attributes("category", attributes.clone()));
        assert!(filters.set_hierarchical_path("category", path.clone()));

        assert_eq!(filters.hierarchical_attributes("category"), attributes.as_slice());
        assert_eq!(filters.hierarchical_path("category"), path.as_slice());
        assert!(filters.hierarchical_path("other").is_empty());
    }

    #[test]
    fn test_clear_keeps_hierarchical_attributes() {
        let mut filters = Filters::new();
        filters.set_hierarchical_attributes("category", vec![Attribute::from("lvl0")]);
        filters.set_hierarchical_path("category", vec![FacetFilter::new("lvl0", "A")]);
        filters.add(red(), &FilterGroupId::and("g"));

        assert!(filters.clear());
        assert!(filters.is_empty());
        assert!(filters.hierarchical_path("category").is_empty());
        assert_eq!(filters.hierarchical_attributes("category").len(), 1);
        assert!(!filters.clear());
    }

    #[test]
    fn test_emptied_hierarchical_group_forgets_path() {
        let mut filters = Filters::new();
        let group = FilterGroupId::hierarchical("category");
        let leaf = FacetFilter::new("lvl1", "Clothing > Men");
        filters.set_hierarchical_attributes("category", vec!["lvl0".into(), "lvl1".into()]);
        filters.set_hierarchical_path(
            "category",
            vec![FacetFilter::new("lvl0", "Clothing"), leaf.clone()],
        );
        filters.add(leaf.clone(), &group);

        assert!(!filters.toggle(leaf, &group));
        assert!(filters.is_empty());
        assert!(filters.hierarchical_path("category").is_empty());
        assert_eq!(filters.hierarchical_attributes("category").len(), 2);
    }

    #[test]
    fn test_partial_removal_keeps_hierarchical_path() {
        let mut filters = Filters::new();
        let group = FilterGroupId::hierarchical("category");
        filters.set_hierarchical_path("category", vec![FacetFilter::new("lvl0", "A")]);
        filters.add(FacetFilter::new("lvl0", "A"), &group);
        filters.add(FacetFilter::new("lvl0", "B"), &group);

        assert!(filters.remove(&FacetFilter::new("lvl0", "B").into(), &group));
        assert_eq!(filters.hierarchical_path("category").len(), 1);
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let mut filters = Filters::new();
        let group = FilterGroupId::and("g");

        assert!(!filters.add(
            NumericFilter::comparison("price", NumericOperator::LessThan, f64::NAN),
            &group,
        ));
        assert!(!filters.add(NumericFilter::range("price", 0.0, f64::INFINITY), &group));
        assert!(!filters.add(FacetFilter::new("rating", f64::NEG_INFINITY), &group));
        assert!(filters.is_empty());

        assert!(filters.add(FacetFilter::new("rating", 4.5), &group));
    }
}
