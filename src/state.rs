//! Observable filter state.
//!
//! [`FilterState`] owns the [`Filters`] of one search context and hands a
//! reference to them to its subscribers whenever that content changes. Single
//! mutations notify at most once; [`FilterState::notify`] and
//! [`FilterState::batch`] apply any number of mutations and notify exactly
//! once.
//!
//! # Example
//!
//! ```
//! use sift::filter::{FacetFilter, FilterGroupId};
//! use sift::state::FilterState;
//!
//! let mut state = FilterState::new();
//! state.subscribe(|filters| println!("{} groups", filters.groups().len()));
//!
//! let colors = FilterGroupId::or_of::<FacetFilter>("colors");
//! state.toggle(FacetFilter::new("color", "red"), &colors);
//! assert!(state.contains(&FacetFilter::new("color", "red").into(), &colors));
//! ```

pub mod accessor;
pub mod filters;

use crate::filter::{
    Attribute, FacetFilter, Filter, FilterGroup, FilterGroupId, FilterKind, TypedFilter,
};
use crate::observer::{Observable, SubscriptionId};
use crate::syntax::{LegacyFilters, legacy, sql};

pub use accessor::{GroupAccessor, HierarchicalGroupAccessor};
pub use filters::Filters;

/// A deferred filter-state mutation, applied by [`FilterState::notify`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCommand {
    Add {
        filter: Filter,
        group: FilterGroupId,
    },
    AddAll {
        filters: Vec<Filter>,
        group: FilterGroupId,
    },
    Remove {
        filter: Filter,
        group: FilterGroupId,
    },
    RemoveAll {
        group: FilterGroupId,
    },
    RemoveFilters {
        filters: Vec<Filter>,
        group: FilterGroupId,
    },
    RemoveAttribute {
        attribute: Attribute,
        group: FilterGroupId,
    },
    Toggle {
        filter: Filter,
        group: FilterGroupId,
    },
    SetHierarchicalAttributes {
        group: String,
        attributes: Vec<Attribute>,
    },
    SetHierarchicalPath {
        group: String,
        path: Vec<FacetFilter>,
    },
    Clear,
}

impl FilterCommand {
    pub fn add(filter: impl Into<Filter>, group: &FilterGroupId) -> Self {
        FilterCommand::Add {
            filter: filter.into(),
            group: group.clone(),
        }
    }

    pub fn remove(filter: impl Into<Filter>, group: &FilterGroupId) -> Self {
        FilterCommand::Remove {
            filter: filter.into(),
            group: group.clone(),
        }
    }

    pub fn toggle(filter: impl Into<Filter>, group: &FilterGroupId) -> Self {
        FilterCommand::Toggle {
            filter: filter.into(),
            group: group.clone(),
        }
    }

    pub fn remove_all(group: &FilterGroupId) -> Self {
        FilterCommand::RemoveAll {
            group: group.clone(),
        }
    }

    /// Apply to `filters`, returning whether the content changed.
    pub fn apply(self, filters: &mut Filters) -> bool {
        match self {
            FilterCommand::Add { filter, group } => filters.add(filter, &group),
            FilterCommand::AddAll {
                filters: added,
                group,
            } => filters.add_all(added, &group),
            FilterCommand::Remove { filter, group } => filters.remove(&filter, &group),
            FilterCommand::RemoveAll { group } => filters.remove_all(&group),
            FilterCommand::RemoveFilters {
                filters: removed,
                group,
            } => filters.remove_filters(&removed, &group),
            FilterCommand::RemoveAttribute { attribute, group } => {
                filters.remove_attribute(&attribute, &group)
            }
            FilterCommand::Toggle { filter, group } => {
                let before = filters.contains(&filter, &group);
                filters.toggle(filter, &group) != before
            }
            FilterCommand::SetHierarchicalAttributes { group, attributes } => {
                filters.set_hierarchical_attributes(&group, attributes)
            }
            FilterCommand::SetHierarchicalPath { group, path } => {
                filters.set_hierarchical_path(&group, path)
            }
            FilterCommand::Clear => filters.clear(),
        }
    }
}

/// Mutable, observable collection of named filter groups.
#[derive(Debug)]
pub struct FilterState {
    filters: Filters,
    on_change: Observable<Filters>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::from_filters(Filters::new())
    }

    pub fn from_filters(filters: Filters) -> Self {
        FilterState {
            filters,
            on_change: Observable::new(),
        }
    }

    /// Current content.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Snapshot of every non-empty group in insertion order.
    pub fn groups(&self) -> Vec<FilterGroup> {
        self.filters.groups()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Subscribe to future changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Filters) + 'static,
    {
        self.on_change.subscribe(callback)
    }

    /// Subscribe and synchronously receive the current content.
    pub fn subscribe_past<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Filters) + 'static,
    {
        self.on_change.subscribe_past(&self.filters, callback)
    }

    pub fn cancel_subscription(&mut self, id: SubscriptionId) -> bool {
        self.on_change.cancel_subscription(id)
    }

    /// Publish the current content to every subscriber.
    pub fn notify_change(&mut self) {
        log::trace!("filter state changed: {} groups", self.filters.len());
        self.on_change.fire(&self.filters);
    }

    /// Apply a batch of commands, then notify exactly once.
    pub fn notify<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = FilterCommand>,
    {
        for command in commands {
            command.apply(&mut self.filters);
        }
        self.notify_change();
    }

    /// Mutate the content inside `f`, then notify exactly once.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Filters) -> R) -> R {
        let result = f(&mut self.filters);
        self.notify_change();
        result
    }

    pub fn add(&mut self, filter: impl Into<Filter>, group: &FilterGroupId) -> bool {
        let changed = self.filters.add(filter, group);
        self.notify_if(changed)
    }

    pub fn add_all<I, F>(&mut self, filters: I, group: &FilterGroupId) -> bool
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        let changed = self.filters.add_all(filters, group);
        self.notify_if(changed)
    }

    pub fn remove(&mut self, filter: &Filter, group: &FilterGroupId) -> bool {
        let changed = self.filters.remove(filter, group);
        self.notify_if(changed)
    }

    pub fn remove_all(&mut self, group: &FilterGroupId) -> bool {
        let changed = self.filters.remove_all(group);
        self.notify_if(changed)
    }

    pub fn remove_filters(&mut self, filters: &[Filter], group: &FilterGroupId) -> bool {
        let changed = self.filters.remove_filters(filters, group);
        self.notify_if(changed)
    }

    pub fn remove_attribute(&mut self, attribute: &Attribute, group: &FilterGroupId) -> bool {
        let changed = self.filters.remove_attribute(attribute, group);
        self.notify_if(changed)
    }

    pub fn remove_attribute_everywhere(&mut self, attribute: &Attribute) -> bool {
        let changed = self.filters.remove_attribute_everywhere(attribute);
        self.notify_if(changed)
    }

    pub fn remove_all_except(&mut self, keep: &[FilterGroupId]) -> bool {
        let changed = self.filters.remove_all_except(keep);
        self.notify_if(changed)
    }

    /// Empty every group and selected hierarchical path.
    pub fn clear(&mut self) -> bool {
        let changed = self.filters.clear();
        self.notify_if(changed)
    }

    pub fn contains(&self, filter: &Filter, group: &FilterGroupId) -> bool {
        self.filters.contains(filter, group)
    }

    pub fn contains_anywhere(&self, filter: &Filter) -> bool {
        self.filters.contains_anywhere(filter)
    }

    /// Remove `filter` if present, add it otherwise, and notify once.
    ///
    /// Returns whether the filter is in the group afterwards.
    pub fn toggle(&mut self, filter: impl Into<Filter>, group: &FilterGroupId) -> bool {
        let filter = filter.into();
        let before = self.filters.contains(&filter, group);
        let after = self.filters.toggle(filter, group);
        self.notify_if(before != after);
        after
    }

    pub fn filters_for_group(&self, group: &FilterGroupId) -> Vec<Filter> {
        self.filters.filters(group)
    }

    pub fn set_hierarchical_attributes(&mut self, group: &str, attributes: Vec<Attribute>) -> bool {
        let changed = self.filters.set_hierarchical_attributes(group, attributes);
        self.notify_if(changed)
    }

    pub fn set_hierarchical_path(&mut self, group: &str, path: Vec<FacetFilter>) -> bool {
        let changed = self.filters.set_hierarchical_path(group, path);
        self.notify_if(changed)
    }

    pub fn hierarchical_attributes(&self, group: &str) -> &[Attribute] {
        self.filters.hierarchical_attributes(group)
    }

    pub fn hierarchical_path(&self, group: &str) -> &[FacetFilter] {
        self.filters.hierarchical_path(group)
    }

    /// Accessor over a group of any filter variant.
    pub fn group<F: FilterKind>(&mut self, id: FilterGroupId) -> GroupAccessor<'_, F> {
        GroupAccessor::new(self, id)
    }

    /// Accessor over a conjunctive group.
    pub fn and_group(&mut self, name: &str) -> GroupAccessor<'_, Filter> {
        GroupAccessor::new(self, FilterGroupId::and(name))
    }

    /// Accessor over a disjunctive group of `F` filters.
    pub fn or_group<F: TypedFilter>(&mut self, name: &str) -> GroupAccessor<'_, F> {
        GroupAccessor::new(self, FilterGroupId::or_of::<F>(name))
    }

    pub fn hierarchical_group(&mut self, name: &str) -> HierarchicalGroupAccessor<'_> {
        HierarchicalGroupAccessor::new(self, name)
    }

    /// SQL-like rendering of the current content.
    pub fn sql_form(&self) -> String {
        sql::render_groups(&self.filters.groups())
    }

    /// Nested-array rendering of the current content.
    pub fn legacy_form(&self) -> LegacyFilters {
        legacy::render_groups(&self.filters.groups())
    }

    fn notify_if(&mut self, changed: bool) -> bool {
        if changed {
            self.notify_change();
        }
        changed
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}
