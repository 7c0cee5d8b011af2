//! Typed views over one group of a [`FilterState`].
//!
//! An accessor is a borrowed `(state, group id)` pair. It holds no state of
//! its own; every mutation goes through the owning [`FilterState`] and
//! therefore notifies its subscribers.

use std::marker::PhantomData;

use crate::filter::{Attribute, FacetFilter, Filter, FilterGroupId, FilterKind};
use crate::state::FilterState;

/// View over a group whose members are `F` filters.
///
/// `F = Filter` gives an untyped view (used for conjunctive groups);
/// a concrete variant gives a typed view over a disjunctive group.
#[derive(Debug)]
pub struct GroupAccessor<'a, F: FilterKind> {
    state: &'a mut FilterState,
    id: FilterGroupId,
    _kind: PhantomData<F>,
}

impl<'a, F: FilterKind> GroupAccessor<'a, F> {
    pub(crate) fn new(state: &'a mut FilterState, id: FilterGroupId) -> Self {
        GroupAccessor {
            state,
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> &FilterGroupId {
        &self.id
    }

    pub fn add(&mut self, filter: F) -> bool {
        self.state.add(filter, &self.id)
    }

    pub fn add_all(&mut self, filters: impl IntoIterator<Item = F>) -> bool {
        self.state.add_all(filters, &self.id)
    }

    pub fn remove(&mut self, filter: &F) -> bool {
        self.state.remove(&filter.clone().into(), &self.id)
    }

    pub fn remove_all(&mut self) -> bool {
        self.state.remove_all(&self.id)
    }

    pub fn remove_attribute(&mut self, attribute: &Attribute) -> bool {
        self.state.remove_attribute(attribute, &self.id)
    }

    pub fn contains(&self, filter: &F) -> bool {
        self.state.contains(&filter.clone().into(), &self.id)
    }

    pub fn toggle(&mut self, filter: F) -> bool {
        self.state.toggle(filter, &self.id)
    }

    /// Members of the group in insertion order.
    pub fn filters(&self) -> Vec<F> {
        self.state
            .filters_for_group(&self.id)
            .iter()
            .filter_map(F::from_filter)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.filters().group(&self.id).is_none()
    }
}

/// View over a hierarchical group and its breadcrumb configuration.
#[derive(Debug)]
pub struct HierarchicalGroupAccessor<'a> {
    state: &'a mut FilterState,
    id: FilterGroupId,
}

impl<'a> HierarchicalGroupAccessor<'a> {
    pub(crate) fn new(state: &'a mut FilterState, name: &str) -> Self {
        HierarchicalGroupAccessor {
            state,
            id: FilterGroupId::hierarchical(name),
        }
    }

    pub fn id(&self) -> &FilterGroupId {
        &self.id
    }

    /// Attribute per hierarchy level, root first.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) -> bool {
        self.state
            .set_hierarchical_attributes(self.id.name(), attributes)
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.state.hierarchical_attributes(self.id.name())
    }

    /// Selected breadcrumb path, root first.
    pub fn set_path(&mut self, path: Vec<FacetFilter>) -> bool {
        self.state.set_hierarchical_path(self.id.name(), path)
    }

    pub fn path(&self) -> &[FacetFilter] {
        self.state.hierarchical_path(self.id.name())
    }

    /// Replace the group content and the breadcrumb path with the selection
    /// of `path`, notifying once.
    ///
    /// The group keeps only the deepest filter of the path; an empty path
    /// clears the selection.
    pub fn select(&mut self, path: Vec<FacetFilter>) {
        let id = self.id.clone();
        self.state.batch(|filters| {
            filters.remove_all(&id);
            if let Some(deepest) = path.last() {
                filters.add(deepest.clone(), &id);
            }
            filters.set_hierarchical_path(id.name(), path);
        });
    }

    pub fn add(&mut self, filter: FacetFilter) -> bool {
        self.state.add(filter, &self.id)
    }

    pub fn remove(&mut self, filter: &FacetFilter) -> bool {
        self.state.remove(&Filter::Facet(filter.clone()), &self.id)
    }

    pub fn remove_all(&mut self) -> bool {
        self.state.remove_all(&self.id)
    }

    pub fn contains(&self, filter: &FacetFilter) -> bool {
        self.state.contains(&Filter::Facet(filter.clone()), &self.id)
    }

    pub fn toggle(&mut self, filter: FacetFilter) -> bool {
        self.state.toggle(filter, &self.id)
    }

    pub fn filters(&self) -> Vec<FacetFilter> {
        self.state
            .filters_for_group(&self.id)
            .iter()
            .filter_map(FacetFilter::from_filter)
            .collect()
    }
}
