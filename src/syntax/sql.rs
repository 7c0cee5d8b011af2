//! SQL-like filter syntax.
//!
//! Negation is an explicit `NOT ` prefix on each term; operators are never
//! inverted here.

use crate::filter::{FacetFilter, Filter, FilterGroup, NumericFilter, NumericValue, TagFilter};
use crate::syntax::{facet_value, number, quoted, quoted_attribute};

pub fn render_filter(filter: &Filter) -> String {
    let term = match filter {
        Filter::Facet(f) => facet(f),
        Filter::Numeric(f) => numeric(f),
        Filter::Tag(f) => tag(f),
    };
    if filter.is_negated() {
        format!("NOT {term}")
    } else {
        term
    }
}

/// `(t1 AND t2 ...)` or `(t1 OR t2 ...)`; empty string for an empty group.
pub fn render_group(group: &FilterGroup) -> String {
    if group.is_empty() {
        return String::new();
    }
    let separator = match group {
        FilterGroup::Or { .. } => " OR ",
        FilterGroup::And { .. } | FilterGroup::Hierarchical { .. } => " AND ",
    };
    let terms: Vec<String> = group.filters().iter().map(render_filter).collect();
    format!("({})", terms.join(separator))
}

/// Non-empty groups joined with ` AND `.
pub fn render_groups(groups: &[FilterGroup]) -> String {
    groups
        .iter()
        .map(render_group)
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn facet(filter: &FacetFilter) -> String {
    let score = filter
        .score()
        .map(|s| format!("<score={s}>"))
        .unwrap_or_default();
    format!(
        "{}:{}{}",
        quoted_attribute(filter.attribute()),
        facet_value(filter.value()),
        score
    )
}

fn numeric(filter: &NumericFilter) -> String {
    let attribute = quoted_attribute(filter.attribute());
    match *filter.value() {
        NumericValue::Comparison(operator, value) => {
            format!("{} {} {}", attribute, operator, number(value))
        }
        NumericValue::Range { lower, upper } => {
            format!("{}:{} TO {}", attribute, number(lower), number(upper))
        }
    }
}

fn tag(filter: &TagFilter) -> String {
    format!("\"_tags\":{}", quoted(filter.value()))
}
