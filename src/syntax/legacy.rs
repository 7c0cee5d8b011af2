//! Nested-array ("legacy") filter syntax.
//!
//! Negation is expressed by inverting comparison operators and by a `-`
//! prefix on facet and tag values. A range expands into two comparison rows;
//! a negated range becomes `< lower` and `> upper` rows, which the API ANDs.
//! That is not the complement of the range, but it is the established wire
//! behaviour and is kept as is.

use crate::filter::{FacetFilter, Filter, FilterGroup, NumericFilter, NumericOperator, NumericValue, TagFilter};
use crate::syntax::{LegacyFilters, facet_value, number, quoted, quoted_attribute};

/// Expressions of a single filter. Ranges yield two, everything else one.
pub fn render_filter(filter: &Filter) -> Vec<String> {
    match filter {
        Filter::Facet(f) => vec![facet(f)],
        Filter::Numeric(f) => numeric(f),
        Filter::Tag(f) => vec![tag(f)],
    }
}

/// Rows of one group: one row per expression for `And`, a single row for
/// `Or` and `Hierarchical`, nothing for an empty group.
pub fn render_group(group: &FilterGroup) -> LegacyFilters {
    let expressions = group.filters().iter().flat_map(render_filter);
    match group {
        FilterGroup::And { .. } => expressions.map(|e| vec![e]).collect(),
        FilterGroup::Or { .. } | FilterGroup::Hierarchical { .. } => {
            let row: Vec<String> = expressions.collect();
            if row.is_empty() { Vec::new() } else { vec![row] }
        }
    }
}

/// Rows of every group, in group order.
pub fn render_groups(groups: &[FilterGroup]) -> LegacyFilters {
    groups.iter().flat_map(render_group).collect()
}

fn facet(filter: &FacetFilter) -> String {
    let sign = if filter.is_negated() { "-" } else { "" };
    let score = filter
        .score()
        .map(|s| format!("<score={s}>"))
        .unwrap_or_default();
    format!(
        "{}:{}{}{}",
        quoted_attribute(filter.attribute()),
        sign,
        facet_value(filter.value()),
        score
    )
}

fn numeric(filter: &NumericFilter) -> Vec<String> {
    let attribute = quoted_attribute(filter.attribute());
    let comparison = |operator: NumericOperator, value: f64| {
        let operator = if filter.is_negated() { operator.inverted() } else { operator };
        format!("{} {} {}", attribute, operator, number(value))
    };
    match *filter.value() {
        NumericValue::Comparison(operator, value) => vec![comparison(operator, value)],
        NumericValue::Range { lower, upper } => vec![
            comparison(NumericOperator::GreaterThanOrEqual, lower),
            comparison(NumericOperator::LessThanOrEqual, upper),
        ],
    }
}

fn tag(filter: &TagFilter) -> String {
    let sign = if filter.is_negated() { "-" } else { "" };
    format!("\"_tags\":{}{}", sign, quoted(filter.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FacetFilter, NumericFilter, TagFilter};

    fn rows(rows: &[&[&str]]) -> LegacyFilters {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_facet_filter() {
        let filter = Filter::from(FacetFilter::new("color", "red"));
        assert_eq!(render_filter(&filter), vec![r#""color":"red""#]);

        let filter = Filter::from(!FacetFilter::new("color", "red"));
        assert_eq!(render_filter(&filter), vec![r#""color":-"red""#]);

        let filter = Filter::from(FacetFilter::new("brand", "acme").with_score(3));
        assert_eq!(render_filter(&filter), vec![r#""brand":"acme"<score=3>"#]);

        let filter = Filter::from(FacetFilter::new("in_stock", true));
        assert_eq!(render_filter(&filter), vec![r#""in_stock":true"#]);
    }

    #[test]
    fn test_numeric_comparison_negation_inverts_operator() {
        let cases = [
            (NumericOperator::Equal, r#""price" != 10"#),
            (NumericOperator::NotEqual, r#""price" = 10"#),
            (NumericOperator::LessThan, r#""price" >= 10"#),
            (NumericOperator::GreaterThanOrEqual, r#""price" < 10"#),
            (NumericOperator::GreaterThan, r#""price" <= 10"#),
            (NumericOperator::LessThanOrEqual, r#""price" > 10"#),
        ];
        for (operator, expected) in cases {
            let filter = Filter::from(!NumericFilter::comparison("price", operator, 10.0));
            assert_eq!(render_filter(&filter), vec![expected]);
        }

        let filter = Filter::from(NumericFilter::comparison(
            "price",
            NumericOperator::LessThan,
            9.5,
        ));
        assert_eq!(render_filter(&filter), vec![r#""price" < 9.5"#]);
    }

    #[test]
    fn test_range_expands_to_two_rows() {
        let filter = Filter::from(NumericFilter::range("price", 10.0, 20.0));
        assert_eq!(
            render_filter(&filter),
            vec![r#""price" >= 10"#, r#""price" <= 20"#]
        );

        let negated = Filter::from(!NumericFilter::range("price", 10.0, 20.0));
        assert_eq!(
            render_filter(&negated),
            vec![r#""price" < 10"#, r#""price" > 20"#]
        );

        let group = FilterGroup::and("prices", vec![negated]);
        assert_eq!(render_group(&group).len(), 2);
    }

    #[test]
    fn test_tag_filter() {
        let filter = Filter::from(TagFilter::new("sale"));
        assert_eq!(render_filter(&filter), vec![r#""_tags":"sale""#]);
        let filter = Filter::from(!TagFilter::new("sale"));
        assert_eq!(render_filter(&filter), vec![r#""_tags":-"sale""#]);
    }

    #[test]
    fn test_and_group_one_row_per_filter() {
        let group = FilterGroup::and(
            "g",
            vec![
                FacetFilter::new("brand", "acme").into(),
                TagFilter::new("new").into(),
            ],
        );
        assert_eq!(
            render_group(&group),
            rows(&[&[r#""brand":"acme""#], &[r#""_tags":"new""#]])
        );
    }

    #[test]
    fn test_or_group_single_row() {
        let group = FilterGroup::or(
            "colors",
            vec![
                FacetFilter::new("color", "red"),
                FacetFilter::new("color", "blue"),
                FacetFilter::new("color", "green"),
            ],
        );
        assert_eq!(
            render_group(&group),
            rows(&[&[r#""color":"red""#, r#""color":"blue""#, r#""color":"green""#]])
        );
    }

    #[test]
    fn test_empty_groups_contribute_nothing() {
        let groups = vec![
            FilterGroup::and("empty", Vec::new()),
            FilterGroup::or::<TagFilter>("empty_or", Vec::new()),
            FilterGroup::hierarchical("empty_h", Vec::new()),
        ];
        assert!(render_groups(&groups).is_empty());
    }

    #[test]
    fn test_row_count_property() {
        let groups = vec![
            FilterGroup::and(
                "a",
                vec![
                    FacetFilter::new("brand", "acme").into(),
                    TagFilter::new("new").into(),
                ],
            ),
            FilterGroup::or(
                "colors",
                vec![FacetFilter::new("color", "red"), FacetFilter::new("color", "blue")],
            ),
            FilterGroup::hierarchical("category", vec![FacetFilter::new("lvl0", "Clothing")]),
            FilterGroup::and("empty", Vec::new()),
        ];
        // 2 conjunctive filters + 1 disjunctive group + 1 hierarchical group
        assert_eq!(render_groups(&groups).len(), 4);
    }
}
