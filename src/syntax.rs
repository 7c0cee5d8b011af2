//! Filter syntax rendering.
//!
//! Two independent renderers turn a snapshot of filter groups into the wire
//! syntaxes accepted by the hosted search API:
//!
//! - [`legacy`]: nested arrays. The outer list is AND-joined, each inner list
//!   is OR-joined.
//! - [`sql`]: a single string, `group (" AND " group)*` where each group is a
//!   parenthesised AND or OR of terms.
//!
//! Both skip groups without filters.
//!
//! ```
//! use sift::filter::{FacetFilter, FilterGroup};
//! use sift::syntax::{LegacySyntax, SqlSyntax};
//!
//! let groups = vec![FilterGroup::or(
//!     "colors",
//!     vec![FacetFilter::new("color", "red"), FacetFilter::new("color", "blue")],
//! )];
//!
//! assert_eq!(groups.sql_form(), r#"("color":"red" OR "color":"blue")"#);
//! assert_eq!(
//!     groups.legacy_form(),
//!     vec![vec![r#""color":"red""#.to_string(), r#""color":"blue""#.to_string()]]
//! );
//! ```

pub mod legacy;
pub mod sql;

use crate::filter::{Attribute, FacetValue, Filter, FilterGroup};

/// Legacy nested-array filters: AND across rows, OR within a row.
pub type LegacyFilters = Vec<Vec<String>>;

/// Rendering into the nested-array syntax.
pub trait LegacySyntax {
    fn legacy_form(&self) -> LegacyFilters;
}

/// Rendering into the SQL-like string syntax.
pub trait SqlSyntax {
    fn sql_form(&self) -> String;
}

impl LegacySyntax for Filter {
    fn legacy_form(&self) -> LegacyFilters {
        legacy::render_filter(self)
            .into_iter()
            .map(|expression| vec![expression])
            .collect()
    }
}

impl LegacySyntax for FilterGroup {
    fn legacy_form(&self) -> LegacyFilters {
        legacy::render_group(self)
    }
}

impl LegacySyntax for [FilterGroup] {
    fn legacy_form(&self) -> LegacyFilters {
        legacy::render_groups(self)
    }
}

impl LegacySyntax for Vec<FilterGroup> {
    fn legacy_form(&self) -> LegacyFilters {
        legacy::render_groups(self)
    }
}

impl SqlSyntax for Filter {
    fn sql_form(&self) -> String {
        sql::render_filter(self)
    }
}

impl SqlSyntax for FilterGroup {
    fn sql_form(&self) -> String {
        sql::render_group(self)
    }
}

impl SqlSyntax for [FilterGroup] {
    fn sql_form(&self) -> String {
        sql::render_groups(self)
    }
}

impl SqlSyntax for Vec<FilterGroup> {
    fn sql_form(&self) -> String {
        sql::render_groups(self)
    }
}

/// Double-quote `raw`, escaping backslashes and quotes.
pub(crate) fn quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

pub(crate) fn quoted_attribute(attribute: &Attribute) -> String {
    quoted(attribute.as_str())
}

/// Strings are quoted; numbers and booleans are bare.
pub(crate) fn facet_value(value: &FacetValue) -> String {
    match value {
        FacetValue::String(s) => quoted(s),
        FacetValue::Number(n) => number(*n),
        FacetValue::Bool(b) => b.to_string(),
    }
}

/// Shortest round-trip form. NaN and infinities have no wire syntax and are
/// kept out of filter state, see [`Filter::is_finite`].
pub(crate) fn number(value: f64) -> String {
    format!("{value}")
}
