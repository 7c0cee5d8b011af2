//! Filter model.
//!
//! A [`Filter`] is a closed sum over the three filter variants understood by
//! the hosted search API:
//!
//! - [`FacetFilter`]: `attribute:value` equality on a faceted attribute
//! - [`NumericFilter`]: a comparison or a range on a numeric attribute
//! - [`TagFilter`]: membership in the reserved `_tags` attribute
//!
//! Filters are immutable values apart from their negation flag. Equality and
//! hashing cover the attribute, the value and the negation flag, so a filter
//! and its negation are distinct members of a group.
//!
//! # Example
//!
//! ```
//! use sift::filter::{FacetFilter, Filter, NumericFilter, NumericOperator};
//!
//! let color = FacetFilter::new("color", "red");
//! let cheap = NumericFilter::comparison("price", NumericOperator::LessThan, 20.0);
//!
//! let not_red: Filter = (!color.clone()).into();
//! assert!(not_red.is_negated());
//! assert_ne!(not_red, Filter::from(color));
//! assert_eq!(cheap.attribute().as_str(), "price");
//! ```

pub mod group;

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Not;

use serde::{Deserialize, Serialize};

pub use group::{FilterGroup, FilterGroupId, GroupKind};

/// Attribute name carried by every [`TagFilter`].
pub const TAGS_ATTRIBUTE: &str = "_tags";

/// Name of a faceted or filterable record attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(String);

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Attribute(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reserved attribute holding record tags.
    pub fn tags() -> Self {
        Attribute(TAGS_ATTRIBUTE.to_string())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Attribute(name.to_string())
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        Attribute(name)
    }
}

impl From<&Attribute> for Attribute {
    fn from(attribute: &Attribute) -> Self {
        attribute.clone()
    }
}

impl AsRef<str> for Attribute {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Attribute {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Discriminant of the [`Filter`] variants.
///
/// Disjunctive groups are declared for exactly one filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Facet,
    Numeric,
    Tag,
}

/// Value matched by a [`FacetFilter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl PartialEq for FacetValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FacetValue::String(a), FacetValue::String(b)) => a == b,
            (FacetValue::Number(a), FacetValue::Number(b)) => a.to_bits() == b.to_bits(),
            (FacetValue::Bool(a), FacetValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FacetValue {}

impl Hash for FacetValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FacetValue::String(s) => s.hash(state),
            FacetValue::Number(n) => n.to_bits().hash(state),
            FacetValue::Bool(b) => b.hash(state),
        }
    }
}

impl FacetValue {
    /// `false` for NaN and infinite numbers, which have no wire syntax.
    pub fn is_finite(&self) -> bool {
        match self {
            FacetValue::Number(n) => n.is_finite(),
            FacetValue::String(_) | FacetValue::Bool(_) => true,
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::String(s) => f.write_str(s),
            FacetValue::Number(n) => write!(f, "{n}"),
            FacetValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::String(value.to_string())
    }
}

impl From<String> for FacetValue {
    fn from(value: String) -> Self {
        FacetValue::String(value)
    }
}

impl From<f64> for FacetValue {
    fn from(value: f64) -> Self {
        FacetValue::Number(value)
    }
}

impl From<i64> for FacetValue {
    fn from(value: i64) -> Self {
        FacetValue::Number(value as f64)
    }
}

impl From<i32> for FacetValue {
    fn from(value: i32) -> Self {
        FacetValue::Number(f64::from(value))
    }
}

impl From<bool> for FacetValue {
    fn from(value: bool) -> Self {
        FacetValue::Bool(value)
    }
}

/// Equality filter on a faceted attribute, with an optional ranking score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetFilter {
    attribute: Attribute,
    value: FacetValue,
    #[serde(default)]
    is_negated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<i32>,
}

impl FacetFilter {
    pub fn new(attribute: impl Into<Attribute>, value: impl Into<FacetValue>) -> Self {
        FacetFilter {
            attribute: attribute.into(),
            value: value.into(),
            is_negated: false,
            score: None,
        }
    }

    /// Attach a ranking score (rendered as `<score=N>`).
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn value(&self) -> &FacetValue {
        &self.value
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn is_negated(&self) -> bool {
        self.is_negated
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.is_negated = negated;
    }
}

// The score is a ranking hint, not part of the filter's identity.
impl PartialEq for FacetFilter {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute
            && self.value == other.value
            && self.is_negated == other.is_negated
    }
}

impl Eq for FacetFilter {}

impl Hash for FacetFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attribute.hash(state);
        self.value.hash(state);
        self.is_negated.hash(state);
    }
}

/// Comparison operators of a [`NumericFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericOperator {
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
}

impl NumericOperator {
    /// The logical complement of this operator.
    ///
    /// `=`/`!=`, `<`/`>=` and `>`/`<=` are complements of each other.
    pub fn inverted(self) -> Self {
        match self {
            NumericOperator::LessThan => NumericOperator::GreaterThanOrEqual,
            NumericOperator::LessThanOrEqual => NumericOperator::GreaterThan,
            NumericOperator::Equal => NumericOperator::NotEqual,
            NumericOperator::NotEqual => NumericOperator::Equal,
            NumericOperator::GreaterThanOrEqual => NumericOperator::LessThan,
            NumericOperator::GreaterThan => NumericOperator::LessThanOrEqual,
        }
    }

    /// Wire symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            NumericOperator::LessThan => "<",
            NumericOperator::LessThanOrEqual => "<=",
            NumericOperator::Equal => "=",
            NumericOperator::NotEqual => "!=",
            NumericOperator::GreaterThanOrEqual => ">=",
            NumericOperator::GreaterThan => ">",
        }
    }
}

impl fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Constraint carried by a [`NumericFilter`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericValue {
    Comparison(NumericOperator, f64),
    Range { lower: f64, upper: f64 },
}

impl NumericValue {
    pub fn is_finite(&self) -> bool {
        match *self {
            NumericValue::Comparison(_, value) => value.is_finite(),
            NumericValue::Range { lower, upper } => lower.is_finite() && upper.is_finite(),
        }
    }
}

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericValue::Comparison(op_a, a), NumericValue::Comparison(op_b, b)) => {
                op_a == op_b && a.to_bits() == b.to_bits()
            }
            (
                NumericValue::Range { lower: la, upper: ua },
                NumericValue::Range { lower: lb, upper: ub },
            ) => la.to_bits() == lb.to_bits() && ua.to_bits() == ub.to_bits(),
            _ => false,
        }
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            NumericValue::Comparison(op, value) => {
                op.hash(state);
                value.to_bits().hash(state);
            }
            NumericValue::Range { lower, upper } => {
                lower.to_bits().hash(state);
                upper.to_bits().hash(state);
            }
        }
    }
}

/// Comparison or range filter on a numeric attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericFilter {
    attribute: Attribute,
    value: NumericValue,
    #[serde(default)]
    is_negated: bool,
}

impl NumericFilter {
    pub fn new(attribute: impl Into<Attribute>, value: NumericValue) -> Self {
        NumericFilter {
            attribute: attribute.into(),
            value,
            is_negated: false,
        }
    }

    pub fn comparison(attribute: impl Into<Attribute>, operator: NumericOperator, value: f64) -> Self {
        Self::new(attribute, NumericValue::Comparison(operator, value))
    }

    /// Inclusive range `lower..=upper`.
    pub fn range(attribute: impl Into<Attribute>, lower: f64, upper: f64) -> Self {
        Self::new(attribute, NumericValue::Range { lower, upper })
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn value(&self) -> &NumericValue {
        &self.value
    }

    pub fn is_negated(&self) -> bool {
        self.is_negated
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.is_negated = negated;
    }
}

/// Filter on the record tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagFilter {
    value: String,
    #[serde(default)]
    is_negated: bool,
}

impl TagFilter {
    pub fn new(value: impl Into<String>) -> Self {
        TagFilter {
            value: value.into(),
            is_negated: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_negated(&self) -> bool {
        self.is_negated
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.is_negated = negated;
    }
}

/// A single filter of any variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Facet(FacetFilter),
    Numeric(NumericFilter),
    Tag(TagFilter),
}

impl Filter {
    /// Attribute the filter constrains. Tags report [`TAGS_ATTRIBUTE`].
    pub fn attribute(&self) -> Attribute {
        match self {
            Filter::Facet(f) => f.attribute.clone(),
            Filter::Numeric(f) => f.attribute.clone(),
            Filter::Tag(_) => Attribute::tags(),
        }
    }

    pub fn filter_type(&self) -> FilterType {
        match self {
            Filter::Facet(_) => FilterType::Facet,
            Filter::Numeric(_) => FilterType::Numeric,
            Filter::Tag(_) => FilterType::Tag,
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Filter::Facet(f) => f.is_negated,
            Filter::Numeric(f) => f.is_negated,
            Filter::Tag(f) => f.is_negated,
        }
    }

    pub fn set_negated(&mut self, negated: bool) {
        match self {
            Filter::Facet(f) => f.set_negated(negated),
            Filter::Numeric(f) => f.set_negated(negated),
            Filter::Tag(f) => f.set_negated(negated),
        }
    }

    /// Whether every number in the filter is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Filter::Facet(f) => f.value.is_finite(),
            Filter::Numeric(f) => f.value.is_finite(),
            Filter::Tag(_) => true,
        }
    }

    /// Flip the negation flag in place.
    pub fn negate(&mut self) {
        let negated = self.is_negated();
        self.set_negated(!negated);
    }
}

macro_rules! impl_negation {
    ($($ty:ty),*) => {
        $(
            impl Not for $ty {
                type Output = $ty;

                fn not(mut self) -> Self::Output {
                    let negated = self.is_negated();
                    self.set_negated(!negated);
                    self
                }
            }
        )*
    };
}

impl_negation!(FacetFilter, NumericFilter, TagFilter, Filter);

impl From<FacetFilter> for Filter {
    fn from(filter: FacetFilter) -> Self {
        Filter::Facet(filter)
    }
}

impl From<NumericFilter> for Filter {
    fn from(filter: NumericFilter) -> Self {
        Filter::Numeric(filter)
    }
}

impl From<TagFilter> for Filter {
    fn from(filter: TagFilter) -> Self {
        Filter::Tag(filter)
    }
}

/// A type that can be stored in a filter group.
///
/// Implemented by [`Filter`] itself (any variant) and by each concrete
/// variant, which lets group accessors hand back typed filters.
pub trait FilterKind: Clone + Into<Filter> {
    /// Extract `Self` from a stored filter, if the variant matches.
    fn from_filter(filter: &Filter) -> Option<Self>;
}

/// A concrete filter variant, usable as the member type of a disjunctive group.
pub trait TypedFilter: FilterKind {
    const FILTER_TYPE: FilterType;
}

impl FilterKind for Filter {
    fn from_filter(filter: &Filter) -> Option<Self> {
        Some(filter.clone())
    }
}

impl FilterKind for FacetFilter {
    fn from_filter(filter: &Filter) -> Option<Self> {
        match filter {
            Filter::Facet(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl FilterKind for NumericFilter {
    fn from_filter(filter: &Filter) -> Option<Self> {
        match filter {
            Filter::Numeric(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl FilterKind for TagFilter {
    fn from_filter(filter: &Filter) -> Option<Self> {
        match filter {
            Filter::Tag(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl TypedFilter for FacetFilter {
    const FILTER_TYPE: FilterType = FilterType::Facet;
}

impl TypedFilter for NumericFilter {
    const FILTER_TYPE: FilterType = FilterType::Numeric;
}

impl TypedFilter for TagFilter {
    const FILTER_TYPE: FilterType = FilterType::Tag;
}
