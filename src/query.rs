//! Search query sent to the hosted search API.
//!
//! A [`Query`] is an opaque bag of search parameters. Only `filters` and
//! `facets` are interpreted by this crate; everything else is forwarded as is.
//! Serialization uses the API's camelCase parameter names.

pub mod builder;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::Attribute;

pub use builder::{QueryBuilder, QueryBuilderConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Full-text query.
    #[serde(default)]
    pub query: String,
    /// SQL-like filter string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    /// Attributes to compute facet counts for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_snippet: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_analytics: Option<bool>,
    /// Parameters this crate does not model.
    #[serde(flatten)]
    pub custom_parameters: BTreeMap<String, serde_json::Value>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Query {
            query: text.into(),
            ..Default::default()
        }
    }

    pub fn with_facets<I, A>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.facets = facets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.hits_per_page = Some(hits_per_page);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_parameters.insert(name.into(), value);
        self
    }

    /// Set `filters`, clearing it for an empty rendering.
    pub(crate) fn set_filters(&mut self, filters: String) {
        self.filters = if filters.is_empty() { None } else { Some(filters) };
    }

    /// JSON body for the transport layer.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
