//! Query builder: filter queries, free-text search, and lookups.

use crate::aliases::{resolve_province, type_matches};
use crate::error::{Result, SearchError};
use crate::matcher::{matches_all_tokens, name_equals};
use crate::normalize::{normalize, tokenize};
use crate::record::{Column, FacilityRecord, Schema};
use crate::store::{FacilityStore, ScanFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

/// Default number of results.
pub const DEFAULT_LIMIT: usize = 20;

/// Largest limit accepted unless configured otherwise.
pub const MAX_LIMIT: usize = 1000;

/// A validated result-count limit.
///
/// Parsing rejects non-numeric, negative, and oversized values instead of
/// coercing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Limit(usize);

impl Limit {
    /// Validate against [`MAX_LIMIT`].
    pub fn new(value: usize) -> Result<Self> {
        Self::with_max(value, MAX_LIMIT)
    }

    /// Validate against a caller-supplied maximum.
    pub fn with_max(value: usize, max: usize) -> Result<Self> {
        if value > max {
            return Err(SearchError::InvalidLimit(format!(
                "{value} exceeds the maximum of {max}"
            )));
        }
        Ok(Self(value))
    }

    /// Validate a signed value, as decoded from JSON.
    pub fn from_i64(value: i64, max: usize) -> Result<Self> {
        let value = usize::try_from(value)
            .map_err(|_| SearchError::InvalidLimit(format!("{value} is negative")))?;
        Self::with_max(value, max)
    }

    /// Parse text, falling back to `default` when the text is absent or blank.
    pub fn parse_or(text: Option<&str>, default: Limit, max: usize) -> Result<Self> {
        match text.map(str::trim) {
            None | Some("") => Ok(default),
            Some(t) => {
                let value: i64 = t
                    .parse()
                    .map_err(|_| SearchError::InvalidLimit(format!("{t:?} is not a number")))?;
                Self::from_i64(value, max)
            }
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl FromStr for Limit {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_or(Some(s), Self::default(), MAX_LIMIT)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional filters for [`QueryEngine::query_facilities`], combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<String>,
}

impl FacilityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_facility_type(mut self, facility_type: impl Into<String>) -> Self {
        self.facility_type = Some(facility_type.into());
        self
    }

    /// Pushed-down part of the query. Blank filters count as absent.
    pub fn scan_filter(&self) -> ScanFilter {
        ScanFilter {
            province: self
                .province
                .as_deref()
                .map(resolve_province)
                .filter(|p| !p.is_empty()),
            city: self
                .city
                .as_deref()
                .map(normalize)
                .filter(|c| !c.is_empty()),
        }
    }

    /// Facility type filter, if one was given and is not blank.
    pub fn type_filter(&self) -> Option<&str> {
        self.facility_type
            .as_deref()
            .filter(|t| !normalize(t).is_empty())
    }
}

/// Outcome of an identifier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "facility", rename_all = "snake_case")]
pub enum Lookup {
    Found(FacilityRecord),
    NotFound,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn into_option(self) -> Option<FacilityRecord> {
        match self {
            Lookup::Found(record) => Some(record),
            Lookup::NotFound => None,
        }
    }
}

/// Retrieval bounds for filter queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Pre-limit cap multiplier without a facility-type filter
    pub prefetch_factor: usize,
    /// Pre-limit cap multiplier when a facility-type filter discards rows
    pub typed_prefetch_factor: usize,
    /// Absolute ceiling on rows pulled before post-filtering
    pub max_prefetch: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            prefetch_factor: 10,
            typed_prefetch_factor: 50,
            max_prefetch: 10_000,
        }
    }
}

impl QueryConfig {
    /// Rows to pull from the store before post-filtering.
    ///
    /// Never below `limit`, so a query without a post-filter is not cut
    /// short by the cap.
    pub fn prefetch_cap(&self, limit: usize, typed: bool) -> usize {
        let factor = if typed {
            self.typed_prefetch_factor
        } else {
            self.prefetch_factor
        };
        limit
            .saturating_mul(factor.max(1))
            .min(self.max_prefetch)
            .max(limit)
    }
}

/// Stateless query operations over a [`FacilityStore`].
///
/// Every method takes `&self` and reads the store only, so one engine can
/// serve concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryEngine<S> {
    store: S,
    config: QueryConfig,
}

impl<S: FacilityStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, QueryConfig::default())
    }

    pub fn with_config(store: S, config: QueryConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Column-to-type mapping of the underlying table.
    pub fn get_schema(&self) -> Result<Schema> {
        self.store.schema().inspect_err(|e| {
            tracing::warn!(error = %e, "schema lookup failed");
        })
    }

    /// Filter by optional province, city, and facility type.
    ///
    /// Province and city go to the store; facility type is checked here
    /// because alias-class membership cannot be pushed down. Results come
    /// back in store order, unranked.
    pub fn query_facilities(&self, query: &FacilityQuery, limit: Limit) -> Result<Vec<FacilityRecord>> {
        let limit = limit.get();
        if limit == 0 {
            return Ok(Vec::new());
        }

        let filter = query.scan_filter();
        let type_filter = query.type_filter();
        let cap = self.config.prefetch_cap(limit, type_filter.is_some());

        let mut pulled = 0usize;
        let mut accepted = Vec::with_capacity(limit.min(64));
        self.store
            .scan(&filter, &mut |record| {
                pulled += 1;
                if type_filter.is_none_or(|t| type_matches(t, &record.facility_type)) {
                    accepted.push(record);
                }
                if accepted.len() >= limit || pulled >= cap {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .inspect_err(|e| tracing::warn!(error = %e, "facility query failed"))?;

        tracing::debug!(
            province = ?filter.province,
            city = ?filter.city,
            facility_type = ?type_filter,
            limit,
            cap,
            pulled,
            returned = accepted.len(),
            "query_facilities"
        );

        Ok(accepted)
    }

    /// Free-text search: every token must hit name, type, city, or province.
    pub fn search_facilities(&self, query_text: &str, limit: Limit) -> Result<Vec<FacilityRecord>> {
        let limit = limit.get();
        if limit == 0 {
            return Ok(Vec::new());
        }

        let tokens = tokenize(query_text);
        let mut hits = Vec::with_capacity(limit.min(64));
        self.store
            .scan(&ScanFilter::default(), &mut |record| {
                if matches_all_tokens(&tokens, &record) {
                    hits.push(record);
                }
                if hits.len() >= limit {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .inspect_err(|e| tracing::warn!(error = %e, "facility search failed"))?;

        tracing::debug!(?tokens, limit, returned = hits.len(), "search_facilities");
        Ok(hits)
    }

    /// Exact lookup by normalized name. The first match in store order wins.
    pub fn fetch_facility_by_id(&self, identifier: &str) -> Result<Lookup> {
        let wanted = normalize(identifier);
        if wanted.is_empty() {
            return Err(SearchError::InvalidIdentifier(
                "identifier is empty after normalization".to_string(),
            ));
        }

        let mut found = None;
        self.store
            .scan(&ScanFilter::default(), &mut |record| {
                if name_equals(&wanted, &record) {
                    found = Some(record);
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .inspect_err(|e| tracing::warn!(error = %e, "facility fetch failed"))?;

        tracing::debug!(identifier = %wanted, found = found.is_some(), "fetch_facility_by_id");
        Ok(found.map_or(Lookup::NotFound, Lookup::Found))
    }

    /// Sorted distinct non-empty cities.
    pub fn list_cities(&self) -> Result<Vec<String>> {
        self.list_distinct(Column::City)
    }

    /// Sorted distinct non-empty facility types.
    pub fn list_facility_types(&self) -> Result<Vec<String>> {
        self.list_distinct(Column::FacilityType)
    }

    fn list_distinct(&self, column: Column) -> Result<Vec<String>> {
        let mut values: Vec<String> = self
            .store
            .distinct(column)?
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }
}
