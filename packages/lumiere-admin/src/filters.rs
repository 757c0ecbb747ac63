//! Filter state and query assembly.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AdminError, Result};

pub const DEFAULT_LIMIT: u64 = 20;

/// A single filter value. `Unset` and falsy values never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Unset,
    Text(String),
    Int(i64),
    Flag(bool),
}

impl FilterValue {
    /// Falsy values: empty text, zero, `false`, unset.
    pub fn is_set(&self) -> bool {
        match self {
            FilterValue::Unset => false,
            FilterValue::Text(s) => !s.is_empty(),
            FilterValue::Int(n) => *n != 0,
            FilterValue::Flag(b) => *b,
        }
    }

    fn as_offset(&self, key: &str) -> Result<u64> {
        let invalid = |reason: &str| AdminError::InvalidFilter {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match self {
            FilterValue::Unset => Ok(0),
            FilterValue::Int(n) => u64::try_from(*n).map_err(|_| invalid("must not be negative")),
            FilterValue::Text(s) if s.is_empty() => Ok(0),
            FilterValue::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid("must be a non-negative integer")),
            FilterValue::Flag(_) => Err(invalid("must be a number")),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Unset => Ok(()),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Int(n) => write!(f, "{}", n),
            FilterValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Flag(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Unset)
    }
}

/// Offset pagination plus named optional constraints.
///
/// Only set values are stored; assigning a falsy value removes the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    skip: u64,
    limit: u64,
    values: BTreeMap<String, FilterValue>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl FilterState {
    /// `limit` of zero falls back to the default page size.
    pub fn with_limit(limit: u64) -> Self {
        Self {
            skip: 0,
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            values: BTreeMap::new(),
        }
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Store a value. Key validation against the resource happens in the
    /// controller; here only the pagination keys are type-checked.
    pub fn set(&mut self, key: &str, value: FilterValue) -> Result<()> {
        match key {
            "skip" => self.skip = value.as_offset(key)?,
            "limit" => {
                let limit = value.as_offset(key)?;
                if limit == 0 {
                    return Err(AdminError::InvalidFilter {
                        key: key.to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                self.limit = limit;
            }
            _ if value.is_set() => {
                self.values.insert(key.to_string(), value);
            }
            _ => {
                self.values.remove(key);
            }
        }
        Ok(())
    }

    pub fn set_skip(&mut self, skip: u64) {
        self.skip = skip;
    }

    pub fn reset_to_first_page(&mut self) {
        self.skip = 0;
    }

    /// Query pairs for the list request. A zero `skip` is omitted like any
    /// other falsy value.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.values.len() + 2);
        if self.skip > 0 {
            query.push(("skip".to_string(), self.skip.to_string()));
        }
        query.push(("limit".to_string(), self.limit.to_string()));
        query.extend(
            self.values
                .iter()
                .filter(|(_, v)| v.is_set())
                .map(|(k, v)| (k.clone(), v.to_string())),
        );
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(state: &FilterState) -> Vec<String> {
        state.to_query().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn defaults_send_only_limit() {
        let state = FilterState::default();
        assert_eq!(state.skip(), 0);
        assert_eq!(state.limit(), 20);
        assert_eq!(
            state.to_query(),
            vec![("limit".to_string(), "20".to_string())]
        );
    }

    #[test]
    fn falsy_values_are_dropped() {
        let mut state = FilterState::default();
        state.set("search", "paris".into()).unwrap();
        state.set("category", "urban".into()).unwrap();
        state.set("search", "".into()).unwrap();
        state.set("category", FilterValue::Unset).unwrap();
        state.set("pending", false.into()).unwrap();
        state.set("article_id", 0i64.into()).unwrap();

        assert_eq!(keys(&state), vec!["limit"]);
        assert!(state.get("search").is_none());
    }

    #[test]
    fn truthy_values_are_rendered() {
        let mut state = FilterState::default();
        state.set("skip", 40i64.into()).unwrap();
        state.set("status", "review".into()).unwrap();
        state.set("pending", true.into()).unwrap();

        let query = state.to_query();
        assert!(query.contains(&("skip".to_string(), "40".to_string())));
        assert!(query.contains(&("status".to_string(), "review".to_string())));
        assert!(query.contains(&("pending".to_string(), "true".to_string())));
    }

    #[test]
    fn pagination_keys_are_validated() {
        let mut state = FilterState::default();
        assert!(matches!(
            state.set("limit", 0i64.into()),
            Err(AdminError::InvalidFilter { .. })
        ));
        assert!(state.set("skip", (-20i64).into()).is_err());
        assert!(state.set("skip", true.into()).is_err());
        state.set("limit", "50".into()).unwrap();
        state.set("skip", FilterValue::Unset).unwrap();
        assert_eq!((state.skip(), state.limit()), (0, 50));
    }

    #[test]
    fn option_conversion_maps_none_to_unset() {
        assert_eq!(FilterValue::from(None::<&str>), FilterValue::Unset);
        assert_eq!(
            FilterValue::from(Some("x")),
            FilterValue::Text("x".to_string())
        );
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        assert_eq!(FilterState::with_limit(0).limit(), DEFAULT_LIMIT);
    }
}
