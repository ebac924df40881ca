// ── Find queries ──
//
// Caller-side knobs for `Resource::find`: extra parameters, the free-text
// `query`, client-side exclusion and the paging bounds. Also holds the alias
// translation and exclusion matching the engine applies around pagination.

use serde_json::{Map, Value};

use pagerly_api::{Params, QueryValue};

use crate::descriptor::{ExcludeFilter, ResourceDescriptor};
use crate::entity::Entity;

/// Values to drop client-side after fetching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclude(Vec<String>);

impl Exclude {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Exclude {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for Exclude {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for Exclude {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for Exclude {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Exclude {
    fn from(values: [&str; N]) -> Self {
        Self(values.into_iter().map(str::to_owned).collect())
    }
}

/// Arguments to a collection query.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    pub params: Params,
    /// Explicit free-text query; wins over any aliased parameter.
    pub query: Option<String>,
    pub exclude: Option<Exclude>,
    /// Items per request; clamped to `1..=100`, default 25.
    pub page_size: Option<u32>,
    /// Upper bound on items fetched across all pages.
    pub maximum: Option<usize>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn exclude(mut self, exclude: impl Into<Exclude>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }
}

// ── Alias translation ───────────────────────────────────────────────

/// Collapse aliased parameters onto the server's `query` parameter.
///
/// Every alias is removed from the result. The explicit `query` wins;
/// otherwise the first non-empty alias in descriptor order is used.
/// Non-alias parameters pass through unchanged.
pub fn translate_query_params(
    descriptor: &ResourceDescriptor,
    explicit: Option<&str>,
    params: &Params,
) -> Params {
    let mut translated = params.clone();
    let mut aliased = None;
    for alias in descriptor.query_aliases {
        let value = translated.remove(alias).filter(|v| !v.is_empty());
        if aliased.is_none() {
            aliased = value;
        }
    }

    match (explicit, aliased) {
        (Some(query), _) => translated.insert("query", query),
        (None, Some(value)) => translated.insert("query", value),
        (None, None) => {}
    }
    translated
}

// ── Exclusion ───────────────────────────────────────────────────────

/// `true` if `item` matches any filter for any excluded value.
pub fn is_excluded(
    descriptor: &ResourceDescriptor,
    item: &Map<String, Value>,
    exclude: &Exclude,
) -> bool {
    exclude.values().iter().any(|value| {
        descriptor.exclude_filters.iter().any(|filter| match filter {
            ExcludeFilter::Field(field) => item
                .get(*field)
                .is_some_and(|candidate| value_matches(candidate, value)),
            ExcludeFilter::Predicate(predicate) => predicate(item, value),
        })
    })
}

/// Drop excluded entities, preserving order.
pub fn apply_exclusions(
    descriptor: &ResourceDescriptor,
    entities: Vec<Entity>,
    exclude: Option<&Exclude>,
) -> Vec<Entity> {
    let Some(exclude) = exclude.filter(|e| !e.is_empty()) else {
        return entities;
    };
    entities
        .into_iter()
        .filter(|entity| {
            entity
                .data()
                .is_none_or(|data| !is_excluded(descriptor, data, exclude))
        })
        .collect()
}

/// Scalar equality between a JSON field and an excluded value.
pub(crate) fn value_matches(candidate: &Value, value: &str) -> bool {
    match candidate {
        Value::String(s) => s == value,
        Value::Number(n) => n.to_string() == value,
        Value::Bool(b) => b.to_string() == value,
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const USER_FILTERS: &[ExcludeFilter] =
        &[ExcludeFilter::Field("email"), ExcludeFilter::Field("name")];
    const USER_ALIASES: &[&str] = &["email", "name"];
    static USERS: ResourceDescriptor = ResourceDescriptor::new("users")
        .exclude_filters(USER_FILTERS)
        .query_aliases(USER_ALIASES);

    fn summary_starts_with(item: &Map<String, Value>, value: &str) -> bool {
        item.get("summary")
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with(value))
    }
    const SUMMARY: &[ExcludeFilter] = &[ExcludeFilter::Predicate(summary_starts_with)];
    static NOTES: ResourceDescriptor = ResourceDescriptor::new("notes").exclude_filters(SUMMARY);

    fn item(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn explicit_query_wins_over_aliases() {
        let params = Params::new().with("email", "a@example.com").with("team", "T1");
        let translated = translate_query_params(&USERS, Some("ada"), &params);

        assert_eq!(translated.get("query"), Some(&QueryValue::from("ada")));
        assert!(!translated.contains_key("email"));
        assert_eq!(translated.get("team"), Some(&QueryValue::from("T1")));
    }

    #[test]
    fn first_alias_in_descriptor_order_is_used() {
        let params = Params::new().with("name", "Ada").with("email", "a@example.com");
        let translated = translate_query_params(&USERS, None, &params);

        assert_eq!(translated.get("query"), Some(&QueryValue::from("a@example.com")));
        assert!(!translated.contains_key("name"));
        assert!(!translated.contains_key("email"));
        assert_eq!(translated.len(), 1);
    }

    #[test]
    fn no_alias_and_no_query_leaves_params_alone() {
        let params = Params::new().with("team", "T1");
        let translated = translate_query_params(&USERS, None, &params);
        assert_eq!(translated, params);
    }

    #[test]
    fn field_filters_match_scalars() {
        let exclude = Exclude::from(["a@example.com"]);
        assert!(is_excluded(&USERS, &item(json!({"email": "a@example.com"})), &exclude));
        assert!(!is_excluded(&USERS, &item(json!({"email": "b@example.com"})), &exclude));

        let numeric = Exclude::from("42");
        assert!(is_excluded(&USERS, &item(json!({"name": 42})), &numeric));
    }

    #[test]
    fn predicate_filter_is_consulted() {
        let exclude = Exclude::from("[bot]");
        assert!(is_excluded(&NOTES, &item(json!({"summary": "[bot] ping"})), &exclude));
        assert!(!is_excluded(&NOTES, &item(json!({"summary": "human note"})), &exclude));
    }

    #[test]
    fn builder_collects_arguments() {
        let query = FindQuery::new()
            .param("team_ids", vec!["T1", "T2"])
            .query("ada")
            .exclude(vec!["x", "y"])
            .page_size(50)
            .maximum(10);

        assert_eq!(query.query.as_deref(), Some("ada"));
        assert_eq!(query.exclude.unwrap().values(), ["x", "y"]);
        assert_eq!(query.page_size, Some(50));
        assert_eq!(query.maximum, Some(10));
        assert!(query.params.contains_key("team_ids"));
    }
}
