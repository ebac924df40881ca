// ── Resource descriptors ──
//
// Static, per-kind configuration consumed by the generic engine: endpoint
// name, key overrides, exclusion filters, query aliases, unwrap rule and the
// operations a kind refuses.

use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use pagerly_api::Error;

/// Custom unwrap rule: pull the payload out of a response object.
///
/// Receives the decoded body and the key the default rule would use. Whatever
/// it removes from the map is no longer part of the page metadata.
pub type UnwrapFn = fn(&mut Map<String, Value>, &str) -> Option<Value>;

/// Exclusion predicate: `(item, excluded_value) -> matches`.
pub type ExcludePredicate = fn(&Map<String, Value>, &str) -> bool;

/// One client-side exclusion rule.
#[derive(Debug, Clone, Copy)]
pub enum ExcludeFilter {
    /// Item is excluded when `item[field]` equals an excluded value.
    Field(&'static str),
    /// Item is excluded when the predicate returns `true`.
    Predicate(ExcludePredicate),
}

/// Engine operations that a descriptor may disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Find,
    Fetch,
    Create,
    Update,
    Delete,
}

const BY_NAME: &[ExcludeFilter] = &[ExcludeFilter::Field("name")];

/// Static configuration for one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDescriptor {
    /// Collection path segment, e.g. `"escalation_policies"`.
    pub endpoint: &'static str,
    pub plural_key: Option<&'static str>,
    pub singular_key: Option<&'static str>,
    pub exclude_filters: &'static [ExcludeFilter],
    /// Caller-facing names collapsed onto the server's `query` parameter.
    pub query_aliases: &'static [&'static str],
    pub unwrap: Option<UnwrapFn>,
    pub disabled: &'static [Operation],
    /// Fields shown by `Display`; dotted paths reach into nested objects.
    pub display_fields: &'static [&'static str],
}

impl ResourceDescriptor {
    pub const fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            plural_key: None,
            singular_key: None,
            exclude_filters: BY_NAME,
            query_aliases: &[],
            unwrap: None,
            disabled: &[],
            display_fields: &["id"],
        }
    }

    pub const fn plural_key(mut self, key: &'static str) -> Self {
        self.plural_key = Some(key);
        self
    }

    pub const fn singular_key(mut self, key: &'static str) -> Self {
        self.singular_key = Some(key);
        self
    }

    pub const fn exclude_filters(mut self, filters: &'static [ExcludeFilter]) -> Self {
        self.exclude_filters = filters;
        self
    }

    pub const fn query_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.query_aliases = aliases;
        self
    }

    pub const fn unwrap_with(mut self, rule: UnwrapFn) -> Self {
        self.unwrap = Some(rule);
        self
    }

    pub const fn disable(mut self, operations: &'static [Operation]) -> Self {
        self.disabled = operations;
        self
    }

    pub const fn display_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.display_fields = fields;
        self
    }

    // ── Keys ─────────────────────────────────────────────────────────

    /// Key holding a collection in list responses.
    pub fn collection_key(&self) -> String {
        self.plural_key
            .map_or_else(|| pluralize(self.endpoint), str::to_owned)
    }

    /// Key holding a single entity in request and response bodies.
    pub fn entity_key(&self) -> String {
        self.singular_key
            .map_or_else(|| singularize(self.endpoint), str::to_owned)
    }

    /// Human-readable kind name, e.g. `"escalation_policy"`.
    pub fn kind(&self) -> String {
        self.entity_key()
    }

    // ── Capabilities ─────────────────────────────────────────────────

    pub fn supports(&self, operation: Operation) -> bool {
        !self.disabled.contains(&operation)
    }

    /// Fail with `UnsupportedOperation` if `operation` is disabled.
    pub fn ensure_supported(&self, operation: Operation) -> Result<(), Error> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(Error::UnsupportedOperation {
                resource: self.endpoint.to_owned(),
                operation: operation.to_string(),
            })
        }
    }

    /// Extract the payload stored under `key`.
    ///
    /// A missing key is an `InvalidResponse`: the server answered with
    /// something other than the expected entity wrapper.
    pub fn unwrap_response(&self, body: &mut Map<String, Value>, key: &str) -> Result<Value, Error> {
        let extracted = match self.unwrap {
            Some(rule) => rule(body, key),
            None => body.remove(key),
        };
        extracted.ok_or_else(|| {
            Error::invalid_response(
                format!("response for {} is missing '{key}'", self.endpoint),
                Value::Object(body.clone()).to_string(),
            )
        })
    }
}

// ── Inflection ──────────────────────────────────────────────────────

/// `policy` → `policies`, `user` → `users`, `users` → `users`.
pub fn pluralize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('y') {
        format!("{stem}ies")
    } else if name.ends_with('s') {
        name.to_owned()
    } else {
        format!("{name}s")
    }
}

/// `policies` → `policy`, `users` → `user`, `user` → `user`.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix('s') {
        stem.to_owned()
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pluralize_cases() {
        assert_eq!(pluralize("plurals"), "plurals");
        assert_eq!(pluralize("pluraly"), "pluralies");
        assert_eq!(pluralize("plural"), "plurals");
    }

    #[test]
    fn singularize_cases() {
        assert_eq!(singularize("singular"), "singular");
        assert_eq!(singularize("singularies"), "singulary");
        assert_eq!(singularize("singulars"), "singular");
    }

    #[test]
    fn keys_follow_endpoint() {
        let d = ResourceDescriptor::new("escalation_policies");
        assert_eq!(d.collection_key(), "escalation_policies");
        assert_eq!(d.entity_key(), "escalation_policy");
    }

    #[test]
    fn key_overrides_win() {
        let d = ResourceDescriptor::new("oncalls")
            .plural_key("oncalls")
            .singular_key("oncall");
        assert_eq!(d.collection_key(), "oncalls");
        assert_eq!(d.entity_key(), "oncall");
    }

    #[test]
    fn disabled_operation_is_unsupported() {
        const DISABLED: &[Operation] = &[Operation::Create, Operation::Delete];
        static LOGS: ResourceDescriptor = ResourceDescriptor::new("log_entries").disable(DISABLED);

        assert!(LOGS.ensure_supported(Operation::Find).is_ok());
        let err = LOGS.ensure_supported(Operation::Delete).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedOperation { ref resource, ref operation }
                if resource == "log_entries" && operation == "delete"
        ));
    }

    #[test]
    fn default_unwrap_removes_key() {
        let d = ResourceDescriptor::new("users");
        let mut body = json!({"users": [1, 2], "more": false})
            .as_object()
            .cloned()
            .unwrap();

        let items = d.unwrap_response(&mut body, "users").unwrap();
        assert_eq!(items, json!([1, 2]));
        assert!(!body.contains_key("users"));
        assert_eq!(body["more"], json!(false));
    }

    #[test]
    fn missing_key_is_invalid_response() {
        let d = ResourceDescriptor::new("users");
        let mut body = json!({"ok": true}).as_object().cloned().unwrap();
        assert!(matches!(
            d.unwrap_response(&mut body, "user"),
            Err(Error::InvalidResponse { .. })
        ));
    }

    #[test]
    fn custom_unwrap_rule_is_used() {
        fn data_rule(body: &mut Map<String, Value>, _key: &str) -> Option<Value> {
            body.remove("data")
        }
        let d = ResourceDescriptor::new("widgets").unwrap_with(data_rule);
        let mut body = json!({"data": ["w"]}).as_object().cloned().unwrap();
        assert_eq!(d.unwrap_response(&mut body, "widgets").unwrap(), json!(["w"]));
    }
}
