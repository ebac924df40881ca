// On-call entries: list-only.

use serde_json::{Map, Value};

use pagerly_api::ApiClient;

use crate::descriptor::{ExcludeFilter, Operation, ResourceDescriptor};
use crate::query::value_matches;
use crate::resource::Resource;

/// Matches entries whose on-call user has the given id.
fn user_id_matches(item: &Map<String, Value>, value: &str) -> bool {
    item.get("user")
        .and_then(|user| user.get("id"))
        .is_some_and(|id| value_matches(id, value))
}

const FILTERS: &[ExcludeFilter] = &[ExcludeFilter::Predicate(user_id_matches)];
const DISABLED: &[Operation] = &[
    Operation::Fetch,
    Operation::Create,
    Operation::Update,
    Operation::Delete,
];
const DISPLAY: &[&str] = &["escalation_level", "user.id"];

pub static ONCALLS: ResourceDescriptor = ResourceDescriptor::new("oncalls")
    .singular_key("oncall")
    .exclude_filters(FILTERS)
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn oncalls(client: &ApiClient) -> Resource {
    Resource::new(client, &ONCALLS)
}
