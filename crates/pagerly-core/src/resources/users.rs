// Users, plus their contact methods and notification rules.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error};

use crate::descriptor::{ExcludeFilter, Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::query::FindQuery;
use crate::resource::Resource;
use crate::resources::attributed;

const FILTERS: &[ExcludeFilter] = &[ExcludeFilter::Field("email"), ExcludeFilter::Field("name")];
const ALIASES: &[&str] = &["email", "name"];
const DISPLAY: &[&str] = &["id", "email"];

pub static USERS: ResourceDescriptor = ResourceDescriptor::new("users")
    .exclude_filters(FILTERS)
    .query_aliases(ALIASES)
    .display_fields(DISPLAY);

const CONTACT_DISPLAY: &[&str] = &["id", "type", "address"];

pub static CONTACT_METHODS: ResourceDescriptor = ResourceDescriptor::new("contact_methods")
    .exclude_filters(&[])
    .display_fields(CONTACT_DISPLAY);

const RULE_DISPLAY: &[&str] = &["id", "urgency", "start_delay_in_minutes"];
const RULES_DISABLED: &[Operation] = &[Operation::Update];

pub static NOTIFICATION_RULES: ResourceDescriptor = ResourceDescriptor::new("notification_rules")
    .exclude_filters(&[])
    .disable(RULES_DISABLED)
    .display_fields(RULE_DISPLAY);

pub fn users(client: &ApiClient) -> Resource {
    Resource::new(client, &USERS)
}

/// Create a user; the API requires an acting user's email.
pub fn create(
    client: &ApiClient,
    data: Map<String, Value>,
    from_email: &str,
) -> Result<Entity, Error> {
    let options = attributed("user.create", from_email)?;
    users(client).create_with(data, &options)
}

// ── Contact methods ─────────────────────────────────────────────────

fn contact_method_resource(user: &Entity) -> Result<Resource, Error> {
    user.ensure_kind(&USERS)?;
    Ok(Resource::nested(user.client(), &CONTACT_METHODS, &user.path()?))
}

pub fn contact_methods(user: &Entity) -> Result<Vec<Entity>, Error> {
    contact_method_resource(user)?.find(&FindQuery::new())
}

pub fn contact_method(user: &Entity, id: &str) -> Result<Entity, Error> {
    contact_method_resource(user)?.fetch(id)
}

/// Create a contact method and append it to the user's snapshot.
pub fn create_contact_method(user: &mut Entity, data: Map<String, Value>) -> Result<Entity, Error> {
    user.ensure_live()?;
    let created = contact_method_resource(user)?.create(data)?;
    append_to(user, "contact_methods", &created);
    Ok(created)
}

pub fn delete_contact_method(user: &Entity, id: &str) -> Result<bool, Error> {
    user.ensure_live()?;
    contact_method_resource(user)?.delete(id)
}

// ── Notification rules ──────────────────────────────────────────────

fn notification_rule_resource(user: &Entity) -> Result<Resource, Error> {
    user.ensure_kind(&USERS)?;
    Ok(Resource::nested(user.client(), &NOTIFICATION_RULES, &user.path()?))
}

pub fn notification_rules(user: &Entity) -> Result<Vec<Entity>, Error> {
    notification_rule_resource(user)?.find(&FindQuery::new())
}

pub fn notification_rule(user: &Entity, id: &str) -> Result<Entity, Error> {
    notification_rule_resource(user)?.fetch(id)
}

pub fn create_notification_rule(
    user: &mut Entity,
    data: Map<String, Value>,
) -> Result<Entity, Error> {
    user.ensure_live()?;
    let created = notification_rule_resource(user)?.create(data)?;
    append_to(user, "notification_rules", &created);
    Ok(created)
}

pub fn delete_notification_rule(user: &Entity, id: &str) -> Result<bool, Error> {
    user.ensure_live()?;
    notification_rule_resource(user)?.delete(id)
}

/// Swap in a snapshot with `child` appended to the list under `field`.
fn append_to(user: &mut Entity, field: &str, child: &Entity) {
    let Some(data) = user.data() else {
        return;
    };
    let mut data = data.clone();
    if let Some(Value::Array(items)) = data.get_mut(field) {
        items.push(child.to_json());
        user.replace(data);
    }
}
