// Schedules and who is on call for them.

use serde_json::Value;

use pagerly_api::{ApiClient, Error, Method, Params, RequestOptions};

use crate::descriptor::ResourceDescriptor;
use crate::entity::Entity;
use crate::resource::{Resource, response_object};
use crate::resources::users::USERS;

const DISPLAY: &[&str] = &["id", "name"];

pub static SCHEDULES: ResourceDescriptor =
    ResourceDescriptor::new("schedules").display_fields(DISPLAY);

pub fn schedules(client: &ApiClient) -> Resource {
    Resource::new(client, &SCHEDULES)
}

/// Users on call for this schedule, typically bounded by `since`/`until`.
pub fn oncall_users(schedule: &Entity, params: &Params) -> Result<Vec<Entity>, Error> {
    schedule.ensure_kind(&SCHEDULES)?;
    let response = schedule.request(
        Method::GET,
        Some("users"),
        &RequestOptions::new().query(params.clone()),
    )?;

    let users = Resource::new(schedule.client(), &USERS);
    let mut body = response_object(response, schedule.endpoint())?;
    match USERS.unwrap_response(&mut body, "users")? {
        Value::Array(items) => items.into_iter().map(|item| users.materialize(item)).collect(),
        other => Err(Error::invalid_response(
            "'users' in schedule response is not a list",
            other.to_string(),
        )),
    }
}
