// Incident notes: listed and created under `incidents/{id}/notes`, never
// fetched or deleted individually.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error, Reference};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::attributed;

const DISABLED: &[Operation] = &[Operation::Fetch, Operation::Update, Operation::Delete];
const DISPLAY: &[&str] = &["id", "created_at"];

pub static NOTES: ResourceDescriptor = ResourceDescriptor::new("notes")
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn for_incident(
    client: &ApiClient,
    incident: impl Into<Reference>,
) -> Result<Resource, Error> {
    let incident = incident.into();
    Ok(Resource::nested(
        client,
        &NOTES,
        &format!("incidents/{}", incident.id()?),
    ))
}

pub fn create(
    client: &ApiClient,
    incident: impl Into<Reference>,
    from_email: &str,
    content: &str,
) -> Result<Entity, Error> {
    let options = attributed("note.create", from_email)?;
    let mut data = Map::new();
    data.insert("content".into(), Value::from(content));
    for_incident(client, incident)?.create_with(data, &options)
}
