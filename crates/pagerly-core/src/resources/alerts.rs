// Alerts live under their incident: `incidents/{id}/alerts`.

use serde_json::{Value, json};

use pagerly_api::{ApiClient, Error, Reference};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::attributed;

const DISPLAY: &[&str] = &["id", "status", "summary"];
const DISABLED: &[Operation] = &[Operation::Update];

pub static ALERTS: ResourceDescriptor = ResourceDescriptor::new("alerts")
    .disable(DISABLED)
    .display_fields(DISPLAY);

/// The alert collection of one incident.
pub fn for_incident(
    client: &ApiClient,
    incident: impl Into<Reference>,
) -> Result<Resource, Error> {
    let incident = incident.into();
    Ok(Resource::nested(
        client,
        &ALERTS,
        &format!("incidents/{}", incident.id()?),
    ))
}

pub fn fetch(
    client: &ApiClient,
    incident: impl Into<Reference>,
    id: &str,
) -> Result<Entity, Error> {
    for_incident(client, incident)?.fetch(id)
}

pub fn resolve(alert: &mut Entity, from_email: &str) -> Result<(), Error> {
    let options = attributed("alert.resolve", from_email)?;
    alert.ensure_kind(&ALERTS)?;
    alert.ensure_live()?;

    let body = json!({"alert": {
        "id": alert.id()?,
        "type": "alert",
        "status": "resolved",
    }});
    let path = alert_path(alert)?;
    let response = alert.client().put(&path, &options.body(body))?;
    alert.absorb(response)
}

/// Move the alert to another incident.
pub fn associate(
    alert: &mut Entity,
    from_email: &str,
    new_incident: impl Into<Reference>,
) -> Result<(), Error> {
    let options = attributed("alert.associate", from_email)?;
    alert.ensure_kind(&ALERTS)?;
    alert.ensure_live()?;

    let new_incident = new_incident.into();
    let body = json!({"alert": {
        "id": alert.id()?,
        "type": "alert",
        "incident": {"type": "incident_reference", "id": new_incident.id()?},
    }});
    let path = alert_path(alert)?;
    let response = alert.client().put(&path, &options.body(body))?;
    alert.absorb(response)
}

/// The alert's own path, derived from its parent incident when known.
fn alert_path(alert: &Entity) -> Result<String, Error> {
    match alert.lookup("incident.id").and_then(Value::as_str) {
        Some(incident) => Ok(format!("incidents/{incident}/alerts/{}", alert.id()?)),
        None => alert.path(),
    }
}
