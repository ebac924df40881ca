// Incidents and their state transitions.

use serde_json::{Value, json};

use pagerly_api::{ApiClient, Error, Method, Reference};

use crate::descriptor::ResourceDescriptor;
use crate::entity::Entity;
use crate::query::FindQuery;
use crate::resource::Resource;
use crate::resources::{alerts, attributed, notes};

const DISPLAY: &[&str] = &["id", "incident_number", "title"];

pub static INCIDENTS: ResourceDescriptor =
    ResourceDescriptor::new("incidents").display_fields(DISPLAY);

pub fn incidents(client: &ApiClient) -> Resource {
    Resource::new(client, &INCIDENTS)
}

/// Mark the incident resolved, optionally with a resolution note.
pub fn resolve(
    incident: &mut Entity,
    from_email: &str,
    resolution: Option<&str>,
) -> Result<(), Error> {
    transition(incident, "incident.resolve", from_email, "resolved", resolution)
}

pub fn acknowledge(incident: &mut Entity, from_email: &str) -> Result<(), Error> {
    transition(incident, "incident.acknowledge", from_email, "acknowledged", None)
}

/// Snooze an acknowledged incident for `duration_secs`.
pub fn snooze(incident: &mut Entity, from_email: &str, duration_secs: u64) -> Result<(), Error> {
    let options = attributed("incident.snooze", from_email)?;
    incident.ensure_kind(&INCIDENTS)?;
    incident.ensure_live()?;

    let response = incident.request(
        Method::POST,
        Some("snooze"),
        &options.body(json!({"duration": duration_secs})),
    )?;
    incident.absorb(response)
}

fn transition(
    incident: &mut Entity,
    operation: &str,
    from_email: &str,
    status: &str,
    resolution: Option<&str>,
) -> Result<(), Error> {
    let options = attributed(operation, from_email)?;
    incident.ensure_kind(&INCIDENTS)?;
    incident.ensure_live()?;

    let mut body = json!({"type": "incident_reference", "status": status});
    if let Some(resolution) = resolution {
        body["resolution"] = Value::from(resolution);
    }
    let response = incident.request(Method::PUT, None, &options.body(json!({"incident": body})))?;
    incident.absorb(response)
}

// ── Sub-collections ─────────────────────────────────────────────────

pub fn alerts(incident: &Entity) -> Result<Vec<Entity>, Error> {
    incident.ensure_kind(&INCIDENTS)?;
    alerts::for_incident(incident.client(), Reference::from(incident))?.find(&FindQuery::new())
}

pub fn notes(incident: &Entity) -> Result<Vec<Entity>, Error> {
    incident.ensure_kind(&INCIDENTS)?;
    notes::for_incident(incident.client(), Reference::from(incident))?.find(&FindQuery::new())
}

pub fn create_note(incident: &Entity, from_email: &str, content: &str) -> Result<Entity, Error> {
    incident.ensure_kind(&INCIDENTS)?;
    incident.ensure_live()?;
    notes::create(incident.client(), Reference::from(incident), from_email, content)
}
