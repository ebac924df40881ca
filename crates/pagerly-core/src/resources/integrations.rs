// Service integrations, nested under `services/{id}/integrations`.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error, Reference};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::validate_type;

const DISABLED: &[Operation] = &[Operation::Delete];
const DISPLAY: &[&str] = &["id", "type", "name"];

/// Accepted integration `type` values.
pub const ALLOWED_TYPES: &[&str] = &[
    "aws_cloudwatch_inbound_integration",
    "aws_cloudwatch_inbound_integration_reference",
    "cloudkick_inbound_integration",
    "cloudkick_inbound_integration_reference",
    "event_transformer_api_inbound_integration",
    "event_transformer_api_inbound_integration_reference",
    "generic_email_inbound_integration",
    "generic_email_inbound_integration_reference",
    "generic_events_api_inbound_integration",
    "generic_events_api_inbound_integration_reference",
    "keynote_inbound_integration",
    "keynote_inbound_integration_reference",
    "nagios_inbound_integration",
    "nagios_inbound_integration_reference",
    "pingdom_inbound_integration",
    "pingdom_inbound_integration_reference",
    "sql_monitor_inbound_integration",
    "sql_monitor_inbound_integration_reference",
];

pub static INTEGRATIONS: ResourceDescriptor = ResourceDescriptor::new("integrations")
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn for_service(client: &ApiClient, service: impl Into<Reference>) -> Result<Resource, Error> {
    let service = service.into();
    Ok(Resource::nested(
        client,
        &INTEGRATIONS,
        &format!("services/{}", service.id()?),
    ))
}

pub fn validate(info: &Map<String, Value>) -> Result<(), Error> {
    validate_type("integration", info, ALLOWED_TYPES)
}

pub fn fetch(
    client: &ApiClient,
    service: impl Into<Reference>,
    id: &str,
) -> Result<Entity, Error> {
    for_service(client, service)?.fetch(id)
}

/// Validate, then create under the service.
pub fn create(
    client: &ApiClient,
    service: impl Into<Reference>,
    info: Map<String, Value>,
) -> Result<Entity, Error> {
    validate(&info)?;
    for_service(client, service)?.create(info)
}
