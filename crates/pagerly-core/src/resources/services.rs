// Services and their integrations.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error, Reference};

use crate::descriptor::ResourceDescriptor;
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::{integrations, referenced_ids, validate_type, vendors};

const DISPLAY: &[&str] = &["id", "name"];

/// Accepted `type` values for service data nested in other payloads.
pub const ALLOWED_TYPES: &[&str] = &["service_reference"];

pub static SERVICES: ResourceDescriptor =
    ResourceDescriptor::new("services").display_fields(DISPLAY);

pub fn services(client: &ApiClient) -> Resource {
    Resource::new(client, &SERVICES)
}

pub fn validate(info: &Map<String, Value>) -> Result<(), Error> {
    validate_type("service", info, ALLOWED_TYPES)
}

/// Fetch every integration the service references, in order.
pub fn integrations(service: &Entity) -> Result<Vec<Entity>, Error> {
    service.ensure_kind(&SERVICES)?;
    let nested = integrations::for_service(service.client(), Reference::from(service))?;
    referenced_ids(service, "integrations")?
        .iter()
        .map(|id| nested.fetch(id))
        .collect()
}

pub fn get_integration(service: &Entity, id: &str) -> Result<Entity, Error> {
    service.ensure_kind(&SERVICES)?;
    integrations::fetch(service.client(), Reference::from(service), id)
}

/// Alias of [`get_integration`].
pub fn view_integration(service: &Entity, id: &str) -> Result<Entity, Error> {
    get_integration(service, id)
}

/// Validate the integration and any nested `service`/`vendor`, then create it.
pub fn create_integration(service: &Entity, info: Map<String, Value>) -> Result<Entity, Error> {
    service.ensure_kind(&SERVICES)?;
    service.ensure_live()?;

    integrations::validate(&info)?;
    if let Some(Value::Object(nested)) = info.get("service") {
        validate(nested)?;
    }
    if let Some(Value::Object(vendor)) = info.get("vendor") {
        vendors::validate(vendor)?;
    }
    integrations::create(service.client(), Reference::from(service), info)
}
