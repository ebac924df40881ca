// Vendors: the integration types an account can use.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::validate_type;

const DISABLED: &[Operation] = &[Operation::Delete];
const DISPLAY: &[&str] = &["id", "name"];

/// Accepted `type` values for vendor data sent to the API.
pub const ALLOWED_TYPES: &[&str] = &["vendor_reference"];

pub static VENDORS: ResourceDescriptor = ResourceDescriptor::new("vendors")
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn vendors(client: &ApiClient) -> Resource {
    Resource::new(client, &VENDORS)
}

pub fn validate(info: &Map<String, Value>) -> Result<(), Error> {
    validate_type("vendor", info, ALLOWED_TYPES)
}

/// Validate, then create.
pub fn create(client: &ApiClient, data: Map<String, Value>) -> Result<Entity, Error> {
    validate(&data)?;
    vendors(client).create(data)
}
