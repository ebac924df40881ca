// Add-ons installed into the web app.

use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::resource::Resource;

const DISPLAY: &[&str] = &["id", "name", "src"];
const DISABLED: &[Operation] = &[Operation::Update];

pub static ADD_ONS: ResourceDescriptor = ResourceDescriptor::new("addons")
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn add_ons(client: &ApiClient) -> Resource {
    Resource::new(client, &ADD_ONS)
}

/// Install an add-on of `kind` (e.g. `full_page_addon`) served from `src`.
pub fn install(client: &ApiClient, kind: &str, name: &str, src: &str) -> Result<Entity, Error> {
    let mut data = Map::new();
    data.insert("type".into(), Value::from(kind));
    data.insert("name".into(), Value::from(name));
    data.insert("src".into(), Value::from(src));
    add_ons(client).create(data)
}
