// Log entries: read-only.

use pagerly_api::ApiClient;

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::resource::Resource;

const DISABLED: &[Operation] = &[Operation::Create, Operation::Update, Operation::Delete];
const DISPLAY: &[&str] = &["id", "type"];

pub static LOG_ENTRIES: ResourceDescriptor = ResourceDescriptor::new("log_entries")
    .disable(DISABLED)
    .display_fields(DISPLAY);

pub fn log_entries(client: &ApiClient) -> Resource {
    Resource::new(client, &LOG_ENTRIES)
}
