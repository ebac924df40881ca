// Maintenance windows.

use pagerly_api::ApiClient;

use crate::descriptor::ResourceDescriptor;
use crate::resource::Resource;

const DISPLAY: &[&str] = &["id", "start_time", "end_time"];

pub static MAINTENANCE_WINDOWS: ResourceDescriptor =
    ResourceDescriptor::new("maintenance_windows").display_fields(DISPLAY);

pub fn maintenance_windows(client: &ApiClient) -> Resource {
    Resource::new(client, &MAINTENANCE_WINDOWS)
}
