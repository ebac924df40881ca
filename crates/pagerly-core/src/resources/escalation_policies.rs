// Escalation policies.

use pagerly_api::{ApiClient, Error};

use crate::descriptor::ResourceDescriptor;
use crate::entity::Entity;
use crate::resource::Resource;
use crate::resources::referenced_ids;
use crate::resources::services::SERVICES;

const ALIASES: &[&str] = &["name"];
const DISPLAY: &[&str] = &["id", "name"];

pub static ESCALATION_POLICIES: ResourceDescriptor = ResourceDescriptor::new("escalation_policies")
    .query_aliases(ALIASES)
    .display_fields(DISPLAY);

pub fn escalation_policies(client: &ApiClient) -> Resource {
    Resource::new(client, &ESCALATION_POLICIES)
}

/// Fetch every service the policy references, in order.
pub fn services(policy: &Entity) -> Result<Vec<Entity>, Error> {
    policy.ensure_kind(&ESCALATION_POLICIES)?;
    let services = Resource::new(policy.client(), &SERVICES);
    referenced_ids(policy, "services")?
        .iter()
        .map(|id| services.fetch(id))
        .collect()
}
