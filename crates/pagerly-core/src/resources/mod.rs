//! Resource kinds: one static [`ResourceDescriptor`](crate::ResourceDescriptor)
//! per kind plus the actions that don't fit the generic engine.

pub mod abilities;
pub mod add_ons;
pub mod alerts;
pub mod escalation_policies;
pub mod events;
pub mod incidents;
pub mod integrations;
pub mod log_entries;
pub mod maintenance_windows;
pub mod notes;
pub mod notifications;
pub mod oncalls;
pub mod schedules;
pub mod services;
pub mod teams;
pub mod users;
pub mod vendors;

use serde_json::{Map, Value};

use pagerly_api::{Error, RequestOptions};

use crate::entity::Entity;

/// Fail with `MissingFromEmail` unless `from_email` is non-blank.
pub(crate) fn require_from(operation: &str, from_email: &str) -> Result<(), Error> {
    if from_email.trim().is_empty() {
        return Err(Error::MissingFromEmail {
            operation: operation.to_owned(),
        });
    }
    Ok(())
}

/// Request options carrying the `From` attribution header.
pub(crate) fn attributed(operation: &str, from_email: &str) -> Result<RequestOptions, Error> {
    require_from(operation, from_email)?;
    Ok(RequestOptions::new().header("From", from_email))
}

/// Ids of the references listed under `field`, e.g. a service's
/// `integrations`.
pub(crate) fn referenced_ids(entity: &Entity, field: &str) -> Result<Vec<String>, Error> {
    let Value::Array(refs) = entity.field(field)? else {
        return Err(Error::invalid_response(
            format!("'{field}' is not a list"),
            entity.to_json().to_string(),
        ));
    };
    refs.iter()
        .map(|r| {
            r.get("id")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| {
                    Error::invalid_response(
                        format!("reference in '{field}' has no id"),
                        r.to_string(),
                    )
                })
        })
        .collect()
}

/// Check the `type` of an object against an allow-list.
pub(crate) fn validate_type(
    what: &str,
    info: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), Error> {
    match info.get("type").and_then(Value::as_str) {
        Some(kind) if allowed.contains(&kind) => Ok(()),
        Some(kind) => Err(Error::invalid_arguments(format!(
            "{what} type '{kind}' is not one of: {}",
            allowed.join(", ")
        ))),
        None => Err(Error::invalid_arguments(format!("{what} requires a 'type'"))),
    }
}
