// Account abilities: plain strings rather than entities.

use serde_json::Value;

use pagerly_api::{ApiClient, Error, RequestOptions};

use crate::resource::response_object;

/// Ability names enabled for the account.
pub fn abilities(client: &ApiClient) -> Result<Vec<String>, Error> {
    let response = client.get("abilities", &RequestOptions::new())?;
    let mut body = response_object(response, "abilities")?;
    match body.remove("abilities") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(Error::invalid_response(
                    "ability is not a string",
                    other.to_string(),
                )),
            })
            .collect(),
        _ => Err(Error::invalid_response(
            "response for abilities is missing 'abilities'",
            Value::Object(body).to_string(),
        )),
    }
}

/// Whether the account has `ability`.
///
/// A 404 or other 4xx answer means "no"; other failures propagate.
pub fn can(client: &ApiClient, ability: &str) -> Result<bool, Error> {
    match client.get(&format!("abilities/{ability}"), &RequestOptions::new()) {
        Ok(_) => Ok(true),
        Err(Error::NotFound { .. } | Error::BadRequest { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
