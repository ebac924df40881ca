// Events API (v1): trigger, acknowledge and resolve incidents by service key.
//
// Events go to a separate host and are not wrapped under a singular key, so
// they bypass the descriptor engine and post the event object as-is.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use pagerly_api::{ApiClient, Error, RequestOptions};

use crate::resource::response_object;

pub const EVENTS_BASE_URL: &str = "https://events.pagerduty.com/generic/2010-04-15/";
const CREATE_PATH: &str = "create_event.json";

pub const EVENT_TYPES: &[&str] = &["trigger", "acknowledge", "resolve"];

/// Check an event locally before it is sent.
///
/// Every event needs a string `service_key` and an `event_type` from
/// [`EVENT_TYPES`]. Triggers need a `description`; the other types need a
/// string `incident_key`. `details` must be an object and `contexts` a list
/// when present.
pub fn validate(event: &Map<String, Value>) -> Result<(), Error> {
    require_string(event, "service_key")?;
    let event_type = require_string(event, "event_type")?;
    if !EVENT_TYPES.contains(&event_type) {
        return Err(Error::invalid_arguments(format!(
            "event_type '{event_type}' is not one of {}",
            EVENT_TYPES.join(", ")
        )));
    }

    if event_type == "trigger" {
        if !event.contains_key("description") {
            return Err(Error::invalid_arguments(
                "trigger events require a description",
            ));
        }
    } else {
        require_string(event, "incident_key")?;
    }

    if event.get("details").is_some_and(|v| !v.is_object()) {
        return Err(Error::invalid_arguments("event details must be an object"));
    }
    if event.get("contexts").is_some_and(|v| !v.is_array()) {
        return Err(Error::invalid_arguments("event contexts must be a list"));
    }
    Ok(())
}

fn require_string<'a>(event: &'a Map<String, Value>, field: &str) -> Result<&'a str, Error> {
    match event.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(Error::invalid_arguments(format!(
            "event {field} must be a string, got {other}"
        ))),
        None => Err(Error::invalid_arguments(format!("event requires {field}"))),
    }
}

/// `client` retargeted at the events host.
pub fn events_client(client: &ApiClient) -> Result<ApiClient, Error> {
    Ok(client.with_base_url(Url::parse(EVENTS_BASE_URL)?))
}

/// Validate, then send the event. Returns the server's acknowledgement
/// (`status`, `message`, `incident_key`).
pub fn create(client: &ApiClient, event: Map<String, Value>) -> Result<Map<String, Value>, Error> {
    validate(&event)?;
    let events = events_client(client)?;
    let response = events.post(CREATE_PATH, &RequestOptions::new().body(Value::Object(event)))?;
    let ack = response_object(response, CREATE_PATH)?;
    debug!(
        status = ?ack.get("status"),
        incident_key = ?ack.get("incident_key"),
        "event accepted"
    );
    Ok(ack)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pagerly_api::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::{Scripted, client};

    fn event(value: &Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn rejected(value: &Value) -> bool {
        matches!(validate(&event(value)), Err(Error::InvalidArguments { .. }))
    }

    #[test]
    fn trigger_with_description_is_valid() {
        let trigger = json!({
            "service_key": "SK1",
            "event_type": "trigger",
            "description": "disk full",
            "details": {"host": "db1"},
            "contexts": [{"type": "link", "href": "https://status.example"}],
        });
        assert!(validate(&event(&trigger)).is_ok());
    }

    #[test]
    fn missing_or_non_string_service_key() {
        assert!(rejected(&json!({"event_type": "trigger", "description": "x"})));
        assert!(rejected(&json!({"service_key": 7, "event_type": "trigger", "description": "x"})));
    }

    #[test]
    fn missing_or_unknown_event_type() {
        assert!(rejected(&json!({"service_key": "SK1", "description": "x"})));
        assert!(rejected(&json!({"service_key": "SK1", "event_type": "escalate"})));
    }

    #[test]
    fn trigger_requires_description() {
        assert!(rejected(&json!({"service_key": "SK1", "event_type": "trigger"})));
    }

    #[test]
    fn non_trigger_requires_string_incident_key() {
        assert!(rejected(&json!({"service_key": "SK1", "event_type": "resolve"})));
        assert!(rejected(&json!({
            "service_key": "SK1", "event_type": "acknowledge", "incident_key": 12,
        })));
        assert!(validate(&event(&json!({
            "service_key": "SK1", "event_type": "acknowledge", "incident_key": "IK1",
        })))
        .is_ok());
    }

    #[test]
    fn details_must_be_object() {
        assert!(rejected(&json!({
            "service_key": "SK1", "event_type": "trigger", "description": "x", "details": "db1",
        })));
    }

    #[test]
    fn contexts_must_be_list() {
        assert!(rejected(&json!({
            "service_key": "SK1", "event_type": "trigger", "description": "x", "contexts": {},
        })));
    }

    #[test]
    fn invalid_event_sends_nothing() {
        let (client, log) = client(Scripted::new());
        let result = create(&client, event(&json!({"event_type": "trigger"})));
        assert!(matches!(result, Err(Error::InvalidArguments { .. })));
        assert!(log.requests().is_empty());
    }

    #[test]
    fn create_posts_unwrapped_event_to_events_host() {
        let scripted = Scripted::new();
        scripted.push_json(
            200,
            &json!({"status": "success", "message": "Event processed", "incident_key": "IK1"}),
        );
        let (client, log) = client(scripted);

        let body = json!({"service_key": "SK1", "event_type": "trigger", "description": "disk full"});
        let ack = create(&client, event(&body)).unwrap();
        assert_eq!(ack.get("incident_key"), Some(&json!("IK1")));

        let sent = &log.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(
            sent.url.as_str(),
            "https://events.pagerduty.com/generic/2010-04-15/create_event.json"
        );
        assert_eq!(sent.body, Some(body));
    }
}
