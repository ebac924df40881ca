// ── Entity ──
//
// One materialized resource instance. The backing data is an immutable
// snapshot swapped as a whole on every mutation; the entity also keeps the
// client it was fetched with so instance-level calls reuse its credentials.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use pagerly_api::{ApiClient, Error, Method, QueryValue, Reference, RequestOptions};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::resource::Resource;

/// A resource instance backed by a server-returned JSON object.
#[derive(Debug, Clone)]
pub struct Entity {
    client: ApiClient,
    descriptor: &'static ResourceDescriptor,
    /// Collection path this entity lives under, e.g. `incidents/P1/alerts`.
    endpoint: String,
    data: Option<Arc<Map<String, Value>>>,
    deleted: bool,
}

impl Entity {
    // ── Construction ─────────────────────────────────────────────────

    /// An entity with no backing data yet.
    pub fn uninitialized(client: &ApiClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            client: client.clone(),
            descriptor,
            endpoint: descriptor.endpoint.to_owned(),
            data: None,
            deleted: false,
        }
    }

    /// Wrap raw data without contacting the server.
    pub fn from_data(
        client: &ApiClient,
        descriptor: &'static ResourceDescriptor,
        data: Map<String, Value>,
    ) -> Self {
        let mut entity = Self::uninitialized(client, descriptor);
        entity.data = Some(Arc::new(data));
        entity
    }

    pub(crate) fn located(
        client: &ApiClient,
        descriptor: &'static ResourceDescriptor,
        endpoint: &str,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            client: client.clone(),
            descriptor,
            endpoint: endpoint.to_owned(),
            data: Some(Arc::new(data)),
            deleted: false,
        }
    }

    pub(crate) fn materialize(
        client: &ApiClient,
        descriptor: &'static ResourceDescriptor,
        endpoint: &str,
        value: Value,
    ) -> Result<Self, Error> {
        match value {
            Value::Object(data) => Ok(Self::located(client, descriptor, endpoint, data)),
            other => Err(Error::invalid_response(
                format!("{} item is not an object", descriptor.endpoint),
                other.to_string(),
            )),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The entity's identifier.
    ///
    /// Fails with `Uninitialized` before a snapshot is assigned.
    pub fn id(&self) -> Result<&str, Error> {
        let data = self.require_data()?;
        data.get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing_field("id"))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.as_deref().and_then(|d| d.get(field))
    }

    /// Like [`get`](Self::get), but a missing field is an error.
    pub fn field(&self, field: &str) -> Result<&Value, Error> {
        self.require_data()?
            .get(field)
            .ok_or_else(|| self.missing_field(field))
    }

    /// Follow a dotted path through nested objects, e.g. `"user.id"`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_deref()
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Option<Arc<Map<String, Value>>> {
        self.data.clone()
    }

    /// The snapshot as a JSON value (`null` when uninitialized).
    pub fn to_json(&self) -> Value {
        self.data
            .as_deref()
            .map_or(Value::Null, |d| Value::Object(d.clone()))
    }

    /// Deserialize the snapshot into a caller-defined type.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let data = self.require_data()?;
        T::deserialize(Value::Object(data.clone())).map_err(|e| {
            Error::invalid_response(
                format!("{} does not match the requested type: {e}", self.kind()),
                Value::Object(data.clone()).to_string(),
            )
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `endpoint/id`.
    pub fn path(&self) -> Result<String, Error> {
        Ok(format!("{}/{}", self.endpoint, self.id()?))
    }

    /// A reference to this entity for use as a query or body value.
    pub fn reference(&self) -> Reference {
        Reference::Entity(self.data.clone().unwrap_or_default())
    }

    /// `true` if this entity was built for `descriptor`.
    pub fn is_kind(&self, descriptor: &ResourceDescriptor) -> bool {
        std::ptr::eq(self.descriptor, descriptor)
    }

    fn kind(&self) -> String {
        self.descriptor.kind()
    }

    fn require_data(&self) -> Result<&Map<String, Value>, Error> {
        self.data.as_deref().ok_or_else(|| Error::Uninitialized {
            resource: self.kind(),
        })
    }

    fn missing_field(&self, field: &str) -> Error {
        Error::MissingField {
            resource: self.kind(),
            field: field.to_owned(),
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Swap in a new snapshot.
    pub(crate) fn replace(&mut self, data: Map<String, Value>) {
        self.data = Some(Arc::new(data));
    }

    /// Fail if this instance was deleted.
    pub(crate) fn ensure_live(&self) -> Result<(), Error> {
        if self.deleted {
            return Err(Error::Deleted {
                resource: self.kind(),
                id: self.id().unwrap_or("<unknown>").to_owned(),
            });
        }
        Ok(())
    }

    /// Fail unless this entity is of the given kind.
    pub(crate) fn ensure_kind(&self, descriptor: &ResourceDescriptor) -> Result<(), Error> {
        if self.is_kind(descriptor) {
            Ok(())
        } else {
            Err(Error::invalid_arguments(format!(
                "expected a {} entity, got {}",
                descriptor.kind(),
                self.kind()
            )))
        }
    }

    /// The collection handle this entity belongs to.
    pub fn resource(&self) -> Resource {
        Resource::at(&self.client, self.descriptor, self.endpoint.clone())
    }

    /// Issue a request below this entity's path (`endpoint/id[/suffix]`).
    pub(crate) fn request(
        &self,
        method: Method,
        suffix: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Option<Value>, Error> {
        let path = match suffix {
            Some(suffix) => format!("{}/{suffix}", self.path()?),
            None => self.path()?,
        };
        self.client.request(method, &path, options)
    }

    /// Replace the snapshot with the entity wrapped in `response`.
    ///
    /// A response without the singular wrapper is `InvalidResponse` and
    /// leaves the snapshot untouched.
    pub(crate) fn absorb(&mut self, response: Option<Value>) -> Result<(), Error> {
        let data = self.resource().unwrap_entity(response)?;
        self.replace(data);
        Ok(())
    }

    /// Delete this entity on the server and mark the instance deleted.
    pub fn remove(&mut self) -> Result<bool, Error> {
        self.descriptor.ensure_supported(Operation::Delete)?;
        self.ensure_live()?;
        let id = self.id()?.to_owned();
        let removed = self.resource().delete(&id)?;
        self.deleted = true;
        Ok(removed)
    }

    /// PUT `data` and replace the snapshot with the server's answer.
    pub fn update(&mut self, data: Map<String, Value>) -> Result<(), Error> {
        self.descriptor.ensure_supported(Operation::Update)?;
        self.ensure_live()?;

        let key = self.descriptor.entity_key();
        let mut body = Map::new();
        body.insert(key.clone(), Value::Object(data));

        let response = self.request(
            Method::PUT,
            None,
            &RequestOptions::new().body(Value::Object(body)),
        )?;
        self.absorb(response)
    }

    /// Re-fetch and replace the snapshot.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.ensure_live()?;
        let id = self.id()?.to_owned();
        let fresh = self.resource().fetch(&id)?;
        self.data = fresh.data;
        Ok(())
    }
}

impl From<&Entity> for Reference {
    fn from(entity: &Entity) -> Self {
        entity.reference()
    }
}

impl From<&Entity> for QueryValue {
    fn from(entity: &Entity) -> Self {
        QueryValue::Ref(entity.reference())
    }
}

impl Serialize for Entity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.data.as_deref() {
            Some(data) => data.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        if self.id().is_err() && self.descriptor.display_fields.contains(&"id") {
            return write!(f, "<{kind} uninitialized>");
        }

        write!(f, "<{kind}")?;
        for field in self.descriptor.display_fields {
            match self.lookup(field) {
                Some(Value::String(s)) => write!(f, " {field}={s}")?,
                Some(other) => write!(f, " {field}={other}")?,
                None => {}
            }
        }
        if self.deleted {
            write!(f, " deleted")?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::test_support::{Scripted, client};

    static USERS: ResourceDescriptor =
        ResourceDescriptor::new("users").display_fields(&["id", "email"]);
    static ONCALLS: ResourceDescriptor =
        ResourceDescriptor::new("oncalls").display_fields(&["escalation_level", "user.id"]);

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn id_fails_before_snapshot() {
        let (client, _) = client(Scripted::new());
        let entity = Entity::uninitialized(&client, &USERS);

        assert!(matches!(entity.id(), Err(Error::Uninitialized { .. })));
        assert!(!entity.is_initialized());
        assert_eq!(entity.to_string(), "<user uninitialized>");
    }

    #[test]
    fn missing_id_is_reported() {
        let (client, _) = client(Scripted::new());
        let entity = Entity::from_data(&client, &USERS, object(json!({"name": "x"})));
        assert!(matches!(
            entity.id(),
            Err(Error::MissingField { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn round_trip_preserves_nested_fields() {
        let (client, _) = client(Scripted::new());
        let raw = json!({
            "id": "PUSER01",
            "email": "ada@example.com",
            "contact_methods": [{"id": "PC1", "type": "email_contact_method_reference"}],
            "teams": [],
            "meta": {"nested": {"deep": [1, 2, 3]}},
        });
        let entity = Entity::from_data(&client, &USERS, object(raw.clone()));

        assert_eq!(entity.to_json(), raw);
        for (key, value) in raw.as_object().unwrap() {
            assert_eq!(entity.get(key), Some(value));
        }
        assert_eq!(serde_json::to_value(&entity).unwrap(), raw);
    }

    #[test]
    fn lookup_follows_dotted_paths() {
        let (client, _) = client(Scripted::new());
        let entity = Entity::from_data(
            &client,
            &ONCALLS,
            object(json!({"escalation_level": 1, "user": {"id": "PUSER01"}})),
        );

        assert_eq!(entity.lookup("user.id"), Some(&json!("PUSER01")));
        assert_eq!(entity.lookup("user.name"), None);
        assert_eq!(entity.to_string(), "<oncall escalation_level=1 user.id=PUSER01>");
    }

    #[test]
    fn display_shows_configured_fields() {
        let (client, _) = client(Scripted::new());
        let entity = Entity::from_data(
            &client,
            &USERS,
            object(json!({"id": "PUSER01", "email": "ada@example.com", "name": "Ada"})),
        );
        assert_eq!(entity.to_string(), "<user id=PUSER01 email=ada@example.com>");
    }

    #[test]
    fn to_typed_deserializes_snapshot() {
        #[derive(Deserialize)]
        struct User {
            id: String,
            email: String,
        }

        let (client, _) = client(Scripted::new());
        let entity = Entity::from_data(
            &client,
            &USERS,
            object(json!({"id": "PUSER01", "email": "ada@example.com"})),
        );
        let user: User = entity.to_typed().unwrap();
        assert_eq!(user.id, "PUSER01");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn remove_marks_instance_deleted_and_blocks_mutation() {
        let scripted = Scripted::new();
        scripted.push(204, "");
        let (client, log) = client(scripted);

        let mut entity = Entity::from_data(&client, &USERS, object(json!({"id": "PUSER01"})));
        assert!(entity.remove().unwrap());
        assert!(entity.is_deleted());

        assert!(matches!(entity.remove(), Err(Error::Deleted { .. })));
        assert!(matches!(
            entity.update(Map::new()),
            Err(Error::Deleted { .. })
        ));
        assert_eq!(log.requests().len(), 1);
        assert_eq!(log.requests()[0].method, Method::DELETE);
        assert_eq!(log.requests()[0].url.path(), "/users/PUSER01");
    }

    #[test]
    fn update_replaces_snapshot() {
        let scripted = Scripted::new();
        scripted.push_json(200, &json!({"user": {"id": "PUSER01", "name": "Grace"}}));
        let (client, log) = client(scripted);

        let mut entity = Entity::from_data(
            &client,
            &USERS,
            object(json!({"id": "PUSER01", "name": "Ada", "email": "ada@example.com"})),
        );
        let before = entity.snapshot().unwrap();
        entity.update(object(json!({"name": "Grace"}))).unwrap();

        assert_eq!(entity.get("name"), Some(&json!("Grace")));
        assert_eq!(entity.get("email"), None);
        assert_eq!(before["name"], json!("Ada"));

        let sent = &log.requests()[0];
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.body, Some(json!({"user": {"name": "Grace"}})));
    }

    #[test]
    fn update_without_wrapper_is_invalid_response() {
        let scripted = Scripted::new();
        scripted.push_json(200, &json!({"ok": true}));
        let (client, _) = client(scripted);

        let mut entity = Entity::from_data(&client, &USERS, object(json!({"id": "PUSER01"})));
        assert!(matches!(
            entity.update(Map::new()),
            Err(Error::InvalidResponse { .. })
        ));
        assert_eq!(entity.id().unwrap(), "PUSER01");
    }

    #[test]
    fn refresh_swaps_snapshot() {
        let scripted = Scripted::new();
        scripted.push_json(200, &json!({"user": {"id": "PUSER01", "name": "Fresh"}}));
        let (client, _) = client(scripted);

        let mut entity = Entity::from_data(&client, &USERS, object(json!({"id": "PUSER01"})));
        entity.refresh().unwrap();
        assert_eq!(entity.get("name"), Some(&json!("Fresh")));
    }

    #[test]
    fn reference_resolves_to_id() {
        let (client, _) = client(Scripted::new());
        let entity = Entity::from_data(&client, &USERS, object(json!({"id": "PUSER01"})));
        assert_eq!(Reference::from(&entity).id().unwrap(), "PUSER01");
    }
}
