// ── Resource handle ──
//
// A descriptor bound to a client and a collection path. All generic
// operations (find, fetch, create, delete) live here; pagination is in
// `paginate.rs`.

use serde_json::{Map, Value};
use tracing::debug;

use pagerly_api::{ApiClient, Error, Params, RequestOptions};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::query::{self, FindQuery};

/// One collection of one resource kind.
#[derive(Debug, Clone)]
pub struct Resource {
    client: ApiClient,
    descriptor: &'static ResourceDescriptor,
    endpoint: String,
}

impl Resource {
    /// Top-level collection, e.g. `/users`.
    pub fn new(client: &ApiClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self::at(client, descriptor, descriptor.endpoint)
    }

    /// Collection nested below `parent`, e.g. `incidents/P1` + `alerts`.
    pub fn nested(
        client: &ApiClient,
        descriptor: &'static ResourceDescriptor,
        parent: &str,
    ) -> Self {
        let parent = parent.trim_end_matches('/');
        Self::at(client, descriptor, format!("{parent}/{}", descriptor.endpoint))
    }

    /// Collection at an arbitrary path.
    pub fn at(
        client: &ApiClient,
        descriptor: &'static ResourceDescriptor,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client: client.clone(),
            descriptor,
            endpoint: endpoint.into(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ── Collection queries ───────────────────────────────────────────

    /// All matching entities across pages, minus client-side exclusions.
    pub fn find(&self, query: &FindQuery) -> Result<Vec<Entity>, Error> {
        self.descriptor.ensure_supported(Operation::Find)?;

        let params =
            query::translate_query_params(self.descriptor, query.query.as_deref(), &query.params);
        let entities = self.fetch_all(&params, query.page_size, query.maximum)?;
        let found = query::apply_exclusions(self.descriptor, entities, query.exclude.as_ref());

        debug!(endpoint = %self.endpoint, count = found.len(), "find complete");
        Ok(found)
    }

    /// The first matching entity, if any.
    ///
    /// Without exclusions only one item is requested.
    pub fn find_one(&self, query: &FindQuery) -> Result<Option<Entity>, Error> {
        let mut query = query.clone();
        if query.exclude.as_ref().is_none_or(query::Exclude::is_empty) {
            query.maximum = Some(1);
        }
        Ok(self.find(&query)?.into_iter().next())
    }

    // ── Single-entity operations ─────────────────────────────────────

    /// GET `endpoint/id`.
    pub fn fetch(&self, id: &str) -> Result<Entity, Error> {
        self.fetch_with(id, &Params::new())
    }

    /// Alias of [`fetch`](Self::fetch).
    pub fn read(&self, id: &str) -> Result<Entity, Error> {
        self.fetch(id)
    }

    /// GET `endpoint/id` with extra query parameters (e.g. `include[]`).
    pub fn fetch_with(&self, id: &str, params: &Params) -> Result<Entity, Error> {
        self.descriptor.ensure_supported(Operation::Fetch)?;
        let response = self.client.get(
            &self.entity_path(id),
            &RequestOptions::new().query(params.clone()),
        )?;
        let data = self.unwrap_entity(response)?;
        Ok(self.materialize_object(data))
    }

    /// POST `{singular: data}` to the collection.
    pub fn create(&self, data: Map<String, Value>) -> Result<Entity, Error> {
        self.create_with(data, &RequestOptions::new())
    }

    /// Like [`create`](Self::create), with extra headers or query.
    ///
    /// Any body already set on `options` is replaced.
    pub fn create_with(
        &self,
        data: Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Entity, Error> {
        self.descriptor.ensure_supported(Operation::Create)?;

        let mut body = Map::new();
        body.insert(self.descriptor.entity_key(), Value::Object(data));
        let options = options.clone().body(Value::Object(body));

        let response = self.client.post(&self.endpoint, &options)?;
        let created = self.unwrap_entity(response)?;
        let entity = self.materialize_object(created);
        debug!(endpoint = %self.endpoint, id = ?entity.id().ok(), "created");
        Ok(entity)
    }

    /// DELETE `endpoint/id`.
    pub fn delete(&self, id: &str) -> Result<bool, Error> {
        self.descriptor.ensure_supported(Operation::Delete)?;
        self.client
            .delete(&self.entity_path(id), &RequestOptions::new())?;
        debug!(endpoint = %self.endpoint, id, "deleted");
        Ok(true)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    pub(crate) fn entity_path(&self, id: &str) -> String {
        format!("{}/{id}", self.endpoint)
    }

    pub(crate) fn materialize(&self, value: Value) -> Result<Entity, Error> {
        Entity::materialize(&self.client, self.descriptor, &self.endpoint, value)
    }

    fn materialize_object(&self, data: Map<String, Value>) -> Entity {
        Entity::located(&self.client, self.descriptor, &self.endpoint, data)
    }

    /// Pull the single-entity payload out of a response.
    pub(crate) fn unwrap_entity(&self, response: Option<Value>) -> Result<Map<String, Value>, Error> {
        let mut body = response_object(response, &self.endpoint)?;
        let key = self.descriptor.entity_key();
        match self.descriptor.unwrap_response(&mut body, &key)? {
            Value::Object(data) => Ok(data),
            other => Err(Error::invalid_response(
                format!("'{key}' in response for {} is not an object", self.endpoint),
                other.to_string(),
            )),
        }
    }
}

/// The decoded body as an object; an empty or non-object body is invalid.
pub(crate) fn response_object(
    response: Option<Value>,
    endpoint: &str,
) -> Result<Map<String, Value>, Error> {
    match response {
        Some(Value::Object(body)) => Ok(body),
        Some(other) => Err(Error::invalid_response(
            format!("response for {endpoint} is not an object"),
            other.to_string(),
        )),
        None => Err(Error::invalid_response(
            format!("empty response for {endpoint}"),
            String::new(),
        )),
    }
}
