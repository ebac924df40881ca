// ── Pagination ──
//
// Offset/limit paging over a collection. A page continues while the server
// says `more: true`; when `more` is absent the `offset + limit < total` rule
// applies; with neither signal paging stops after the first page. An empty
// page always ends the walk, whatever the server claims.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use pagerly_api::{Error, Params, RequestOptions};

use crate::entity::Entity;
use crate::resource::{Resource, response_object};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page size, defaulted and clamped to the accepted range.
pub fn clamp_page_size(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Pagination metadata returned next to a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub total: Option<u64>,
    pub more: Option<bool>,
    /// Any other top-level keys the server sent.
    pub extra: Map<String, Value>,
}

impl PageMeta {
    /// Split the known paging keys out of what remains of a list response.
    pub fn from_body(mut body: Map<String, Value>) -> Self {
        Self {
            limit: body.remove("limit").as_ref().and_then(Value::as_u64),
            offset: body.remove("offset").as_ref().and_then(Value::as_u64),
            total: body.remove("total").as_ref().and_then(Value::as_u64),
            more: body.remove("more").as_ref().and_then(Value::as_bool),
            extra: body,
        }
    }

    /// Whether another page should be requested.
    ///
    /// `more` is authoritative when present. `requested_limit` stands in for
    /// a missing `limit`.
    pub fn has_more(&self, requested_limit: u32) -> bool {
        if let Some(more) = self.more {
            return more;
        }
        match (self.offset, self.total) {
            (Some(offset), Some(total)) => {
                let limit = self.limit.unwrap_or(u64::from(requested_limit));
                offset.saturating_add(limit) < total
            }
            _ => false,
        }
    }
}

/// One page of entities.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Entity>,
    pub meta: PageMeta,
}

impl Resource {
    /// GET one page at `offset`.
    ///
    /// `limit` and `offset` in `params` are overridden.
    pub fn fetch_page(
        &self,
        params: &Params,
        offset: u64,
        page_size: Option<u32>,
    ) -> Result<Page, Error> {
        let limit = clamp_page_size(page_size);
        let mut params = params.clone();
        params.insert("limit", limit);
        params.insert("offset", offset);

        let response = self
            .client()
            .get(self.endpoint(), &RequestOptions::new().query(params))?;
        let mut body = response_object(response, self.endpoint())?;

        let key = self.descriptor().collection_key();
        let items = match self.descriptor().unwrap_response(&mut body, &key)? {
            Value::Array(items) => items,
            other => {
                return Err(Error::invalid_response(
                    format!("'{key}' in response for {} is not a list", self.endpoint()),
                    other.to_string(),
                ));
            }
        };
        let items = items
            .into_iter()
            .map(|item| self.materialize(item))
            .collect::<Result<Vec<_>, _>>()?;
        let meta = PageMeta::from_body(body);

        trace!(
            endpoint = self.endpoint(),
            offset,
            limit,
            received = items.len(),
            more = ?meta.more,
            total = ?meta.total,
            "page received"
        );
        Ok(Page { items, meta })
    }

    /// Walk every page, stopping at `maximum` items if given.
    ///
    /// Any failing page fails the whole call; no partial results.
    pub fn fetch_all(
        &self,
        params: &Params,
        page_size: Option<u32>,
        maximum: Option<usize>,
    ) -> Result<Vec<Entity>, Error> {
        let page_size = clamp_page_size(page_size);
        let mut items = Vec::new();
        let mut offset = 0_u64;

        loop {
            let limit = match maximum {
                Some(max) => {
                    let remaining = max.saturating_sub(items.len());
                    if remaining == 0 {
                        break;
                    }
                    page_size.min(u32::try_from(remaining).unwrap_or(u32::MAX))
                }
                None => page_size,
            };

            let page = self.fetch_page(params, offset, Some(limit))?;
            let received = page.items.len();
            items.extend(page.items);

            if received == 0 || !page.meta.has_more(limit) {
                break;
            }
            offset = offset.saturating_add(u64::from(limit));
        }

        if let Some(max) = maximum {
            items.truncate(max);
        }
        debug!(endpoint = self.endpoint(), count = items.len(), "pagination complete");
        Ok(items)
    }
}
