//! Generic entity engine over the PagerDuty v2 REST API.
//!
//! Every resource kind is a static [`ResourceDescriptor`]; one generic
//! [`Resource`] handle runs the shared operations against it:
//!
//! - **Pagination** ([`Resource::fetch_all`]): offset/limit paging that trusts
//!   the server's `more` flag, falls back to `offset + limit < total`, and
//!   honours an optional maximum.
//! - **Queries** ([`FindQuery`]): alias parameters collapsed onto `query`,
//!   plus client-side exclusion by field or predicate.
//! - **Entities** ([`Entity`]): immutable JSON snapshots with the client they
//!   were fetched with; mutations swap the snapshot as a whole.
//!
//! Kind-specific actions (resolving incidents, adding team members, ...) live
//! in [`resources`].

pub mod descriptor;
pub mod entity;
pub mod paginate;
pub mod query;
pub mod resource;
pub mod resources;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use descriptor::{
    ExcludeFilter, ExcludePredicate, Operation, ResourceDescriptor, UnwrapFn, pluralize,
    singularize,
};
pub use entity::Entity;
pub use paginate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE, Page, PageMeta, clamp_page_size};
pub use query::{Exclude, FindQuery, translate_query_params};
pub use resource::Resource;

pub use pagerly_api::{
    ApiClient, ClientConfig, Defaults, Error, Params, QueryValue, Reference, RequestOptions,
    TlsMode, TransportConfig, init_defaults,
};
