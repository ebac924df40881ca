// Notifications sent to users, queried over a bounded time window.

use chrono::{DateTime, Duration, Utc};

use pagerly_api::{ApiClient, Error};

use crate::descriptor::{Operation, ResourceDescriptor};
use crate::entity::Entity;
use crate::query::FindQuery;
use crate::resource::Resource;

const DISABLED: &[Operation] = &[
    Operation::Fetch,
    Operation::Create,
    Operation::Update,
    Operation::Delete,
];
const DISPLAY: &[&str] = &["id", "type", "started_at"];

pub static NOTIFICATIONS: ResourceDescriptor = ResourceDescriptor::new("notifications")
    .exclude_filters(&[])
    .disable(DISABLED)
    .display_fields(DISPLAY);

/// Longest window the API accepts.
pub const MAX_WINDOW_DAYS: i64 = 30;

/// Optional bounds; `until` defaults to now and `since` to 30 days before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl Window {
    /// Fill in defaults relative to `now` and validate the span.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), Error> {
        let max = Duration::days(MAX_WINDOW_DAYS);
        let until = self.until.unwrap_or(now);
        let since = self.since.unwrap_or(until - max);

        if since > until {
            return Err(Error::invalid_arguments(format!(
                "notification window starts after it ends ({since} > {until})"
            )));
        }
        if until - since > max {
            return Err(Error::invalid_arguments(format!(
                "notification window exceeds {MAX_WINDOW_DAYS} days"
            )));
        }
        Ok((since, until))
    }
}

pub fn notifications(client: &ApiClient) -> Resource {
    Resource::new(client, &NOTIFICATIONS)
}

/// Find notifications inside `window`; `since`/`until` in `query` are replaced.
pub fn find(client: &ApiClient, window: &Window, query: &FindQuery) -> Result<Vec<Entity>, Error> {
    let (since, until) = window.resolve(Utc::now())?;
    let query = query
        .clone()
        .param("since", since)
        .param("until", until);
    notifications(client).find(&query)
}
