// Scripted transport for unit tests: replays queued responses in order and
// records every request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::Value;
use url::Url;

use pagerly_api::{ApiClient, ApiRequest, Error, RawResponse, Transport};

#[derive(Default)]
pub(crate) struct Scripted {
    responses: Mutex<VecDeque<(u16, String)>>,
    seen: Mutex<Vec<ApiRequest>>,
}

#[allow(clippy::unwrap_used)]
impl Scripted {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_owned()));
    }

    pub(crate) fn push_json(&self, status: u16, body: &Value) {
        self.push(status, &body.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
impl Transport for Scripted {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, Error> {
        self.seen.lock().unwrap().push(request.clone());
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.url));
        Ok(RawResponse {
            status,
            url: request.url.clone(),
            body,
        })
    }
}

/// A keyed client over `scripted`, plus a handle for inspecting requests.
#[allow(clippy::unwrap_used)]
pub(crate) fn client(scripted: Scripted) -> (ApiClient, Arc<Scripted>) {
    let scripted = Arc::new(scripted);
    let client = ApiClient::with_transport(
        Some(Url::parse("https://api.example.test").unwrap()),
        Some(SecretString::from("TEST_KEY".to_string())),
        Arc::clone(&scripted) as Arc<dyn Transport>,
    );
    (client, scripted)
}

/// Query pairs of a recorded request whose key is `key`.
pub(crate) fn query_values<'a>(request: &'a ApiRequest, key: &str) -> Vec<&'a str> {
    request
        .query
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}
