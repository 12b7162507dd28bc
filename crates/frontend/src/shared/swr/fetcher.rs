use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::Value;
use thiserror::Error;

use super::key::Key;
use crate::shared::api_utils::api_url;

/// Failure of a single fetch. `Clone` so one in-flight result can be handed
/// to every coalesced subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Source of raw responses for cache keys
pub trait Fetcher {
    fn fetch(&self, key: &Key) -> LocalBoxFuture<'static, Result<Value, FetchError>>;
}

/// GET `{api_base}{key.url()}` and parse the body as JSON
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, key: &Key) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
        let url = api_url(&key.url());
        async move {
            let response = gloo_net::http::Request::get(&url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            if !response.ok() {
                return Err(FetchError::Status(response.status()));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| FetchError::Parse(e.to_string()))
        }
        .boxed_local()
    }
}

/// POST a JSON body and decode the JSON answer; used by bulk actions
pub async fn post_json<B, R>(path: &str, body: &B) -> Result<R, FetchError>
where
    B: serde::Serialize,
    R: for<'de> serde::Deserialize<'de>,
{
    let response = gloo_net::http::Request::post(&api_url(path))
        .json(body)
        .map_err(|e| FetchError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}
