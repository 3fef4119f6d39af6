//! Hosted database REST backend (PostgREST dialect)
//!
//! Listings are read through the project's REST endpoint
//! (`<url>/rest/v1/<table>`), authenticated with a service or anonymous key.
//! Filters are compiled into PostgREST's query-string operators:
//!
//! | Predicate | Query parameter |
//! |---|---|
//! | `equals` | `col=eq.value` |
//! | `contains_any` (one column) | `col=imatch.value` |
//! | `contains_any` (several) | `or=(a.imatch."value",b.imatch."value")` |
//! | `overlaps` | `col=ov.{"a","b"}` |
//! | `at_least` | `col=gte.4.5` |
//!
//! Substring terms go through `regex::escape`, so every character of the
//! term (including PostgREST's `*` wildcard) matches literally.
//! Several multi-column groups are combined as `and=(or(..),or(..))`.
//! The total comes from a `HEAD` request with `Prefer: count=exact`.

use crate::core::entity::Listing;
use crate::core::error::StoreError;
use crate::core::predicate::{Filter, Predicate};
use crate::core::query::{Page, SortKey};
use crate::core::store::ListingStore;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use std::marker::PhantomData;
use std::time::Duration;

const BACKEND: &str = "postgrest";

/// Upstream error bodies are truncated to this many characters in errors
const MAX_ERROR_BODY: usize = 500;

/// Build the HTTP client shared by all PostgREST stores
pub fn build_client(timeout: Duration) -> Result<Client, StoreError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| StoreError::Transport {
            backend: BACKEND,
            message: e.to_string(),
        })
}

/// Listing store backed by a PostgREST endpoint
pub struct PostgrestStore<T> {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    schema: Option<String>,
    _marker: PhantomData<T>,
}

impl<T> Clone for PostgrestStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            schema: self.schema.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Listing> PostgrestStore<T> {
    /// Create a store for `table` under the project at `base_url`
    ///
    /// `base_url` may be the project root or already end in `/rest/v1`.
    pub fn new(client: Client, base_url: &str, table: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let endpoint = if base.ends_with("/rest/v1") {
            format!("{}/{}", base, table)
        } else {
            format!("{}/rest/v1/{}", base, table)
        };
        Self {
            client,
            endpoint,
            api_key: None,
            schema: None,
            _marker: PhantomData,
        }
    }

    /// Authenticate requests with this key
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Read from a schema other than the default one
    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert("apikey", value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        if let Some(schema) = &self.schema {
            if let Ok(value) = HeaderValue::from_str(schema) {
                headers.insert("Accept-Profile", value);
            }
        }
        headers
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| StoreError::Transport {
                backend: BACKEND,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Upstream {
            backend: BACKEND,
            status: status.as_u16(),
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        })
    }

    async fn rows(&self, params: Vec<(String, String)>) -> Result<Vec<T>, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, ?params, "postgrest select");
        let response = self
            .send(self.client.get(&self.endpoint).query(&params))
            .await?;
        let body = response.bytes().await.map_err(|e| StoreError::Transport {
            backend: BACKEND,
            message: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| StoreError::Decode {
            backend: BACKEND,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl<T: Listing> ListingStore<T> for PostgrestStore<T> {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let params = filter_params(filter);
        tracing::debug!(endpoint = %self.endpoint, ?params, "postgrest count");
        let response = self
            .send(
                self.client
                    .head(&self.endpoint)
                    .query(&params)
                    .header("Prefer", "count=exact"),
            )
            .await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode {
                backend: BACKEND,
                message: "missing Content-Range header".to_string(),
            })?;
        content_range_total(range).ok_or_else(|| StoreError::Decode {
            backend: BACKEND,
            message: format!("unusable Content-Range header '{}'", range),
        })
    }

    async fn fetch(
        &self,
        filter: &Filter,
        order: &[SortKey],
        page: Page,
    ) -> Result<Vec<T>, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter_params(filter));
        if !order.is_empty() {
            params.push(("order".to_string(), order_param(order)));
        }
        params.push(("limit".to_string(), page.limit.to_string()));
        params.push(("offset".to_string(), page.offset.to_string()));
        self.rows(params).await
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<T>, StoreError> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            (field.to_string(), format!("eq.{}", value)),
            ("limit".to_string(), "1".to_string()),
        ];
        Ok(self.rows(params).await?.into_iter().next())
    }
}

/// Compile a filter into PostgREST query parameters
pub fn filter_params(filter: &Filter) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut groups = Vec::new();

    for predicate in filter.predicates() {
        match predicate {
            Predicate::Equals { field, value } => {
                params.push((field.to_string(), format!("eq.{}", value)));
            }
            Predicate::ContainsAny { fields, needle } => {
                let pattern = regex::escape(needle);
                match fields.as_slice() {
                    [field] => params.push((field.to_string(), format!("imatch.{}", pattern))),
                    _ => {
                        let quoted = quote(&pattern);
                        let alternatives: Vec<String> = fields
                            .iter()
                            .map(|field| format!("{}.imatch.{}", field, quoted))
                            .collect();
                        groups.push(alternatives.join(","));
                    }
                }
            }
            Predicate::Overlaps { field, tags } => {
                let items: Vec<String> = tags.iter().map(|t| quote(t)).collect();
                params.push((field.to_string(), format!("ov.{{{}}}", items.join(","))));
            }
            Predicate::AtLeast { field, bound } => {
                params.push((field.to_string(), format!("gte.{}", bound)));
            }
        }
    }

    match groups.len() {
        0 => {}
        1 => params.push(("or".to_string(), format!("({})", groups[0]))),
        _ => {
            let nested: Vec<String> = groups.iter().map(|g| format!("or({})", g)).collect();
            params.push(("and".to_string(), format!("({})", nested.join(","))));
        }
    }

    params
}

/// Compile a fixed ordering into the `order` parameter
pub fn order_param(order: &[SortKey]) -> String {
    order
        .iter()
        .map(|key| {
            let nulls = if key.nulls_last {
                ".nullslast"
            } else {
                ".nullsfirst"
            };
            format!("{}.{}{}", key.field, key.direction.as_str(), nulls)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Double-quote a value for use inside a logic tree or array literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Extract the total from `Content-Range: 0-11/42` or `*/42`
fn content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}
