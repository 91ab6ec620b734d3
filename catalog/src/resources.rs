use crate::client::{UpstreamClient, UpstreamError};
use crate::config::UpstreamConfig;
use serde_json::{Map, Value};
use std::fmt;

/// The three collections exposed by the catalog API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Character,
    Episode,
    Location,
}

impl Resource {
    pub const fn path(self) -> &'static str {
        match self {
            Resource::Character => "character",
            Resource::Episode => "episode",
            Resource::Location => "location",
        }
    }
}

/// Maps resource lookups onto catalog API URLs.
#[derive(Clone)]
pub struct CatalogApi {
    client: UpstreamClient,
    base_url: String,
}

impl CatalogApi {
    pub fn new(client: UpstreamClient, config: &UpstreamConfig) -> Self {
        CatalogApi {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn list_url(&self, resource: Resource, page: impl fmt::Display) -> String {
        format!("{}/{}?page={page}", self.base_url, resource.path())
    }

    pub fn item_url(&self, resource: Resource, id: impl fmt::Display) -> String {
        format!("{}/{}/{id}", self.base_url, resource.path())
    }

    /// One page of a collection, exactly as the catalog API returns it.
    pub async fn list(
        &self,
        resource: Resource,
        page: impl fmt::Display,
    ) -> Result<Value, UpstreamError> {
        self.client.get_json(&self.list_url(resource, page)).await
    }

    pub async fn get(
        &self,
        resource: Resource,
        id: impl fmt::Display,
    ) -> Result<Value, UpstreamError> {
        self.client.get_json(&self.item_url(resource, id)).await
    }

    /// Follows `record.<relation>.url`.
    ///
    /// An absent or empty URL means the relation is unknown; no request is made
    /// and an empty object stands in for it.
    pub async fn related(&self, record: &Value, relation: &str) -> Result<Value, UpstreamError> {
        match relation_url(record, relation) {
            Some(url) => self.client.get_json(url).await,
            None => Ok(Value::Object(Map::new())),
        }
    }
}

fn relation_url<'a>(record: &'a Value, relation: &str) -> Option<&'a str> {
    record
        .get(relation)
        .and_then(|r| r.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}
