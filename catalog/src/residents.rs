//! Resident fan-out for the location detail page.
//!
//! A location record lists its residents as character URLs. Each one is
//! fetched and projected into a [`ResidentSummary`]. Lookups run concurrently
//! up to a configured limit, but the summaries come back in the order the
//! location lists them, and the first failed lookup fails the whole page.

use crate::client::UpstreamClient;
use crate::errors::CatalogError;
use crate::metrics_defs::RESIDENTS_FANOUT_SIZE;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The part of a character record shown in a location's resident table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResidentSummary {
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Species")]
    pub species: String,
    #[serde(rename = "Status")]
    pub status: String,
    pub url: String,
}

impl TryFrom<&Value> for ResidentSummary {
    type Error = CatalogError;

    fn try_from(record: &Value) -> Result<Self, Self::Error> {
        let text = |field: &'static str| {
            record
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(CatalogError::MalformedRecord { field })
        };

        Ok(ResidentSummary {
            id: record
                .get("id")
                .and_then(Value::as_u64)
                .ok_or(CatalogError::MalformedRecord { field: "id" })?,
            name: text("name")?,
            species: text("species")?,
            status: text("status")?,
            url: text("url")?,
        })
    }
}

/// Resident URLs of a location, in listed order. Empty entries are unset
/// references and are left out.
pub fn resident_urls(location: &Value) -> Vec<String> {
    location
        .get("residents")
        .and_then(Value::as_array)
        .map(|residents| {
            residents
                .iter()
                .filter_map(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Fetches every resident of `location`, at most `max_concurrency` at a time.
pub async fn fetch_residents(
    client: &UpstreamClient,
    location: &Value,
    max_concurrency: usize,
) -> Result<Vec<ResidentSummary>, CatalogError> {
    let urls = resident_urls(location);
    shared::histogram!(RESIDENTS_FANOUT_SIZE).record(urls.len() as f64);

    let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (index, url) in urls.iter().cloned().enumerate() {
        let client = client.clone();
        let permits = permits.clone();

        join_set.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| CatalogError::Internal(format!("fan-out semaphore closed: {e}")))?;
            let record = client.get_json(&url).await?;
            let summary = ResidentSummary::try_from(&record)?;
            Ok::<_, CatalogError>((index, summary))
        });
    }

    // Completion order is arbitrary; slot each summary back at its input index
    let mut slots: Vec<Option<ResidentSummary>> = vec![None; urls.len()];

    while let Some(join_result) = join_set.join_next().await {
        let outcome = match join_result {
            Ok(outcome) => outcome,
            Err(e) => Err(CatalogError::Internal(format!("resident task failed: {e}"))),
        };

        match outcome {
            Ok((index, summary)) => slots[index] = Some(summary),
            Err(e) => {
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| CatalogError::Internal("resident lookup lost".into())))
        .collect()
}
