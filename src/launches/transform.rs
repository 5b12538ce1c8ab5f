//! Join, transform and paginate.
//!
//! Upstream bodies arrive as untyped JSON and are decoded here, so a shape
//! mismatch surfaces as a [`TransformError`] rather than an upstream failure.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::launches::model::{Launch, PayloadSummary, Rocket, RocketSummary, TransformedLaunch};
use crate::launches::query::Page;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unexpected {resource} payload shape: {source}")]
    Shape {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode an upstream list body into typed records.
pub fn decode_list<T: DeserializeOwned>(
    resource: &'static str,
    body: Value,
) -> Result<Vec<T>, TransformError> {
    serde_json::from_value(body).map_err(|source| TransformError::Shape { resource, source })
}

/// Index rockets by id. A repeated id keeps the last record.
pub fn index_rockets(rockets: Vec<Rocket>) -> HashMap<String, RocketSummary> {
    rockets
        .into_iter()
        .map(|rocket| (rocket.rocket_id.clone(), RocketSummary::from(rocket)))
        .collect()
}

/// Join each launch to its rocket and simplify its payloads, preserving order.
pub fn transform_launches(launches: Vec<Launch>, rockets: Vec<Rocket>) -> Vec<TransformedLaunch> {
    let rockets = index_rockets(rockets);

    launches
        .into_iter()
        .map(|launch| TransformedLaunch {
            flight_number: launch.flight_number,
            mission_name: launch.mission_name,
            rocket: rockets.get(&launch.rocket.rocket_id).cloned(),
            payloads: launch
                .rocket
                .second_stage
                .payloads
                .into_iter()
                .map(PayloadSummary::from)
                .collect(),
        })
        .collect()
}

/// Contiguous `[offset, offset + limit)` slice; an offset past the end is empty.
pub fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}
