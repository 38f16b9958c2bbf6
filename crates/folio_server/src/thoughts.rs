//! Thoughts feed proxy
//!
//! `GET /api/thoughts` fetches the configured remote JSON endpoint once per
//! request. Failures never surface as an error status: the feed degrades
//! to an empty list with the error message attached.

use crate::app::AppState;
use crate::config::ThoughtsConfig;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Thoughts fetch errors
#[derive(Error, Debug)]
pub enum ThoughtsError {
    #[error("Thoughts feed is not configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Invalid feed data: {0}")]
    Decode(String),
}

/// One short post
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Thought {
    pub date: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Parse the remote rows, skipping any without a date or text
pub fn parse_rows(rows: Value) -> Result<Vec<Thought>, ThoughtsError> {
    let Value::Array(rows) = rows else {
        return Err(ThoughtsError::Decode("expected an array of rows".into()));
    };

    let mut thoughts: Vec<Thought> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<Thought>(row) {
            Ok(t) if !t.text.trim().is_empty() => Some(t),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Skipping thought row: {}", e);
                None
            }
        })
        .collect();

    // ISO dates sort lexically; newest first
    thoughts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(thoughts)
}

pub async fn fetch_thoughts(
    client: &reqwest::Client,
    config: &ThoughtsConfig,
) -> Result<Vec<Thought>, ThoughtsError> {
    let url = config.url.as_deref().ok_or(ThoughtsError::NotConfigured)?;

    let response = client
        .get(url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ThoughtsError::Status(status.as_u16()));
    }

    let rows: Value = response
        .json()
        .await
        .map_err(|e| ThoughtsError::Decode(e.to_string()))?;
    parse_rows(rows)
}

pub async fn handle_thoughts(State(state): State<AppState>) -> Json<Value> {
    match fetch_thoughts(&state.client, &state.config.thoughts).await {
        Ok(thoughts) => {
            tracing::debug!(count = thoughts.len(), "thoughts fetched");
            Json(json!({ "thoughts": thoughts }))
        }
        Err(e) => {
            tracing::warn!("Thoughts feed unavailable: {}", e);
            Json(json!({ "thoughts": [], "error": e.to_string() }))
        }
    }
}
