//! Push endpoint handler and pipeline orchestration.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use log::{debug, error, info, warn};

use super::stage::Stage;
use super::AppState;
use crate::config::{MAX_ENVELOPE_SIZE, MAX_LOG_SUBJECT_CHARS};
use crate::envelope::{decode_payload, parse_envelope};
use crate::error_handling::PipelineError;
use crate::fetch::Fetcher;
use crate::outcome::FetchOutcome;
use crate::request::parse_and_validate;

/// Handles one push delivery.
///
/// Always answers 200 so the subscription never redelivers because of
/// something that went wrong here; failures are published as failure
/// outcomes and logged instead.
///
/// Fetching and publishing run on a spawned task. If the push connection
/// drops before the answer is written, the task still runs to completion and
/// the outcome is still published exactly once.
pub async fn push_handler(State(state): State<AppState>, method: Method, body: Body) -> StatusCode {
    let input = if method != Method::POST {
        Err(PipelineError::InvalidMethod {
            method: method.to_string(),
        })
    } else {
        axum::body::to_bytes(body, MAX_ENVELOPE_SIZE)
            .await
            .map_err(|e| PipelineError::BodyRead {
                detail: e.to_string(),
            })
    };

    if let Err(e) = tokio::spawn(handle_delivery(state, input)).await {
        error!("Push handling task did not complete: {}", e);
    }
    StatusCode::OK
}

/// Produces and publishes the outcome for one delivery.
async fn handle_delivery(state: AppState, input: Result<Bytes, PipelineError>) {
    let outcome = match input {
        Ok(bytes) => process_envelope(&state.fetcher, &bytes).await,
        Err(err) => failure_outcome(err),
    };

    let delivery = state.publisher.publish(&outcome).await;
    debug!(
        "Outcome for {:?} {} ({:?}), {}",
        truncate_for_log(outcome.url()),
        Stage::Published,
        delivery,
        Stage::Acknowledged
    );
}

/// Runs the pipeline over a raw push body and always yields an outcome.
pub async fn process_envelope(fetcher: &Fetcher, body: &[u8]) -> FetchOutcome {
    match run_pipeline(fetcher, body).await {
        Ok(outcome) => outcome,
        Err(err) => failure_outcome(err),
    }
}

/// Decode, validate, fetch and classify.
///
/// # Errors
///
/// Returns the first `PipelineError` hit; later stages are skipped.
pub async fn run_pipeline(fetcher: &Fetcher, body: &[u8]) -> Result<FetchOutcome, PipelineError> {
    let envelope = parse_envelope(body)?;
    let data = decode_payload(&envelope)?;
    debug!(
        "Message {} from {} {}",
        envelope.message.message_id,
        envelope.subscription,
        Stage::Decoded
    );

    let request = parse_and_validate(&data)?;
    debug!("Request for {} {}", request.url, Stage::Validated);

    let response = fetcher.fetch(&request.url).await?;
    debug!("Status {} from {} {}", response.status, request.url, Stage::Fetched);
    let outcome = FetchOutcome::from_response(response);

    let json = outcome
        .to_json()
        .map_err(|source| PipelineError::Serialization {
            url: request.url.clone(),
            source,
        })?;
    info!("Processed Response: {}", json);

    Ok(outcome)
}

fn failure_outcome(err: PipelineError) -> FetchOutcome {
    log_pipeline_error(&err);
    FetchOutcome::from_error(&err)
}

fn log_pipeline_error(err: &PipelineError) {
    let subject = truncate_for_log(err.subject());
    let reached = err.stage();
    let step = match reached.next() {
        Some(next) => format!("{} -> {}", reached, next),
        None => reached.to_string(),
    };
    match err.detail() {
        Some(detail) => warn!("{} at {}: {}. Subject: {:?}", err, step, detail, subject),
        None => warn!("{} at {}. Subject: {:?}", err, step, subject),
    }
}

/// Cuts long subjects (raw bodies, blobs) down for log lines.
fn truncate_for_log(value: &str) -> String {
    let mut chars = value.chars();
    let kept: String = chars.by_ref().take(MAX_LOG_SUBJECT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}... (truncated from {} bytes)", kept, value.len())
    } else {
        kept
    }
}
