//! Outcome publishing.
//!
//! Every handled push produces exactly one publish attempt. Without a topic the
//! outcome goes to the log instead; when publishing fails the outcome is logged
//! too, so it is never silently dropped. Failures stop here: nothing is
//! propagated back to the inbound request.

mod pubsub;

use log::{error, info, warn};

use crate::config::{Config, PublishTarget};
use crate::error_handling::{InitializationError, PublishError};
use crate::initialization::init_publish_client;
use crate::outcome::FetchOutcome;

pub use pubsub::{PubSubClient, TokenSource};

/// What happened to an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by Pub/Sub.
    Published {
        /// Server-assigned message id
        message_id: String,
    },
    /// Written to the log (no topic, or no project).
    Logged,
    /// Publishing failed; the outcome was logged if it could be serialized.
    Failed,
}

#[derive(Debug, Clone)]
enum Sink {
    Log,
    MissingProject,
    PubSub(PubSubClient),
}

/// Delivers outcomes to the configured sink.
#[derive(Debug, Clone)]
pub struct OutcomePublisher {
    sink: Sink,
}

impl OutcomePublisher {
    /// Publisher that only logs.
    pub fn log_only() -> Self {
        Self { sink: Sink::Log }
    }

    /// Publisher backed by a Pub/Sub client.
    pub fn pubsub(client: PubSubClient) -> Self {
        Self {
            sink: Sink::PubSub(client),
        }
    }

    /// Builds the publisher the configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let sink = match config.publish_target() {
            PublishTarget::Log => Sink::Log,
            PublishTarget::MissingProject { topic } => {
                warn!(
                    "RESPONSE_PUBSUB is set to {} but GOOGLE_CLOUD_PROJECT is not; outcomes will be logged",
                    topic
                );
                Sink::MissingProject
            }
            PublishTarget::PubSub { project, topic } => {
                let http = init_publish_client()?;
                let client = match config.pubsub_emulator_host.as_deref() {
                    Some(host) if !host.is_empty() => {
                        PubSubClient::emulator(http, host, &project, &topic)
                    }
                    _ => PubSubClient::new(http, &project, &topic, &config.metadata_host),
                };
                Sink::PubSub(client)
            }
        };
        Ok(Self { sink })
    }

    /// Human-readable description of the sink, for the startup log.
    pub fn describe(&self) -> String {
        match &self.sink {
            Sink::Log => "log only (no topic configured)".to_string(),
            Sink::MissingProject => "log only (no project configured)".to_string(),
            Sink::PubSub(client) => client.publish_url().to_string(),
        }
    }

    /// Publishes one outcome. Never fails; see [`Delivery`].
    pub async fn publish(&self, outcome: &FetchOutcome) -> Delivery {
        let payload = match outcome.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!("{}", PublishError::from(e));
                return Delivery::Failed;
            }
        };

        match &self.sink {
            Sink::Log => {
                info!("Publish Message: {}", payload);
                Delivery::Logged
            }
            Sink::MissingProject => {
                warn!("{}", PublishError::MissingProject);
                info!("Publish Message: {}", payload);
                Delivery::Logged
            }
            Sink::PubSub(client) => match client.publish(payload.as_bytes()).await {
                Ok(message_id) => {
                    info!("Published message with ID: {}", message_id);
                    Delivery::Published { message_id }
                }
                Err(e) => {
                    error!("{}", e);
                    info!("Publish Message: {}", payload);
                    Delivery::Failed
                }
            },
        }
    }
}
