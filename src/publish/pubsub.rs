//! Pub/Sub REST publishing.
//!
//! Publishes through `projects.topics.publish` rather than a gRPC SDK. Outside
//! the emulator each call is authorized with an access token minted by the
//! compute metadata server for the runtime's service account.

use std::collections::HashMap;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::{PUBLISH_ATTRIBUTE_KEY, PUBLISH_ATTRIBUTE_VALUE, PUBSUB_API_ENDPOINT};
use crate::error_handling::PublishError;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Serialize)]
struct PublishRequest<'a> {
    messages: [PubsubMessage<'a>; 1],
}

#[derive(Serialize)]
struct PubsubMessage<'a> {
    data: String,
    attributes: HashMap<&'a str, &'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Deserialize)]
struct AccessToken {
    access_token: String,
}

/// How publish calls are authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// No authorization (emulator).
    None,
    /// Bearer token from the metadata server at this base URL.
    Metadata {
        /// e.g. `http://metadata.google.internal`
        base_url: String,
    },
}

/// Client for one topic.
#[derive(Debug, Clone)]
pub struct PubSubClient {
    http: reqwest::Client,
    publish_url: String,
    token_source: TokenSource,
}

impl PubSubClient {
    /// Client for the production endpoint, authorized via the metadata server.
    pub fn new(http: reqwest::Client, project: &str, topic: &str, metadata_host: &str) -> Self {
        Self::with_endpoint(
            http,
            PUBSUB_API_ENDPOINT,
            project,
            topic,
            TokenSource::Metadata {
                base_url: format!("http://{}", metadata_host),
            },
        )
    }

    /// Client for the Pub/Sub emulator at `host:port`; no authorization.
    pub fn emulator(http: reqwest::Client, emulator_host: &str, project: &str, topic: &str) -> Self {
        Self::with_endpoint(
            http,
            &format!("http://{}", emulator_host),
            project,
            topic,
            TokenSource::None,
        )
    }

    /// Client for an arbitrary endpoint.
    pub fn with_endpoint(
        http: reqwest::Client,
        endpoint: &str,
        project: &str,
        topic: &str,
        token_source: TokenSource,
    ) -> Self {
        Self {
            http,
            publish_url: format!(
                "{}/v1/projects/{}/topics/{}:publish",
                endpoint.trim_end_matches('/'),
                project,
                topic
            ),
            token_source,
        }
    }

    /// The full `...:publish` URL this client posts to.
    pub fn publish_url(&self) -> &str {
        &self.publish_url
    }

    /// Publishes one message and returns its server-assigned id.
    ///
    /// # Errors
    ///
    /// - `PublishError::Client` if no access token can be obtained
    /// - `PublishError::Transport` if the call fails
    /// - `PublishError::Rejected` on a non-success status
    /// - `PublishError::MissingMessageId` if the response carries no id
    pub async fn publish(&self, payload: &[u8]) -> Result<String, PublishError> {
        let token = self.access_token().await?;

        let body = PublishRequest {
            messages: [PubsubMessage {
                data: base64::engine::general_purpose::STANDARD.encode(payload),
                attributes: HashMap::from([(PUBLISH_ATTRIBUTE_KEY, PUBLISH_ATTRIBUTE_VALUE)]),
            }],
        };

        let mut request = self.http.post(&self.publish_url).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PublishResponse = response.json().await?;
        parsed
            .message_ids
            .into_iter()
            .next()
            .ok_or(PublishError::MissingMessageId)
    }

    async fn access_token(&self) -> Result<Option<String>, PublishError> {
        let base_url = match &self.token_source {
            TokenSource::None => return Ok(None),
            TokenSource::Metadata { base_url } => base_url,
        };

        let response = self
            .http
            .get(format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH))
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PublishError::Client(format!("metadata server unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(PublishError::Client(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| PublishError::Client(format!("invalid token response: {}", e)))?;
        Ok(Some(token.access_token))
    }
}
