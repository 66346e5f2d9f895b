//! Configuration types and CLI options.
//!
//! `Config` is parsed once at startup from flags and environment variables and
//! then handed to the server. Nothing downstream reads the environment.

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_METADATA_HOST, DEFAULT_PORT};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for log collectors
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Where outcomes go, resolved from the configured project and topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// No topic configured: outcomes are written to the log.
    Log,
    /// A topic is configured but no project: log-only, with a warning per outcome.
    MissingProject {
        /// Configured topic name
        topic: String,
    },
    /// Publish to `projects/{project}/topics/{topic}`.
    PubSub {
        /// Google Cloud project id
        project: String,
        /// Topic id within the project
        topic: String,
    },
}

/// Service configuration.
///
/// # Examples
///
/// ```bash
/// # Log-only mode on the default port
/// http_response_collector
///
/// # Publish outcomes to a topic
/// GOOGLE_CLOUD_PROJECT=my-project RESPONSE_PUBSUB=responses http_response_collector
///
/// # Against the local Pub/Sub emulator
/// PUBSUB_EMULATOR_HOST=localhost:8085 http_response_collector --project-id test --response-topic responses
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "http_response_collector",
    about = "Fetches URLs delivered by a Pub/Sub push subscription and publishes the responses."
)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Google Cloud project that owns the response topic
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project_id: Option<String>,

    /// Topic to publish outcomes to (outcomes are logged when unset)
    #[arg(long, env = "RESPONSE_PUBSUB")]
    pub response_topic: Option<String>,

    /// Pub/Sub emulator host:port; disables authentication when set
    #[arg(long, env = "PUBSUB_EMULATOR_HOST")]
    pub pubsub_emulator_host: Option<String>,

    /// Compute metadata server host used to obtain access tokens
    #[arg(long, env = "GCE_METADATA_HOST", default_value = DEFAULT_METADATA_HOST)]
    pub metadata_host: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// Resolves the publishing mode. Empty strings count as unset.
    pub fn publish_target(&self) -> PublishTarget {
        let topic = non_empty(self.response_topic.as_deref());
        let project = non_empty(self.project_id.as_deref());
        match (topic, project) {
            (None, _) => PublishTarget::Log,
            (Some(topic), None) => PublishTarget::MissingProject {
                topic: topic.to_string(),
            },
            (Some(topic), Some(project)) => PublishTarget::PubSub {
                project: project.to_string(),
                topic: topic.to_string(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            project_id: None,
            response_topic: None,
            pubsub_emulator_host: None,
            metadata_host: DEFAULT_METADATA_HOST.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
