use std::str::FromStr as _;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use weave::StdError;

use crate::ConfigSection;

/// Installs the global `tracing` subscriber.
pub struct Tracing;

impl Tracing {
    /// Installs an `EnvFilter` and `fmt` subscriber built from `config`.
    ///
    /// Returns `false` if a global subscriber was already installed, in which
    /// case the existing one is kept.
    pub fn init(config: &TracingConfig) -> Result<bool, StdError> {
        let directives = config.parse_directives()?;
        let installed = tracing_subscriber::registry()
            .with(new_env_filter(&directives, config.level))
            .with(tracing_subscriber::fmt::Layer::default())
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!("Installed tracing with level {}", config.level);
        }
        Ok(installed)
    }
}

fn new_env_filter(directives: &[Directive], level: tracing::Level) -> EnvFilter {
    let mut filter = EnvFilter::default().add_directive(level.into());
    for directive in directives {
        filter = filter.add_directive(directive.clone());
    }
    filter
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TracingConfig {
    #[serde(
        serialize_with = "serialize_level",
        deserialize_with = "deserialize_level",
        default = "default_level"
    )]
    pub level: tracing::Level,
    #[serde(default)]
    pub directives: Vec<String>,
}

impl TracingConfig {
    /// Parses filter directives such as `weave=trace`.
    pub fn parse_directives(&self) -> Result<Vec<Directive>, StdError> {
        let mut directives = Vec::new();
        for directive in &self.directives {
            directives.push(directive.parse().map_err(Box::new)?);
        }
        Ok(directives)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directives: Default::default(),
        }
    }
}

impl ConfigSection for TracingConfig {
    fn key() -> &'static str {
        "tracing"
    }
}

fn serialize_level<S>(v: &tracing::Level, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(v.as_str())
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<tracing::Level, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    String::deserialize(deserializer)
        .and_then(|v| tracing::Level::from_str(&v).map_err(|v| Error::custom(format!("{v}"))))
}

fn default_level() -> tracing::Level {
    tracing::Level::INFO
}
