use serde::{Deserialize, Serialize};
use weave::{DEFAULT_MAX_DEPTH, Injectors, ResolveOptions, StdError};

use crate::{Config, ConfigSection, Tracing, TracingConfig};

/// The `injector` configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Maximum length of a resolution chain.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Root modules scanned at startup.
    #[serde(default)]
    pub roots: Vec<String>,
}

impl InjectorConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.max_depth,
        }
    }
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            roots: Vec::new(),
        }
    }
}

impl ConfigSection for InjectorConfig {
    fn key() -> &'static str {
        "injector"
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Builds the application injectors from `config`.
///
/// Installs tracing when the config has a `tracing` section, applies the
/// `injector` section and scans every configured root, so that malformed or
/// unknown roots fail at startup rather than on first use.
pub fn bootstrap(config: &Config) -> Result<Injectors, StdError> {
    bootstrap_with(config, Injectors::new())
}

/// Same as [`bootstrap`] over the given injectors, for custom catalogs.
pub fn bootstrap_with(config: &Config, injectors: Injectors) -> Result<Injectors, StdError> {
    if let Some(section) = config.get::<Option<TracingConfig>>(TracingConfig::key())? {
        Tracing::init(&section)?;
    }
    let injector = config
        .get::<Option<InjectorConfig>>(InjectorConfig::key())?
        .unwrap_or_default();
    if injector.max_depth == 0 {
        return Err("injector.max_depth must be positive".into());
    }
    let injectors = injectors.with_options(injector.resolve_options());
    for root in &injector.roots {
        let scanned = injectors.for_root(root)?;
        tracing::info!(
            "Scanned root {root} with {} components",
            scanned.registry().len()
        );
    }
    Ok(injectors)
}
