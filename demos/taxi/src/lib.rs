//! # taxi
//!
//! The service layer of a taxi fleet: manufacturers, cars and drivers kept in
//! in-memory repositories, with every service wired by weave.
//!
//! ```rust
//! use taxi::service::DriverService;
//! use taxi::models::Driver;
//!
//! # fn main() -> Result<(), taxi::TaxiError> {
//! let injectors = weave::Injectors::new();
//! let injector = injectors.for_root(taxi::ROOT)?;
//! let drivers = injector.get_instance::<dyn DriverService>()?;
//! drivers.create(Driver::new("Alice", "AB-1024", "alice", "s3cret"));
//! assert!(drivers.find_by_login("alice").is_some());
//! # Ok(())
//! # }
//! ```

pub mod demo;
mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::*;

use std::path::{Path, PathBuf};

use weave::{Injector, StdError};
use weave_base::Config;

/// Root module of every component in this crate.
pub const ROOT: &str = module_path!();

/// Lines of the binding table: each contract with its implementation.
pub fn bindings(injector: &Injector) -> Vec<String> {
    injector
        .registry()
        .bindings()
        .into_iter()
        .map(|(contract, types)| format!("{contract} -> {}", types.join(", ")))
        .collect()
}

/// Loads the configuration from `path` and merges every override file into it
/// in order. Without a path the overrides apply to an empty configuration.
pub fn load_config(path: Option<&Path>, overrides: &[PathBuf]) -> Result<Config, StdError> {
    let mut config = match path {
        Some(path) => Config::parse_file(path)?,
        None => Config::new(),
    };
    for path in overrides {
        let config_override = Config::parse_file(path)?;
        config.merge_from(config_override)?;
    }
    Ok(config)
}
