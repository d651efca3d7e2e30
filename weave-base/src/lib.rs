//! # weave-base
//!
//! Configuration and startup utilities for applications wired with weave.
//!
//! ## Core Components
//!
//! - **Configuration System**: Named JSON sections loaded from strings or
//!   files and merged from several sources
//! - **Tracing Integration**: Structured logging configured from the
//!   `tracing` section
//! - **Bootstrap**: Builds [`weave::Injectors`] from the `injector` section
//!   and validates the configured roots at startup
//!
//! ## Configuration Example
//!
//! ```rust
//! use weave_base::{Config, InjectorConfig, bootstrap};
//!
//! # fn main() -> Result<(), weave::StdError> {
//! let config = Config::parse(r#"{ "injector": { "max_depth": 16 } }"#)?;
//! let section: InjectorConfig = config.section()?;
//! assert_eq!(section.max_depth, 16);
//!
//! let injectors = bootstrap(&config)?;
//! assert_eq!(injectors.options().max_depth, 16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `macros` (default): Enables `#[config_section("key")]`

mod bootstrap;
mod config;
mod tracing;

pub use bootstrap::*;
pub use config::*;
pub use self::tracing::*;

#[cfg(feature = "macros")]
pub use weave_base_macros::*;
