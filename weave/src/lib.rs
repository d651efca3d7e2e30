//! # weave
//!
//! A component container that discovers injectable types under a root module,
//! binds each requested contract to its single tagged implementation and wires
//! the whole instance graph on first use, keeping one singleton per concrete
//! type.
//!
//! ## Core Concepts
//!
//! - **Contract**: An abstract capability, usually a trait object type such as
//!   `dyn CarService`, that callers request
//! - **Component**: A concrete type with a role tag, the contracts it conforms
//!   to and the contract-typed fields it needs injected
//! - **Catalog**: The source of type metadata, filled by the macros at compile
//!   time or by explicit registration calls
//! - **Injector**: The container of one root module: scanned once, resolves
//!   contracts and caches singletons
//! - **Injectors**: Injectors memoized by root name
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use weave::{Component, Injectors};
//!
//! pub trait CarRepository: Send + Sync {
//!     fn count(&self) -> usize;
//! }
//!
//! pub trait CarService: Send + Sync {
//!     fn fleet_size(&self) -> usize;
//! }
//!
//! #[derive(Component, Default)]
//! #[component(repository(dyn CarRepository))]
//! struct InMemoryCars;
//!
//! impl CarRepository for InMemoryCars {
//!     fn count(&self) -> usize {
//!         3
//!     }
//! }
//!
//! #[derive(Component)]
//! #[component(service(dyn CarService))]
//! struct Fleet {
//!     #[inject]
//!     cars: Arc<dyn CarRepository>,
//! }
//!
//! impl CarService for Fleet {
//!     fn fleet_size(&self) -> usize {
//!         self.cars.count()
//!     }
//! }
//!
//! # fn main() -> Result<(), weave::InjectError> {
//! let injectors = Injectors::new();
//! let injector = injectors.for_root(module_path!())?;
//! let fleet = injector.get_instance::<dyn CarService>()?;
//! assert_eq!(fleet.fleet_size(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Factories
//!
//! Types that need custom construction declare a factory that receives the
//! resolved dependencies as arguments:
//!
//! ```rust
//! use std::sync::Arc;
//! use weave::{Component, Injectors, injectable};
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! pub trait Scheduler: Send + Sync {
//!     fn next_run(&self) -> u64;
//! }
//!
//! #[derive(Component, Default)]
//! #[component(service(dyn Clock))]
//! struct FixedClock;
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         100
//!     }
//! }
//!
//! struct Cron {
//!     clock: Arc<dyn Clock>,
//!     period: u64,
//! }
//!
//! #[injectable(service(dyn Scheduler))]
//! impl Cron {
//!     #[factory]
//!     fn new(#[inject] clock: Arc<dyn Clock>) -> Self {
//!         Self { clock, period: 60 }
//!     }
//! }
//!
//! impl Scheduler for Cron {
//!     fn next_run(&self) -> u64 {
//!         self.clock.now() + self.period
//!     }
//! }
//!
//! # fn main() -> Result<(), weave::InjectError> {
//! let injector = Injectors::new().for_root(module_path!())?;
//! assert_eq!(injector.get_instance::<dyn Scheduler>()?.next_run(), 160);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `macros` (default): Enables `#[derive(Component)]` and `#[injectable]`

mod cache;
mod component;
mod contract;
mod error;
mod inject;
mod injector;
mod registry;
mod resolver;
mod scanner;

pub use cache::*;
pub use component::*;
pub use contract::*;
pub use error::*;
pub use inject::*;
pub use injector::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;

#[doc(hidden)]
pub use inventory;

#[cfg(feature = "macros")]
pub use weave_macros::*;
