use std::any::type_name;
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use tracing::debug;

use crate::{
    Catalog, ComponentRegistry, Contract, Handle, InjectError, InstanceCache, InventoryCatalog,
    ResolveOptions, Resolver, Scanner,
};

/// Container of the components found under one root module.
///
/// An injector owns the registry built from its root scan and the cache of
/// every singleton it constructed. Each concrete type is constructed at most
/// once per injector, no matter how many contracts or fields lead to it.
///
/// Requests are serialized: a request made from another thread waits for the
/// running one. A constructor must not call back into the injector that is
/// building it; such a request fails with [`InjectError::Construction`]
/// instead of blocking.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use weave::{DiscoveredType, Injector, ResolveOptions, Role, StaticCatalog};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "Hello".to_string()
///     }
/// }
///
/// let catalog = StaticCatalog::new().register_type(
///     "app::greeting",
///     DiscoveredType::builder::<English>()
///         .role(Role::Service)
///         .contract::<dyn Greeter>(|it| it)
///         .constructor(|_| Ok(English))
///         .build(),
/// );
///
/// let injector = Injector::scan("app", &catalog, ResolveOptions::default())?;
/// let greeter = injector.get_instance::<dyn Greeter>()?;
/// assert_eq!(greeter.greet(), "Hello");
/// assert!(Arc::ptr_eq(&greeter, &injector.get_instance::<dyn Greeter>()?));
/// # Ok::<(), weave::InjectError>(())
/// ```
pub struct Injector {
    root: String,
    registry: ComponentRegistry,
    options: ResolveOptions,
    cache: ReentrantMutex<RefCell<InstanceCache>>,
    committed: AtomicUsize,
}

impl Injector {
    /// Scans `root` in `catalog` and builds an injector over the types found.
    pub fn scan(
        root: &str,
        catalog: &dyn Catalog,
        options: ResolveOptions,
    ) -> Result<Self, InjectError> {
        let types = Scanner::new(catalog).scan(root)?;
        Ok(Self {
            root: root.to_string(),
            registry: ComponentRegistry::build(types),
            options,
            cache: ReentrantMutex::new(RefCell::new(InstanceCache::new())),
            committed: AtomicUsize::new(0),
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Number of singletons committed so far.
    pub fn instance_count(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    /// Returns the singleton bound to contract `C`, building it on first use.
    pub fn get_instance<C>(&self) -> Result<Arc<C>, InjectError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let handle = self.get_instance_of(Contract::of::<C>())?;
        handle
            .downcast::<Arc<C>>()
            .map(|v| *v)
            .map_err(|_| InjectError::Construction {
                type_name: type_name::<C>(),
                source: "resolved instance has another contract type".into(),
            })
    }

    /// Returns the singleton bound to `contract` as an erased `Arc<C>`.
    pub fn get_instance_of(&self, contract: Contract) -> Result<Handle, InjectError> {
        // The lock spans the whole request so that concurrent first uses
        // never construct the same singleton twice.
        let guard = self.cache.lock();
        // The lock is reentrant, so a borrowed cache means this thread is
        // already inside a constructor of this injector.
        let Ok(mut cache) = guard.try_borrow_mut() else {
            return Err(InjectError::Construction {
                type_name: contract.name(),
                source: "re-entrant request from a constructor of the same injector".into(),
            });
        };
        let mut resolver = Resolver::new(&self.registry, &cache, self.options);
        let handle = resolver.resolve(contract)?;
        let staged = resolver.into_staged();
        debug!(
            "Resolved {contract} in {} with {} new instances",
            self.root,
            staged.len(),
        );
        for (type_id, instance) in staged {
            cache.put(type_id, instance);
        }
        self.committed.store(cache.len(), Ordering::Release);
        Ok(handle)
    }
}

/// Injectors memoized by root module name.
///
/// The first request for a root scans it and builds its registry; later
/// requests return the same injector. Failed scans are not remembered.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use weave::{DiscoveredType, Injectors, StaticCatalog};
///
/// struct Clock;
///
/// let injectors = Injectors::with_catalog(
///     StaticCatalog::new().register_type("app", DiscoveredType::builder::<Clock>().build()),
/// );
/// let first = injectors.for_root("app")?;
/// let second = injectors.for_root("app")?;
/// assert!(Arc::ptr_eq(&first, &second));
/// # Ok::<(), weave::InjectError>(())
/// ```
pub struct Injectors {
    catalog: Arc<dyn Catalog>,
    options: ResolveOptions,
    injectors: DashMap<String, Arc<Injector>>,
}

impl Injectors {
    /// Creates injectors over every type registered with the macros.
    pub fn new() -> Self {
        Self::with_catalog(InventoryCatalog)
    }

    pub fn with_catalog<T>(catalog: T) -> Self
    where
        T: Catalog + 'static,
    {
        Self {
            catalog: Arc::new(catalog),
            options: ResolveOptions::default(),
            injectors: DashMap::new(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Returns the injector of `root`, scanning it on first use.
    pub fn for_root(&self, root: &str) -> Result<Arc<Injector>, InjectError> {
        if let Some(v) = self.injectors.get(root) {
            return Ok(v.value().clone());
        }
        let injector = self
            .injectors
            .entry(root.to_string())
            .or_try_insert_with(|| {
                Injector::scan(root, self.catalog.as_ref(), self.options).map(Arc::new)
            })?;
        Ok(injector.value().clone())
    }

    /// Roots scanned so far, in lexical order.
    pub fn roots(&self) -> Vec<String> {
        let mut roots: Vec<_> = self.injectors.iter().map(|v| v.key().clone()).collect();
        roots.sort_unstable();
        roots
    }
}

impl Default for Injectors {
    fn default() -> Self {
        Self::new()
    }
}
