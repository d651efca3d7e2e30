use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::{
    ComponentRegistry, Contract, Dependencies, DiscoveredType, Handle, InjectError, Instance,
    InstanceCache,
};

/// Default limit of nested resolutions within one request.
pub const DEFAULT_MAX_DEPTH: usize = 100;

const NO_INITIALIZER: &str = "no zero-argument initializer";

/// Options that bound a single resolution request.
#[derive(Clone, Copy, Debug)]
pub struct ResolveOptions {
    /// Maximum length of the chain of types being resolved at once.
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Builds instance graphs for requested contracts.
///
/// A resolver serves one top-level request. Instances it constructs are
/// staged rather than written to the cache; the caller takes them with
/// [`Resolver::into_staged`] and commits them once the request succeeded, so a
/// failed request never leaves partially wired graphs behind.
pub struct Resolver<'a> {
    registry: &'a ComponentRegistry,
    cache: &'a InstanceCache,
    options: ResolveOptions,
    staged: HashMap<TypeId, Instance>,
    chain: Vec<(TypeId, &'static str)>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a ComponentRegistry,
        cache: &'a InstanceCache,
        options: ResolveOptions,
    ) -> Self {
        Self {
            registry,
            cache,
            options,
            staged: HashMap::new(),
            chain: Vec::new(),
        }
    }

    /// Resolves `contract` to an erased `Arc<C>`.
    pub fn resolve(&mut self, contract: Contract) -> Result<Handle, InjectError> {
        let ty = self.registry.lookup(contract)?;
        let instance = match self.cached(ty.type_id()) {
            Some(v) => {
                debug!("Reusing {} for {contract}", ty.name());
                v
            }
            None => self.construct(contract, &ty)?,
        };
        upcast(&ty, contract, instance)
    }

    /// Consumes the resolver and returns the instances it constructed.
    pub fn into_staged(self) -> HashMap<TypeId, Instance> {
        self.staged
    }

    fn cached(&self, type_id: TypeId) -> Option<Instance> {
        self.staged
            .get(&type_id)
            .cloned()
            .or_else(|| self.cache.get(type_id))
    }

    fn construct(
        &mut self,
        contract: Contract,
        ty: &DiscoveredType,
    ) -> Result<Instance, InjectError> {
        if self.chain.iter().any(|(v, _)| *v == ty.type_id()) {
            let mut chain: Vec<_> = self.chain.iter().map(|(_, name)| *name).collect();
            chain.push(ty.name());
            return Err(InjectError::CircularDependency {
                chain: chain.join(" -> "),
            });
        }
        if self.chain.len() >= self.options.max_depth {
            return Err(InjectError::UnboundedRecursion {
                contract: contract.name(),
                limit: self.options.max_depth,
            });
        }
        if let Some(field) = ty.fields().iter().find(|v| !v.is_marked()) {
            return Err(InjectError::MissingInjectMarker {
                field: field.name(),
                owner: ty.name(),
            });
        }
        if !ty.has_constructor() {
            return Err(InjectError::Construction {
                type_name: ty.name(),
                source: NO_INITIALIZER.into(),
            });
        }
        debug!("Constructing {} for {contract}", ty.name());
        self.chain.push((ty.type_id(), ty.name()));
        let deps = self.resolve_fields(ty);
        self.chain.pop();
        let mut deps = deps?;
        let instance = ty
            .construct(&mut deps)
            .unwrap_or_else(|| Err(NO_INITIALIZER.into()))
            .map_err(|source| InjectError::Construction {
                type_name: ty.name(),
                source,
            })?;
        self.staged.insert(ty.type_id(), instance.clone());
        Ok(instance)
    }

    fn resolve_fields(&mut self, ty: &DiscoveredType) -> Result<Dependencies, InjectError> {
        let mut deps = Dependencies::new(ty.name());
        for field in ty.fields() {
            let handle = self.resolve(field.contract())?;
            deps.insert(field.name(), handle);
        }
        Ok(deps)
    }
}

fn upcast(
    ty: &DiscoveredType,
    contract: Contract,
    instance: Instance,
) -> Result<Handle, InjectError> {
    ty.upcast(contract, instance)
        .ok_or_else(|| InjectError::Construction {
            type_name: ty.name(),
            source: format!("instance does not convert into {contract}").into(),
        })
}
