use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{Contract, DiscoveredType, InjectError};

/// Index of scanned types by the contracts they implement.
///
/// Only tagged types (services and repositories) take part in bindings;
/// untagged types are kept for inspection but are invisible to [`lookup`].
///
/// [`lookup`]: ComponentRegistry::lookup
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    types: Vec<Arc<DiscoveredType>>,
    bindings: HashMap<Contract, Vec<Arc<DiscoveredType>>>,
}

impl ComponentRegistry {
    pub fn build<I>(types: I) -> Self
    where
        I: IntoIterator<Item = DiscoveredType>,
    {
        let mut seen = HashSet::<TypeId>::new();
        let mut registry = Self::default();
        for ty in types {
            if !seen.insert(ty.type_id()) {
                warn!("Type {} is registered more than once", ty.name());
                continue;
            }
            let ty = Arc::new(ty);
            if ty.role().is_tagged() {
                for contract in ty.contracts() {
                    registry
                        .bindings
                        .entry(contract)
                        .or_default()
                        .push(ty.clone());
                }
            }
            registry.types.push(ty);
        }
        debug!(
            "Built registry of {} types and {} contracts",
            registry.types.len(),
            registry.bindings.len(),
        );
        registry
    }

    /// Returns the unique tagged implementation of `contract`.
    pub fn lookup(&self, contract: Contract) -> Result<Arc<DiscoveredType>, InjectError> {
        match self.bindings.get(&contract).map(Vec::as_slice) {
            None | Some([]) => Err(InjectError::NoBinding {
                contract: contract.name(),
            }),
            Some([ty]) => Ok(ty.clone()),
            Some(candidates) => {
                let mut candidates: Vec<_> = candidates.iter().map(|v| v.name()).collect();
                candidates.sort_unstable();
                Err(InjectError::AmbiguousBinding {
                    contract: contract.name(),
                    candidates,
                })
            }
        }
    }

    /// All scanned types, tagged or not, in scan order.
    pub fn types(&self) -> &[Arc<DiscoveredType>] {
        &self.types
    }

    /// Contract names mapped to the names of their tagged implementations.
    pub fn bindings(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        self.bindings
            .iter()
            .map(|(contract, types)| {
                let mut names: Vec<_> = types.iter().map(|v| v.name()).collect();
                names.sort_unstable();
                (contract.name(), names)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
