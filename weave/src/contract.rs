use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle of a contract type that callers can request from an injector.
///
/// Contracts are usually trait objects such as `dyn CarService`. Two handles
/// are equal when they refer to the same type.
///
/// # Examples
///
/// ```rust
/// use weave::Contract;
///
/// trait Clock: Send + Sync {}
///
/// let contract = Contract::of::<dyn Clock>();
/// assert_eq!(contract, Contract::of::<dyn Clock>());
/// assert!(contract.name().ends_with("Clock"));
/// ```
#[derive(Clone, Copy)]
pub struct Contract {
    type_id: TypeId,
    name: &'static str,
}

impl Contract {
    pub fn of<C>() -> Self
    where
        C: ?Sized + 'static,
    {
        Self {
            type_id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Contract {}

impl Hash for Contract {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Contract").field(&self.name).finish()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
