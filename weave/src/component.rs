use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{Contract, Dependencies, StdError};

/// A constructed concrete instance with its type erased.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// An `Arc<C>` for some contract `C`, with the contract type erased.
pub type Handle = Box<dyn Any + Send + Sync>;

type Upcast = Arc<dyn Fn(Instance) -> Option<Handle> + Send + Sync>;

type Constructor = Arc<dyn Fn(&mut Dependencies) -> Result<Instance, StdError> + Send + Sync>;

/// Marker that decides whether a discovered type may be bound to a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Service,
    Repository,
    /// Untagged types are discovered but never bound.
    #[default]
    None,
}

impl Role {
    pub fn is_tagged(&self) -> bool {
        !matches!(self, Role::None)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Service => write!(f, "service"),
            Role::Repository => write!(f, "repository"),
            Role::None => write!(f, "none"),
        }
    }
}

/// Descriptor of a contract-typed field of a discovered type.
#[derive(Clone, Copy, Debug)]
pub struct InjectableField {
    name: &'static str,
    contract: Contract,
    marked: bool,
}

impl InjectableField {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    /// Returns `true` if the field is explicitly marked for injection.
    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

#[derive(Clone)]
struct ContractBinding {
    contract: Contract,
    upcast: Upcast,
}

/// Metadata of a concrete type found by the scanner.
///
/// A discovered type knows which contracts it conforms to, how it is tagged,
/// which of its fields need injection and how to build an instance from
/// resolved dependencies. It is immutable once built.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use weave::{DiscoveredType, Role};
///
/// trait Clock: Send + Sync {}
///
/// #[derive(Default)]
/// struct SystemClock;
///
/// impl Clock for SystemClock {}
///
/// let ty = DiscoveredType::builder::<SystemClock>()
///     .role(Role::Service)
///     .contract::<dyn Clock>(|it| it)
///     .constructor(|_| Ok(SystemClock))
///     .build();
///
/// assert_eq!(ty.role(), Role::Service);
/// assert_eq!(ty.contracts().count(), 1);
/// ```
#[derive(Clone)]
pub struct DiscoveredType {
    type_id: TypeId,
    name: &'static str,
    role: Role,
    contracts: Vec<ContractBinding>,
    fields: Vec<InjectableField>,
    constructor: Option<Constructor>,
}

impl DiscoveredType {
    pub fn builder<T>() -> DiscoveredTypeBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        DiscoveredTypeBuilder {
            name: type_name::<T>(),
            role: Role::None,
            contracts: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            _marker: PhantomData,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the concrete type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn contracts(&self) -> impl Iterator<Item = Contract> + '_ {
        self.contracts.iter().map(|v| v.contract)
    }

    pub fn implements(&self, contract: Contract) -> bool {
        self.contracts.iter().any(|v| v.contract == contract)
    }

    pub fn fields(&self) -> &[InjectableField] {
        &self.fields
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) fn construct(&self, deps: &mut Dependencies) -> Option<Result<Instance, StdError>> {
        self.constructor.as_ref().map(|v| v(deps))
    }

    /// Converts a concrete instance of this type into an erased `Arc<C>`.
    pub(crate) fn upcast(&self, contract: Contract, instance: Instance) -> Option<Handle> {
        self.contracts
            .iter()
            .find(|v| v.contract == contract)
            .and_then(|v| (v.upcast)(instance))
    }
}

impl fmt::Debug for DiscoveredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredType")
            .field("name", &self.name)
            .field("role", &self.role)
            .field(
                "contracts",
                &self.contracts.iter().map(|v| v.contract).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .field("constructor", &self.constructor.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// Builder for [`DiscoveredType`] of a concrete type `T`.
pub struct DiscoveredTypeBuilder<T> {
    name: &'static str,
    role: Role,
    contracts: Vec<ContractBinding>,
    fields: Vec<InjectableField>,
    constructor: Option<Constructor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DiscoveredTypeBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Overrides the reported name, which defaults to `type_name::<T>()`.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Declares that `T` conforms to contract `C`.
    ///
    /// The `upcast` function is usually the identity closure `|it| it`, which
    /// lets the compiler coerce `Arc<T>` into `Arc<C>`.
    pub fn contract<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.contracts.push(ContractBinding {
            contract: Contract::of::<C>(),
            upcast: Arc::new(move |instance: Instance| {
                instance
                    .downcast::<T>()
                    .ok()
                    .map(|v| Box::new(upcast(v)) as Handle)
            }),
        });
        self
    }

    /// Declares a field that must be injected with an instance of contract `C`.
    pub fn inject<C>(mut self, field: &'static str) -> Self
    where
        C: ?Sized + 'static,
    {
        self.fields.push(InjectableField {
            name: field,
            contract: Contract::of::<C>(),
            marked: true,
        });
        self
    }

    /// Declares a field of contract type `C` that lacks the injection marker.
    ///
    /// Resolving a type with such a field always fails.
    pub fn unmarked<C>(mut self, field: &'static str) -> Self
    where
        C: ?Sized + 'static,
    {
        self.fields.push(InjectableField {
            name: field,
            contract: Contract::of::<C>(),
            marked: false,
        });
        self
    }

    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&mut Dependencies) -> Result<T, StdError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move |deps: &mut Dependencies| {
            constructor(deps).map(|v| Arc::new(v) as Instance)
        }));
        self
    }

    pub fn build(self) -> DiscoveredType {
        DiscoveredType {
            type_id: TypeId::of::<T>(),
            name: self.name,
            role: self.role,
            contracts: self.contracts,
            fields: self.fields,
            constructor: self.constructor,
        }
    }
}

/// Trait for types that can be discovered and wired by the container.
///
/// Usually implemented with `#[derive(Component)]` or `#[injectable]`, which
/// also register the type for discovery under its module path.
pub trait Component: Send + Sync + Sized + 'static {
    /// Describes the type: its role, contracts, fields and constructor.
    fn describe() -> DiscoveredType;
}

/// Compile-time registration of a component under the module it is declared in.
///
/// Collected with `inventory` and read by [`InventoryCatalog`](crate::InventoryCatalog).
pub struct Registration {
    module: &'static str,
    describe: fn() -> DiscoveredType,
}

impl Registration {
    pub const fn new(module: &'static str, describe: fn() -> DiscoveredType) -> Self {
        Self { module, describe }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn describe(&self) -> DiscoveredType {
        (self.describe)()
    }
}

inventory::collect!(Registration);
