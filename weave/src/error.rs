use thiserror::Error;

/// Type alias for boxed errors that can be sent across threads.
///
/// Constructors registered with the container report failures with this type.
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while walking the module tree of a root.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path is empty.
    #[error("Root module path is empty")]
    EmptyRoot,
    /// A path segment is not a valid module name.
    #[error("Malformed module segment {segment:?} in {path:?}")]
    MalformedSegment { path: String, segment: String },
    /// No registered module lives at or under the root.
    #[error("Cannot resolve root module {root:?}")]
    UnresolvedRoot { root: String },
}

/// Errors that can occur while resolving a contract.
///
/// Every variant is terminal: the container never retries and never falls back
/// to another binding.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The root could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// No tagged type implements the contract.
    #[error("No tagged implementation of {contract}")]
    NoBinding { contract: &'static str },
    /// More than one tagged type implements the contract.
    #[error("Ambiguous binding for {contract}: {}", .candidates.join(", "))]
    AmbiguousBinding {
        contract: &'static str,
        candidates: Vec<&'static str>,
    },
    /// The concrete type has no constructor or its constructor failed.
    #[error("Cannot construct {type_name}: {source}")]
    Construction {
        type_name: &'static str,
        #[source]
        source: StdError,
    },
    /// A contract-typed field is not marked for injection.
    #[error("Field {field} of {owner} is not marked for injection")]
    MissingInjectMarker {
        field: &'static str,
        owner: &'static str,
    },
    /// A concrete type was requested while it was already being resolved.
    #[error("Circular dependency detected: {chain}")]
    CircularDependency { chain: String },
    /// The resolution chain grew deeper than the configured limit.
    #[error("Resolution of {contract} exceeded depth limit {limit}")]
    UnboundedRecursion { contract: &'static str, limit: usize },
    /// A constructor asked for a dependency that was not resolved for it.
    #[error("Field {field} of {owner} was not resolved as {expected}")]
    DependencyMismatch {
        owner: &'static str,
        field: String,
        expected: &'static str,
    },
}
