//! Resolved dependencies handed to component constructors.
//!
//! The resolver resolves every marked field of a discovered type before the
//! type is constructed, and passes the results to the constructor as a
//! [`Dependencies`] bag keyed by field name. Constructors take each dependency
//! out of the bag under the contract the field was declared with.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use weave::{DiscoveredType, Role};
//!
//! trait Store: Send + Sync {}
//! trait Catalogue: Send + Sync {}
//!
//! struct BookCatalogue {
//!     store: Arc<dyn Store>,
//! }
//!
//! impl Catalogue for BookCatalogue {}
//!
//! let ty = DiscoveredType::builder::<BookCatalogue>()
//!     .role(Role::Service)
//!     .contract::<dyn Catalogue>(|it| it)
//!     .inject::<dyn Store>("store")
//!     .constructor(|deps| {
//!         Ok(BookCatalogue {
//!             store: deps.take::<dyn Store>("store")?,
//!         })
//!     })
//!     .build();
//!
//! assert_eq!(ty.fields()[0].name(), "store");
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{Handle, InjectError};

/// Dependencies resolved for one concrete type, keyed by field name.
pub struct Dependencies {
    owner: &'static str,
    resolved: HashMap<&'static str, Handle>,
}

impl Dependencies {
    pub(crate) fn new(owner: &'static str) -> Self {
        Self {
            owner,
            resolved: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, field: &'static str, handle: Handle) {
        self.resolved.insert(field, handle);
    }

    /// Name of the type being constructed.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Takes the instance resolved for `field` as contract `C`.
    ///
    /// Fails with [`InjectError::DependencyMismatch`] if the field was not
    /// resolved, was already taken, or was declared with another contract.
    pub fn take<C>(&mut self, field: &str) -> Result<Arc<C>, InjectError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let mismatch = InjectError::DependencyMismatch {
            owner: self.owner,
            field: field.to_string(),
            expected: type_name::<C>(),
        };
        let (key, handle) = match self.resolved.remove_entry(field) {
            Some(v) => v,
            None => return Err(mismatch),
        };
        match handle.downcast::<Arc<C>>() {
            Ok(v) => Ok(*v),
            Err(handle) => {
                // Put it back so a retry with the declared contract still works.
                self.resolved.insert(key, handle);
                Err(mismatch)
            }
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.resolved.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
