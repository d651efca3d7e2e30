use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::{Component, DiscoveredType, Registration, ScanError};

const SEGMENT_SEPARATOR: &str = "::";

/// A type reported by a catalog together with the module it is declared in.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub module: String,
    pub ty: DiscoveredType,
}

/// Source of type metadata for the scanner.
///
/// A catalog reports every type it knows about, each with the module path
/// it lives in. Entries are returned by value so that nothing borrowed from
/// the catalog outlives a scan.
pub trait Catalog: Send + Sync {
    fn entries(&self) -> Vec<CatalogEntry>;
}

impl<T> Catalog for Arc<T>
where
    T: Catalog + ?Sized,
{
    fn entries(&self) -> Vec<CatalogEntry> {
        T::entries(self)
    }
}

/// Catalog of every type registered with `#[derive(Component)]` or `#[injectable]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryCatalog;

impl Catalog for InventoryCatalog {
    fn entries(&self) -> Vec<CatalogEntry> {
        inventory::iter::<Registration>
            .into_iter()
            .map(|v| CatalogEntry {
                module: v.module().to_string(),
                ty: v.describe(),
            })
            .collect()
    }
}

/// Catalog filled with explicit registration calls.
///
/// # Examples
///
/// ```rust
/// use weave::{Catalog, DiscoveredType, StaticCatalog};
///
/// struct Clock;
///
/// let catalog = StaticCatalog::new()
///     .register_type("app::time", DiscoveredType::builder::<Clock>().build());
///
/// assert_eq!(catalog.entries().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers component `T` as declared in `module`.
    pub fn register<T>(self, module: impl Into<String>) -> Self
    where
        T: Component,
    {
        self.register_type(module, T::describe())
    }

    pub fn register_type(mut self, module: impl Into<String>, ty: DiscoveredType) -> Self {
        self.entries.push(CatalogEntry {
            module: module.into(),
            ty,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }
}

/// Enumerates the types reachable under a root module path.
pub struct Scanner<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> Scanner<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Walks the module tree rooted at `root` and returns every type found.
    ///
    /// Types of a module come before the types of its submodules and
    /// submodules are visited in lexical order. Each call walks the catalog
    /// again.
    pub fn scan(&self, root: &str) -> Result<Vec<DiscoveredType>, ScanError> {
        debug!("Scanning root module {root}");
        let root_segments = split_path(root)?;
        if root_segments.is_empty() {
            return Err(ScanError::EmptyRoot);
        }
        let mut tree = ModuleNode::default();
        let mut resolved = false;
        for entry in self.catalog.entries() {
            let segments: Vec<&str> = entry.module.split(SEGMENT_SEPARATOR).collect();
            if !segments.starts_with(&root_segments) {
                continue;
            }
            resolved = true;
            let mut node = &mut tree;
            for segment in &segments[root_segments.len()..] {
                check_segment(&entry.module, segment)?;
                node = node.children.entry(segment.to_string()).or_default();
            }
            node.types.push(entry.ty);
        }
        if !resolved {
            return Err(ScanError::UnresolvedRoot {
                root: root.to_string(),
            });
        }
        let mut types = Vec::new();
        tree.walk(&mut types);
        debug!("Scanned {} types under {root}", types.len());
        Ok(types)
    }
}

#[derive(Default)]
struct ModuleNode {
    types: Vec<DiscoveredType>,
    children: BTreeMap<String, ModuleNode>,
}

impl ModuleNode {
    fn walk(self, types: &mut Vec<DiscoveredType>) {
        types.extend(self.types);
        for (_, child) in self.children {
            child.walk(types);
        }
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, ScanError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = path.split(SEGMENT_SEPARATOR).collect();
    for segment in &segments {
        check_segment(path, segment)?;
    }
    Ok(segments)
}

fn check_segment(path: &str, segment: &str) -> Result<(), ScanError> {
    let mut chars = segment.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric()) && segment != "_"
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ScanError::MalformedSegment {
            path: path.to_string(),
            segment: segment.to_string(),
        })
    }
}
