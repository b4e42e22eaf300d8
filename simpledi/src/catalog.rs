//! Catalogs list the types available for component scanning. The container only needs to
//! enumerate namespaces and resolve entries, so any source of [TypeDescriptor]s can be plugged in.
//! [StaticTypeCatalog] is built from descriptors registered at compile time by
//! `#[derive(Component)]` and `#[component_alias]`, or from an explicit list.

use crate::catalog::internal::{AliasRegisterer, TypeRegisterer};
use crate::component::{AliasDescriptor, TypeDescriptor};
use crate::error::ScanError;
use fxhash::FxHashMap;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Entry listed directly under a namespace.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CatalogEntry {
    /// Fully qualified name of a nested namespace.
    Namespace(String),
    /// Simple name of a type in the listed namespace.
    Type(String),
}

/// Source of types for component scanning.
#[cfg_attr(test, automock)]
pub trait TypeCatalog {
    /// Lists entries directly contained in the given namespace.
    fn entries(&self, namespace: &str) -> Result<Vec<CatalogEntry>, ScanError>;

    /// Resolves a type entry listed in the given namespace.
    fn resolve(&self, namespace: &str, entry: &str) -> Result<TypeDescriptor, ScanError>;

    /// Returns all aliases registered for given concrete type.
    fn aliases(&self, target: TypeId) -> Vec<AliasDescriptor>;
}

#[derive(Default, Clone, Debug)]
struct Namespace {
    children: BTreeSet<String>,
    types: BTreeMap<&'static str, TypeDescriptor>,
}

/// Catalog of statically known types, organized in a namespace tree.
#[derive(Default, Clone, Debug)]
pub struct StaticTypeCatalog {
    namespaces: BTreeMap<String, Namespace>,
    aliases: FxHashMap<TypeId, Vec<AliasDescriptor>>,
}

impl StaticTypeCatalog {
    /// Creates a catalog with all types registered at compile time.
    pub fn new() -> Self {
        let types = inventory::iter::<TypeRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
            .collect_vec();

        let aliases = inventory::iter::<AliasRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
            .collect_vec();

        Self::from_descriptors(types, aliases)
    }

    /// Creates a catalog with given types and aliases.
    pub fn from_descriptors<T, A>(types: T, aliases: A) -> Self
    where
        T: IntoIterator<Item = TypeDescriptor>,
        A: IntoIterator<Item = AliasDescriptor>,
    {
        let mut catalog = Self::default();

        for descriptor in types {
            catalog.insert_type(descriptor);
        }

        for alias in aliases {
            catalog
                .aliases
                .entry(alias.target_type)
                .or_default()
                .push(alias);
        }

        catalog
    }

    fn insert_type(&mut self, descriptor: TypeDescriptor) {
        let namespace = descriptor.namespace().to_string();
        self.insert_namespace(&namespace);

        let types = &mut self.namespaces.entry(namespace).or_default().types;
        if let Some(previous) = types.insert(descriptor.simple_name(), descriptor) {
            warn!("Type {} registered more than once", previous.name);
        }
    }

    fn insert_namespace(&mut self, namespace: &str) {
        let mut current = namespace.to_string();
        self.namespaces.entry(current.clone()).or_default();

        while let Some((parent, _)) = current.rsplit_once(NAMESPACE_SEPARATOR) {
            let parent = parent.to_string();
            let newly_added = self
                .namespaces
                .entry(parent.clone())
                .or_default()
                .children
                .insert(current);

            if !newly_added {
                break;
            }

            current = parent;
        }
    }
}

impl TypeCatalog for StaticTypeCatalog {
    fn entries(&self, namespace: &str) -> Result<Vec<CatalogEntry>, ScanError> {
        let contents = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| ScanError::UnknownNamespace(namespace.to_string()))?;

        Ok(contents
            .children
            .iter()
            .cloned()
            .map(CatalogEntry::Namespace)
            .chain(
                contents
                    .types
                    .keys()
                    .map(|name| CatalogEntry::Type(name.to_string())),
            )
            .collect())
    }

    fn resolve(&self, namespace: &str, entry: &str) -> Result<TypeDescriptor, ScanError> {
        self.namespaces
            .get(namespace)
            .and_then(|contents| contents.types.get(entry))
            .cloned()
            .ok_or_else(|| ScanError::UnresolvableEntry {
                namespace: namespace.to_string(),
                entry: entry.to_string(),
            })
    }

    fn aliases(&self, target: TypeId) -> Vec<AliasDescriptor> {
        self.aliases.get(&target).cloned().unwrap_or_default()
    }
}

#[doc(hidden)]
pub mod internal {
    use crate::component::{AliasDescriptor, TypeDescriptor};
    use inventory::collect;
    pub use inventory::submit;

    pub struct TypeRegisterer {
        pub register: fn() -> TypeDescriptor,
    }

    pub struct AliasRegisterer {
        pub register: fn() -> AliasDescriptor,
    }

    collect!(TypeRegisterer);
    collect!(AliasRegisterer);
}
