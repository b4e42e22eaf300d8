//! The container: the fully wired bean registry, built once from a root configuration type.

use crate::catalog::{StaticTypeCatalog, TypeCatalog};
use crate::component::{Component, TypeDescriptor};
use crate::diagnostics::Diagnostics;
use crate::error::ContainerError;
use crate::injection::FieldInjector;
use crate::instance::{ComponentInstanceAnyPtr, ComponentInstancePtr, Shareable};
use crate::registry::{BeanRegistry, BeanRegistryBuilder, QualifierIndex};
use std::any::TypeId;
use tracing::{info, warn};

pub type TypeCatalogPtr = Box<dyn TypeCatalog>;

/// Builder for [Container] with sensible defaults, for easy construction.
pub struct ContainerBuilder {
    catalog: TypeCatalogPtr,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Creates a new builder using all types registered at compile time.
    pub fn new() -> Self {
        Self {
            catalog: Box::new(StaticTypeCatalog::new()),
        }
    }

    /// Sets new [TypeCatalog].
    pub fn with_catalog(mut self, catalog: TypeCatalogPtr) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builds the container for given root configuration type.
    pub fn build<Root: Component>(self) -> Result<Container, ContainerError> {
        self.build_from(&Root::descriptor())
    }

    /// Builds the container for given root configuration descriptor: scans the namespace named by
    /// the root, constructs all beans and injects their fields.
    pub fn build_from(self, root: &TypeDescriptor) -> Result<Container, ContainerError> {
        info!("Building container for {}...", root.name);

        let mut diagnostics = Diagnostics::default();
        let (registry, qualifiers) =
            BeanRegistryBuilder::new(self.catalog.as_ref()).build(root, &mut diagnostics)?;

        FieldInjector::new(&registry, &qualifiers).inject(&mut diagnostics);

        if diagnostics.has_failures() {
            warn!(
                "Container for {} built with {} recovered faults",
                root.name,
                diagnostics.len()
            );
        }

        Ok(Container {
            registry,
            qualifiers,
            diagnostics,
        })
    }
}

/// Read-only access to beans wired together during construction. Lookups never create
/// instances, so the same instance is returned for the same type every time.
#[derive(Debug)]
pub struct Container {
    registry: BeanRegistry,
    qualifiers: QualifierIndex,
    diagnostics: Diagnostics,
}

impl Container {
    /// Builds a container for given root configuration type using the default
    /// [ContainerBuilder].
    pub fn new<Root: Component>() -> Result<Self, ContainerError> {
        ContainerBuilder::new().build::<Root>()
    }

    /// Returns the bean registered for type `T`, if any.
    pub fn instance<T: Shareable>(&self) -> Option<ComponentInstancePtr<T>> {
        self.registry
            .instance(TypeId::of::<T>())
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// Type-erased version of [Container::instance].
    pub fn instance_of(&self, descriptor: &TypeDescriptor) -> Option<ComponentInstanceAnyPtr> {
        self.registry.instance(descriptor.type_id)
    }

    /// Returns the type registered under given qualifier.
    pub fn qualified_type(&self, qualifier: &str) -> Option<&TypeDescriptor> {
        self.qualifiers.get(qualifier)
    }

    #[inline]
    pub fn qualifiers(&self) -> &QualifierIndex {
        &self.qualifiers
    }

    /// Faults recovered while building the container.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn contains<T: Shareable>(&self) -> bool {
        self.registry.contains(TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
