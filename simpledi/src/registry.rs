//! Bean registry: the single instance of every constructed bean, and the index of qualifiers
//! attached to bean types. Both are populated once by the [BeanRegistryBuilder] and are read-only
//! afterwards.

use crate::catalog::TypeCatalog;
use crate::component::{AliasDescriptor, TypeDescriptor};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConstructionError, ContainerError, InjectionError};
use crate::instance::{CastFunction, ComponentInstanceAnyPtr};
use crate::scanner::PackageScanner;
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use tracing::{debug, error, info, warn};

/// A constructed bean with the casts available for its instance.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Bean {
    pub descriptor: TypeDescriptor,

    #[derivative(Debug = "ignore")]
    pub instance: ComponentInstanceAnyPtr,

    #[derivative(Debug = "ignore")]
    casts: FxHashMap<TypeId, CastFunction>,
}

impl Bean {
    /// Creates a bean castable to its own type and to all given aliases.
    pub fn new<A: IntoIterator<Item = AliasDescriptor>>(
        descriptor: TypeDescriptor,
        instance: ComponentInstanceAnyPtr,
        aliases: A,
    ) -> Self {
        let casts = aliases
            .into_iter()
            .map(|alias| (alias.alias_type, alias.cast))
            .chain([(descriptor.type_id, descriptor.cast)])
            .collect();

        Self {
            descriptor,
            instance,
            casts,
        }
    }

    /// Casts the instance to `Box<ComponentInstancePtr<T>>`, where `T` is identified by `target`.
    pub fn cast_to(
        &self,
        target: TypeId,
        target_name: &'static str,
    ) -> Result<Box<dyn Any>, InjectionError> {
        let incompatible = || InjectionError::IncompatibleComponent {
            expected: target_name,
            actual: self.descriptor.name.to_string(),
        };

        let cast = self.casts.get(&target).ok_or_else(incompatible)?;
        cast(self.instance.clone()).map_err(|_| incompatible())
    }

    #[cfg(test)]
    fn is_castable_to(&self, target: TypeId) -> bool {
        self.casts.contains_key(&target)
    }
}

/// Single instances of all registered beans, keyed by their types.
#[derive(Clone, Debug, Default)]
pub struct BeanRegistry {
    beans: FxHashMap<TypeId, Bean>,
}

impl BeanRegistry {
    /// Adds a bean, replacing any bean previously registered for the same type.
    pub fn insert(&mut self, bean: Bean) {
        self.beans.insert(bean.descriptor.type_id, bean);
    }

    #[inline]
    pub fn bean(&self, type_id: TypeId) -> Option<&Bean> {
        self.beans.get(&type_id)
    }

    #[inline]
    pub fn instance(&self, type_id: TypeId) -> Option<ComponentInstanceAnyPtr> {
        self.beans.get(&type_id).map(|bean| bean.instance.clone())
    }

    #[inline]
    pub fn beans(&self) -> impl Iterator<Item = &Bean> {
        self.beans.values()
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.beans.contains_key(&type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

/// Mapping of qualifiers to bean types. A qualifier identifies at most one type.
#[derive(Clone, Debug, Default)]
pub struct QualifierIndex {
    qualifiers: FxHashMap<String, TypeDescriptor>,
}

impl QualifierIndex {
    /// Registers `qualifier` for given type, failing if it's already taken.
    pub fn try_register(
        &mut self,
        qualifier: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<(), ContainerError> {
        match self.qualifiers.entry(qualifier.to_string()) {
            Entry::Occupied(entry) => Err(ContainerError::DuplicateQualifier {
                qualifier: qualifier.to_string(),
                existing: entry.get().name.to_string(),
                duplicate: descriptor.name.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(descriptor.clone());
                Ok(())
            }
        }
    }

    #[inline]
    pub fn get(&self, qualifier: &str) -> Option<&TypeDescriptor> {
        self.qualifiers.get(qualifier)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.qualifiers
            .iter()
            .map(|(qualifier, descriptor)| (qualifier.as_str(), descriptor))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.qualifiers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }
}

/// Scans the namespace named by a configuration type and constructs all discovered beans.
pub struct BeanRegistryBuilder<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> BeanRegistryBuilder<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Builds the registry for given root configuration type. Beans which cannot be constructed
    /// are skipped; the only fatal conditions are a configuration without a component scan and a
    /// duplicate qualifier.
    pub fn build(
        &self,
        root: &TypeDescriptor,
        diagnostics: &mut Diagnostics,
    ) -> Result<(BeanRegistry, QualifierIndex), ContainerError> {
        let mut registry = BeanRegistry::default();
        let mut qualifiers = QualifierIndex::default();

        if !root.markers.configuration {
            warn!(
                "{} is not a configuration - skipping component scan",
                root.name
            );
            return Ok((registry, qualifiers));
        }

        let namespace = root
            .markers
            .component_scan
            .ok_or_else(|| ContainerError::MissingComponentScan(root.name.to_string()))?;

        info!("Performing component scan of {}...", namespace);

        let types = PackageScanner::new(self.catalog).scan(namespace, diagnostics);

        for descriptor in types
            .into_iter()
            .filter(TypeDescriptor::is_bean)
            .sorted_by_key(|descriptor| descriptor.name)
        {
            let instance = match construct(&descriptor) {
                Ok(instance) => instance,
                Err(error) => {
                    error!("{}", error);
                    diagnostics.push(Diagnostic::ConstructionFailed {
                        component: descriptor.name,
                        error,
                    });
                    continue;
                }
            };

            if let Some(qualifier) = descriptor.markers.named {
                debug!("Registering {} as: {}", descriptor.name, qualifier);
                qualifiers.try_register(qualifier, &descriptor)?;
            }

            let aliases = self.catalog.aliases(descriptor.type_id);
            registry.insert(Bean::new(descriptor, instance, aliases));
        }

        info!("Registered {} beans", registry.len());

        Ok((registry, qualifiers))
    }
}

fn construct(descriptor: &TypeDescriptor) -> Result<ComponentInstanceAnyPtr, ConstructionError> {
    debug!("Constructing bean: {}", descriptor.name);

    let constructor = descriptor
        .constructor
        .ok_or_else(|| ConstructionError::MissingConstructor(descriptor.name.to_string()))?;

    constructor().map_err(|error| ConstructionError::ConstructorFailed {
        component: descriptor.name.to_string(),
        error,
    })
}

#[cfg(test)]
//noinspection DuplicatedCode
mod tests {
    use crate::catalog::{CatalogEntry, MockTypeCatalog};
    use crate::component::{AliasDescriptor, TypeDescriptor, TypeMarkers};
    use crate::diagnostics::{Diagnostic, Diagnostics};
    use crate::error::{ConstructionError, ContainerError, ScanError};
    use crate::instance::{error_ptr, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr};
    use crate::registry::{Bean, BeanRegistryBuilder, QualifierIndex};
    use mockall::predicate::*;
    use std::any::{Any, TypeId};

    struct First;
    struct Second;

    fn cast(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        instance
            .downcast::<First>()
            .map(|p| Box::new(p) as Box<dyn Any>)
    }

    fn alias_cast(
        instance: ComponentInstanceAnyPtr,
    ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        Err(instance)
    }

    fn first_constructor() -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
        Ok(ComponentInstancePtr::new(First) as ComponentInstanceAnyPtr)
    }

    fn second_constructor() -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
        Ok(ComponentInstancePtr::new(Second) as ComponentInstanceAnyPtr)
    }

    fn error_constructor() -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
        Err(error_ptr(ScanError::UnknownNamespace("db".to_string())))
    }

    fn bean(name: &'static str, type_id: TypeId, named: Option<&'static str>) -> TypeDescriptor {
        TypeDescriptor {
            name,
            type_id,
            markers: TypeMarkers {
                bean: true,
                named,
                ..Default::default()
            },
            constructor: Some(if type_id == TypeId::of::<First>() {
                first_constructor
            } else {
                second_constructor
            }),
            cast,
            injection_points: vec![],
        }
    }

    fn configuration(component_scan: Option<&'static str>) -> TypeDescriptor {
        TypeDescriptor {
            name: "app::Config",
            type_id: TypeId::of::<u8>(),
            markers: TypeMarkers {
                configuration: true,
                component_scan,
                ..Default::default()
            },
            constructor: None,
            cast,
            injection_points: vec![],
        }
    }

    fn create_catalog(types: Vec<TypeDescriptor>) -> MockTypeCatalog {
        let entries = types
            .iter()
            .map(|descriptor| CatalogEntry::Type(descriptor.simple_name().to_string()))
            .collect::<Vec<_>>();

        let mut catalog = MockTypeCatalog::new();
        catalog
            .expect_entries()
            .with(eq("app"))
            .returning(move |_| Ok(entries.clone()));
        catalog.expect_resolve().returning(move |_, entry| {
            types
                .iter()
                .find(|descriptor| descriptor.simple_name() == entry)
                .cloned()
                .ok_or_else(|| ScanError::UnresolvableEntry {
                    namespace: "app".to_string(),
                    entry: entry.to_string(),
                })
        });
        catalog.expect_aliases().returning(|_| vec![]);
        catalog
    }

    #[test]
    fn should_register_beans_and_qualifiers() {
        let catalog = create_catalog(vec![
            bean("app::First", TypeId::of::<First>(), Some("first")),
            bean("app::Second", TypeId::of::<Second>(), None),
        ]);

        let mut diagnostics = Diagnostics::default();
        let (registry, qualifiers) = BeanRegistryBuilder::new(&catalog)
            .build(&configuration(Some("app")), &mut diagnostics)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(TypeId::of::<First>()));
        assert_eq!(qualifiers.len(), 1);
        assert_eq!(qualifiers.get("first").unwrap().name, "app::First");
        assert!(qualifiers
            .iter()
            .all(|(_, descriptor)| descriptor.name != "app::Second"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_ignore_types_without_bean_marker() {
        let mut plain = bean("app::Second", TypeId::of::<Second>(), None);
        plain.markers.bean = false;

        let catalog = create_catalog(vec![
            bean("app::First", TypeId::of::<First>(), None),
            plain,
        ]);

        let mut diagnostics = Diagnostics::default();
        let (registry, _) = BeanRegistryBuilder::new(&catalog)
            .build(&configuration(Some("app")), &mut diagnostics)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(TypeId::of::<Second>()));
    }

    #[test]
    fn should_reject_duplicate_qualifier() {
        let catalog = create_catalog(vec![
            bean("app::First", TypeId::of::<First>(), Some("same")),
            bean("app::Second", TypeId::of::<Second>(), Some("same")),
        ]);

        let mut diagnostics = Diagnostics::default();
        assert_eq!(
            BeanRegistryBuilder::new(&catalog)
                .build(&configuration(Some("app")), &mut diagnostics)
                .unwrap_err(),
            ContainerError::DuplicateQualifier {
                qualifier: "same".to_string(),
                existing: "app::First".to_string(),
                duplicate: "app::Second".to_string(),
            }
        );
    }

    #[test]
    fn should_skip_failing_constructors() {
        let mut failing = bean("app::Second", TypeId::of::<Second>(), Some("second"));
        failing.constructor = Some(error_constructor);

        let mut missing = bean("app::Third", TypeId::of::<i16>(), None);
        missing.constructor = None;

        let catalog = create_catalog(vec![
            bean("app::First", TypeId::of::<First>(), None),
            failing,
            missing,
        ]);

        let mut diagnostics = Diagnostics::default();
        let (registry, qualifiers) = BeanRegistryBuilder::new(&catalog)
            .build(&configuration(Some("app")), &mut diagnostics)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(qualifiers.get("second").is_none());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().any(|diagnostic| matches!(
            diagnostic,
            Diagnostic::ConstructionFailed {
                component: "app::Third",
                error: ConstructionError::MissingConstructor(..),
            }
        )));
        assert!(diagnostics.iter().any(|diagnostic| matches!(
            diagnostic,
            Diagnostic::ConstructionFailed {
                component: "app::Second",
                error: ConstructionError::ConstructorFailed { .. },
            }
        )));
    }

    #[test]
    fn should_not_scan_without_configuration() {
        let catalog = MockTypeCatalog::new();
        let mut root = configuration(Some("app"));
        root.markers.configuration = false;

        let mut diagnostics = Diagnostics::default();
        let (registry, qualifiers) = BeanRegistryBuilder::new(&catalog)
            .build(&root, &mut diagnostics)
            .unwrap();

        assert!(registry.is_empty());
        assert!(qualifiers.is_empty());
    }

    #[test]
    fn should_require_component_scan() {
        let catalog = MockTypeCatalog::new();

        let mut diagnostics = Diagnostics::default();
        assert_eq!(
            BeanRegistryBuilder::new(&catalog)
                .build(&configuration(None), &mut diagnostics)
                .unwrap_err(),
            ContainerError::MissingComponentScan("app::Config".to_string())
        );
    }

    #[test]
    fn should_cast_to_registered_aliases_only() {
        let descriptor = bean("app::First", TypeId::of::<First>(), None);
        let bean = Bean::new(
            descriptor,
            ComponentInstancePtr::new(First) as ComponentInstanceAnyPtr,
            [AliasDescriptor {
                alias_type: TypeId::of::<u32>(),
                alias_name: "u32",
                target_type: TypeId::of::<First>(),
                target_name: "app::First",
                cast: alias_cast,
            }],
        );

        assert!(bean.cast_to(TypeId::of::<First>(), "First").is_ok());
        assert!(bean.is_castable_to(TypeId::of::<u32>()));
        assert!(bean.cast_to(TypeId::of::<u32>(), "u32").is_err());
        assert!(bean.cast_to(TypeId::of::<Second>(), "Second").is_err());
    }

    #[test]
    fn should_not_register_duplicate_qualifier_in_index() {
        let mut qualifiers = QualifierIndex::default();
        qualifiers
            .try_register("name", &bean("app::First", TypeId::of::<First>(), None))
            .unwrap();

        assert!(matches!(
            qualifiers
                .try_register("name", &bean("app::Second", TypeId::of::<Second>(), None))
                .unwrap_err(),
            ContainerError::DuplicateQualifier { .. }
        ));
        assert_eq!(qualifiers.get("name").unwrap().name, "app::First");
    }
}
