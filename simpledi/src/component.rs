//! The marker model. Any type the container should know about implements [Component], which
//! describes the type and its markers with a static [TypeDescriptor]. For convenience, the trait
//! can be automatically derived if the `derive` feature is enabled:
//!
//! ```
//! use simpledi::injection::{Literal, Wired};
//! use simpledi::{component_alias, Component};
//!
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Component)]
//! #[configuration]
//! #[component_scan]
//! struct AppConfig;
//!
//! #[derive(Component, Default)]
//! #[bean]
//! #[named("english")]
//! struct EnglishGreeter;
//!
//! #[component_alias]
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello".to_string()
//!     }
//! }
//!
//! #[derive(Component, Default)]
//! #[bean]
//! struct Greeting {
//!     #[inject]
//!     #[named("english")]
//!     greeter: Wired<dyn Greeter + Send + Sync>,
//!     #[inject]
//!     #[named("world")]
//!     target: Literal,
//! }
//! ```
//!
//! ### Supported type markers
//!
//! * `#[configuration]` - the type is a root of component scanning
//! * `#[component_scan("path")]` - module path scanned for components, when the type is a
//! configuration; a bare `#[component_scan]` scans the module containing the type
//! * `#[bean]` - the container creates and manages a single instance of the type; requires
//! `Default`
//! * `#[bean(constructor = "path")]` - construct the bean by calling `path()`, which returns
//! `Result<Self, ErrorPtr>`
//! * `#[named("qualifier")]` - register the bean under given qualifier; a bare `#[named]` uses the
//! type name in lower camel case
//!
//! ### Supported field markers
//!
//! * `#[inject]` - the field is an [InjectionSlot](crate::injection::InjectionSlot) filled after
//! all beans are constructed
//! * `#[named("qualifier")]` - resolve the field by qualifier instead of by its declared type; if
//! no bean is registered under the qualifier, the qualifier itself is injected as a literal
//!
//! ## Registering component aliases
//!
//! Fields are usually declared with `dyn Trait` types, while beans are registered under their
//! concrete types. Use `#[component_alias]` on a trait implementation to let the container cast
//! the concrete bean when writing it into such a field. Aliases do not register the trait type
//! itself, so a `dyn Trait` field without a qualifier stays empty.

use crate::error::InjectionError;
use crate::injection::InjectedValue;
use crate::instance::{
    CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr, Shareable,
};
use derivative::Derivative;
use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// Creates a type-erased instance of a bean.
pub type ConstructorFunction = fn() -> Result<ComponentInstanceAnyPtr, ErrorPtr>;

/// Writes a resolved value into a field of the given instance.
pub type InjectFunction =
    fn(instance: &dyn Any, value: InjectedValue) -> Result<(), InjectionError>;

/// Base trait for all types known to the container. Typically derived.
pub trait Component: Shareable + Sized {
    /// Returns the static description of this type.
    fn descriptor() -> TypeDescriptor;
}

/// Markers attached to a type.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Hash)]
pub struct TypeMarkers {
    pub configuration: bool,
    pub component_scan: Option<&'static str>,
    pub bean: bool,
    pub named: Option<&'static str>,
}

/// Static description of a single `#[inject]` field.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct InjectionPoint {
    /// Field name, or index for tuple structs.
    pub field: &'static str,

    /// Type the field expects, i.e. `T` for `Wired<T>` and `Literal<T>`.
    #[derivative(Debug = "ignore")]
    pub declared_type: TypeId,
    pub declared_type_name: &'static str,

    /// Qualifier attached to the field.
    pub named: Option<&'static str>,

    #[derivative(Debug = "ignore")]
    pub inject: InjectFunction,
}

/// Handle to a catalogued type. Two descriptors are equal when their fully qualified names are.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct TypeDescriptor {
    /// Fully qualified name: `module::path::Ident`.
    pub name: &'static str,

    #[derivative(Debug = "ignore")]
    pub type_id: TypeId,

    pub markers: TypeMarkers,

    /// No-argument constructor; present for beans.
    #[derivative(Debug = "ignore")]
    pub constructor: Option<ConstructorFunction>,

    /// Cast to `ComponentInstancePtr<Self>`.
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,

    pub injection_points: Vec<InjectionPoint>,
}

impl TypeDescriptor {
    /// Namespace (module path) containing the type.
    pub fn namespace(&self) -> &'static str {
        self.name
            .rsplit_once("::")
            .map(|(namespace, _)| namespace)
            .unwrap_or("")
    }

    /// Type name without the namespace.
    pub fn simple_name(&self) -> &'static str {
        self.name
            .rsplit_once("::")
            .map(|(_, name)| name)
            .unwrap_or(self.name)
    }

    #[inline]
    pub fn is_bean(&self) -> bool {
        self.markers.bean
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Registration of a `dyn Trait` alias for a concrete component. Typically created by the
/// `#[component_alias]` attribute.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct AliasDescriptor {
    #[derivative(Debug = "ignore")]
    pub alias_type: TypeId,
    pub alias_name: &'static str,

    #[derivative(Debug = "ignore")]
    pub target_type: TypeId,
    pub target_name: &'static str,

    /// Cast to `ComponentInstancePtr<Alias>`.
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// [ConstructorFunction] using `Default`.
pub fn construct_default<T: Component + Default>() -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
    Ok(ComponentInstancePtr::new(T::default()) as ComponentInstanceAnyPtr)
}

/// Erases the result of a custom bean constructor.
pub fn into_instance<T: Component>(
    result: Result<T, ErrorPtr>,
) -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
    result.map(|instance| ComponentInstancePtr::new(instance) as ComponentInstanceAnyPtr)
}

/// [CastFunction] to the concrete component type.
pub fn cast_self<T: Component>(
    instance: ComponentInstanceAnyPtr,
) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
    instance
        .downcast::<T>()
        .map(|p| Box::new(p) as Box<dyn Any>)
}
