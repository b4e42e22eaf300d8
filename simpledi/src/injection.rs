//! Field injection. Beans are fully constructed before any injection happens, so injected fields
//! are slots which can be filled through a shared reference after the instance has already been
//! placed in the registry: [Wired] for other beans and [Literal] for named values.
//!
//! For every `#[inject]` field the [FieldInjector] determines what to write:
//!
//! 1. A field with a qualifier registered in the [QualifierIndex] resolves to the bean registered
//! under that qualifier.
//! 2. A field with an unknown qualifier gets the qualifier itself written as a [Literal].
//! 3. A field without a qualifier resolves to the bean registered for its declared type.
//!
//! Fields which cannot be resolved are left empty.

use crate::component::InjectionPoint;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::InjectionError;
use crate::instance::{ComponentInstancePtr, SlotCell};
use crate::registry::{Bean, BeanRegistry, QualifierIndex};
use std::any::{type_name, Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use tracing::{debug, error, info};

/// A value resolved for an injected field.
pub enum InjectedValue {
    /// `Box<ComponentInstancePtr<T>>`, already cast to the declared field type.
    Component {
        name: &'static str,
        cast: Box<dyn Any>,
    },
    Literal(String),
}

impl Debug for InjectedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component { name, .. } => f.debug_tuple("Component").field(name).finish(),
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
        }
    }
}

/// A field type which can be filled by the container after construction.
pub trait InjectionSlot {
    /// Type used to look up a bean when the field has no qualifier.
    fn target_type() -> TypeId;

    fn target_type_name() -> &'static str;

    /// Stores given value in the slot.
    fn accept(&self, value: InjectedValue) -> Result<(), InjectionError>;
}

/// Slot holding another bean. `T` is either a concrete component type or a `dyn Trait` alias.
pub struct Wired<T: ?Sized> {
    instance: SlotCell<ComponentInstancePtr<T>>,
}

impl<T: ?Sized> Wired<T> {
    /// Returns the injected instance, if any.
    #[inline]
    pub fn get(&self) -> Option<&ComponentInstancePtr<T>> {
        self.instance.get()
    }

    #[inline]
    pub fn is_wired(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl<T: ?Sized> Default for Wired<T> {
    fn default() -> Self {
        Self {
            instance: SlotCell::new(),
        }
    }
}

impl<T: ?Sized> Debug for Wired<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wired")
            .field("target", &type_name::<T>())
            .field("wired", &self.is_wired())
            .finish()
    }
}

impl<T: ?Sized + 'static> InjectionSlot for Wired<T> {
    fn target_type() -> TypeId {
        TypeId::of::<T>()
    }

    fn target_type_name() -> &'static str {
        type_name::<T>()
    }

    fn accept(&self, value: InjectedValue) -> Result<(), InjectionError> {
        match value {
            InjectedValue::Component { name, cast } => {
                let instance = cast
                    .downcast::<ComponentInstancePtr<T>>()
                    .map_err(|_| InjectionError::IncompatibleComponent {
                        expected: type_name::<T>(),
                        actual: name.to_string(),
                    })?;

                self.instance
                    .set(*instance)
                    .map_err(|_| InjectionError::AlreadyInjected)
            }
            InjectedValue::Literal(value) => Err(InjectionError::IncompatibleLiteral {
                expected: type_name::<T>(),
                value,
            }),
        }
    }
}

/// Slot holding a literal value, injected from the qualifier of the field.
pub struct Literal<T = String> {
    value: SlotCell<T>,
}

impl<T> Literal<T> {
    /// Returns the injected value, if any.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }
}

impl<T> Default for Literal<T> {
    fn default() -> Self {
        Self {
            value: SlotCell::new(),
        }
    }
}

impl<T: Debug> Debug for Literal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Literal").field(&self.value.get()).finish()
    }
}

impl<T: FromStr + 'static> InjectionSlot for Literal<T>
where
    T::Err: std::fmt::Display,
{
    fn target_type() -> TypeId {
        TypeId::of::<T>()
    }

    fn target_type_name() -> &'static str {
        type_name::<T>()
    }

    fn accept(&self, value: InjectedValue) -> Result<(), InjectionError> {
        match value {
            InjectedValue::Literal(value) => {
                let parsed = match value.parse::<T>() {
                    Ok(parsed) => parsed,
                    Err(error) => {
                        return Err(InjectionError::InvalidLiteral {
                            expected: type_name::<T>(),
                            value,
                            reason: error.to_string(),
                        });
                    }
                };

                self.value
                    .set(parsed)
                    .map_err(|_| InjectionError::AlreadyInjected)
            }
            InjectedValue::Component { name, .. } => Err(InjectionError::IncompatibleComponent {
                expected: type_name::<T>(),
                actual: name.to_string(),
            }),
        }
    }
}

enum Resolution<'a> {
    Component(&'a Bean),
    Literal(&'static str),
    Unresolved(&'static str),
}

/// Resolves and writes all `#[inject]` fields of registered beans.
pub struct FieldInjector<'a> {
    registry: &'a BeanRegistry,
    qualifiers: &'a QualifierIndex,
}

impl<'a> FieldInjector<'a> {
    pub fn new(registry: &'a BeanRegistry, qualifiers: &'a QualifierIndex) -> Self {
        Self {
            registry,
            qualifiers,
        }
    }

    /// Injects fields of every registered bean. Faults are logged, recorded in `diagnostics` and
    /// leave the affected field empty.
    pub fn inject(&self, diagnostics: &mut Diagnostics) {
        info!("Injecting fields of {} beans...", self.registry.len());

        for bean in self.registry.beans() {
            for point in &bean.descriptor.injection_points {
                self.inject_field(bean, point, diagnostics);
            }
        }
    }

    fn resolve(&self, point: &InjectionPoint) -> Resolution<'a> {
        let target = match point.named {
            Some(qualifier) => match self.qualifiers.get(qualifier) {
                Some(descriptor) => descriptor.type_id,
                None => return Resolution::Literal(qualifier),
            },
            None => point.declared_type,
        };

        self.registry
            .bean(target)
            .map(Resolution::Component)
            .unwrap_or(Resolution::Unresolved(point.declared_type_name))
    }

    fn inject_field(&self, bean: &Bean, point: &InjectionPoint, diagnostics: &mut Diagnostics) {
        debug!(
            component = bean.descriptor.name,
            field = point.field,
            "Injecting field"
        );

        let value = match self.resolve(point) {
            Resolution::Component(dependency) => {
                match dependency.cast_to(point.declared_type, point.declared_type_name) {
                    Ok(cast) => InjectedValue::Component {
                        name: dependency.descriptor.name,
                        cast,
                    },
                    Err(error) => {
                        self.report_failure(bean, point, error, diagnostics);
                        return;
                    }
                }
            }
            Resolution::Literal(qualifier) => InjectedValue::Literal(qualifier.to_string()),
            Resolution::Unresolved(declared_type) => {
                debug!(
                    component = bean.descriptor.name,
                    field = point.field,
                    declared_type,
                    "No bean found for field - leaving it empty"
                );

                diagnostics.push(Diagnostic::UnresolvedDependency {
                    component: bean.descriptor.name,
                    field: point.field,
                    declared_type,
                });
                return;
            }
        };

        if let Err(error) = (point.inject)(&*bean.instance, value) {
            self.report_failure(bean, point, error, diagnostics);
        }
    }

    fn report_failure(
        &self,
        bean: &Bean,
        point: &InjectionPoint,
        error: InjectionError,
        diagnostics: &mut Diagnostics,
    ) {
        error!(
            component = bean.descriptor.name,
            field = point.field,
            "Error injecting field: {error}"
        );

        diagnostics.push(Diagnostic::InjectionFailed {
            component: bean.descriptor.name,
            field: point.field,
            error,
        });
    }
}
