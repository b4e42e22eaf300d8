//! Pointer types shared by the container and injected fields. With the `threadsafe` feature
//! instances are shared via [Arc](std::sync::Arc) and must be `Send + Sync`, otherwise
//! [Rc](std::rc::Rc) is used.

use std::any::Any;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + Send + Sync + 'static>;

#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = Rc<dyn std::error::Error + 'static>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Write-once cell backing injection slots.
#[cfg(not(feature = "threadsafe"))]
pub type SlotCell<T> = std::cell::OnceCell<T>;
#[cfg(feature = "threadsafe")]
pub type SlotCell<T> = std::sync::OnceLock<T>;

/// Casts a type-erased instance to `Box<ComponentInstancePtr<T>>` (erased again as
/// `Box<dyn Any>`), where `T` is either the concrete component type or one of its aliases.
/// Returns the source pointer back if the cast is not possible.
pub type CastFunction =
    fn(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr>;

/// Bounds every managed type must satisfy to be stored in a [ComponentInstanceAnyPtr].
#[cfg(feature = "threadsafe")]
pub trait Shareable: Any + Send + Sync {}

#[cfg(feature = "threadsafe")]
impl<T: Any + Send + Sync> Shareable for T {}

/// Bounds every managed type must satisfy to be stored in a [ComponentInstanceAnyPtr].
#[cfg(not(feature = "threadsafe"))]
pub trait Shareable: Any {}

#[cfg(not(feature = "threadsafe"))]
impl<T: Any> Shareable for T {}

/// Wraps a user error into an [ErrorPtr].
#[cfg(feature = "threadsafe")]
pub fn error_ptr<E: std::error::Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

/// Wraps a user error into an [ErrorPtr].
#[cfg(not(feature = "threadsafe"))]
pub fn error_ptr<E: std::error::Error + 'static>(error: E) -> ErrorPtr {
    Rc::new(error) as ErrorPtr
}
