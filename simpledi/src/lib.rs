//! A minimal dependency injection container. Types describe themselves and their markers with
//! [Component](component::Component) (usually derived), the container scans the module path named
//! by a root configuration type, creates a single instance of every bean found there, and then
//! injects beans and named literals into fields marked with `#[inject]`.
//!
//! ```
//! use simpledi::container::Container;
//! use simpledi::injection::Wired;
//! use simpledi::Component;
//!
//! #[derive(Component)]
//! #[configuration]
//! #[component_scan]
//! struct Config;
//!
//! #[derive(Component, Default)]
//! #[bean]
//! struct Storage;
//!
//! #[derive(Component, Default)]
//! #[bean]
//! struct Service {
//!     #[inject]
//!     storage: Wired<Storage>,
//! }
//!
//! let container = Container::new::<Config>().unwrap();
//! let service = container.instance::<Service>().unwrap();
//! assert!(service.storage.get().is_some());
//! ```
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds
//! * `derive` - automatically derive `Component` and register aliases

pub mod catalog;
pub mod component;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod injection;
pub mod instance;
pub mod registry;
pub mod scanner;

#[cfg(feature = "derive")]
pub use simpledi_derive::{component_alias, Component};
