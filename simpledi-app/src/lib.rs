//! Application bootstrap based on [simpledi] dependency injection.
//!
//! With dependency injection in place, application components are decoupled and wired together by
//! the container. This, in turn, requires an entrypoint which loads configuration, installs
//! logging, builds the container and runs the actual business logic. This crate provides such
//! entrypoint in the form of [Application](application::Application).
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds

pub mod application;
pub mod config;
pub mod runner;
