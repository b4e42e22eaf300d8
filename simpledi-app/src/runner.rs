//! Runners executing actual application logic.

#[cfg(test)]
use mockall::automock;
pub use simpledi::instance::ErrorPtr;

/// Runs application logic. The runner is a bean looked up by its concrete type after the
/// container is built, so all its `#[inject]` fields are already filled when [run](Self::run) is
/// called.
#[cfg_attr(test, automock)]
pub trait ApplicationRunner {
    /// Runs any application code.
    fn run(&self) -> Result<(), ErrorPtr>;
}
