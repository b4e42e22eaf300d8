//! Core application framework functionality.

use crate::config::ApplicationConfig;
use crate::runner::ApplicationRunner;
use derive_more::Constructor;
use simpledi::component::Component;
use simpledi::container::{Container, ContainerBuilder};
use simpledi::error::ContainerError;
use simpledi::instance::{error_ptr, ErrorPtr, Shareable};
use std::any::type_name;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error loading application config: {0}")]
    Configuration(ErrorPtr),
    #[error("Error building container: {0}")]
    Container(#[from] ContainerError),
    #[error("Runner {0} is not a registered bean")]
    MissingRunner(&'static str),
    #[error("Runner error: {0}")]
    RunnerError(ErrorPtr),
}

/// Main entrypoint for the application. Bootstraps the container for a root configuration type
/// and runs an [ApplicationRunner] bean.
#[derive(Constructor, Debug)]
pub struct Application {
    config: ApplicationConfig,
}

impl Application {
    /// Creates an application configured from the environment.
    pub fn from_environment() -> Result<Self, ApplicationError> {
        ApplicationConfig::init_from_environment()
            .map(Self::new)
            .map_err(|error| ApplicationError::Configuration(error_ptr(error)))
    }

    #[inline]
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Installs logging and builds the container for given root configuration type.
    pub fn bootstrap<Root: Component>(&self) -> Result<Container, ApplicationError> {
        self.bootstrap_with::<Root>(ContainerBuilder::new())
    }

    /// Like [bootstrap](Self::bootstrap), but uses given container builder.
    pub fn bootstrap_with<Root: Component>(
        &self,
        builder: ContainerBuilder,
    ) -> Result<Container, ApplicationError> {
        self.install_tracing_logger();

        info!("Bootstrapping application...");
        Ok(builder.build::<Root>()?)
    }

    /// Builds the container and runs the runner bean of type `R`. Returns the container for
    /// further inspection.
    pub fn run<Root: Component, R: ApplicationRunner + Shareable>(
        &self,
    ) -> Result<Container, ApplicationError> {
        let container = self.bootstrap::<Root>()?;
        self.run_in::<R>(&container)?;
        Ok(container)
    }

    /// Runs the runner bean of type `R` from an already built container.
    pub fn run_in<R: ApplicationRunner + Shareable>(
        &self,
        container: &Container,
    ) -> Result<(), ApplicationError> {
        let runner = container
            .instance::<R>()
            .ok_or(ApplicationError::MissingRunner(type_name::<R>()))?;

        info!("Running application runner {}...", type_name::<R>());
        runner.run().map_err(ApplicationError::RunnerError)
    }

    fn install_tracing_logger(&self) {
        if !self.config.install_tracing_logger {
            return;
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.log_filter));

        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_err()
        {
            debug!("Tracing subscriber already installed");
        }
    }
}
