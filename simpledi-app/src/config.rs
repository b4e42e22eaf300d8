//! Framework configuration. [ApplicationConfig] is created with opinionated default values, which
//! can then be overwritten by environment variables prefixed with `SIMPLEDI_` or the
//! `simpledi.json` file.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "SIMPLEDI";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "simpledi.json";

/// Filter used by the installed logger when neither the config nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Framework configuration used by [Application](crate::application::Application).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
    /// Directives for the installed logger, in `tracing_subscriber::EnvFilter` syntax.
    pub log_filter: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            log_filter: value.log_filter.unwrap_or(default.log_filter),
        }
    }
}

impl ApplicationConfig {
    /// Loads the config from the optional [CONFIG_FILE] and the environment.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Self::init_from_sources(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX)),
        )
    }

    fn init_from_sources(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }

    /// Returns a copy with the logger disabled.
    pub fn without_tracing_logger(mut self) -> Self {
        self.install_tracing_logger = false;
        self
    }
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
    log_filter: Option<String>,
}
