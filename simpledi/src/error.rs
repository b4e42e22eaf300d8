use crate::instance::ErrorPtr;
use thiserror::Error;

/// Errors which abort building a [Container](crate::container::Container).
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ContainerError {
    #[error("Qualifier '{qualifier}' is registered for both {existing} and {duplicate}")]
    DuplicateQualifier {
        qualifier: String,
        existing: String,
        duplicate: String,
    },
    #[error("Configuration type {0} does not declare a namespace to scan")]
    MissingComponentScan(String),
}

/// Errors related to discovering types in a [TypeCatalog](crate::catalog::TypeCatalog).
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ScanError {
    #[error("Cannot find namespace: {0}")]
    UnknownNamespace(String),
    #[error("Cannot resolve entry '{entry}' in namespace: {namespace}")]
    UnresolvableEntry { namespace: String, entry: String },
}

/// Errors related to creating bean instances.
#[derive(Error, Clone, Debug)]
pub enum ConstructionError {
    #[error("Bean {0} does not provide a no-argument constructor")]
    MissingConstructor(String),
    #[error("Error constructing bean {component}: {error}")]
    ConstructorFailed { component: String, error: ErrorPtr },
}

/// Errors related to writing a resolved value into an injected field.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum InjectionError {
    #[error("Tried to inject fields of an instance which is not of type {0}")]
    IncompatibleInstance(&'static str),
    #[error("Component {actual} cannot be injected as {expected}")]
    IncompatibleComponent {
        expected: &'static str,
        actual: String,
    },
    #[error("Literal '{value}' cannot be injected into a field expecting {expected}")]
    IncompatibleLiteral {
        expected: &'static str,
        value: String,
    },
    #[error("Literal '{value}' is not a valid {expected}: {reason}")]
    InvalidLiteral {
        expected: &'static str,
        value: String,
        reason: String,
    },
    #[error("Field has already been injected")]
    AlreadyInjected,
}
