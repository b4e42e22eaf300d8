//! Faults recovered while building a container. Apart from a duplicate qualifier or a missing
//! component scan, nothing aborts a build: failing namespaces, beans and fields are skipped and
//! recorded here, so callers wanting a fail-fast contract can inspect them afterwards.

use crate::error::{ConstructionError, InjectionError, ScanError};

#[derive(Clone, Debug)]
pub enum Diagnostic {
    /// A namespace or an entry could not be scanned.
    ScanFailed(ScanError),
    /// A bean could not be constructed and is absent from the registry.
    ConstructionFailed {
        component: &'static str,
        error: ConstructionError,
    },
    /// A resolved value could not be written into a field.
    InjectionFailed {
        component: &'static str,
        field: &'static str,
        error: InjectionError,
    },
    /// No bean matched the field; it was left empty.
    UnresolvedDependency {
        component: &'static str,
        field: &'static str,
        declared_type: &'static str,
    },
}

impl Diagnostic {
    /// Name of the component the diagnostic relates to, if any.
    pub fn component(&self) -> Option<&'static str> {
        match self {
            Self::ScanFailed(_) => None,
            Self::ConstructionFailed { component, .. }
            | Self::InjectionFailed { component, .. }
            | Self::UnresolvedDependency { component, .. } => Some(*component),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[inline]
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all diagnostics related to given component.
    pub fn for_component<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries
            .iter()
            .filter(move |diagnostic| diagnostic.component() == Some(component))
    }

    /// Returns true if any fault other than an unresolved dependency was recorded.
    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|diagnostic| !matches!(diagnostic, Diagnostic::UnresolvedDependency { .. }))
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::{Diagnostic, Diagnostics};
    use crate::error::ScanError;

    #[test]
    fn should_filter_by_component() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(Diagnostic::ScanFailed(ScanError::UnknownNamespace(
            "app".to_string(),
        )));
        diagnostics.push(Diagnostic::UnresolvedDependency {
            component: "app::A",
            field: "b",
            declared_type: "app::B",
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.for_component("app::A").count(), 1);
        assert_eq!(diagnostics.for_component("app::B").count(), 0);
    }

    #[test]
    fn should_not_treat_unresolved_as_failure() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(Diagnostic::UnresolvedDependency {
            component: "app::A",
            field: "b",
            declared_type: "app::B",
        });
        assert!(!diagnostics.has_failures());

        diagnostics.push(Diagnostic::ScanFailed(ScanError::UnknownNamespace(
            "app".to_string(),
        )));
        assert!(diagnostics.has_failures());
    }
}
