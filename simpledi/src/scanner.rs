//! Component scanning: discovering all types reachable under a root namespace.

use crate::catalog::{CatalogEntry, TypeCatalog, NAMESPACE_SEPARATOR};
use crate::component::TypeDescriptor;
use crate::diagnostics::{Diagnostic, Diagnostics};
use fxhash::FxHashSet;
use tracing::{debug, error, warn};

/// Recursively enumerates types under a namespace using a [TypeCatalog]. Discovery is
/// best-effort: unknown namespaces and unresolvable entries are skipped and recorded.
pub struct PackageScanner<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> PackageScanner<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Returns all types contained in `root` and its nested namespaces.
    pub fn scan(&self, root: &str, diagnostics: &mut Diagnostics) -> FxHashSet<TypeDescriptor> {
        let mut types = FxHashSet::default();
        let mut visited = FxHashSet::default();

        self.scan_namespace(root, root, &mut types, &mut visited, diagnostics);

        debug!("Found {} types under {}", types.len(), root);
        types
    }

    fn scan_namespace(
        &self,
        root: &str,
        namespace: &str,
        types: &mut FxHashSet<TypeDescriptor>,
        visited: &mut FxHashSet<String>,
        diagnostics: &mut Diagnostics,
    ) {
        if !visited.insert(namespace.to_string()) {
            return;
        }

        debug!("Scanning namespace: {}", namespace);

        let entries = match self.catalog.entries(namespace) {
            Ok(entries) => entries,
            Err(error) => {
                warn!("Skipping namespace {}: {}", namespace, error);
                diagnostics.push(Diagnostic::ScanFailed(error));
                return;
            }
        };

        for entry in entries {
            match entry {
                CatalogEntry::Namespace(child) => {
                    if is_within(root, &child) {
                        self.scan_namespace(root, &child, types, visited, diagnostics);
                    } else {
                        warn!("Namespace {} listed outside of {}", child, root);
                    }
                }
                CatalogEntry::Type(name) => match self.catalog.resolve(namespace, &name) {
                    Ok(descriptor) => {
                        types.insert(descriptor);
                    }
                    Err(error) => {
                        error!("{}", error);
                        diagnostics.push(Diagnostic::ScanFailed(error));
                    }
                },
            }
        }
    }
}

/// Checks if `namespace` is `root` or nested in it. Containment is by whole path segments.
pub fn is_within(root: &str, namespace: &str) -> bool {
    namespace == root
        || namespace
            .strip_prefix(root)
            .map(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
            .unwrap_or(false)
}
