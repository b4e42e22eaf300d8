#[cfg(feature = "derive")]
mod container_derive_test {
    mod demo {
        use simpledi::injection::{Literal, Wired};
        use simpledi::{component_alias, Component};
        use std::collections::HashSet;
        use std::sync::Mutex;

        #[derive(Component)]
        #[configuration]
        #[component_scan("container::container_derive_test::demo")]
        pub struct DemoConfiguration;

        pub trait DemoService {
            fn create_demo(&self);

            fn retrieve_demo(&self) -> Option<String>;
        }

        #[derive(Component, Default)]
        #[bean]
        pub struct DemoRepository {
            demos: Mutex<HashSet<String>>,
        }

        impl DemoRepository {
            pub fn create(&self, name: &str) {
                if let Ok(mut demos) = self.demos.lock() {
                    demos.insert(name.to_string());
                }
            }

            pub fn retrieve(&self, name: &str) -> Option<String> {
                self.demos
                    .lock()
                    .ok()
                    .and_then(|demos| demos.get(name).cloned())
            }
        }

        #[derive(Component, Default)]
        #[bean]
        #[named]
        pub struct DemoServiceImplA {
            #[inject]
            pub repository: Wired<DemoRepository>,
            #[inject]
            #[named("A")]
            pub name: Literal,
        }

        #[component_alias]
        impl DemoService for DemoServiceImplA {
            fn create_demo(&self) {
                if let (Some(repository), Some(name)) = (self.repository.get(), self.name.get()) {
                    repository.create(name);
                }
            }

            fn retrieve_demo(&self) -> Option<String> {
                self.repository
                    .get()
                    .zip(self.name.get())
                    .and_then(|(repository, name)| repository.retrieve(name))
            }
        }

        #[derive(Component, Default)]
        #[bean]
        #[named("demoServiceImplB")]
        pub struct DemoServiceImplB {
            #[inject]
            pub repository: Wired<DemoRepository>,
            #[inject]
            #[named("B")]
            pub name: Literal,
        }

        #[component_alias]
        impl DemoService for DemoServiceImplB {
            fn create_demo(&self) {
                if let (Some(repository), Some(name)) = (self.repository.get(), self.name.get()) {
                    repository.create(name);
                }
            }

            fn retrieve_demo(&self) -> Option<String> {
                self.repository
                    .get()
                    .zip(self.name.get())
                    .and_then(|(repository, name)| repository.retrieve(name))
            }
        }

        #[derive(Component, Default)]
        #[bean]
        pub struct DemoApplication {
            #[cfg(feature = "threadsafe")]
            #[inject]
            #[named("demoServiceImplA")]
            pub service_a: Wired<dyn DemoService + Send + Sync>,
            #[cfg(not(feature = "threadsafe"))]
            #[inject]
            #[named("demoServiceImplA")]
            pub service_a: Wired<dyn DemoService>,
            #[cfg(feature = "threadsafe")]
            #[inject]
            #[named("demoServiceImplB")]
            pub service_b: Wired<dyn DemoService + Send + Sync>,
            #[cfg(not(feature = "threadsafe"))]
            #[inject]
            #[named("demoServiceImplB")]
            pub service_b: Wired<dyn DemoService>,
            #[cfg(feature = "threadsafe")]
            #[inject]
            #[named("demoServiceImplC")]
            pub service_c: Wired<dyn DemoService + Send + Sync>,
            #[cfg(not(feature = "threadsafe"))]
            #[inject]
            #[named("demoServiceImplC")]
            pub service_c: Wired<dyn DemoService>,
            #[cfg(feature = "threadsafe")]
            #[inject]
            pub unqualified: Wired<dyn DemoService + Send + Sync>,
            #[cfg(not(feature = "threadsafe"))]
            #[inject]
            pub unqualified: Wired<dyn DemoService>,
        }

        impl DemoApplication {
            pub fn create_demo(&self) {
                for service in [&self.service_a, &self.service_b] {
                    if let Some(service) = service.get() {
                        service.create_demo();
                    }
                }
            }

            pub fn retrieve_demo_1(&self) -> Option<String> {
                self.service_a
                    .get()
                    .and_then(|service| service.retrieve_demo())
            }

            pub fn retrieve_demo_2(&self) -> Option<String> {
                self.service_b
                    .get()
                    .and_then(|service| service.retrieve_demo())
            }
        }

        pub mod nested {
            use simpledi::injection::Literal;
            use simpledi::Component;

            #[derive(Component, Default)]
            #[bean]
            pub struct Settings {
                #[inject]
                #[named("8080")]
                pub port: Literal<u16>,
                #[inject]
                #[named("not a number")]
                pub timeout: Literal<u32>,
            }
        }
    }

    mod duplicate {
        use simpledi::Component;

        #[derive(Component)]
        #[configuration]
        #[component_scan("container::container_derive_test::duplicate")]
        pub struct DuplicateConfiguration;

        #[derive(Component, Default)]
        #[bean]
        #[named("storage")]
        pub struct FileStorage;

        #[derive(Component, Default)]
        #[bean]
        #[named("storage")]
        pub struct MemoryStorage;
    }

    mod faulty {
        use simpledi::injection::Wired;
        use simpledi::instance::{error_ptr, ErrorPtr};
        use simpledi::Component;
        use std::fmt::{Display, Formatter};

        #[derive(Debug)]
        pub struct ConnectionError;

        impl Display for ConnectionError {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "connection refused")
            }
        }

        impl std::error::Error for ConnectionError {}

        #[derive(Component)]
        #[configuration]
        #[component_scan]
        pub struct FaultyConfiguration;

        #[derive(Component)]
        #[bean(constructor = "Database::connect")]
        #[named("database")]
        pub struct Database;

        impl Database {
            fn connect() -> Result<Self, ErrorPtr> {
                Err(error_ptr(ConnectionError))
            }
        }

        #[derive(Component)]
        #[bean(constructor = "Cache::with_capacity")]
        pub struct Cache {
            pub capacity: usize,
        }

        impl Cache {
            fn with_capacity() -> Result<Self, ErrorPtr> {
                Ok(Self { capacity: 16 })
            }
        }

        #[derive(Component, Default)]
        #[bean]
        pub struct Repository {
            #[inject]
            pub database: Wired<Database>,
            #[inject]
            pub cache: Wired<Cache>,
        }
    }

    mod unscanned {
        use simpledi::Component;

        #[derive(Component)]
        #[configuration]
        pub struct MissingScan;

        #[derive(Component, Default)]
        #[bean]
        pub struct NotConfiguration;
    }

    use crate::container_derive_test::demo::nested::Settings;
    use crate::container_derive_test::demo::{
        DemoApplication, DemoConfiguration, DemoRepository, DemoService, DemoServiceImplA,
        DemoServiceImplB,
    };
    use crate::container_derive_test::duplicate::DuplicateConfiguration;
    use crate::container_derive_test::faulty::{Cache, Database, FaultyConfiguration, Repository};
    use crate::container_derive_test::unscanned::{MissingScan, NotConfiguration};
    use simpledi::component::Component;
    use simpledi::container::Container;
    use simpledi::diagnostics::Diagnostic;
    use simpledi::error::{ContainerError, InjectionError};
    use simpledi::injection::{InjectionSlot, Wired};
    use simpledi::instance::ComponentInstancePtr;
    use std::any::TypeId;

    fn is_invalid_literal(diagnostic: &Diagnostic) -> bool {
        matches!(
            diagnostic,
            Diagnostic::InjectionFailed {
                error: InjectionError::InvalidLiteral { .. },
                ..
            }
        )
    }

    fn is_unknown_service(diagnostic: &Diagnostic) -> bool {
        matches!(
            diagnostic,
            Diagnostic::InjectionFailed {
                field: "service_c",
                error: InjectionError::IncompatibleLiteral { .. },
                ..
            }
        )
    }

    fn is_unresolved_service(diagnostic: &Diagnostic) -> bool {
        matches!(
            diagnostic,
            Diagnostic::UnresolvedDependency {
                field: "unqualified",
                ..
            }
        )
    }

    fn is_construction_failure(diagnostic: &Diagnostic) -> bool {
        matches!(diagnostic, Diagnostic::ConstructionFailed { .. })
    }

    #[test]
    fn should_wire_demo_application() {
        let container = Container::new::<DemoConfiguration>().unwrap();
        let application = container.instance::<DemoApplication>().unwrap();

        application.create_demo();

        assert_eq!(application.retrieve_demo_1(), Some("A".to_string()));
        assert_eq!(application.retrieve_demo_2(), Some("B".to_string()));
    }

    #[test]
    fn should_wire_alias_fields() {
        let container = Container::new::<DemoConfiguration>().unwrap();
        let application = container.instance::<DemoApplication>().unwrap();
        let service_a = container.instance::<DemoServiceImplA>().unwrap();

        #[cfg(feature = "threadsafe")]
        let alias_type = TypeId::of::<dyn DemoService + Send + Sync>();
        #[cfg(not(feature = "threadsafe"))]
        let alias_type = TypeId::of::<dyn DemoService>();

        assert_eq!(
            <Wired<DemoServiceImplA> as InjectionSlot>::target_type(),
            TypeId::of::<DemoServiceImplA>()
        );
        assert_eq!(
            DemoApplication::descriptor().injection_points[0].declared_type,
            alias_type
        );

        let wired = application.service_a.get().unwrap();
        assert_eq!(
            ComponentInstancePtr::as_ptr(wired) as *const (),
            ComponentInstancePtr::as_ptr(&service_a) as *const ()
        );
    }

    #[test]
    fn should_share_single_instances() {
        let container = Container::new::<DemoConfiguration>().unwrap();

        let repository = container.instance::<DemoRepository>().unwrap();
        let service_a = container.instance::<DemoServiceImplA>().unwrap();
        let service_b = container.instance::<DemoServiceImplB>().unwrap();

        assert!(ComponentInstancePtr::ptr_eq(
            &repository,
            service_a.repository.get().unwrap()
        ));
        assert!(ComponentInstancePtr::ptr_eq(
            &repository,
            service_b.repository.get().unwrap()
        ));
        assert!(ComponentInstancePtr::ptr_eq(
            &repository,
            &container.instance::<DemoRepository>().unwrap()
        ));
    }

    #[test]
    fn should_register_qualifiers() {
        let container = Container::new::<DemoConfiguration>().unwrap();

        assert_eq!(
            container
                .qualified_type("demoServiceImplA")
                .unwrap()
                .simple_name(),
            "DemoServiceImplA"
        );
        assert_eq!(
            container
                .qualified_type("demoServiceImplB")
                .unwrap()
                .simple_name(),
            "DemoServiceImplB"
        );
        assert_eq!(container.qualifiers().len(), 2);
        assert!(container.qualified_type("demoRepository").is_none());
    }

    #[test]
    fn should_inject_literals() {
        let container = Container::new::<DemoConfiguration>().unwrap();

        let service = container.instance::<DemoServiceImplA>().unwrap();
        assert_eq!(service.name.get().unwrap(), "A");

        let settings = container.instance::<Settings>().unwrap();
        assert_eq!(settings.port.get(), Some(&8080));
        assert!(settings.timeout.get().is_none());

        let mut diagnostics = container
            .diagnostics()
            .for_component(Settings::descriptor().name);
        assert!(diagnostics.any(is_invalid_literal));
    }

    #[test]
    fn should_leave_unknown_qualifier_empty() {
        let container = Container::new::<DemoConfiguration>().unwrap();
        let application = container.instance::<DemoApplication>().unwrap();

        assert!(application.service_a.is_wired());
        assert!(application.service_b.is_wired());
        assert!(!application.service_c.is_wired());
        assert!(!application.unqualified.is_wired());

        assert!(container.diagnostics().iter().any(is_unknown_service));
        assert!(container.diagnostics().iter().any(is_unresolved_service));
    }

    #[test]
    fn should_reject_duplicate_qualifiers() {
        assert!(matches!(
            Container::new::<DuplicateConfiguration>().unwrap_err(),
            ContainerError::DuplicateQualifier { qualifier, .. } if qualifier == "storage"
        ));
    }

    #[test]
    fn should_skip_failed_constructions() {
        let container = Container::new::<FaultyConfiguration>().unwrap();

        assert!(container.instance::<Database>().is_none());
        assert!(container.qualified_type("database").is_none());
        assert_eq!(container.instance::<Cache>().unwrap().capacity, 16);

        let repository = container.instance::<Repository>().unwrap();
        assert!(!repository.database.is_wired());
        assert!(ComponentInstancePtr::ptr_eq(
            repository.cache.get().unwrap(),
            &container.instance::<Cache>().unwrap()
        ));

        assert!(container.diagnostics().iter().any(is_construction_failure));
    }

    #[test]
    fn should_build_empty_container_for_non_configuration() {
        let container = Container::new::<NotConfiguration>().unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn should_require_component_scan() {
        assert!(matches!(
            Container::new::<MissingScan>().unwrap_err(),
            ContainerError::MissingComponentScan(..)
        ));
    }
}
