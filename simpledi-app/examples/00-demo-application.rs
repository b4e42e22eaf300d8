use simpledi::injection::{Literal, Wired};
use simpledi::instance::{error_ptr, ErrorPtr};
use simpledi::{component_alias, Component};
use simpledi_app::application::Application;
use simpledi_app::runner::ApplicationRunner;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

// this is the root of our application - a bare component_scan means "scan the module I'm declared
// in", which for an example is the whole crate
#[derive(Component)]
#[configuration]
#[component_scan]
struct DemoConfiguration;

// a shared storage; beans are created once and shared by every field they're injected into, so
// any mutable state needs to be synchronized
#[derive(Component, Default)]
#[bean]
struct DemoRepository {
    demos: Mutex<HashSet<String>>,
}

impl DemoRepository {
    fn create(&self, name: &str) {
        if let Ok(mut demos) = self.demos.lock() {
            demos.insert(name.to_string());
        }
    }

    fn retrieve(&self, name: &str) -> Option<String> {
        self.demos
            .lock()
            .ok()
            .and_then(|demos| demos.get(name).cloned())
    }
}

trait DemoService {
    fn create_demo(&self);

    fn retrieve_demo(&self) -> Option<String>;
}

// a bare #[named] registers the bean as "demoServiceImplA"
#[derive(Component, Default)]
#[bean]
#[named]
struct DemoServiceImplA {
    // no qualifier - the bean is looked up by its type
    #[inject]
    repository: Wired<DemoRepository>,
    // there's no bean named "A", so the qualifier itself gets injected
    #[inject]
    #[named("A")]
    name: Literal,
}

// aliases let the container put DemoServiceImplA into a Wired<dyn DemoService + Send + Sync>
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
struct DemoServiceImplB {
    #[inject]
    repository: Wired<DemoRepository>,
    #[inject]
    #[named("B")]
    name: Literal,
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

#[derive(Debug)]
struct MissingDemo(&'static str);

impl Display for MissingDemo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "demo {} was not stored", self.0)
    }
}

impl std::error::Error for MissingDemo {}

// the runner is a regular bean - the application looks it up by type after all fields are injected
#[derive(Component, Default)]
#[bean]
struct DemoApplication {
    #[inject]
    #[named("demoServiceImplA")]
    service_a: Wired<dyn DemoService + Send + Sync>,
    #[inject]
    #[named("demoServiceImplB")]
    service_b: Wired<dyn DemoService + Send + Sync>,
}

impl DemoApplication {
    fn retrieve(
        service: &Wired<dyn DemoService + Send + Sync>,
        name: &'static str,
    ) -> Result<String, ErrorPtr> {
        service
            .get()
            .and_then(|service| service.retrieve_demo())
            .ok_or_else(|| error_ptr(MissingDemo(name)))
    }
}

impl ApplicationRunner for DemoApplication {
    fn run(&self) -> Result<(), ErrorPtr> {
        for service in [&self.service_a, &self.service_b] {
            if let Some(service) = service.get() {
                service.create_demo();
            }
        }

        // prints "A" and "B"
        println!("{}", Self::retrieve(&self.service_a, "A")?);
        println!("{}", Self::retrieve(&self.service_b, "B")?);

        Ok(())
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // configuration comes from simpledi.json and SIMPLEDI_* environment variables
    let application = Application::from_environment().expect("unable to load configuration");

    let container = application
        .run::<DemoConfiguration, DemoApplication>()
        .expect("error running application");

    // anything that went wrong during wiring, without aborting the build, ends up here
    for diagnostic in container.diagnostics() {
        println!("{diagnostic:?}");
    }
}
