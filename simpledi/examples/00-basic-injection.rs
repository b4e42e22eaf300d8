use simpledi::container::Container;
use simpledi::injection::Wired;
use simpledi::{component_alias, Component};

// the container starts from a configuration type, which tells it where to look for beans; a bare
// component_scan scans the module the configuration is declared in
#[derive(Component)]
#[configuration]
#[component_scan]
struct AppConfiguration;

// this is a trait we would like to use in our component
trait TestTrait {
    fn foo(&self);
}

// beans are created once, using Default, and shared with everyone who needs them
#[derive(Component, Default)]
#[bean]
struct TestDependency;

// we're telling the container how to put TestDependency into a field declared as dyn TestTrait;
// see the next example for such fields
#[component_alias]
impl TestTrait for TestDependency {
    fn foo(&self) {
        println!("Hello world!");
    }
}

#[derive(Component, Default)]
#[bean]
struct TestComponent {
    // #[inject] fields are filled after all beans are created; without a qualifier, the bean is
    // looked up by the concrete type
    #[inject]
    dependency: Wired<TestDependency>,
}

impl TestComponent {
    fn call_foo(&self) {
        if let Some(dependency) = self.dependency.get() {
            dependency.foo();
        }
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = Container::new::<AppConfiguration>().expect("error building container");

    let component = container
        .instance::<TestComponent>()
        .expect("TestComponent is not a bean");

    // prints "Hello world!"
    component.call_foo();
}
