// note: this example assumes you've analyzed the previous one

use simpledi::container::Container;
use simpledi::injection::{Literal, Wired};
use simpledi::instance::{error_ptr, ErrorPtr};
use simpledi::{component_alias, Component};
use std::fmt::{Display, Formatter};

#[derive(Component)]
#[configuration]
#[component_scan]
struct AppConfiguration;

trait Greeter {
    fn greet(&self, target: &str) -> String;
}

// beans can be registered under a qualifier, which is then used to pick one of many beans sharing
// a trait
#[derive(Component, Default)]
#[bean]
#[named("english")]
struct EnglishGreeter;

#[component_alias]
impl Greeter for EnglishGreeter {
    fn greet(&self, target: &str) -> String {
        format!("Hello {target}!")
    }
}

// a bare #[named] uses the type name in lower camel case, i.e. "polishGreeter"
#[derive(Component, Default)]
#[bean]
#[named]
struct PolishGreeter;

#[component_alias]
impl Greeter for PolishGreeter {
    fn greet(&self, target: &str) -> String {
        format!("Witaj {target}!")
    }
}

#[derive(Debug)]
struct InvalidPrefix(String);

impl Display for InvalidPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid prefix: '{}'", self.0)
    }
}

impl std::error::Error for InvalidPrefix {}

// sometimes there's a need to do some work during construction, which means bypassing Default and
// invoking a custom constructor function
#[derive(Component)]
#[bean(constructor = "Greeting::new")]
struct Greeting {
    prefix: String,
    // qualified fields get the bean registered under the qualifier, cast to the declared trait
    #[inject]
    #[named("english")]
    greeter: Wired<dyn Greeter + Send + Sync>,
    // when nothing is registered under the qualifier, the qualifier itself is injected as a value;
    // any FromStr type can be used
    #[inject]
    #[named("world")]
    target: Literal,
    #[inject]
    #[named("3")]
    repeat: Literal<usize>,
}

impl Greeting {
    // construction errors don't abort the container - the bean is simply left out
    fn new() -> Result<Self, ErrorPtr> {
        let prefix = std::env::var("GREETING_PREFIX").unwrap_or_else(|_| ">>".to_string());
        if prefix.chars().any(char::is_whitespace) {
            return Err(error_ptr(InvalidPrefix(prefix)));
        }

        Ok(Self {
            prefix,
            greeter: Default::default(),
            target: Default::default(),
            repeat: Default::default(),
        })
    }

    fn greet(&self) {
        if let (Some(greeter), Some(target), Some(repeat)) =
            (self.greeter.get(), self.target.get(), self.repeat.get())
        {
            for _ in 0..*repeat {
                println!("{} {}", self.prefix, greeter.greet(target));
            }
        }
    }
}

fn main() {
    let container = Container::new::<AppConfiguration>().expect("error building container");

    // prints ">> Hello world!" three times
    container
        .instance::<Greeting>()
        .expect("Greeting is not a bean")
        .greet();

    for (qualifier, descriptor) in container.qualifiers().iter() {
        println!("{qualifier} -> {}", descriptor.name);
    }
}
