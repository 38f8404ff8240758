use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use prototypal::{Descriptor, DynObject, Value, PROTOTYPE};

#[derive(Parser)]
#[command(name = "demo", version, about = "Walk through prototype-based objects")]
struct Cli {
    /// Which walkthrough to run
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Log lookups and hooks
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Basics,
    Inheritance,
    Factory,
    Hooks,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let runs: &[(Scenario, fn() -> Result<()>)] = &[
        (Scenario::Basics, basics),
        (Scenario::Inheritance, inheritance),
        (Scenario::Factory, factory),
        (Scenario::Hooks, hooks),
    ];
    for (scenario, run) in runs {
        if cli.scenario == Scenario::All || cli.scenario == *scenario {
            run()?;
        }
    }

    Ok(())
}

/// A method that prints `text` and returns nothing
fn say(text: &'static str) -> Value {
    Value::closure(move |_, _| {
        println!("{text}");
        Ok(Value::Nil)
    })
}

fn basics() -> Result<()> {
    println!("== basics");
    let obj1 = DynObject::new();
    obj1.set("a", 1);
    obj1.set("getA", Value::closure(|this, _| Ok(this.get_or_nil("a"))));
    println!("{}", obj1.invoke_method("getA", &[])?);

    let obj2 = DynObject::new();
    if let Some(prototype) = obj2.prototype() {
        prototype.set("getB", Value::closure(|this, _| Ok(this.get_or_nil("b"))));
        obj1.set("b", 2);
        obj1.set_prototype(&prototype);
    }
    println!("{}", obj1.invoke_method("getB", &[])?);

    // borrow a method for another receiver
    let obj3 = DynObject::new();
    obj3.set("b", 3);
    if let Some(get_b) = obj1.resolve_optional("getB") {
        println!("{}", get_b.call_with(&obj3, Vec::<Value>::new())?);
    }
    Ok(())
}

fn inheritance() -> Result<()> {
    println!("== inheritance");
    let obj1 = DynObject::new();
    let proto1 = obj1.get_or_nil(PROTOTYPE);
    let proto1 = proto1
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("default object has no prototype"))?;
    proto1.set("foo", say("foo"));

    let obj2 = DynObject::construct(proto1);
    obj2.invoke_method("foo", &[])?;

    proto1.set("foo", say("bar"));
    obj2.invoke_method("foo", &[])?; // live delegation

    let obj3 = DynObject::construct(&DynObject::with_prototype(proto1));
    proto1.set("foo", say("baz"));
    obj3.invoke_method("foo", &[])?; // transitive

    let obj4 = DynObject::new();
    let proto4 = obj4
        .prototype()
        .ok_or_else(|| anyhow::anyhow!("default object has no prototype"))?;
    proto4.set("foo", say("pok"));
    obj3.set_prototype(&proto4.clone_object()?);
    obj3.invoke_method("foo", &[])?;

    proto4.set("foo", say("pom"));
    obj3.invoke_method("foo", &[])?; // still pok, the prototype was copied

    let obj5 = DynObject::new();
    obj5.set("foo", say("sup"));
    obj3.set_prototype(&obj5);
    obj3.invoke_method("foo", &[])?;
    Ok(())
}

fn factory() -> Result<()> {
    println!("== factory");
    let class = DynObject::new();
    class.set(
        "new",
        Value::closure(|this, _| {
            Ok(DynObject::from_value(this.get_or_nil(PROTOTYPE))?.into())
        }),
    );
    let instance = class.invoke_method("new", &[])?;
    let instance = DynObject::try_from(instance)?;

    if let Some(prototype) = class.prototype() {
        prototype.set("sayHello", say("hello!"));
    }
    instance.invoke_method("sayHello", &[])?;
    Ok(())
}

fn hooks() -> Result<()> {
    println!("== hooks");
    let descriptor = Descriptor::new()
        .with("name", "point")
        .with("x", 1)
        .with(
            "toString",
            Value::closure(|this, _| {
                Ok(format!("{}({})", this.get_or_nil("name"), this.get_or_nil("x")).into())
            }),
        )
        .with(
            "clone",
            Value::closure(|this, _| {
                let x = isize::try_from(this.get_or_nil("x"))?;
                this.set("x", x + 1);
                Ok(Value::Nil)
            }),
        )
        .with("destruct", say("released"));
    let point = DynObject::construct(descriptor);
    println!("{point}");

    let copy = point.clone_object()?;
    println!("{copy}");
    for (name, value) in &copy {
        println!("  {name} = {value}");
    }

    drop(copy);
    println!("{}", DynObject::new());
    Ok(())
}
