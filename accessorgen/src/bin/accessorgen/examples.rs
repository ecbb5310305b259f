use crate::commands::{detach, generate, init, runtime, scan};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "init",
            groups: init::EXAMPLES,
        },
        CommandExample {
            name: "generate",
            groups: generate::EXAMPLES,
        },
        CommandExample {
            name: "detach",
            groups: detach::EXAMPLES,
        },
        CommandExample {
            name: "runtime",
            groups: runtime::EXAMPLES,
        },
        CommandExample {
            name: "scan",
            groups: scan::EXAMPLES,
        },
    ]
}
