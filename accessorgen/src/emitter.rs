//! Rendering of accessor methods and the trait file that holds them.

use std::fmt::Write;

use log::debug;

use crate::inflect::{camelize, classify};
use crate::members::KnownMembers;
use crate::types::{AccessorKind, AccessorPolicy, short_name};

/// Type hint for getters and setters of collection-valued fields.
pub const COLLECTION_TYPE: &str = "Doctrine\\Common\\Collections\\Collection";

/// Runtime trait every generated trait pulls in for bidirectional collections.
pub const BIDIRECTIONAL_TRAIT: &str = "HasBidirectionalManyToMany";

/// Column types known to the ORM. Anything else is treated as a class name.
const COLUMN_TYPES: &[&str] = &[
    "array",
    "ascii_string",
    "bigint",
    "binary",
    "blob",
    "boolean",
    "date",
    "date_immutable",
    "dateinterval",
    "datetime",
    "datetime_immutable",
    "datetimetz",
    "datetimetz_immutable",
    "decimal",
    "float",
    "guid",
    "integer",
    "json",
    "json_array",
    "object",
    "simple_array",
    "smallint",
    "string",
    "text",
    "time",
    "time_immutable",
];

/// How column types are spelled in doc comments.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("datetimetz", "\\DateTime"),
    ("datetime", "\\DateTime"),
    ("date", "\\DateTime"),
    ("time", "\\DateTime"),
    ("object", "\\stdClass"),
    ("bigint", "integer"),
    ("smallint", "integer"),
    ("text", "string"),
    ("decimal", "float"),
];

fn is_column_type(type_name: &str) -> bool {
    COLUMN_TYPES.contains(&type_name)
}

fn doc_type(type_name: &str) -> String {
    if !is_column_type(type_name) {
        return format!("\\{type_name}");
    }
    TYPE_ALIASES
        .iter()
        .find(|(column, _)| *column == type_name)
        .map_or(type_name, |(_, alias)| *alias)
        .to_string()
}

/// Name of the `kind` accessor for a field, e.g. `addUser` for `users`.
pub fn method_name(policy: &AccessorPolicy, kind: AccessorKind) -> String {
    let base = if kind.uses_singular() {
        &policy.singular
    } else {
        &policy.public_name
    };
    format!("{}{}", kind.prefix(), classify(base))
}

/// Renders accessor methods at a fixed indentation.
#[derive(Debug, Clone)]
pub struct MethodEmitter {
    indent: String,
}

impl MethodEmitter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self { indent: indent.into() }
    }

    /// Source of the `kind` accessor for `policy` on `class`, or `None` when the
    /// class or one of its ancestors already has a method by that name.
    ///
    /// Emitted methods are recorded in `members`, so asking twice yields the
    /// method once.
    pub fn emit(
        &self,
        policy: &AccessorPolicy,
        kind: AccessorKind,
        class: &str,
        members: &mut KnownMembers<'_>,
    ) -> Option<String> {
        let name = method_name(policy, kind);
        if members.has_method(class, &name) {
            debug!("{class}::{name} already declared, skipping");
            return None;
        }

        members.record_method(class, &name);
        debug!("emitting {class}::{name}");
        Some(self.render(policy, kind, class, &name))
    }

    fn render(&self, policy: &AccessorPolicy, kind: AccessorKind, class: &str, name: &str) -> String {
        let i = &self.indent;
        let subject = if kind.uses_singular() {
            &policy.singular
        } else {
            &policy.public_name
        };
        let variable = camelize(subject);
        let field = &policy.field;

        let type_name = match kind {
            AccessorKind::Get | AccessorKind::Set if policy.stores_collection => COLLECTION_TYPE,
            _ => policy.default_type.as_str(),
        };
        let documented = doc_type(type_name);
        let hint = if is_column_type(type_name) {
            String::new()
        } else {
            format!("\\{type_name} ")
        };

        // Only collections can be kept in sync from both ends.
        let other_side = policy
            .other_side
            .as_deref()
            .filter(|_| policy.stores_collection)
            .map(classify);

        let mut code = String::new();
        let _ = writeln!(code, "/**");
        let _ = writeln!(code, " * {} {subject}", capitalized(kind.prefix()));
        let _ = writeln!(code, " *");
        match kind {
            AccessorKind::Get => {
                let _ = writeln!(code, " * @return {documented}");
                let _ = writeln!(code, " */");
                let _ = writeln!(code, "public function {name}()");
                let _ = writeln!(code, "{{");
                let _ = writeln!(code, "{i}return $this->{field};");
            }
            AccessorKind::Set => {
                let default = if policy.nullable { " = null" } else { "" };
                let _ = writeln!(code, " * @param {documented} ${variable}");
                let _ = writeln!(code, " * @return {}", short_name(class));
                let _ = writeln!(code, " */");
                let _ = writeln!(code, "public function {name}({hint}${variable}{default})");
                let _ = writeln!(code, "{{");
                match &other_side {
                    Some(other) => {
                        let _ = writeln!(
                            code,
                            "{i}$this->{field} = $this->setInBothCollections(${variable}, $this->{field}, 'remove{other}', 'add{other}');"
                        );
                    }
                    None => {
                        let _ = writeln!(code, "{i}$this->{field} = ${variable};");
                    }
                }
                let _ = writeln!(code);
                let _ = writeln!(code, "{i}return $this;");
            }
            AccessorKind::Add => {
                let _ = writeln!(code, " * @param {documented} ${variable}");
                let _ = writeln!(code, " * @return {}", short_name(class));
                let _ = writeln!(code, " */");
                let _ = writeln!(code, "public function {name}({hint}${variable})");
                let _ = writeln!(code, "{{");
                match &other_side {
                    Some(other) => {
                        let _ = writeln!(
                            code,
                            "{i}$this->{field} = $this->addToBothCollections(${variable}, $this->{field}, 'add{other}');"
                        );
                    }
                    None => {
                        let _ = writeln!(code, "{i}$this->{field}[] = ${variable};");
                    }
                }
                let _ = writeln!(code);
                let _ = writeln!(code, "{i}return $this;");
            }
            AccessorKind::Remove => {
                let _ = writeln!(code, " * @param {documented} ${variable}");
                let _ = writeln!(code, " */");
                let _ = writeln!(code, "public function {name}({hint}${variable})");
                let _ = writeln!(code, "{{");
                match &other_side {
                    Some(other) => {
                        let _ = writeln!(
                            code,
                            "{i}$this->{field} = $this->removeFromBothCollections(${variable}, $this->{field}, 'remove{other}');"
                        );
                    }
                    None => {
                        let _ = writeln!(code, "{i}$this->{field}->removeElement(${variable});");
                    }
                }
            }
        }
        code.push('}');

        indent_lines(&code, i)
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Prefixes every non-empty line with `indent`.
fn indent_lines(code: &str, indent: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full source of a generated trait file.
pub fn render_artifact(
    namespace: &str,
    trait_name: &str,
    runtime_namespace: &str,
    methods: &[String],
    indent: &str,
) -> String {
    let mut code = String::new();
    let _ = writeln!(code, "<?php");
    let _ = writeln!(code);
    if !namespace.is_empty() {
        let _ = writeln!(code, "namespace {namespace};");
        let _ = writeln!(code);
    }
    let _ = writeln!(code, "/**");
    let _ = writeln!(
        code,
        " * Generated by accessorgen and overwritten on every run. Do not edit this file."
    );
    let _ = writeln!(
        code,
        " * To customise one of these methods, declare it in the class itself and run the"
    );
    let _ = writeln!(code, " * generator again: the generated version is then left out.");
    let _ = writeln!(code, " */");
    let _ = writeln!(code, "trait {trait_name}");
    let _ = writeln!(code, "{{");
    let _ = writeln!(
        code,
        "{indent}use \\{}\\{BIDIRECTIONAL_TRAIT};",
        runtime_namespace.trim_matches('\\')
    );
    if !methods.is_empty() {
        let _ = writeln!(code);
        let _ = writeln!(code, "{}", methods.join("\n\n"));
    }
    let _ = writeln!(code, "}}");
    code
}
