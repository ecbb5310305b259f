//! Index of the methods and properties each class is known to declare.
//!
//! Answers "does class X already have method Y" for the emitter. Entries are
//! loaded lazily from an [`Introspector`] the first time a class is asked
//! about, and replaced by a fresh scan whenever a host file is rewritten, so
//! that methods written by a previous run are never mistaken for missing ones
//! (or the other way round). The index lives for one generation run.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::layout::SourceLayout;
use crate::scanner::{self, ScannedClass};
use crate::types::ClassDescriptor;

/// Members known for one class. Method names are compared case-insensitively,
/// as PHP does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMembers {
    methods: BTreeSet<String>,
    properties: BTreeSet<String>,
}

impl ClassMembers {
    pub fn add_method(&mut self, name: &str) {
        self.methods.insert(name.to_ascii_lowercase());
    }

    pub fn add_property(&mut self, name: &str) {
        self.properties.insert(name.to_string());
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(&name.to_ascii_lowercase())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub fn extend(&mut self, other: &Self) {
        self.methods.extend(other.methods.iter().cloned());
        self.properties.extend(other.properties.iter().cloned());
    }
}

impl From<&ScannedClass> for ClassMembers {
    fn from(scanned: &ScannedClass) -> Self {
        let mut members = Self::default();
        for method in &scanned.methods {
            members.add_method(method);
        }
        for property in &scanned.properties {
            members.add_property(property);
        }
        members
    }
}

/// Live lookup of a class's members, consulted for classes the index has not
/// seen yet in this run.
pub trait Introspector {
    fn introspect(&self, class: &str) -> Option<ClassMembers>;
}

impl<T: Introspector + ?Sized> Introspector for Box<T> {
    fn introspect(&self, class: &str) -> Option<ClassMembers> {
        (**self).introspect(class)
    }
}

/// Knows nothing; every class starts empty.
pub struct NoIntrospection;

impl Introspector for NoIntrospection {
    fn introspect(&self, _class: &str) -> Option<ClassMembers> {
        None
    }
}

/// Reads a class's members from its source file, including the generated
/// trait currently attached to it.
pub struct SourceIntrospector {
    layout: SourceLayout,
}

impl SourceIntrospector {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    fn scan_file(path: &std::path::Path, class: &str) -> Option<ClassMembers> {
        let source = std::fs::read_to_string(path).ok()?;
        scanner::scan(&source)
            .iter()
            .find(|scanned| scanned.name == class)
            .map(ClassMembers::from)
    }
}

impl Introspector for SourceIntrospector {
    fn introspect(&self, class: &str) -> Option<ClassMembers> {
        let host = self.layout.host_path(class);
        let source = std::fs::read_to_string(&host).ok()?;
        let mut members = scanner::scan(&source)
            .iter()
            .find(|scanned| scanned.name == class)
            .map(ClassMembers::from)?;

        let artifact = self.layout.artifact_name(class);
        if source.contains(&format!("use \\{artifact};")) {
            let artifact_path = self.layout.artifact_path(class);
            if let Some(generated) = Self::scan_file(&artifact_path, &artifact) {
                members.extend(&generated);
            }
        }

        Some(members)
    }
}

/// Per-run index of known class members.
pub struct KnownMembers<'a> {
    introspector: Box<dyn Introspector + 'a>,
    index: HashMap<String, ClassMembers>,
    /// Methods declared outside the scanned sources; survive refreshes.
    external: HashMap<String, ClassMembers>,
    parents: HashMap<String, String>,
}

impl<'a> KnownMembers<'a> {
    pub fn new(introspector: impl Introspector + 'a) -> Self {
        Self {
            introspector: Box::new(introspector),
            index: HashMap::new(),
            external: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    /// Registers class hierarchy and externally known methods.
    pub fn with_classes(mut self, classes: &[ClassDescriptor]) -> Self {
        for class in classes {
            if let Some(parent) = &class.parent {
                self.parents.insert(class.name.clone(), parent.clone());
            }
            let external = self.external.entry(class.name.clone()).or_default();
            for method in &class.methods {
                external.add_method(method);
            }
        }
        self
    }

    fn ensure_loaded(&mut self, class: &str) -> &ClassMembers {
        if !self.index.contains_key(class) {
            let members = self.introspector.introspect(class).unwrap_or_default();
            self.index.insert(class.to_string(), members);
        }
        &self.index[class]
    }

    /// Whether `class` or one of its ancestors declares `method`.
    pub fn has_method(&mut self, class: &str, method: &str) -> bool {
        let mut current = Some(class.to_string());
        let mut visited = BTreeSet::new();

        while let Some(name) = current {
            if !visited.insert(name.clone()) {
                break;
            }
            let external = self.external.get(&name).is_some_and(|members| members.has_method(method));
            if external || self.ensure_loaded(&name).has_method(method) {
                return true;
            }
            current = self.parents.get(&name).cloned();
        }

        false
    }

    pub fn has_property(&mut self, class: &str, property: &str) -> bool {
        self.ensure_loaded(class).has_property(property)
    }

    /// Notes a method that was just generated for `class`.
    pub fn record_method(&mut self, class: &str, method: &str) {
        self.ensure_loaded(class);
        if let Some(members) = self.index.get_mut(class) {
            members.add_method(method);
        }
    }

    /// Replaces the entries of every class declared in `source`.
    pub fn refresh_from_source(&mut self, source: &str) {
        for scanned in scanner::scan(source) {
            debug!(
                "indexed {} ({} methods, {} properties)",
                scanned.name,
                scanned.methods.len(),
                scanned.properties.len()
            );
            self.index.insert(scanned.name.clone(), ClassMembers::from(&scanned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorSettings;
    use std::cell::Cell;

    struct Counting<'c> {
        calls: &'c Cell<usize>,
    }

    impl Introspector for Counting<'_> {
        fn introspect(&self, _class: &str) -> Option<ClassMembers> {
            self.calls.set(self.calls.get() + 1);
            let mut members = ClassMembers::default();
            members.add_method("getLive");
            Some(members)
        }
    }

    #[test]
    fn test_lazy_introspection_is_cached() {
        let calls = Cell::new(0);
        let mut members = KnownMembers::new(Counting { calls: &calls });

        assert!(members.has_method("App\\User", "getLive"));
        assert!(members.has_method("App\\User", "GETLIVE"));
        assert!(!members.has_method("App\\User", "getOther"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_refresh_replaces_stale_entry() {
        let calls = Cell::new(0);
        let mut members = KnownMembers::new(Counting { calls: &calls });
        assert!(members.has_method("App\\User", "getLive"));

        members.refresh_from_source("<?php\nnamespace App;\nclass User { public function getName() {} }\n");
        assert!(!members.has_method("App\\User", "getLive"));
        assert!(members.has_method("App\\User", "getName"));
    }

    #[test]
    fn test_record_and_ancestors() {
        let classes = vec![
            ClassDescriptor::new("App\\Base"),
            ClassDescriptor::new("App\\Child").parent("App\\Base"),
        ];
        let mut members = KnownMembers::new(NoIntrospection).with_classes(&classes);

        members.record_method("App\\Base", "getId");
        assert!(members.has_method("App\\Child", "getId"));
        assert!(!members.has_method("App\\Base", "getName"));
    }

    #[test]
    fn test_external_methods_survive_refresh() {
        let mut class = ClassDescriptor::new("App\\User");
        class.methods.push("getRoles".into());
        let mut members = KnownMembers::new(NoIntrospection).with_classes(&[class]);

        members.refresh_from_source("<?php\nnamespace App;\nclass User {}\n");
        assert!(members.has_method("App\\User", "getRoles"));
    }

    #[test]
    fn test_source_introspector_includes_attached_trait() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SourceLayout::new(dir.path(), &GeneratorSettings::default());

        let host = layout.host_path("App\\Base");
        std::fs::create_dir_all(host.parent().unwrap()).unwrap();
        std::fs::write(
            &host,
            "<?php\nnamespace App;\nclass Base\n{\n    protected $name;\n\n    use \\App\\AutomaticAccessors\\Base;\n}\n",
        )
        .unwrap();

        let artifact = layout.artifact_path("App\\Base");
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(
            &artifact,
            "<?php\nnamespace App\\AutomaticAccessors;\ntrait Base\n{\n    public function getName() {}\n}\n",
        )
        .unwrap();

        let introspected = SourceIntrospector::new(layout).introspect("App\\Base").unwrap();
        assert!(introspected.has_method("getName"));
        assert!(introspected.has_property("name"));
    }
}
