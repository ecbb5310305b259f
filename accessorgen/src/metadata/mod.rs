//! Inputs supplied by the hosting framework.
//!
//! The generator never introspects classes itself. Mappings come from a
//! [`MetadataProvider`] and accessor annotations from an [`AnnotationReader`];
//! [`Manifest`] implements both from a serialized file.

mod manifest;

pub use manifest::{AnnotationEntry, Manifest};

use crate::types::{AccessorSettings, ClassDescriptor};

/// Source of class and mapping metadata.
pub trait MetadataProvider {
    fn classes(&self) -> &[ClassDescriptor];

    fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes().iter().find(|class| class.name == name)
    }

    /// Classes matching `filter`, see [`select_classes`].
    fn select(&self, filter: Option<&str>) -> Vec<&ClassDescriptor> {
        select_classes(self.classes(), filter)
    }
}

/// Source of accessor-settings annotations.
///
/// Each method returns every annotation instance that applies, in the order
/// they should be merged.
pub trait AnnotationReader {
    /// Annotations on the property `field` as written in `class`, the class that declares it.
    fn field_settings(&self, class: &str, field: &str) -> Vec<AccessorSettings>;

    /// Class-level annotations on `class` overriding the inherited property `field`.
    fn class_field_settings(&self, class: &str, field: &str) -> Vec<AccessorSettings>;
}

/// Picks the classes a name argument refers to.
///
/// `filter` may be a fully-qualified class name, a namespace (every class
/// below it is selected), or an unqualified class name. `/` is accepted as a
/// namespace separator. `None` selects everything.
pub fn select_classes<'a>(classes: &'a [ClassDescriptor], filter: Option<&str>) -> Vec<&'a ClassDescriptor> {
    let Some(filter) = filter else {
        return classes.iter().collect();
    };

    let filter = filter.replace('/', "\\");
    let filter = filter.trim_matches('\\');

    if let Some(class) = classes.iter().find(|class| class.name == filter) {
        return vec![class];
    }

    let prefix = format!("{filter}\\");
    let in_namespace: Vec<_> = classes.iter().filter(|class| class.name.starts_with(&prefix)).collect();
    if !in_namespace.is_empty() {
        return in_namespace;
    }

    classes.iter().filter(|class| class.short_name() == filter).collect()
}
