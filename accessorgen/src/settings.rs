//! Resolution of per-field accessor policies.
//!
//! A field's policy starts from defaults, is adjusted by the annotations on the
//! class that declares the property, and, when the property is inherited, by
//! class-level overrides on the class being processed. Overrides can only
//! widen visibility: accessors a parent already exposes stay inherited.

use std::borrow::Cow;

use log::debug;

use crate::errors::{GenerateError, GenerateResult};
use crate::inflect::singularize;
use crate::metadata::AnnotationReader;
use crate::types::{AccessorPolicy, AccessorSettings, ClassDescriptor, FieldMapping, IdGenerator, Visibility};

/// Whether `class` has `ancestor` somewhere up its parent chain.
fn descends_from(class: &ClassDescriptor, ancestor: &str, all: &[ClassDescriptor]) -> bool {
    let mut parent = class.parent.as_deref();
    let mut depth = 0;

    while let Some(name) = parent {
        if name == ancestor {
            return true;
        }
        depth += 1;
        if depth > all.len() {
            return false;
        }
        parent = all
            .iter()
            .find(|candidate| candidate.name == name)
            .and_then(|candidate| candidate.parent.as_deref());
    }

    false
}

/// The descriptor generation should work from.
///
/// A mapped superclass records no mappings of its own; they live on its
/// concrete subclasses. Those are borrowed from the first subclass found,
/// keeping only the properties the superclass itself declares, along with the
/// subclass's id generator.
pub fn effective_descriptor<'a>(
    class: &'a ClassDescriptor,
    all: &[ClassDescriptor],
) -> GenerateResult<Cow<'a, ClassDescriptor>> {
    if !class.mapped_superclass {
        return Ok(Cow::Borrowed(class));
    }

    let mut descendants = all
        .iter()
        .filter(|candidate| candidate.name != class.name && descends_from(candidate, &class.name, all))
        .peekable();
    let first = descendants.peek().copied();
    // Intermediate abstract classes may carry none of the mappings.
    let subclass = descendants
        .find(|candidate| {
            candidate
                .fields
                .iter()
                .any(|field| field.declaring_class(&candidate.name) == class.name)
        })
        .or(first)
        .ok_or_else(|| {
            GenerateError::configuration(
                &class.name,
                "cannot generate accessors for a mapped superclass without a known subclass",
            )
        })?;

    debug!("borrowing mappings for {} from {}", class.name, subclass.name);

    let mut effective = class.clone();
    effective.fields = subclass
        .fields
        .iter()
        .filter(|field| field.declaring_class(&subclass.name) == class.name)
        .cloned()
        .collect();
    effective.generator = subclass.generator;

    Ok(Cow::Owned(effective))
}

fn is_generated_id(field: &FieldMapping, class: &ClassDescriptor) -> bool {
    field.id && class.generator != IdGenerator::None
}

/// A single-valued association is nullable unless it is part of the id or a
/// join column forbids null.
fn is_nullable_association(field: &FieldMapping) -> bool {
    !field.id && !field.join_columns().iter().any(|column| column.nullable == Some(false))
}

/// Database-assigned ids are never settable.
fn restrict_generated_id(visibility: Visibility, field: &FieldMapping, class: &ClassDescriptor) -> Visibility {
    if is_generated_id(field, class) && visibility != Visibility::Private {
        Visibility::ReadOnly
    } else {
        visibility
    }
}

/// Resolves [`AccessorPolicy`]s from annotations.
pub struct SettingsResolver<'a> {
    reader: &'a dyn AnnotationReader,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(reader: &'a dyn AnnotationReader) -> Self {
        Self { reader }
    }

    /// Policy for `field` when generating the trait of `class`.
    ///
    /// `class` must be the effective descriptor (see [`effective_descriptor`]).
    pub fn resolve(&self, field: &FieldMapping, class: &ClassDescriptor) -> AccessorPolicy {
        let declaring = field.declaring_class(&class.name);
        let annotation = AccessorSettings::merged(&self.reader.field_settings(declaring, &field.name));
        let stores_collection = field.is_to_many();

        let visibility = restrict_generated_id(annotation.visibility.unwrap_or_default(), field, class);
        let mut policy = AccessorPolicy {
            field: field.name.clone(),
            visibility,
            public_name: annotation.public_name.unwrap_or_else(|| field.name.clone()),
            singular: annotation
                .singular
                .unwrap_or_else(|| singularize(&field.name).preferred().to_string()),
            other_side: annotation.other_side,
            stores_collection,
            nullable: field.is_association() && !stores_collection && is_nullable_association(field),
            default_type: field.type_name().to_string(),
            accessors: visibility.accessors(stores_collection),
        };

        if !class.declares(field) {
            self.apply_inherited(&mut policy, field, class);
        }

        policy
    }

    /// Without a local override the declaring class's trait covers the field.
    /// A widening override yields the full accessor set under the possibly
    /// renamed field; names the parent already has are dropped by the emitter.
    fn apply_inherited(&self, policy: &mut AccessorPolicy, field: &FieldMapping, class: &ClassDescriptor) {
        policy.accessors.clear();

        let overrides = self.reader.class_field_settings(&class.name, &field.name);
        if overrides.is_empty() {
            return;
        }
        let local = AccessorSettings::merged(&overrides);

        if let Some(requested) = local.visibility {
            if policy.visibility.is_widened_by(requested) {
                let widened = restrict_generated_id(requested, field, class);
                policy.visibility = widened;
                policy.accessors = widened.accessors(policy.stores_collection);
            } else {
                debug!(
                    "{}::{}: ignoring override narrowing {} to {}",
                    class.name,
                    field.name,
                    policy.visibility.as_str(),
                    requested.as_str()
                );
            }
        }

        if let Some(public_name) = local.public_name {
            policy.public_name = public_name;
        }
        if let Some(singular) = local.singular {
            policy.singular = singular;
        }
        if local.other_side.is_some() {
            policy.other_side = local.other_side;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Manifest;
    use crate::types::{AccessorKind, AssociationKind, JoinColumn};
    use AccessorKind::*;

    fn settings(visibility: Option<Visibility>) -> AccessorSettings {
        AccessorSettings {
            visibility,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_for_scalar_field() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\Tag").field(FieldMapping::field("label", "string"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::Public);
        assert_eq!(policy.public_name, "label");
        assert_eq!(policy.default_type, "string");
        assert!(!policy.nullable);
        assert_eq!(policy.accessors, vec![Get, Set]);
    }

    #[test]
    fn test_collection_defaults_use_singular() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\Group").field(FieldMapping::association(
            "categories",
            AssociationKind::ManyToMany,
            "App\\Category",
        ));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.singular, "category");
        assert_eq!(policy.default_type, "App\\Category");
        assert!(policy.stores_collection);
        assert_eq!(policy.accessors, vec![Get, Set, Add, Remove]);
    }

    #[test]
    fn test_generated_id_is_read_only() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\User")
            .generator(IdGenerator::Auto)
            .field(FieldMapping::field("id", "integer").with_id());
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::ReadOnly);
        assert_eq!(policy.accessors, vec![Get]);
    }

    #[test]
    fn test_assigned_id_keeps_setter() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\Country").field(FieldMapping::field("code", "string").with_id());
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);
        assert_eq!(policy.accessors, vec![Get, Set]);
    }

    #[test]
    fn test_private_generated_id_stays_private() {
        let manifest = Manifest::default().annotate("App\\User", "id", settings(Some(Visibility::Private)));
        let class = ClassDescriptor::new("App\\User")
            .generator(IdGenerator::Identity)
            .field(FieldMapping::field("id", "integer").with_id());
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);
        assert!(policy.accessors.is_empty());
    }

    #[test]
    fn test_nullable_single_association() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\Post")
            .field(FieldMapping::association("author", AssociationKind::ManyToOne, "App\\User"))
            .field(
                FieldMapping::association("blog", AssociationKind::ManyToOne, "App\\Blog").join_column(JoinColumn {
                    name: Some("blog_id".into()),
                    nullable: Some(false),
                }),
            );
        let resolver = SettingsResolver::new(&manifest);

        assert!(resolver.resolve(&class.fields[0], &class).nullable);
        assert!(!resolver.resolve(&class.fields[1], &class).nullable);
    }

    #[test]
    fn test_annotations_merge_in_order() {
        let manifest = Manifest::default()
            .annotate(
                "App\\Group",
                "users",
                AccessorSettings {
                    singular: Some("person".into()),
                    other_side: Some("groups".into()),
                    ..Default::default()
                },
            )
            .annotate(
                "App\\Group",
                "users",
                AccessorSettings {
                    singular: Some("user".into()),
                    ..Default::default()
                },
            );
        let class = ClassDescriptor::new("App\\Group").field(FieldMapping::association(
            "users",
            AssociationKind::ManyToMany,
            "App\\User",
        ));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.singular, "user");
        assert_eq!(policy.other_side.as_deref(), Some("groups"));
    }

    #[test]
    fn test_inherited_field_without_override_is_skipped() {
        let manifest = Manifest::default();
        let class = ClassDescriptor::new("App\\Admin")
            .parent("App\\User")
            .field(FieldMapping::field("email", "string").declared_in("App\\User"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);
        assert!(policy.accessors.is_empty());
    }

    #[test]
    fn test_override_widens_inherited_visibility() {
        let manifest = Manifest::default()
            .annotate("App\\User", "email", settings(Some(Visibility::ReadOnly)))
            .override_field("App\\Admin", "email", settings(Some(Visibility::Public)));
        let class = ClassDescriptor::new("App\\Admin")
            .parent("App\\User")
            .field(FieldMapping::field("email", "string").declared_in("App\\User"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::Public);
        assert_eq!(policy.accessors, vec![Get, Set]);
    }

    #[test]
    fn test_widening_override_with_new_public_name() {
        let manifest = Manifest::default()
            .annotate("App\\User", "email", settings(Some(Visibility::ReadOnly)))
            .override_field(
                "App\\Admin",
                "email",
                AccessorSettings {
                    visibility: Some(Visibility::Public),
                    public_name: Some("mail".into()),
                    ..Default::default()
                },
            );
        let class = ClassDescriptor::new("App\\Admin")
            .parent("App\\User")
            .field(FieldMapping::field("email", "string").declared_in("App\\User"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.public_name, "mail");
        assert_eq!(policy.accessors, vec![Get, Set]);
    }

    #[test]
    fn test_override_cannot_narrow_public_parent() {
        let manifest = Manifest::default().override_field("App\\Admin", "email", settings(Some(Visibility::ReadOnly)));
        let class = ClassDescriptor::new("App\\Admin")
            .parent("App\\User")
            .field(FieldMapping::field("email", "string").declared_in("App\\User"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::Public);
        assert!(policy.accessors.is_empty());
    }

    #[test]
    fn test_override_between_read_and_write_only_is_ignored() {
        let manifest = Manifest::default()
            .annotate("App\\User", "email", settings(Some(Visibility::ReadOnly)))
            .override_field("App\\Admin", "email", settings(Some(Visibility::WriteOnly)));
        let class = ClassDescriptor::new("App\\Admin")
            .parent("App\\User")
            .field(FieldMapping::field("email", "string").declared_in("App\\User"));
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::ReadOnly);
        assert!(policy.accessors.is_empty());
    }

    #[test]
    fn test_override_from_private_and_names_fall_back() {
        let manifest = Manifest::default()
            .annotate(
                "App\\Team",
                "members",
                AccessorSettings {
                    visibility: Some(Visibility::Private),
                    other_side: Some("teams".into()),
                    ..Default::default()
                },
            )
            .override_field(
                "App\\Squad",
                "members",
                AccessorSettings {
                    visibility: Some(Visibility::WriteOnly),
                    singular: Some("player".into()),
                    ..Default::default()
                },
            );
        let class = ClassDescriptor::new("App\\Squad").parent("App\\Team").field(
            FieldMapping::association("members", AssociationKind::ManyToMany, "App\\Person").declared_in("App\\Team"),
        );
        let policy = SettingsResolver::new(&manifest).resolve(&class.fields[0], &class);

        assert_eq!(policy.visibility, Visibility::WriteOnly);
        assert_eq!(policy.accessors, vec![Set, Add, Remove]);
        assert_eq!(policy.singular, "player");
        assert_eq!(policy.public_name, "members");
        assert_eq!(policy.other_side.as_deref(), Some("teams"));
    }

    #[test]
    fn test_mapped_superclass_borrows_declared_fields() {
        let base = ClassDescriptor::new("App\\Model").mapped_superclass();
        let child = ClassDescriptor::new("App\\Article")
            .parent("App\\Model")
            .generator(IdGenerator::Auto)
            .field(FieldMapping::field("id", "integer").with_id().declared_in("App\\Model"))
            .field(FieldMapping::field("title", "string"));
        let all = vec![base, child];

        let effective = effective_descriptor(&all[0], &all).unwrap();
        assert_eq!(effective.fields.len(), 1);
        assert_eq!(effective.fields[0].name, "id");
        assert_eq!(effective.generator, IdGenerator::Auto);

        let manifest = Manifest::default();
        let policy = SettingsResolver::new(&manifest).resolve(&effective.fields[0], &effective);
        assert_eq!(policy.accessors, vec![Get]);
    }

    #[test]
    fn test_mapped_superclass_through_intermediate_class() {
        let all = vec![
            ClassDescriptor::new("App\\Model").mapped_superclass(),
            ClassDescriptor::new("App\\Content").parent("App\\Model").mapped_superclass(),
            ClassDescriptor::new("App\\Page")
                .parent("App\\Content")
                .field(FieldMapping::field("slug", "string").declared_in("App\\Model")),
        ];

        let effective = effective_descriptor(&all[0], &all).unwrap();
        assert_eq!(effective.fields.len(), 1);
    }

    #[test]
    fn test_mapped_superclass_without_subclass_fails() {
        let all = vec![ClassDescriptor::new("App\\Orphan").mapped_superclass()];
        let err = effective_descriptor(&all[0], &all).unwrap_err();
        assert!(matches!(err, GenerateError::Configuration { .. }));
    }
}
