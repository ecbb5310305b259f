//! Metadata model consumed by the generator and the policies it derives.

use serde::{Deserialize, Serialize};

/// Accessor visibility requested for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    ReadOnly,
    WriteOnly,
}

impl Visibility {
    /// Whether `other` exposes at least everything `self` exposes.
    ///
    /// `ReadOnly` and `WriteOnly` are incomparable: each is wider than `Private`
    /// and narrower than `Public`.
    pub fn is_widened_by(self, other: Self) -> bool {
        self == other || self == Self::Private || other == Self::Public
    }

    /// Accessor methods generated for this visibility.
    pub fn accessors(self, to_many: bool) -> Vec<AccessorKind> {
        use AccessorKind::*;

        match (self, to_many) {
            (Self::Private, _) => vec![],
            (Self::ReadOnly, _) => vec![Get],
            (Self::WriteOnly, false) => vec![Set],
            (Self::WriteOnly, true) => vec![Set, Add, Remove],
            (Self::Public, false) => vec![Get, Set],
            (Self::Public, true) => vec![Get, Set, Add, Remove],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
        }
    }
}

/// Shape of a generated method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    /// Adders and removers take one item, so they are named after the singular.
    pub fn uses_singular(self) -> bool {
        matches!(self, Self::Add | Self::Remove)
    }
}

/// One accessor-settings annotation instance. Unset attributes defer to
/// whatever was set earlier or to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorSettings {
    pub visibility: Option<Visibility>,
    pub public_name: Option<String>,
    pub singular: Option<String>,
    /// Method name ending of the paired accessor on the related entity, e.g.
    /// `groups` for `addGroups`/`removeGroups`.
    pub other_side: Option<String>,
}

impl AccessorSettings {
    /// Overwrites only the attributes that `other` explicitly sets.
    pub fn merge_in(&mut self, other: &Self) {
        if other.visibility.is_some() {
            self.visibility = other.visibility;
        }
        if other.public_name.is_some() {
            self.public_name.clone_from(&other.public_name);
        }
        if other.singular.is_some() {
            self.singular.clone_from(&other.singular);
        }
        if other.other_side.is_some() {
            self.other_side.clone_from(&other.other_side);
        }
    }

    pub fn merged<'a>(instances: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut merged = Self::default();
        for instance in instances {
            merged.merge_in(instance);
        }
        merged
    }
}

/// How the database assigns primary keys for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdGenerator {
    #[default]
    None,
    Auto,
    Sequence,
    Identity,
    Uuid,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssociationKind {
    OneToOne,
    ManyToOne,
    OneToMany,
    ManyToMany,
}

impl AssociationKind {
    pub fn is_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinColumn {
    pub name: Option<String>,
    pub nullable: Option<bool>,
}

/// A mapped scalar column or a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mapping", rename_all = "lowercase")]
pub enum MappingKind {
    Field {
        /// Column type, e.g. `string`, `datetime`, `bigint`.
        #[serde(rename = "type")]
        column_type: String,
    },
    Association {
        kind: AssociationKind,
        /// Fully-qualified class name of the related entity.
        target_entity: String,
        #[serde(default)]
        mapped_by: Option<String>,
        #[serde(default)]
        inversed_by: Option<String>,
        #[serde(default)]
        join_columns: Vec<JoinColumn>,
    },
}

/// A named field or relationship of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    /// Class that declares the property. Defaults to the class the mapping is
    /// listed under.
    #[serde(default)]
    pub declared_in: Option<String>,
    #[serde(default)]
    pub id: bool,
    #[serde(flatten)]
    pub kind: MappingKind,
}

impl FieldMapping {
    pub fn field(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_in: None,
            id: false,
            kind: MappingKind::Field {
                column_type: column_type.into(),
            },
        }
    }

    pub fn association(name: impl Into<String>, kind: AssociationKind, target_entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_in: None,
            id: false,
            kind: MappingKind::Association {
                kind,
                target_entity: target_entity.into(),
                mapped_by: None,
                inversed_by: None,
                join_columns: Vec::new(),
            },
        }
    }

    pub fn with_id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn declared_in(mut self, class: impl Into<String>) -> Self {
        self.declared_in = Some(class.into());
        self
    }

    pub fn join_column(mut self, column: JoinColumn) -> Self {
        if let MappingKind::Association { join_columns, .. } = &mut self.kind {
            join_columns.push(column);
        }
        self
    }

    pub fn is_association(&self) -> bool {
        matches!(self.kind, MappingKind::Association { .. })
    }

    pub fn is_to_many(&self) -> bool {
        matches!(&self.kind, MappingKind::Association { kind, .. } if kind.is_to_many())
    }

    /// Column type for fields, target entity for associations.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            MappingKind::Field { column_type } => column_type,
            MappingKind::Association { target_entity, .. } => target_entity,
        }
    }

    pub fn join_columns(&self) -> &[JoinColumn] {
        match &self.kind {
            MappingKind::Association { join_columns, .. } => join_columns,
            MappingKind::Field { .. } => &[],
        }
    }

    /// Declaring class, falling back to `listed_on` when the mapping does not name one.
    pub fn declaring_class<'a>(&'a self, listed_on: &'a str) -> &'a str {
        self.declared_in.as_deref().unwrap_or(listed_on)
    }
}

/// Everything the generator knows about one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Fully-qualified class name, e.g. `App\Entity\Group`.
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Abstract base whose mappings are recorded on its concrete subclasses.
    #[serde(default)]
    pub mapped_superclass: bool,
    #[serde(default)]
    pub generator: IdGenerator,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
    /// Methods the class is known to have without looking at its source, such
    /// as ones inherited from framework base classes.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Pair of fields whose swapped values must stay unique.
    #[serde(default)]
    pub unique_symmetrically: Option<Vec<String>>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            mapped_superclass: false,
            generator: IdGenerator::None,
            fields: Vec::new(),
            methods: Vec::new(),
            unique_symmetrically: None,
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn mapped_superclass(mut self) -> Self {
        self.mapped_superclass = true;
        self
    }

    pub fn generator(mut self, generator: IdGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Unqualified class name.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    /// Namespace without the class name; empty for global classes.
    pub fn namespace(&self) -> &str {
        self.name.rsplit_once('\\').map(|(ns, _)| ns).unwrap_or_default()
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether `field` is declared by this class itself rather than inherited.
    pub fn declares(&self, field: &FieldMapping) -> bool {
        field.declaring_class(&self.name) == self.name
    }
}

pub fn short_name(fqcn: &str) -> &str {
    fqcn.rsplit_once('\\').map(|(_, name)| name).unwrap_or(fqcn)
}

/// Final, per-field accessor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorPolicy {
    pub field: String,
    pub visibility: Visibility,
    pub public_name: String,
    pub singular: String,
    pub other_side: Option<String>,
    pub stores_collection: bool,
    pub nullable: bool,
    pub default_type: String,
    pub accessors: Vec<AccessorKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_widening() {
        use Visibility::*;

        assert!(Private.is_widened_by(ReadOnly));
        assert!(Private.is_widened_by(WriteOnly));
        assert!(ReadOnly.is_widened_by(Public));
        assert!(ReadOnly.is_widened_by(ReadOnly));
        assert!(!Public.is_widened_by(ReadOnly));
        assert!(!Public.is_widened_by(Private));
        assert!(!ReadOnly.is_widened_by(WriteOnly));
        assert!(!WriteOnly.is_widened_by(ReadOnly));
    }

    #[test]
    fn test_visibility_accessors() {
        use AccessorKind::*;

        assert!(Visibility::Private.accessors(true).is_empty());
        assert_eq!(Visibility::ReadOnly.accessors(true), vec![Get]);
        assert_eq!(Visibility::WriteOnly.accessors(false), vec![Set]);
        assert_eq!(Visibility::WriteOnly.accessors(true), vec![Set, Add, Remove]);
        assert_eq!(Visibility::Public.accessors(false), vec![Get, Set]);
        assert_eq!(Visibility::Public.accessors(true), vec![Get, Set, Add, Remove]);
    }

    #[test]
    fn test_settings_merge_keeps_set_attributes() {
        let mut merged = AccessorSettings {
            visibility: Some(Visibility::ReadOnly),
            singular: Some("person".into()),
            ..Default::default()
        };
        merged.merge_in(&AccessorSettings {
            singular: Some("member".into()),
            ..Default::default()
        });

        assert_eq!(merged.visibility, Some(Visibility::ReadOnly));
        assert_eq!(merged.singular.as_deref(), Some("member"));
        assert_eq!(merged.public_name, None);
    }

    #[test]
    fn test_class_names() {
        let class = ClassDescriptor::new("App\\Entity\\Group");
        assert_eq!(class.short_name(), "Group");
        assert_eq!(class.namespace(), "App\\Entity");
        assert_eq!(ClassDescriptor::new("Group").namespace(), "");
    }

    #[test]
    fn test_field_mapping_deserializes_from_toml() {
        let mapping: FieldMapping = toml::from_str(
            r#"
            name = "users"
            mapping = "association"
            kind = "many-to-many"
            target_entity = "App\\Entity\\User"
            mapped_by = "groups"
            "#,
        )
        .unwrap();

        assert!(mapping.is_to_many());
        assert!(matches!(&mapping.kind, MappingKind::Association { mapped_by: Some(side), .. } if side == "groups"));
        assert_eq!(mapping.type_name(), "App\\Entity\\User");
    }
}
