//! accessorgen core library.
//!
//! Generates PHP accessor traits (getters, setters, adders and removers) for
//! ORM entity classes from their mapping metadata, and links each trait into
//! its class with a single `use` statement. Accessors a class already declares,
//! itself or through an ancestor, are never generated.
//!
//! A run reads [`ClassDescriptor`]s and accessor annotations from a
//! [`metadata::Manifest`], resolves one [`AccessorPolicy`] per field, and
//! rewrites files below a source root through [`AccessorGenerator`].

pub mod config;
pub mod constraints;
pub mod emitter;
pub mod errors;
pub mod generator;
pub mod inflect;
pub mod layout;
pub mod members;
pub mod metadata;
pub mod rewriter;
pub mod runtime;
pub mod scanner;
pub mod settings;
pub mod types;

pub use config::GeneratorSettings;
pub use errors::*;
pub use generator::{AccessorGenerator, BatchPolicy, ClassFailure, ClassReport, GenerationReport};
pub use layout::SourceLayout;
pub use members::{ClassMembers, Introspector, KnownMembers, NoIntrospection, SourceIntrospector};
pub use metadata::{AnnotationReader, Manifest, MetadataProvider, select_classes};
pub use types::{
    AccessorKind, AccessorPolicy, AccessorSettings, AssociationKind, ClassDescriptor, FieldMapping, IdGenerator,
    JoinColumn, MappingKind, Visibility,
};
