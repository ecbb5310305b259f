//! Batch generation over a set of classes.

use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::config::GeneratorSettings;
use crate::constraints::UniqueSymmetrically;
use crate::emitter::{MethodEmitter, method_name, render_artifact};
use crate::errors::{GenerateError, GenerateResult};
use crate::layout::SourceLayout;
use crate::members::{Introspector, KnownMembers, SourceIntrospector};
use crate::metadata::AnnotationReader;
use crate::rewriter;
use crate::runtime;
use crate::settings::{SettingsResolver, effective_descriptor};
use crate::types::ClassDescriptor;

/// What to do with the remaining classes once one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPolicy {
    /// Record the failure and carry on.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Outcome for one successfully processed class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassReport {
    pub class: String,
    pub host: PathBuf,
    pub backup: Option<PathBuf>,
    /// Unset in unlink-only runs.
    pub artifact: Option<PathBuf>,
    pub detached: bool,
    pub attached: bool,
    pub emitted: Vec<String>,
    /// Accessors left out because the class already has them.
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassFailure {
    pub class: String,
    pub message: String,
    #[serde(skip)]
    pub error: GenerateError,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub classes: Vec<ClassReport>,
    pub failures: Vec<ClassFailure>,
    /// Runtime trait files written alongside the accessors.
    pub runtime: Vec<PathBuf>,
    /// Set when [`BatchPolicy::Abort`] stopped the run early.
    pub aborted: bool,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn emitted_count(&self) -> usize {
        self.classes.iter().map(|class| class.emitted.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.classes.iter().map(|class| class.skipped.len()).sum()
    }
}

/// Builder for configuring and running accessor generation.
///
/// ```ignore
/// let manifest = Manifest::from_path(Path::new("accessors.toml"))?;
/// let report = AccessorGenerator::new("src/", &manifest)
///     .batch_policy(BatchPolicy::Abort)
///     .run(&manifest.classes, &select_classes(&manifest.classes, None))?;
/// ```
pub struct AccessorGenerator<'a> {
    root: PathBuf,
    reader: &'a dyn AnnotationReader,
    settings: GeneratorSettings,
    introspector: Option<Box<dyn Introspector + 'a>>,
    batch_policy: BatchPolicy,
    unlink_only: bool,
    with_runtime: bool,
}

impl<'a> AccessorGenerator<'a> {
    /// Generator for the sources below `root`, with default settings.
    pub fn new(root: impl Into<PathBuf>, reader: &'a dyn AnnotationReader) -> Self {
        Self {
            root: root.into(),
            reader,
            settings: GeneratorSettings::default(),
            introspector: None,
            batch_policy: BatchPolicy::default(),
            unlink_only: false,
            with_runtime: false,
        }
    }

    pub fn settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Source of members for classes not yet seen in this run.
    ///
    /// Default: scan each class's source file and its attached trait.
    pub fn introspector(mut self, introspector: impl Introspector + 'a) -> Self {
        self.introspector = Some(Box::new(introspector));
        self
    }

    pub fn batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    /// Only detach generated traits from their classes; write nothing new.
    pub fn unlink_only(mut self, unlink_only: bool) -> Self {
        self.unlink_only = unlink_only;
        self
    }

    /// Also write the runtime support traits.
    pub fn with_runtime(mut self, with_runtime: bool) -> Self {
        self.with_runtime = with_runtime;
        self
    }

    pub fn layout(&self) -> SourceLayout {
        SourceLayout::new(&self.root, &self.settings)
    }

    /// Processes `selected` in order.
    ///
    /// `all` is every class known to the metadata source; it supplies parent
    /// chains and the subclasses mapped superclasses borrow from. Per-class
    /// errors end up in the report; only a failure to write the runtime traits
    /// is returned as an error.
    pub fn run(self, all: &[ClassDescriptor], selected: &[&ClassDescriptor]) -> GenerateResult<GenerationReport> {
        let layout = self.layout();
        let introspector: Box<dyn Introspector + 'a> = match self.introspector {
            Some(introspector) => introspector,
            None => Box::new(SourceIntrospector::new(layout.clone())),
        };
        let mut members = KnownMembers::new(introspector).with_classes(all);
        let run = ClassRun {
            layout: &layout,
            settings: &self.settings,
            resolver: SettingsResolver::new(self.reader),
            emitter: MethodEmitter::new(self.settings.indent()),
            unlink_only: self.unlink_only,
        };

        let mut report = GenerationReport::default();
        for class in selected {
            info!("processing {}", class.name);
            match run.process(class, all, &mut members) {
                Ok(outcome) => {
                    info!(
                        "{}: {} accessors emitted, {} already present",
                        class.name,
                        outcome.emitted.len(),
                        outcome.skipped.len()
                    );
                    report.classes.push(outcome);
                }
                Err(error) => {
                    warn!("{}: {error}", class.name);
                    report.failures.push(ClassFailure {
                        class: class.name.clone(),
                        message: error.to_string(),
                        error,
                    });
                    if self.batch_policy == BatchPolicy::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        if self.with_runtime && !self.unlink_only {
            report.runtime = runtime::write_runtime(&self.root, &self.settings.runtime_namespace, &self.settings.extension)?;
        }

        Ok(report)
    }
}

/// Per-run state shared by every class.
struct ClassRun<'r> {
    layout: &'r SourceLayout,
    settings: &'r GeneratorSettings,
    resolver: SettingsResolver<'r>,
    emitter: MethodEmitter,
    unlink_only: bool,
}

impl ClassRun<'_> {
    fn process(
        &self,
        class: &ClassDescriptor,
        all: &[ClassDescriptor],
        members: &mut KnownMembers<'_>,
    ) -> GenerateResult<ClassReport> {
        // Configuration problems are reported before any file is touched.
        let effective = if self.unlink_only {
            None
        } else {
            let effective = effective_descriptor(class, all)?;
            if let Some(constraint) = UniqueSymmetrically::for_class(&effective)? {
                constraint.validate_against(&effective)?;
            }
            Some(effective)
        };

        let host = self.layout.host_path(&class.name);
        let marker = self.layout.marker(&class.name);
        let mut outcome = ClassReport {
            class: class.name.clone(),
            host: host.clone(),
            ..Default::default()
        };

        if self.settings.backup_existing {
            let backup = self.layout.backup_path(&host);
            rewriter::backup(&host, &backup)?;
            outcome.backup = Some(backup);
        }

        // The old trait must be gone before lookups, or its methods would
        // count as declared by the class.
        outcome.detached = rewriter::detach_marker(&host, &marker, members)?;

        let Some(effective) = effective else {
            return Ok(outcome);
        };

        let mut methods = Vec::new();
        for field in &effective.fields {
            let policy = self.resolver.resolve(field, &effective);
            for &kind in &policy.accessors {
                match self.emitter.emit(&policy, kind, &class.name, members) {
                    Some(code) => {
                        methods.push(code);
                        outcome.emitted.push(method_name(&policy, kind));
                    }
                    None => outcome.skipped.push(method_name(&policy, kind)),
                }
            }
        }

        let code = render_artifact(
            &self.layout.artifact_namespace(&class.name),
            class.short_name(),
            &self.settings.runtime_namespace,
            &methods,
            &self.settings.indent(),
        );
        let artifact = self.layout.artifact_path(&class.name);
        rewriter::write_artifact(&artifact, &code)?;
        outcome.artifact = Some(artifact);

        outcome.attached = rewriter::attach_marker(&host, &marker, &class.name)?;
        Ok(outcome)
    }
}
