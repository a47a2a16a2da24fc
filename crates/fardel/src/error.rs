//! Typed errors for registry construction and bundle assembly
//!
//! External collaborators (template fetches, emission) report failures as
//! opaque `anyhow` errors that propagate unchanged; everything the crate
//! itself can get wrong is enumerated here.

use thiserror::Error;

use crate::templates::TemplateKind;
use crate::types::{NodeId, Uid};

/// Errors raised while populating a [`crate::ModuleRegistry`] or
/// [`crate::ExportTable`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A module with this uid is already registered.
    #[error("module uid {uid} is already registered")]
    DuplicateModule {
        /// The conflicting uid.
        uid: Uid,
    },

    /// An export name can only be bound once.
    #[error("export name `{name}` is already bound to module uid {existing}")]
    DuplicateExport {
        /// The conflicting export name.
        name: String,
        /// The uid the name was first bound to.
        existing: Uid,
    },

    /// The two parallel dependency sequences must have the same length;
    /// positional index is the sole correlation between them.
    #[error(
        "module uid {uid}: {sites} dependency call sites but {resolved} resolved targets"
    )]
    DependencyArityMismatch {
        /// The module the sequences belong to.
        uid: Uid,
        /// Number of call-site entries.
        sites: usize,
        /// Number of resolved-target entries.
        resolved: usize,
    },
}

/// Errors raised by the synchronous assembly pass.
///
/// Per-module failures are *not* errors: a module flagged as failed upstream
/// is silently omitted so the rest of the registry still bundles. What does
/// error is a caller contract violation, such as a template without the
/// expected slots, an export pointing at nothing, or a rewrite target that
/// does not exist in the module body it was recorded against.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A template does not expose the structural position the assembler
    /// splices into.
    #[error("malformed `{kind}` template: expected {expected}")]
    MalformedTemplate {
        /// Which template was malformed.
        kind: TemplateKind,
        /// The structural position that was missing.
        expected: &'static str,
    },

    /// A named export references a uid absent from the registry.
    #[error("named export `{name}` references unknown module uid {uid}")]
    UnknownNamedExport {
        /// The export name.
        name: String,
        /// The uid that was not found.
        uid: Uid,
    },

    /// A named export references a module excluded as failed.
    #[error("named export `{name}` references failed module uid {uid}")]
    NamedExportOfFailedModule {
        /// The export name.
        name: String,
        /// The failed module's uid.
        uid: Uid,
    },

    /// A side-effect-only require references a uid absent from the registry.
    #[error("side-effect require references unknown module uid {uid}")]
    UnknownNamelessRequire {
        /// The uid that was not found.
        uid: Uid,
    },

    /// A side-effect-only require references a module excluded as failed.
    #[error("side-effect require references failed module uid {uid}")]
    NamelessRequireOfFailedModule {
        /// The failed module's uid.
        uid: Uid,
    },

    /// Dependency call sites recorded for a module were not found in its
    /// body, or the nodes at those ids were not rewritable call expressions.
    #[error(
        "module uid {uid}: {count} dependency call site(s) missing or not rewritable",
        count = .sites.len()
    )]
    MissingRewriteSites {
        /// The module whose rewrite plan could not be fully applied.
        uid: Uid,
        /// The unapplied site ids, in ascending order.
        sites: Vec<NodeId>,
    },
}
