//! Fardel bundles parsed JavaScript modules into one self-contained browser
//! script.
//!
//! Parsing and dependency resolution happen upstream; this crate starts from
//! their results. Given a set of module bodies keyed by uid, the recorded
//! require call sites inside each body with their resolved targets, and a
//! table of what to export, it produces a single program: every module
//! registered as a function in a registry object, every require call pointing
//! at a sibling uid (or nulled out when its dependency is not in the bundle),
//! and export wiring that either attaches named modules to a host object or
//! declares them as plain variables, per [`Options`].
//!
//! # Architecture
//!
//! - [`ast`] - The JavaScript tree the crate operates on, plus [`ast_builder`]
//!   factories, [`ast_indexer`] node numbering, and the require-site
//!   [`visitors`]
//! - [`module_registry`] - [`ModuleRegistry`] and [`ExportTable`], the inputs
//!   one assembly consumes
//! - [`templates`] - The output skeleton and wiring donors, behind the
//!   [`TemplateProvider`] seam with [`BuiltinTemplates`] as default
//! - [`rewrite`] - In-place rewriting of require call sites by node id
//! - [`assembler`] - The synchronous pass that stitches everything together
//! - [`emit`] - Deterministic source generation and the [`Emit`] output seam
//! - [`error`] - What can go wrong, as typed errors
//!
//! # Assembly model
//!
//! Template fetches are the only async edge; [`bundle`] drives them
//! concurrently and then runs the pure, synchronous assembly. The same
//! registry, export table and options always produce the same tree, and the
//! same tree always prints as the same text, so whole-artifact comparisons
//! are stable.

pub mod assembler;
pub mod ast;
pub mod ast_builder;
pub mod ast_indexer;
pub mod emit;
pub mod error;
pub mod module_registry;
pub mod options;
pub mod rewrite;
pub mod templates;
pub mod types;
pub mod visitors;

pub use assembler::assemble;
pub use ast::Program;
pub use emit::{Emit, Generator, SingleFileEmitter};
pub use error::{AssembleError, RegistryError};
pub use module_registry::{DependencySite, ExportTable, Module, ModuleRegistry};
pub use options::Options;
pub use templates::{BuiltinTemplates, TemplateKind, TemplateProvider, TemplateSet};
pub use types::{NodeId, Uid};

/// Fetch templates from `provider` and assemble one bundle.
///
/// Provider failures propagate unchanged; assembly failures are
/// [`AssembleError`] values underneath the returned error. The produced
/// program is ready for [`Generator`](emit::Generator) or any [`Emit`] sink.
pub async fn bundle(
    provider: &impl TemplateProvider,
    modules: &ModuleRegistry,
    exports: &ExportTable,
    options: &Options,
) -> anyhow::Result<Program> {
    let templates = TemplateSet::load(provider, options).await?;
    let program = assemble(&templates, modules, exports, options)?;
    Ok(program)
}
