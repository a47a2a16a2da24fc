//! Module registry for tracking modules and export wiring during assembly
//!
//! The registry is the single source of truth for module identity: which
//! bodies exist, under which uid each one registers, and which dependency
//! call sites inside each body must be rewritten. The export table carries
//! the separate decision of which uids become named bindings in the host
//! environment and which are run purely for their side effects.
//!
//! Everything here is populated by the upstream resolution stage, consumed
//! read-only by one assembly pass, and discarded. Nothing survives across
//! invocations.

use crate::ast::Program;
use crate::error::RegistryError;
use crate::types::{FxIndexMap, NodeId, Uid};

/// One rewrite target inside a module body: the call site to rewrite and the
/// resolved uid to substitute, or `None` when the dependency stayed
/// unresolved and the call site must be nulled out.
///
/// Holding site and target in one record makes the "same length, positional
/// alignment" invariant of the two upstream sequences unbreakable by
/// construction; [`Module::with_parallel_deps`] accepts the raw parallel form
/// and checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySite {
    /// Node id of the require call expression inside the module body.
    pub call_site: NodeId,
    /// Target module uid, or `None` for an optional dependency that did not
    /// resolve.
    pub resolved: Option<Uid>,
}

impl DependencySite {
    /// A resolved dependency site.
    pub fn resolved(call_site: NodeId, target: impl Into<Uid>) -> Self {
        DependencySite {
            call_site,
            resolved: Some(target.into()),
        }
    }

    /// An unresolved dependency site; assembly nulls the call out.
    pub fn unresolved(call_site: NodeId) -> Self {
        DependencySite {
            call_site,
            resolved: None,
        }
    }
}

/// One unit of parsed source, ready to be registered in the bundle.
#[derive(Debug, Clone)]
pub struct Module {
    /// Registry key, and the literal substituted into sibling require sites.
    pub uid: Uid,
    /// The parsed body. Owned by the module once registered; the assembler
    /// clones it at splice time and never hands the clone back.
    pub body: Program,
    /// Rewrite targets inside `body`, in upstream discovery order.
    pub deps: Vec<DependencySite>,
    /// Set when upstream parsing or resolution failed; a failed module is
    /// excluded from assembly entirely.
    pub failed: bool,
}

impl Module {
    /// Create a module with no dependencies.
    pub fn new(uid: impl Into<Uid>, body: Program) -> Self {
        Module {
            uid: uid.into(),
            body,
            deps: Vec::new(),
            failed: false,
        }
    }

    /// Attach dependency sites.
    pub fn with_dependencies(mut self, deps: Vec<DependencySite>) -> Self {
        self.deps = deps;
        self
    }

    /// Create a module from the two parallel sequences the resolution stage
    /// produces: call sites and, positionally aligned, their resolved
    /// targets. Fails when the lengths differ.
    pub fn with_parallel_deps(
        uid: impl Into<Uid>,
        body: Program,
        sites: Vec<NodeId>,
        resolved: Vec<Option<Uid>>,
    ) -> Result<Self, RegistryError> {
        let uid = uid.into();
        if sites.len() != resolved.len() {
            return Err(RegistryError::DependencyArityMismatch {
                uid,
                sites: sites.len(),
                resolved: resolved.len(),
            });
        }
        let deps = sites
            .into_iter()
            .zip(resolved)
            .map(|(call_site, resolved)| DependencySite {
                call_site,
                resolved,
            })
            .collect();
        Ok(Module::new(uid, body).with_dependencies(deps))
    }

    /// Mark this module as failed upstream.
    pub fn failed(mut self) -> Self {
        self.failed = true;
        self
    }
}

/// Ordered collection of the modules to bundle.
///
/// Iteration order is registration order, and registration order is the
/// output's module registration order; the registry never reorders.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: FxIndexMap<Uid, Module>,
}

impl ModuleRegistry {
    /// Create a new empty module registry.
    pub fn new() -> Self {
        ModuleRegistry::default()
    }

    /// Register a module. Duplicate uids are rejected; the registry is keyed
    /// by uid and a second body under the same key could silently shadow the
    /// first in the output artifact.
    pub fn insert(&mut self, module: Module) -> Result<(), RegistryError> {
        if self.modules.contains_key(&module.uid) {
            return Err(RegistryError::DuplicateModule { uid: module.uid });
        }
        log::debug!(
            "registered module {} ({} dependency site(s){})",
            module.uid,
            module.deps.len(),
            if module.failed { ", failed" } else { "" }
        );
        self.modules.insert(module.uid.clone(), module);
        Ok(())
    }

    /// Get a module by uid.
    pub fn get(&self, uid: &Uid) -> Option<&Module> {
        self.modules.get(uid)
    }

    /// Whether a uid is registered at all, failed or not.
    pub fn contains(&self, uid: &Uid) -> bool {
        self.modules.contains_key(uid)
    }

    /// Whether a uid is registered and will appear in the output: present and
    /// not failed.
    pub fn is_active(&self, uid: &Uid) -> bool {
        self.modules.get(uid).is_some_and(|m| !m.failed)
    }

    /// Iterate all modules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Iterate the modules that will appear in the output, in registration
    /// order.
    pub fn active(&self) -> impl Iterator<Item = &Module> {
        self.modules.values().filter(|m| !m.failed)
    }

    /// Total number of registered modules, failed included.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Which modules become named bindings, and which run for side effects only.
///
/// Named entries keep insertion order, and the assembler emits all named
/// wiring before any side-effect require. That phase order is fixed, not
/// configurable.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    named: FxIndexMap<String, Uid>,
    nameless: Vec<Uid>,
}

impl ExportTable {
    /// Create an empty export table.
    pub fn new() -> Self {
        ExportTable::default()
    }

    /// Bind `name` in the host environment to the export of module `uid`.
    /// A name can only be bound once.
    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        uid: impl Into<Uid>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if let Some(existing) = self.named.get(&name) {
            return Err(RegistryError::DuplicateExport {
                name,
                existing: existing.clone(),
            });
        }
        self.named.insert(name, uid.into());
        Ok(())
    }

    /// Require module `uid` for its side effects, retaining no binding.
    pub fn push_nameless(&mut self, uid: impl Into<Uid>) {
        self.nameless.push(uid.into());
    }

    /// Named exports in insertion order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Uid)> {
        self.named.iter().map(|(name, uid)| (name.as_str(), uid))
    }

    /// Side-effect-only uids in insertion order.
    pub fn nameless(&self) -> &[Uid] {
        &self.nameless
    }

    /// Number of named exports.
    pub fn named_len(&self) -> usize {
        self.named.len()
    }

    /// Whether the table requests no wiring at all.
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.nameless.is_empty()
    }
}
