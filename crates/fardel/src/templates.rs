//! Assembly templates and where they come from
//!
//! Assembly never builds the output skeleton from scratch. It clones slots
//! out of four template programs and fills them in:
//!
//! - `wrapper`: the whole artifact, a closure invoked with the module
//!   registry object. Its first statement must be an expression statement
//!   wrapping that call; the call's first argument is the (initially empty)
//!   registry object, and export wiring is appended to the closure body.
//! - `module`: holds one registry entry, the property of an object literal
//!   whose value is the module function. The entry's key literal is
//!   overwritten with the module uid and the module body is spliced into the
//!   function.
//! - `named` / `var-named`: one export wiring statement. Which of the two is
//!   fetched depends on [`Options::globalize_target`], and only the fetched
//!   one is used for every named export of that assembly.
//! - `nameless`: one side-effect require statement.
//!
//! The [`TemplateProvider`] seam exists so templates can come from anywhere
//! (disk, embedded fixtures, a test harness); [`BuiltinTemplates`] is the
//! default provider with the shapes above baked in.

use std::fmt;
use std::future::{self, Future};

use crate::ast::{LitValue, Program};
use crate::ast_builder as builder;
use crate::options::Options;

/// The template roles an assembly consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// The output skeleton the whole bundle lives in.
    Wrapper,
    /// One registry entry.
    Module,
    /// One named export wired onto a host object property.
    Named,
    /// One named export wired through a hoisted variable.
    VarNamed,
    /// One side-effect-only require.
    Nameless,
}

impl TemplateKind {
    /// Stable name, usable as a lookup key by providers that map kinds to
    /// files or fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Wrapper => "wrapper",
            TemplateKind::Module => "module",
            TemplateKind::Named => "named",
            TemplateKind::VarNamed => "var-named",
            TemplateKind::Nameless => "nameless",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of template programs.
///
/// `fetch` is async so providers that read from disk or over the wire fit
/// without blocking; [`TemplateSet::load`] drives the four fetches of one
/// assembly concurrently and fails fast on the first error.
pub trait TemplateProvider {
    /// Produce the template program for `kind`.
    fn fetch(&self, kind: TemplateKind) -> impl Future<Output = anyhow::Result<Program>> + Send;
}

/// The four template programs one assembly consumes.
///
/// `named` holds whichever of the named / var-named shapes matched the
/// options the set was loaded with; the assembler does not re-check.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    /// Output skeleton.
    pub wrapper: Program,
    /// Registry entry donor.
    pub module: Program,
    /// Named export wiring donor, already selected for the load options.
    pub named: Program,
    /// Side-effect require donor.
    pub nameless: Program,
}

impl TemplateSet {
    /// Fetch all templates needed under `options`, concurrently.
    ///
    /// The named/var-named choice is made here, before fetching, so a
    /// provider is only ever asked for the shape that will actually be used.
    pub async fn load(
        provider: &impl TemplateProvider,
        options: &Options,
    ) -> anyhow::Result<TemplateSet> {
        let named_kind = if options.globalize_target().is_some() {
            TemplateKind::Named
        } else {
            TemplateKind::VarNamed
        };
        let (wrapper, named, module, nameless) = futures::try_join!(
            provider.fetch(TemplateKind::Wrapper),
            provider.fetch(named_kind),
            provider.fetch(TemplateKind::Module),
            provider.fetch(TemplateKind::Nameless),
        )?;
        Ok(TemplateSet {
            wrapper,
            module,
            named,
            nameless,
        })
    }
}

/// The default provider: template shapes built in memory, no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateProvider for BuiltinTemplates {
    fn fetch(&self, kind: TemplateKind) -> impl Future<Output = anyhow::Result<Program>> + Send {
        future::ready(Ok(build(kind)))
    }
}

fn build(kind: TemplateKind) -> Program {
    match kind {
        TemplateKind::Wrapper => wrapper_template(),
        TemplateKind::Module => module_template(),
        TemplateKind::Named => named_template(),
        TemplateKind::VarNamed => var_named_template(),
        TemplateKind::Nameless => nameless_template(),
    }
}

/// ```js
/// (function (modules) {
///     var cache = {};
///     var require = function (id) {
///         var module = cache[id];
///         if (!module) {
///             module = cache[id] = {};
///             var exports = module.exports = {};
///             modules[id].call(exports, require, module, exports, window);
///         }
///         return module.exports;
///     };
/// })({});
/// ```
///
/// Module functions run with `this` bound to their exports object and
/// receive `(require, module, exports, global)`, matching the parameter list
/// of the module template. Results are cached by uid, so requiring a module
/// twice runs its body once.
fn wrapper_template() -> Program {
    let require_fn = builder::function_expr(
        &["id"],
        vec![
            builder::var_decl(vec![builder::declarator(
                "module",
                Some(builder::computed_member(
                    builder::name("cache"),
                    builder::name("id"),
                )),
            )]),
            builder::if_stmt(
                builder::unary("!", builder::name("module")),
                builder::block(vec![
                    builder::expr_stmt(builder::assign(
                        builder::name("module"),
                        builder::assign(
                            builder::computed_member(builder::name("cache"), builder::name("id")),
                            builder::object(vec![]),
                        ),
                    )),
                    builder::var_decl(vec![builder::declarator(
                        "exports",
                        Some(builder::assign(
                            builder::member(builder::name("module"), "exports"),
                            builder::object(vec![]),
                        )),
                    )]),
                    builder::expr_stmt(builder::call(
                        builder::member(
                            builder::computed_member(
                                builder::name("modules"),
                                builder::name("id"),
                            ),
                            "call",
                        ),
                        vec![
                            builder::name("exports"),
                            builder::name("require"),
                            builder::name("module"),
                            builder::name("exports"),
                            builder::name("window"),
                        ],
                    )),
                ]),
                None,
            ),
            builder::return_stmt(Some(builder::member(builder::name("module"), "exports"))),
        ],
    );
    builder::program(vec![builder::expr_stmt(builder::call(
        builder::function_expr(
            &["modules"],
            vec![
                builder::var_decl(vec![builder::declarator(
                    "cache",
                    Some(builder::object(vec![])),
                )]),
                builder::var_decl(vec![builder::declarator("require", Some(require_fn))]),
            ],
        ),
        vec![builder::object(vec![])],
    ))])
}

/// ```js
/// var module = { "id": function (require, module, exports, global) {} };
/// ```
fn module_template() -> Program {
    builder::program(vec![builder::var_decl(vec![builder::declarator(
        "module",
        Some(builder::object(vec![builder::property(
            LitValue::Str("id".to_owned()),
            builder::function_expr(&["require", "module", "exports", "global"], vec![]),
        )])),
    )])])
}

/// ```js
/// window["name"] = require(null);
/// ```
fn named_template() -> Program {
    builder::program(vec![builder::expr_stmt(builder::assign(
        builder::computed_member(builder::name("window"), builder::string_literal("name")),
        builder::call(builder::name("require"), vec![builder::null_literal()]),
    ))])
}

/// ```js
/// name = require(null);
/// ```
fn var_named_template() -> Program {
    builder::program(vec![builder::expr_stmt(builder::assign(
        builder::name("name"),
        builder::call(builder::name("require"), vec![builder::null_literal()]),
    ))])
}

/// ```js
/// require(null);
/// ```
fn nameless_template() -> Program {
    builder::program(vec![builder::expr_stmt(builder::call(
        builder::name("require"),
        vec![builder::null_literal()],
    ))])
}
