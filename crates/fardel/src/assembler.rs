//! Bundle assembly
//!
//! One synchronous pass from templates, registry, export table and options to
//! the finished wrapper program. The pass owns nothing: it borrows its
//! inputs, clones the slots it fills in, and either returns the complete
//! artifact or an error with no partial output escaping.
//!
//! Phase order is fixed. Export targets are validated first, then every
//! active module is registered (its require sites rewritten on the way in),
//! then named export wiring is appended to the closure body, then side-effect
//! requires. A hoisted `var` statement for variable-style exports lands above
//! the closure as the program's first statement, after everything else
//! succeeded.

use crate::ast::{Expr, ExprCall, ExprObject, LitValue, Program, Property, PropertyKey, Stmt};
use crate::ast_builder as builder;
use crate::error::AssembleError;
use crate::module_registry::{ExportTable, ModuleRegistry};
use crate::options::Options;
use crate::rewrite;
use crate::templates::{TemplateKind, TemplateSet};
use crate::types::Uid;

/// Assemble one bundle program.
///
/// Modules flagged as failed upstream are omitted; requires pointing at them
/// are nulled out like any other unresolved dependency. Everything else that
/// can go wrong is a caller contract violation and comes back as a typed
/// [`AssembleError`] before any output exists.
pub fn assemble(
    templates: &TemplateSet,
    modules: &ModuleRegistry,
    exports: &ExportTable,
    options: &Options,
) -> Result<Program, AssembleError> {
    validate_exports(modules, exports)?;

    let mut wrapper = templates.wrapper.clone();
    register_modules(&mut wrapper, &templates.module, modules)?;

    let target = options.globalize_target();
    let mut declarators = Vec::new();
    let wiring = wiring_body_mut(&mut wrapper)?;
    for (name, uid) in exports.named() {
        wiring.push(named_export_stmt(&templates.named, target, name, uid)?);
        if target.is_none() {
            declarators.push(builder::declarator(name, None));
        }
    }
    for uid in exports.nameless() {
        wiring.push(nameless_stmt(&templates.nameless, uid)?);
    }

    // `A = require(0)` inside the closure assigns to an outer binding; the
    // declaration that creates it goes above the closure itself.
    if !declarators.is_empty() {
        wrapper.body.insert(0, builder::var_decl(declarators));
    }

    log::debug!(
        "assembled bundle with {} module(s), {} named export(s), {} side-effect require(s)",
        modules.active().count(),
        exports.named_len(),
        exports.nameless().len()
    );
    Ok(wrapper)
}

/// Every export target must be present and active before anything is built.
fn validate_exports(modules: &ModuleRegistry, exports: &ExportTable) -> Result<(), AssembleError> {
    for (name, uid) in exports.named() {
        match modules.get(uid) {
            None => {
                return Err(AssembleError::UnknownNamedExport {
                    name: name.to_owned(),
                    uid: uid.clone(),
                });
            }
            Some(module) if module.failed => {
                return Err(AssembleError::NamedExportOfFailedModule {
                    name: name.to_owned(),
                    uid: uid.clone(),
                });
            }
            Some(_) => {}
        }
    }
    for uid in exports.nameless() {
        match modules.get(uid) {
            None => {
                return Err(AssembleError::UnknownNamelessRequire { uid: uid.clone() });
            }
            Some(module) if module.failed => {
                return Err(AssembleError::NamelessRequireOfFailedModule { uid: uid.clone() });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Splice every active module into the wrapper's registry object, rewriting
/// its require sites on the cloned body before it lands.
fn register_modules(
    wrapper: &mut Program,
    module_template: &Program,
    modules: &ModuleRegistry,
) -> Result<(), AssembleError> {
    let entry = registration_entry(module_template)?;
    let registry_object = registry_object_mut(wrapper)?;

    for module in modules.iter() {
        if module.failed {
            log::debug!("module {} failed upstream, omitting from bundle", module.uid);
            continue;
        }

        let mut body = module.body.body.clone();
        let plan = rewrite::rewrite_plan(&module.deps, |uid| modules.is_active(uid));
        rewrite::apply_rewrites(&mut body, &plan).map_err(|sites| {
            AssembleError::MissingRewriteSites {
                uid: module.uid.clone(),
                sites,
            }
        })?;

        let mut slot = entry.clone();
        if let PropertyKey::Lit { value } = &mut slot.key {
            *value = LitValue::from(&module.uid);
        }
        if let Expr::Function(function) = &mut slot.value {
            function.body.extend(body);
        }
        log::debug!(
            "registered module {} ({} require rewrite(s))",
            module.uid,
            plan.len()
        );
        registry_object.properties.push(slot);
    }
    Ok(())
}

/// The registry entry donor inside the module template.
fn registration_entry(template: &Program) -> Result<&Property, AssembleError> {
    let malformed = |expected| AssembleError::MalformedTemplate {
        kind: TemplateKind::Module,
        expected,
    };
    let Some(Stmt::VarDecl(decl)) = template.body.first() else {
        return Err(malformed("a variable declaration as the first statement"));
    };
    let Some(Expr::Object(object)) = decl.declarations.first().and_then(|d| d.init.as_deref())
    else {
        return Err(malformed("an object initializer on the first declarator"));
    };
    let Some(property) = object.properties.first() else {
        return Err(malformed("one property in the object initializer"));
    };
    if !matches!(property.key, PropertyKey::Lit { .. }) {
        return Err(malformed("a literal property key"));
    }
    if !matches!(property.value, Expr::Function(_)) {
        return Err(malformed("a function expression as the property value"));
    }
    Ok(property)
}

/// One named export wiring statement, cloned from the template and filled in.
fn named_export_stmt(
    template: &Program,
    target: Option<&str>,
    name: &str,
    uid: &Uid,
) -> Result<Stmt, AssembleError> {
    let kind = if target.is_some() {
        TemplateKind::Named
    } else {
        TemplateKind::VarNamed
    };
    let malformed = move |expected| AssembleError::MalformedTemplate { kind, expected };

    let Some(stmt) = template.body.first() else {
        return Err(malformed("one statement"));
    };
    let mut stmt = stmt.clone();
    let Stmt::Expr(expr_stmt) = &mut stmt else {
        return Err(malformed("an expression statement"));
    };
    let Expr::Assign(assign) = expr_stmt.expression.as_mut() else {
        return Err(malformed("an assignment expression"));
    };
    match target {
        Some(target) => {
            let Expr::Member(member) = assign.left.as_mut() else {
                return Err(malformed("a member expression on the left"));
            };
            let Expr::Name(object) = member.object.as_mut() else {
                return Err(malformed("an identifier as the member object"));
            };
            object.name = target.to_owned();
            let Expr::Lit(property) = member.property.as_mut() else {
                return Err(malformed("a literal member property"));
            };
            property.value = LitValue::Str(name.to_owned());
        }
        None => {
            let Expr::Name(left) = assign.left.as_mut() else {
                return Err(malformed("an identifier on the left"));
            };
            left.name = name.to_owned();
        }
    }
    set_require_argument(assign.right.as_mut(), uid, malformed)?;
    Ok(stmt)
}

/// One side-effect require statement.
fn nameless_stmt(template: &Program, uid: &Uid) -> Result<Stmt, AssembleError> {
    let malformed = |expected| AssembleError::MalformedTemplate {
        kind: TemplateKind::Nameless,
        expected,
    };
    let Some(stmt) = template.body.first() else {
        return Err(malformed("one statement"));
    };
    let mut stmt = stmt.clone();
    let Stmt::Expr(expr_stmt) = &mut stmt else {
        return Err(malformed("an expression statement"));
    };
    set_require_argument(expr_stmt.expression.as_mut(), uid, malformed)?;
    Ok(stmt)
}

/// Point a template's `require(null)` at `uid`.
fn set_require_argument(
    expr: &mut Expr,
    uid: &Uid,
    malformed: impl Fn(&'static str) -> AssembleError,
) -> Result<(), AssembleError> {
    let Expr::Call(call) = expr else {
        return Err(malformed("a require call"));
    };
    let Some(Expr::Lit(argument)) = call.arguments.first_mut() else {
        return Err(malformed("a literal first argument in the require call"));
    };
    argument.value = LitValue::from(uid);
    Ok(())
}

/// The wrapper's closure invocation: `(function (...) { ... })({ ... })`.
fn wrapper_call_mut(wrapper: &mut Program) -> Result<&mut ExprCall, AssembleError> {
    let malformed = |expected| AssembleError::MalformedTemplate {
        kind: TemplateKind::Wrapper,
        expected,
    };
    let Some(Stmt::Expr(stmt)) = wrapper.body.first_mut() else {
        return Err(malformed("an expression statement as the first statement"));
    };
    match stmt.expression.as_mut() {
        Expr::Call(call) => Ok(call),
        _ => Err(malformed("a call expression in the first statement")),
    }
}

/// The registry object modules are spliced into.
fn registry_object_mut(wrapper: &mut Program) -> Result<&mut ExprObject, AssembleError> {
    match wrapper_call_mut(wrapper)?.arguments.first_mut() {
        Some(Expr::Object(object)) => Ok(object),
        _ => Err(AssembleError::MalformedTemplate {
            kind: TemplateKind::Wrapper,
            expected: "an object expression as the call's first argument",
        }),
    }
}

/// The closure body export wiring is appended to.
fn wiring_body_mut(wrapper: &mut Program) -> Result<&mut Vec<Stmt>, AssembleError> {
    match wrapper_call_mut(wrapper)?.callee.as_mut() {
        Expr::Function(closure) => Ok(&mut closure.body),
        _ => Err(AssembleError::MalformedTemplate {
            kind: TemplateKind::Wrapper,
            expected: "a function expression as the callee",
        }),
    }
}
